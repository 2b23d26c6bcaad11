//! Email host syntax validation against a public suffix rule table.
//!
//! A host is acceptable when it is syntactically a domain name *and* it
//! has a registrable label in front of a known public suffix. The rule
//! table follows the format and matching semantics of
//! <https://publicsuffix.org/list/>: rules are `.`-separated labels, a
//! label may be the wildcard `*`, and a rule may be prefixed `!` to mark
//! an exception to a wildcard rule.

use std::{fs, io, path::Path};

use log::debug;
use thiserror::Error;

/// Hosts are limited to 253 characters overall.
const MAX_HOST_LENGTH: usize = 253;

/// Individual labels are limited to 63 characters.
const MAX_LABEL_LENGTH: usize = 63;

/// Characters never allowed anywhere in a host.
const FORBIDDEN_HOST_CHARS: &str = ",~:!@#$%^&'\"(){}_*";

/// Error returned when a public suffix list cannot be loaded.
#[derive(Debug, Error)]
pub enum PublicSuffixListError {
    #[error("failed to read public suffix list")]
    Io(#[from] io::Error),
}

/// One label of a suffix rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RuleLabel {
    /// Matches exactly this label.
    Exact(String),
    /// `*`, matches any single label.
    Wildcard,
    /// `!name`, terminates matching: the rule applies iff the candidate
    /// label equals `name`, and a match marks the host acceptable
    /// regardless of other rules.
    Exception(String),
}

/// A single public suffix rule, e.g. `com`, `*.uk`, or `!www.ck`.
///
/// Labels are kept in written order, root-most label last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    labels: Vec<RuleLabel>,
}

impl Rule {
    /// Parses one rule line. Never fails: any text between dots is taken
    /// as a literal label.
    pub fn parse(line: &str) -> Self {
        let labels = line
            .split('.')
            .map(|label| match label {
                "*" => RuleLabel::Wildcard,
                _ => match label.strip_prefix('!') {
                    Some(name) => RuleLabel::Exception(name.to_owned()),
                    None => RuleLabel::Exact(label.to_owned()),
                },
            })
            .collect();

        Self { labels }
    }

    fn is_exception(&self) -> bool {
        matches!(self.labels.first(), Some(RuleLabel::Exception(_)))
    }

    /// Walks the rule and the candidate labels from the rightmost end.
    /// The rule matches when it is exhausted; extra leading candidate
    /// labels are permitted. An exception label settles the walk on the
    /// spot.
    fn matches(&self, labels: &[&str]) -> bool {
        if self.labels.is_empty() || labels.is_empty() {
            return false;
        }

        let mut rule_labels = self.labels.iter().rev();
        let mut labels = labels.iter().rev();

        loop {
            match (rule_labels.next(), labels.next()) {
                (None, _) => return true,
                (Some(_), None) => return false,
                (Some(RuleLabel::Exception(name)), Some(label)) => return name == label,
                (Some(RuleLabel::Wildcard), Some(_)) => {}
                (Some(RuleLabel::Exact(name)), Some(label)) => {
                    if name != label {
                        return false;
                    }
                }
            }
        }
    }

    fn label_count(&self) -> usize {
        self.labels.len()
    }
}

/// A loaded public suffix rule table.
///
/// Loaded once (from the newline-delimited list format) and read-only
/// afterwards; sharing it across threads is safe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicSuffixList {
    rules: Vec<Rule>,
}

impl PublicSuffixList {
    /// Parses the newline-delimited list format: lines starting with
    /// `//` are comments, blank lines are skipped, every remaining line
    /// is one rule.
    pub fn parse(text: &str) -> Self {
        let rules: Vec<Rule> = text
            .lines()
            .filter(|line| !line.starts_with("//") && !line.is_empty())
            .map(Rule::parse)
            .collect();

        debug!("loaded {} public suffix rules", rules.len());

        Self { rules }
    }

    /// Reads and parses a rule file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PublicSuffixListError> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns `true` iff `candidate` is a syntactically valid host that
    /// is not itself a public suffix, i.e. a registrable domain.
    pub fn is_unrestricted(&self, candidate: &str) -> bool {
        is_valid_email_host_syntax(candidate, &self.rules)
    }
}

impl From<Vec<Rule>> for PublicSuffixList {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

/// Validates host syntax and applies suffix-rule matching.
///
/// Syntax: 1-253 characters, no forbidden characters (see module docs),
/// no leading/trailing dot, and every `.`-split label 1-63 characters
/// long without a leading or trailing hyphen.
///
/// Rule decision: if any matching rule is an exception, the host is
/// accepted. Otherwise the matching rule with the most labels prevails
/// and the host is accepted iff it has strictly more labels than the
/// prevailing rule. No matching rule rejects the host.
pub fn is_valid_email_host_syntax(candidate: &str, rules: &[Rule]) -> bool {
    if !host_passes_guards(candidate) {
        return false;
    }

    let labels: Vec<&str> = candidate.split('.').collect();

    if !labels.iter().all(|label| label_passes_guards(label)) {
        return false;
    }

    let matched: Vec<&Rule> = rules.iter().filter(|rule| rule.matches(&labels)).collect();

    if matched.iter().any(|rule| rule.is_exception()) {
        return true;
    }

    match matched.iter().map(|rule| rule.label_count()).max() {
        Some(prevailing) => labels.len() > prevailing,
        None => false,
    }
}

fn host_passes_guards(candidate: &str) -> bool {
    let length = candidate.chars().count();

    (1..=MAX_HOST_LENGTH).contains(&length)
        && !candidate.starts_with('.')
        && !candidate.ends_with('.')
        && !candidate.chars().any(is_forbidden_host_char)
}

fn is_forbidden_host_char(c: char) -> bool {
    FORBIDDEN_HOST_CHARS.contains(c) || c.is_whitespace() || c.is_control() || is_format_char(c)
}

/// Unicode general category Cf (format characters): soft hyphen,
/// zero-width and bidirectional marks, BOM, tag characters. All are
/// invisible and have no business in a host name.
fn is_format_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0xad | 0x600..=0x605
            | 0x61c
            | 0x6dd
            | 0x70f
            | 0x890..=0x891
            | 0x8e2
            | 0x180e
            | 0x200b..=0x200f
            | 0x202a..=0x202e
            | 0x2060..=0x2064
            | 0x2066..=0x206f
            | 0xfeff
            | 0xfff9..=0xfffb
            | 0x110bd
            | 0x110cd
            | 0x13430..=0x1343f
            | 0x1bca0..=0x1bca3
            | 0x1d173..=0x1d17a
            | 0xe0001
            | 0xe0020..=0xe007f
    )
}

fn label_passes_guards(label: &str) -> bool {
    let length = label.chars().count();

    (1..=MAX_LABEL_LENGTH).contains(&length) && !label.starts_with('-') && !label.ends_with('-')
}
