//! Email address syntax validation and mailbox extraction.
//!
//! The entry points are [`correctly_formatted`] and [`mailbox`]. Both
//! are total: malformed input is an ordinary outcome reported through
//! the return value, never an error or a partial result.
//!
//! Extraction runs in three stages. An optional RFC 2047 decode first
//! resolves the text and character-class profile to validate against.
//! The local part is then taken as a dot-atom or, failing that, as a
//! quoted string. The remainder after the `@` finally has to pass as a
//! domain (via the injected predicate) or as a bracketed address
//! literal.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

use crate::{
    ip,
    mailbox::{Host, LocalPart, Mailbox},
    rfc2047,
    utils::indicators::{
        is_atext, is_atext_unicode, is_qtext_smtp, is_qtext_smtp_unicode, is_quoted_pair_smtp,
    },
};

/// Local parts are limited to 64 codepoints in either form.
const MAX_LOCAL_PART_LENGTH: usize = 64;

/// A single grapheme cluster in quoted text may combine at most 5
/// Unicode scalar values.
const MAX_CLUSTER_SCALARS: usize = 5;

/// IANA address-literal tag for IPv6.
const IPV6_TAG: &str = "IPv6:";

/// The RFC compatibility profile to validate against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compatibility {
    /// ASCII-only addresses per RFC 822/5322.
    Ascii,
    /// ASCII addresses plus RFC 2047 MIME-encoded Unicode.
    AsciiWithUnicodeExtension,
    /// Full internationalized addresses per RFC 6531.
    #[default]
    Unicode,
}

/// Validation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Options {
    /// Under [`Compatibility::AsciiWithUnicodeExtension`], re-encode a
    /// candidate that failed extraction as an RFC 2047 word and retry
    /// once.
    pub auto_encode_to_rfc2047: bool,
}

/// Returns `true` iff [`mailbox`] would succeed for the same arguments.
pub fn correctly_formatted(
    candidate: &str,
    options: Options,
    compatibility: Compatibility,
    allow_address_literal: bool,
    domain_validator: impl Fn(&str) -> bool,
) -> bool {
    mailbox(
        candidate,
        options,
        compatibility,
        allow_address_literal,
        domain_validator,
    )
    .is_some()
}

/// Validates `candidate` and extracts its local part and host.
///
/// `domain_validator` decides whether a (non-literal) host string is
/// acceptable; pass
/// [`PublicSuffixList::is_unrestricted`](crate::host::PublicSuffixList::is_unrestricted)
/// for public-suffix-based acceptance, or any custom pure predicate.
///
/// Returns `None` as soon as any step fails; no partial mailbox is ever
/// produced.
pub fn mailbox(
    candidate: &str,
    options: Options,
    compatibility: Compatibility,
    allow_address_literal: bool,
    domain_validator: impl Fn(&str) -> bool,
) -> Option<Mailbox> {
    let mut smtp_candidate = Cow::Borrowed(candidate);
    let mut extraction = compatibility;

    if compatibility != Compatibility::Ascii {
        match rfc2047::decode(candidate) {
            Some(decoded) => {
                smtp_candidate = Cow::Owned(decoded);
                extraction = Compatibility::Unicode;
            }
            // Not an encoded word: fall back to ASCII or full Unicode.
            None => {
                extraction = if compatibility == Compatibility::AsciiWithUnicodeExtension {
                    Compatibility::Ascii
                } else {
                    Compatibility::Unicode
                };
            }
        }
    }

    if let Some(dot_atom) = extract_dot_atom(&smtp_candidate, extraction) {
        let host_candidate = &smtp_candidate[dot_atom.len() + 1..];
        let host = extract_host(host_candidate, allow_address_literal, &domain_validator)?;

        return Some(Mailbox {
            email: candidate.to_owned(),
            local_part: LocalPart::DotAtom(dot_atom.to_owned()),
            host,
        });
    }

    if let Some(quoted) = extract_quoted_string(&smtp_candidate, extraction) {
        let host_candidate = &smtp_candidate[quoted.integral_length + 1..];
        let host = extract_host(host_candidate, allow_address_literal, &domain_validator)?;

        return Some(Mailbox {
            email: candidate.to_owned(),
            local_part: LocalPart::QuotedString(quoted.cleaned),
            host,
        });
    }

    if options.auto_encode_to_rfc2047 {
        if let Some(reencoded) = candidate_for_rfc2047(candidate, compatibility) {
            // Single bounded retry: the option is cleared before recursing.
            return mailbox(
                &reencoded,
                Options::default(),
                compatibility,
                allow_address_literal,
                domain_validator,
            );
        }
    }

    None
}

/// Repackages a Unicode candidate as an RFC 2047 word for the retry path.
///
/// Only applies under `AsciiWithUnicodeExtension`, for candidates that
/// are not already encoded words, contain no character outside the
/// Unicode quoted-text superset (newlines, tabs and the like are invalid
/// regardless of encoding), and contain at least one non-ASCII character
/// (otherwise the candidate was already validated as far as it can be).
fn candidate_for_rfc2047(candidate: &str, compatibility: Compatibility) -> Option<String> {
    if compatibility != Compatibility::AsciiWithUnicodeExtension
        || candidate.starts_with("=?")
        || !candidate.chars().all(is_qtext_smtp_unicode)
    {
        return None;
    }

    if candidate.is_ascii() {
        return None;
    }

    Some(rfc2047::encode(candidate))
}

fn extract_dot_atom(candidate: &str, compatibility: Compatibility) -> Option<&str> {
    if candidate.starts_with('"') {
        return None;
    }

    let dot_atom = &candidate[..candidate.find('@')?];

    let length = dot_atom.chars().count();

    if length == 0 || length > MAX_LOCAL_PART_LENGTH {
        return None;
    }

    let in_class: fn(char) -> bool = match compatibility {
        Compatibility::Ascii => is_atext,
        _ => is_atext_unicode,
    };

    // Labels split on `.` must each be non-empty and fully in class;
    // this also rules out leading/trailing and consecutive dots.
    if !dot_atom
        .split('.')
        .all(|label| !label.is_empty() && label.chars().all(in_class))
    {
        return None;
    }

    Some(dot_atom)
}

struct ExtractedQuotedText {
    /// Bytes consumed by the quoted string as written, delimiting quotes
    /// and escape markers included. The `@` follows at this offset.
    integral_length: usize,
    /// The quoted text with quotes removed and escapes collapsed.
    cleaned: String,
}

/// Scans a quoted-string local part.
///
/// Character-at-a-time state machine: `\` escapes the next character
/// (which must be printable ASCII), unescaped `"` toggles the string
/// boundary, and the second boundary quote must be followed immediately
/// by `@`. Anything else must be in the active quoted-text class, and
/// no grapheme cluster of the quoted text may combine more than
/// [`MAX_CLUSTER_SCALARS`] scalar values.
fn extract_quoted_string(
    candidate: &str,
    compatibility: Compatibility,
) -> Option<ExtractedQuotedText> {
    if !candidate.starts_with('"') {
        return None;
    }

    let in_class: fn(char) -> bool = match compatibility {
        Compatibility::Ascii => is_qtext_smtp,
        _ => is_qtext_smtp_unicode,
    };

    let mut cleaned = String::new();
    let mut integral_length = 0;
    let mut escaped = false;
    let mut dquotes = 0;
    let mut expecting_at = false;

    for (index, c) in candidate.char_indices() {
        if expecting_at {
            if c != '@' {
                return None;
            }

            if cleaned.chars().count() > MAX_LOCAL_PART_LENGTH {
                return None;
            }

            if !within_cluster_budget(&cleaned) {
                return None;
            }

            return Some(ExtractedQuotedText {
                integral_length,
                cleaned,
            });
        }

        integral_length = index + c.len_utf8();

        if escaped {
            cleaned.push(c);

            if !is_quoted_pair_smtp(c) {
                return None;
            }

            escaped = false;
            continue;
        }

        if c == '\\' {
            escaped = true;
            continue;
        }

        if c == '"' {
            dquotes += 1;

            if dquotes == 2 {
                expecting_at = true;
            }

            continue;
        }

        cleaned.push(c);

        if !in_class(c) {
            return None;
        }
    }

    // End of input before the `@`: unterminated quote or missing host.
    None
}

/// Every logical character (grapheme cluster) of the quoted text must
/// stay within [`MAX_CLUSTER_SCALARS`] scalar values.
fn within_cluster_budget(text: &str) -> bool {
    text.graphemes(true)
        .all(|cluster| cluster.chars().count() <= MAX_CLUSTER_SCALARS)
}

/// Resolves the host candidate, either as a bracketed address literal or
/// through the injected domain predicate.
fn extract_host(
    candidate: &str,
    allow_address_literal: bool,
    domain_validator: &impl Fn(&str) -> bool,
) -> Option<Host> {
    if let Some(bracketed) = candidate.strip_prefix('[') {
        if !allow_address_literal {
            return None;
        }

        let literal = bracketed.strip_suffix(']')?;

        let valid = match literal.strip_prefix(IPV6_TAG) {
            Some(address) => ip::match_ipv6(address),
            None => ip::match_ipv4(literal),
        };

        return valid.then(|| Host::AddressLiteral(literal.to_owned()));
    }

    domain_validator(candidate).then(|| Host::Domain(candidate.to_owned()))
}
