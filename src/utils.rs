//! Character-class predicates shared by the extraction routines.

/// Character-class indicator functions.
///
/// The ASCII classes follow RFC 5321/5322 verbatim. The Unicode-extended
/// classes add `UTF8-non-ascii` per RFC 6531, minus the exclusions of
/// RFC 5198 section 2 (C0/C1 controls) and a small set of format
/// characters that are problematic in identifiers (bidirectional
/// overrides, deprecated formatting).
pub mod indicators {
    /// `atext` as defined in RFC 5322 section 3.2.3.
    ///
    /// ALPHA / DIGIT / "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" /
    /// "-" / "/" / "=" / "?" / "^" / "_" / "`" / "{" / "|" / "}" / "~"
    pub fn is_atext(c: char) -> bool {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '!' | '#'
                    | '$'
                    | '%'
                    | '&'
                    | '\''
                    | '*'
                    | '+'
                    | '-'
                    | '/'
                    | '='
                    | '?'
                    | '^'
                    | '_'
                    | '`'
                    | '{'
                    | '|'
                    | '}'
                    | '~'
            )
    }

    /// `atext` extended with `UTF8-non-ascii` (RFC 6531 section 3.3).
    pub fn is_atext_unicode(c: char) -> bool {
        is_atext(c) || is_permitted_non_ascii(c)
    }

    /// `qtextSMTP` as defined in RFC 5321 section 4.1.2.
    ///
    /// %d32-33 / %d35-91 / %d93-126 (printable US-ASCII except `"` and `\`)
    pub fn is_qtext_smtp(c: char) -> bool {
        matches!(u32::from(c), 0x20..=0x21 | 0x23..=0x5b | 0x5d..=0x7e)
    }

    /// `qtextSMTP` extended with `UTF8-non-ascii` (RFC 6531 section 3.3).
    pub fn is_qtext_smtp_unicode(c: char) -> bool {
        is_qtext_smtp(c) || is_permitted_non_ascii(c)
    }

    /// The character allowed after `\` in `quoted-pairSMTP` (RFC 5321
    /// section 4.1.2): any printable US-ASCII character, %d32-126.
    pub fn is_quoted_pair_smtp(c: char) -> bool {
        matches!(u32::from(c), 0x20..=0x7e)
    }

    /// Non-ASCII codepoints admitted by the Unicode-extended classes.
    ///
    /// Excluded: C1 controls (U+0080-U+009F, RFC 5198 section 2),
    /// bidirectional marks and embeddings/overrides/isolates
    /// (U+200E-U+200F, U+202A-U+202E, U+2066-U+2069), and the deprecated
    /// format characters U+206A-U+206F. Everything else above U+007F is
    /// allowed, including all supplementary planes.
    pub fn is_permitted_non_ascii(c: char) -> bool {
        let cp = u32::from(c);

        cp > 0x7f
            && !matches!(
                cp,
                0x80..=0x9f | 0x200e..=0x200f | 0x202a..=0x202e | 0x2066..=0x206f
            )
    }
}
