//! RFC 2047 encoded-word codec.
//!
//! An encoded word has the fixed shape `=?charset?encoding?text?=` and
//! carries non-ASCII text through ASCII-only transports. The validator
//! uses it for the `AsciiWithUnicodeExtension` compatibility profile;
//! [`decode`] and [`encode`] are also usable standalone.

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine,
};

use crate::charset::Charset;

/// RFC 2047 section 2: an encoded word may be at most 75 characters, plus
/// the terminating delimiter.
const MAX_ENCODED_WORD_LENGTH: usize = 76;

/// Decodes an RFC 2047 encoded word.
///
/// Supported charsets are utf-8, utf-16, utf-32, iso-8859-1, and
/// iso-8859-2 (case-insensitive); supported encodings are `b` (base64)
/// and `q` (quoted-printable, ISO charsets only). Returns `None` for
/// anything malformed: wrong shape, unknown charset, oversized input,
/// bad base64, invalid byte sequences for the declared charset, or
/// quoted-printable escapes that resolve to control characters.
pub fn decode(encoded: &str) -> Option<String> {
    if encoded.chars().count() > MAX_ENCODED_WORD_LENGTH {
        return None;
    }

    let word = EncodedWord::parse(encoded)?;
    let charset = Charset::from_label(word.charset)?;

    match word.encoding.to_ascii_lowercase() {
        'b' => {
            let bytes = STANDARD.decode(pad(word.text)).ok()?;

            charset.decode(&bytes)
        }
        'q' => decode_quoted_printable(word.text, charset),
        _ => None,
    }
}

/// Encodes `text` as an RFC 2047 encoded word.
///
/// Always produces the base64/UTF-8 form, `=?utf-8?b?...?=`, with the
/// base64 padding stripped.
pub fn encode(text: &str) -> String {
    format!("=?utf-8?b?{}?=", STANDARD_NO_PAD.encode(text.as_bytes()))
}

/// Restores the `=` padding stripped from a base64 value.
pub(crate) fn pad(value: &str) -> String {
    const PADDING: [&str; 4] = ["", "===", "==", "="];

    format!("{value}{}", PADDING[value.len() % 4])
}

struct EncodedWord<'a> {
    charset: &'a str,
    encoding: char,
    text: &'a str,
}

impl<'a> EncodedWord<'a> {
    /// Splits `=?charset?encoding?text?=`. The text portion may itself
    /// contain `?`.
    fn parse(encoded: &'a str) -> Option<Self> {
        let inner = encoded.strip_prefix("=?")?.strip_suffix("?=")?;

        let (charset, rest) = inner.split_once('?')?;
        let (encoding, text) = rest.split_once('?')?;

        if charset.is_empty()
            || !charset
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return None;
        }

        let mut chars = encoding.chars();
        let encoding = chars.next()?;

        if chars.next().is_some() || !matches!(encoding, 'b' | 'B' | 'q' | 'Q') {
            return None;
        }

        Some(Self {
            charset,
            encoding,
            text,
        })
    }
}

/// Quoted-printable branch. Literal characters are copied through,
/// except control characters, which have no place in an encoded word;
/// `=` introduces exactly two hex digits forming one byte, decoded under
/// `charset`. Bytes below 0x20 and the byte 0xFF are rejected, as is a
/// dangling escape.
fn decode_quoted_printable(text: &str, charset: Charset) -> Option<String> {
    if !charset.is_latin() {
        return None;
    }

    let mut decoded = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '=' {
            if c.is_control() {
                return None;
            }

            decoded.push(c);
            continue;
        }

        let high = chars.next()?.to_digit(16)?;
        let low = chars.next()?.to_digit(16)?;
        let value = (high << 4 | low) as u8;

        if value < 0x20 || value == 0xff {
            return None;
        }

        decoded.push(charset.decode_byte(value)?);
    }

    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_base64() {
        let tests = [
            ("=?utf-8?B?7ZWcQHgu7ZWc6rWt?=", "한@x.한국"),
            ("=?utf-8?b?dXNlckBzaXRlLmNvbQ?=", "user@site.com"),
            ("=?UTF-8?b?dGVzdA?=", "test"),
            ("=?Utf-8?b?dGVzdA?=", "test"),
        ];

        for (encoded, expected) in tests {
            assert_eq!(decode(encoded).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_decode_latin_quoted_printable() {
        let tests = [
            ("=?iso-8859-1?q?h=E9ro@cinema.ca?=", "héro@cinema.ca"),
            ("=?iso-8859-1?q?Santa=20Claus?=", "Santa Claus"),
            (
                "=?iso-8859-1?q?\"Santa=20Claus\"@x=20.com?=",
                "\"Santa Claus\"@x .com",
            ),
            ("=?iso-8859-2?q?=B1@site.com?=", "ą@site.com"),
            ("=?iso-8859-2?q?=EC@site.com?=", "ě@site.com"),
        ];

        for (encoded, expected) in tests {
            assert_eq!(decode(encoded).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_decode_utf16_utf32_base64() {
        // "test" in UTF-16BE with BOM: FE FF 00 74 00 65 00 73 00 74
        assert_eq!(decode("=?utf-16?b?/v8AdABlAHMAdA?=").as_deref(), Some("test"));
        // "hi" in UTF-32BE with BOM.
        assert_eq!(
            decode("=?utf-32?b?AAD+/wAAAGgAAABp?=").as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let tests = [
            // Missing delimiters.
            "notEncoded@site.com",
            "=?iso-8859-1?q?h=E9ro@cinema.ca?",
            // Unknown charset, unknown encoding.
            "=?schtroomf?b?shackalaka?=",
            "=?iso-8859-1?r?h=E9ro@cinema.ca?=",
            // q-encoding is not defined for the UTF charsets here.
            "=?utf-8?q?hello=64@site.com?=",
            "=?utf-8?Q?thisShouldNotWork@site.com?=",
            // Bad hex escapes.
            "=?iso-8859-1?q?h=G9ro@cinema.ca?=",
            "=?iso-8859-1?q?hero@cinema.c=3?=",
            // Control character 0x09.
            "=?iso-8859-1?q?h=09ro@cinema.ca?=",
            "=?iso-8859-2?q?=09@site.com?=",
            // Literal control characters.
            "=?iso-8859-1?q?a\nb?=",
            "=?iso-8859-1?q?a\tb?=",
            "=?iso-8859-2?q?a\rb?=",
            // Broken base64.
            "=?utf-8?B?7?=",
            "=?utf-8?B?7x_?=",
            "=?utf-8?b?dGVz dA?=",
            "=?utf-8?b?7ZWcQHgu!@#?=",
        ];

        for test in tests {
            assert_eq!(decode(test), None, "expected {test:?} to fail");
        }
    }

    #[test]
    fn test_decode_rejects_oversized_input() {
        let encoded =
            "=?iso-8859-1?q?1234567890123456789012345678901234567890123456789012345678901234567890@toolong.net?=";

        assert!(encoded.len() > 76);
        assert_eq!(decode(encoded), None);
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("한@x.한국"), "=?utf-8?b?7ZWcQHgu7ZWc6rWt?=");
        assert_eq!(encode(""), "=?utf-8?b??=");
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let tests = [
            "",
            "user@domain.com",
            "한@x.한국",
            "café@bistro.fr",
            "用户@例子.中国",
            "test.user+tag@example.com",
            "a!b#c$d%e@site.com",
        ];

        for test in tests {
            assert_eq!(decode(&encode(test)).as_deref(), Some(test));
        }
    }

    #[test]
    fn test_pad() {
        let tests = [
            ("", ""),
            ("x", "x==="),
            ("xx", "xx=="),
            ("xxx", "xxx="),
            ("xxxx", "xxxx"),
            ("7ZWcQHgu7ZWc6rWt", "7ZWcQHgu7ZWc6rWt"),
        ];

        for (value, expected) in tests {
            assert_eq!(pad(value), expected);
        }
    }
}
