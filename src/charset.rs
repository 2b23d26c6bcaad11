//! Charsets supported by the RFC 2047 codec.

use encoding_rs::ISO_8859_2;

/// A charset an encoded word may declare.
///
/// Decoding is strict: malformed byte sequences yield `None` rather than
/// replacement characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Charset {
    Utf8,
    Utf16,
    Utf32,
    Latin1,
    Latin2,
}

impl Charset {
    /// Resolves a charset label, case-insensitively.
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" => Some(Self::Utf8),
            "utf-16" => Some(Self::Utf16),
            "utf-32" => Some(Self::Utf32),
            "iso-8859-1" => Some(Self::Latin1),
            "iso-8859-2" => Some(Self::Latin2),
            _ => None,
        }
    }

    /// Whether this is one of the ISO Latin charsets (the only ones the
    /// quoted-printable branch accepts).
    pub(crate) fn is_latin(self) -> bool {
        matches!(self, Self::Latin1 | Self::Latin2)
    }

    /// Decodes a full byte payload.
    ///
    /// UTF-16 and UTF-32 payloads honor a leading BOM and are read as
    /// big-endian without one.
    pub(crate) fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Latin2 => ISO_8859_2
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Into::into),
            Self::Utf16 => decode_utf16(bytes),
            Self::Utf32 => decode_utf32(bytes),
        }
    }

    /// Decodes a single byte (quoted-printable escapes). Only defined for
    /// the Latin charsets.
    pub(crate) fn decode_byte(self, byte: u8) -> Option<char> {
        match self {
            Self::Latin1 => Some(char::from(byte)),
            Self::Latin2 => ISO_8859_2
                .decode_without_bom_handling_and_without_replacement(&[byte])
                .and_then(|s| s.chars().next()),
            _ => None,
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (encoding, bytes) = match bytes {
        [0xfe, 0xff, rest @ ..] => (encoding_rs::UTF_16BE, rest),
        [0xff, 0xfe, rest @ ..] => (encoding_rs::UTF_16LE, rest),
        _ => (encoding_rs::UTF_16BE, bytes),
    };

    if bytes.len() % 2 != 0 {
        return None;
    }

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Into::into)
}

fn decode_utf32(bytes: &[u8]) -> Option<String> {
    let (big_endian, bytes) = match bytes {
        [0x00, 0x00, 0xfe, 0xff, rest @ ..] => (true, rest),
        [0xff, 0xfe, 0x00, 0x00, rest @ ..] => (false, rest),
        _ => (true, bytes),
    };

    if bytes.len() % 4 != 0 {
        return None;
    }

    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let scalar = if big_endian {
                u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
            } else {
                u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
            };

            char::from_u32(scalar)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_is_case_insensitive() {
        let tests = [
            ("utf-8", Some(Charset::Utf8)),
            ("UTF-8", Some(Charset::Utf8)),
            ("Utf-16", Some(Charset::Utf16)),
            ("utf-32", Some(Charset::Utf32)),
            ("ISO-8859-1", Some(Charset::Latin1)),
            ("iso-8859-2", Some(Charset::Latin2)),
            ("latin1", None),
            ("schtroomf", None),
            ("", None),
        ];

        for (label, expected) in tests {
            assert_eq!(Charset::from_label(label), expected, "label {label:?}");
        }
    }

    #[test]
    fn test_latin1_decodes_every_byte() {
        assert_eq!(Charset::Latin1.decode_byte(0xe9), Some('é'));
        assert_eq!(Charset::Latin1.decode(b"h\xe9ro").as_deref(), Some("héro"));
    }

    #[test]
    fn test_latin2_high_bytes() {
        // 0xB1 is LATIN SMALL LETTER A WITH OGONEK, 0xEC is E WITH CARON.
        assert_eq!(Charset::Latin2.decode_byte(0xb1), Some('ą'));
        assert_eq!(Charset::Latin2.decode_byte(0xec), Some('ě'));
    }

    #[test]
    fn test_utf8_strict() {
        assert_eq!(Charset::Utf8.decode("한".as_bytes()).as_deref(), Some("한"));
        assert_eq!(Charset::Utf8.decode(&[0xff, 0xfe, 0xfd]), None);
    }

    #[test]
    fn test_utf16_bom_handling() {
        // "hi" big-endian with and without BOM, little-endian with BOM.
        assert_eq!(
            Charset::Utf16.decode(&[0xfe, 0xff, 0x00, 0x68, 0x00, 0x69]).as_deref(),
            Some("hi")
        );
        assert_eq!(
            Charset::Utf16.decode(&[0x00, 0x68, 0x00, 0x69]).as_deref(),
            Some("hi")
        );
        assert_eq!(
            Charset::Utf16.decode(&[0xff, 0xfe, 0x68, 0x00, 0x69, 0x00]).as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn test_utf16_rejects_malformed() {
        // Lone high surrogates and odd lengths fail.
        assert_eq!(Charset::Utf16.decode(&[0xd8, 0x00, 0xd8, 0x00]), None);
        assert_eq!(Charset::Utf16.decode(&[0x00, 0x68, 0x00]), None);
    }

    #[test]
    fn test_utf32_round_trip_and_rejects() {
        assert_eq!(
            Charset::Utf32
                .decode(&[0x00, 0x00, 0xfe, 0xff, 0x00, 0x00, 0x00, 0x68])
                .as_deref(),
            Some("h")
        );
        assert_eq!(
            Charset::Utf32.decode(&[0x00, 0x01, 0xf6, 0x00]).as_deref(),
            Some("\u{1f600}")
        );
        // Beyond U+10FFFF.
        assert_eq!(Charset::Utf32.decode(&[0x00, 0x20, 0x00, 0x00]), None);
        // Truncated scalar.
        assert_eq!(Charset::Utf32.decode(&[0x00, 0x00, 0x00]), None);
    }
}
