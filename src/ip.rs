//! IP address literal syntax matching.
//!
//! Email hosts may be address literals instead of domain names, e.g.,
//! `user@[192.168.0.1]` or `user@[IPv6:2001:db8::1]` (RFC 5321 section
//! 4.1.3). This module checks the textual syntax of the bracketed value.
//!
//! Note: Zone identifiers (`fe80::1%eth0`) are rejected. General IPv6
//! text syntax allows them, but address literals must not carry
//! link-local scope.

/// Returns `true` iff `candidate` is a valid IPv4 or IPv6 address.
pub fn matches(candidate: &str) -> bool {
    match_ipv4(candidate) || match_ipv6(candidate)
}

/// Returns `true` iff `candidate` is a dotted-quad IPv4 address.
///
/// Exactly four `.`-separated decimal octets, each 0-255. A two-digit
/// octet may carry a leading zero (`05`), a three-digit octet may not
/// (`012` is rejected).
pub fn match_ipv4(candidate: &str) -> bool {
    let mut octets = 0;

    for octet in candidate.split('.') {
        if !is_ipv4_octet(octet) {
            return false;
        }

        octets += 1;
    }

    octets == 4
}

fn is_ipv4_octet(octet: &str) -> bool {
    if !octet.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    match octet.as_bytes() {
        [_] | [_, _] => true,
        [b'1', _, _] => true,
        [b'2', b'0'..=b'4', _] => true,
        [b'2', b'5', b'0'..=b'5'] => true,
        _ => false,
    }
}

/// Returns `true` iff `candidate` is a textual IPv6 address.
///
/// Accepts 8 uncompressed hextets, `::` compression with at most 7
/// expressed groups, and the IPv4-mapped tail forms `::a.b.c.d`,
/// `::ffff:a.b.c.d`, `::ffff:0:a.b.c.d`, and `h:...::a.b.c.d` with up
/// to four leading hextets. Zone identifiers are rejected.
pub fn match_ipv6(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.contains('%') {
        return false;
    }

    let Some(at) = candidate.find("::") else {
        // No compression: exactly eight hextets.
        let mut groups = 0;

        for group in candidate.split(':') {
            if !is_hextet(group) {
                return false;
            }

            groups += 1;
        }

        return groups == 8;
    };

    let (head, tail) = (&candidate[..at], &candidate[at + 2..]);

    let head_groups = match count_hextets(head) {
        Some(count) => count,
        None => return false,
    };

    if tail.contains('.') {
        return match_ipv4_tail(head_groups, tail);
    }

    match count_hextets(tail) {
        // The compression must stand for at least one omitted group.
        Some(tail_groups) => head_groups + tail_groups <= 7,
        None => false,
    }
}

/// Number of hextets in a `:`-separated (possibly empty) group list, or
/// `None` if any group is malformed. A second `::` shows up here as an
/// empty group and is rejected.
fn count_hextets(part: &str) -> Option<usize> {
    if part.is_empty() {
        return Some(0);
    }

    let mut groups = 0;

    for group in part.split(':') {
        if !is_hextet(group) {
            return None;
        }

        groups += 1;
    }

    Some(groups)
}

fn is_hextet(group: &str) -> bool {
    (1..=4).contains(&group.len()) && group.bytes().all(|b| b.is_ascii_hexdigit())
}

/// IPv4-mapped tails: `::v4`, `::ffff:v4`, `::ffff:0{1,4}:v4`, or
/// `h(:h){0,3}::v4`.
fn match_ipv4_tail(head_groups: usize, tail: &str) -> bool {
    if head_groups == 0 {
        if match_ipv4(tail) {
            return true;
        }

        let Some(rest) = tail.strip_prefix("ffff:") else {
            return false;
        };

        if match_ipv4(rest) {
            return true;
        }

        match rest.split_once(':') {
            Some((zeros, v4)) => {
                (1..=4).contains(&zeros.len())
                    && zeros.bytes().all(|b| b == b'0')
                    && match_ipv4(v4)
            }
            None => false,
        }
    } else {
        head_groups <= 4 && match_ipv4(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ipv4() {
        let tests = [
            "0.0.0.0",
            "1.2.3.4",
            "127.0.0.1",
            "192.168.254.254",
            "255.255.255.255",
            "05.09.00.99",
            "249.200.199.99",
        ];

        for test in tests {
            assert!(match_ipv4(test), "expected {test} to be valid IPv4");
            assert!(matches(test));
        }
    }

    #[test]
    fn test_invalid_ipv4() {
        let tests = [
            "",
            " ",
            "1.2.3",
            "1.2.3.4.5",
            "256.2.3.4",
            "1.2.3.260",
            "012.1.1.1",
            "1..2.3",
            ".1.2.3",
            "1.2.3.4.",
            "a.b.c.d",
            "1.2.3.4 ",
            "::1",
        ];

        for test in tests {
            assert!(!match_ipv4(test), "expected {test:?} to be invalid IPv4");
        }
    }

    #[test]
    fn test_valid_ipv6() {
        let tests = [
            "::",
            "::1",
            "0:0:0:0:0:0:0:1",
            "1:2:3:4:5:6:7:8",
            "2001:db8:0:0:0:0:2:1",
            "2001:db8::2:1",
            "fe80::1",
            "1::",
            "1:2:3:4:5:6:7::",
            "::2:3:4:5:6:7:8",
            "1::8",
            "1:2:3:4:5::7:8",
            "abcd:ef01:2345:6789:abcd:ef01:2345:6789",
        ];

        for test in tests {
            assert!(match_ipv6(test), "expected {test} to be valid IPv6");
            assert!(matches(test));
        }
    }

    #[test]
    fn test_invalid_ipv6() {
        let tests = [
            "",
            " ",
            ":",
            ":::",
            "1:::2",
            "1:2:3:4:5:6:7",
            "1:2:3:4:5:6:7:8:9",
            "1:2:3:4:5:6:7:8::",
            "12345::1",
            "g::1",
            "1:2:3:4:5:6:1.2.3.4",
            "127.0.0.1",
        ];

        for test in tests {
            assert!(!match_ipv6(test), "expected {test:?} to be invalid IPv6");
        }
    }

    #[test]
    fn test_ipv4_mapped_tails() {
        let valid = [
            "::1.2.3.4",
            "::ffff:192.168.0.1",
            "::ffff:0:255.255.255.255",
            "::ffff:0000:1.2.3.4",
            "1:2::10.0.0.1",
            "1:2:3:4::10.0.0.1",
        ];

        for test in valid {
            assert!(match_ipv6(test), "expected {test} to be valid IPv6");
        }

        let invalid = [
            "::ffff:256.0.0.1",
            "::ffff:1:2:1.2.3.4",
            "1:2:3:4:5::10.0.0.1",
            "::eeee:1.2.3.4",
        ];

        for test in invalid {
            assert!(!match_ipv6(test), "expected {test} to be invalid IPv6");
        }
    }

    #[test]
    fn test_zone_identifiers_rejected() {
        let tests = ["fe80::1%eth0", "fe80::1%25eth0", "::1%lo0"];

        for test in tests {
            assert!(!match_ipv6(test), "expected {test} to be rejected");
            assert!(!matches(test));
        }
    }
}
