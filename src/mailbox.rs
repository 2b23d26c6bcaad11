//! The parsed email address data model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A successfully validated email address, decomposed into its RFC 5321
/// components.
///
/// Produced only by [`crate::validator::mailbox`]; a `Mailbox` never
/// represents a partially valid address.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// The candidate string the mailbox was extracted from.
    pub email: String,
    /// The part before the `@`.
    pub local_part: LocalPart,
    /// The part after the `@`.
    pub host: Host,
}

/// The form of the local part.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalPart {
    /// Unquoted `.`-separated runs of permitted characters, e.g.
    /// `first.last`.
    DotAtom(String),
    /// A quoted local part, e.g. `"Mickey Mouse"`. The stored text is the
    /// cleaned value: delimiting quotes removed and escape markers
    /// collapsed, so `"\t"` is stored as `t`.
    QuotedString(String),
}

/// The form of the host.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// A domain name, e.g. `example.com`.
    Domain(String),
    /// An IP address literal without its brackets, e.g. `192.168.0.1` or
    /// `IPv6:2001:db8::1`.
    AddressLiteral(String),
}
