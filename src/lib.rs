//! # RFC-compliant email address syntax validation
//!
//! This crate validates email address syntax against three compatibility
//! profiles and, on success, decomposes the address into a structured
//! local-part/host representation:
//!
//! * [`Compatibility::Ascii`](validator::Compatibility::Ascii): classic
//!   ASCII-only addresses (RFC 822/5322),
//! * [`Compatibility::AsciiWithUnicodeExtension`](validator::Compatibility::AsciiWithUnicodeExtension):
//!   ASCII transport carrying RFC 2047 MIME-encoded Unicode,
//! * [`Compatibility::Unicode`](validator::Compatibility::Unicode): full
//!   internationalized addresses (RFC 6531).
//!
//! Validation is pure syntax checking: no network access, no mailbox
//! existence probing. Domain acceptability is delegated to an injected
//! predicate; [`host::PublicSuffixList`] provides the standard
//! public-suffix-based implementation.
//!
//! ## Example
//!
//! ```
//! use email_syntax::{
//!     host::PublicSuffixList,
//!     mailbox::{Host, LocalPart},
//!     validator::{self, Compatibility, Options},
//! };
//!
//! let suffixes = PublicSuffixList::parse("com\nnet\norg\n");
//!
//! let mailbox = validator::mailbox(
//!     "first.last@example.com",
//!     Options::default(),
//!     Compatibility::Unicode,
//!     false,
//!     |host| suffixes.is_unrestricted(host),
//! )
//! .unwrap();
//!
//! assert_eq!(mailbox.local_part, LocalPart::DotAtom("first.last".into()));
//! assert_eq!(mailbox.host, Host::Domain("example.com".into()));
//! ```
//!
//! The RFC 2047 codec ([`rfc2047`]) and the IP literal matcher ([`ip`])
//! are usable standalone.

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod charset;
pub mod host;
pub mod ip;
pub mod mailbox;
pub mod rfc2047;
pub mod utils;
pub mod validator;
