//! Sensitive-data redaction for arch-report.
//!
//! Command output and configuration files that end up in a system report
//! often carry credentials, addresses and usernames. This crate masks them
//! with fixed placeholders before anything is written.
//!
//! # Rules
//!
//! Rules run in a fixed order and each one sees the output of the previous:
//!
//! 1. credential assignments (`password=...`, `api_token: ...`) → value becomes `<REDACTED>`
//! 2. email addresses → `<EMAIL>`
//! 3. dotted-quad IPv4 addresses → `<IP>`
//! 4. `/home/<name>` prefixes → `/home/<USER>`
//!
//! Placeholders never produce new matches, so the filter is idempotent.
//!
//! # Example
//!
//! ```
//! use ar_redact::RedactionFilter;
//!
//! let filter = RedactionFilter::new();
//! assert_eq!(filter.redact("password=hunter2"), "password=<REDACTED>");
//! assert_eq!(filter.redact("/home/alice/projects"), "/home/<USER>/projects");
//! ```

pub mod error;
pub mod filter;
pub mod policy;
pub mod rule;

pub use error::{RedactionError, Result};
pub use filter::{RedactedLine, RedactedLines, RedactionFilter, RedactionStats};
pub use policy::{CustomRule, RedactionPolicy};
pub use rule::{Ipv4Mode, RedactionRule, RuleKind, EMAIL, IP, REDACTED, USER};
