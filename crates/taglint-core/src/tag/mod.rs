//! Struct tag micro-parser
//!
//! Tags follow a small grammar: zero or more space-separated `key:"value"` pairs, where
//! each value is a backslash-escaped quoted string holding `name[,opt1[,opt2...]]` or
//! the skip marker `-`.
//!
//! - [`unquote`] and [`lookup`] decode the literal and select one dialect's value
//! - [`ParsedTag`] splits a dialect value into name and options
//! - [`TagSet`] is the editable multi-key form used to build suggested fixes

mod literal;
mod parsed;
mod set;

pub use literal::{lookup, unquote};
pub use parsed::ParsedTag;
pub use set::{TagEntry, TagSet};

/// Value that excludes a field from a dialect's checks
pub const SKIP_MARKER: &str = "-";
