//! Structured, editable view of a whole tag literal
//!
//! [`TagSet`] is used when a rule needs to rewrite a tag: it keeps every entry in
//! order together with its original text, so untouched entries render back exactly as
//! they were written.

use super::literal::{scan_pair, unquote};
use crate::error::{TagSyntaxKind, TaglintError};
use crate::result::Result;
use std::fmt;

/// One `key:"name,opt,..."` entry of a tag literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub key: String,
    pub name: String,
    pub options: Vec<String>,
    /// Original `key:"value"` text, dropped once the entry is edited
    raw: Option<String>,
}

impl TagEntry {
    /// The unquoted value: name followed by comma-separated options
    pub fn value(&self) -> String {
        if self.options.is_empty() {
            self.name.clone()
        } else {
            let mut parts = Vec::with_capacity(self.options.len() + 1);
            parts.push(self.name.as_str());
            parts.extend(self.options.iter().map(String::as_str));
            parts.join(",")
        }
    }

    /// Check whether an option token is present
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

impl fmt::Display for TagEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write!(f, "{}:{}", self.key, quote(&self.value())),
        }
    }
}

/// Ordered list of tag entries parsed from a literal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<TagEntry>,
}

impl TagSet {
    /// Parse tag text (without the surrounding backquotes)
    pub fn parse(tag: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut rest = tag;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            let (key, quoted, tail) =
                scan_pair(rest).map_err(|kind| TaglintError::tag_syntax(kind, tag))?;
            let value = unquote(quoted)
                .map_err(|_| TaglintError::tag_syntax(TagSyntaxKind::Value, tag))?;

            let mut segments = value.split(',');
            let name = segments.next().unwrap_or_default().to_string();
            let options = segments.map(str::to_string).collect();
            let raw_len = rest.len() - tail.len();

            entries.push(TagEntry {
                key: key.to_string(),
                name,
                options,
                raw: Some(rest[..raw_len].to_string()),
            });
            rest = tail;
        }

        Ok(Self { entries })
    }

    /// Parse a literal as written in source, trimming the surrounding backquotes
    pub fn parse_literal(literal: &str) -> Result<Self> {
        Self::parse(literal.trim_matches('`'))
    }

    /// All entries in source order
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// First entry with the given key
    pub fn get(&self, key: &str) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Remove every entry with the given key; returns whether anything was removed
    pub fn delete(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        before != self.entries.len()
    }

    /// Clear the name of the first entry with the given key, keeping its options
    pub fn clear_name(&mut self, key: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.name.clear();
                entry.raw = None;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a source literal: backquoted, or empty when no entries remain
    pub fn to_literal(&self) -> String {
        if self.entries.is_empty() {
            String::new()
        } else {
            format!("`{self}`")
        }
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Double-quote a value, escaping backslashes, quotes and control characters
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02x}"));
                } else {
                    out.push_str(&format!("\\u{code:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
