//! Line tokenizer for the interchange format.
//!
//! A line is `<level> [@xref@] <tag> [value]`. Lines that do not fit this
//! shape yield `None` and are skipped by the reader.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+(?:(@[^@\s]+@)\s+)?([A-Za-z0-9_]+)(?:\s+(.*))?$")
        .expect("valid gedcom line regex")
});

/// One tokenized input line borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GedcomLine<'a> {
    pub level: u32,
    /// Cross-reference token including its `@` delimiters.
    pub xref: Option<&'a str>,
    pub tag: &'a str,
    /// Remainder of the line, trimmed. Empty when absent.
    pub value: &'a str,
}

impl<'a> GedcomLine<'a> {
    /// Tokenizes one raw line.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let caps = LINE_RE.captures(raw.trim_end())?;
        let level = caps.get(1)?.as_str().parse::<u32>().ok()?;
        Some(Self {
            level,
            xref: caps.get(2).map(|m| m.as_str()),
            tag: caps.get(3)?.as_str(),
            value: caps.get(4).map_or("", |m| m.as_str().trim()),
        })
    }

    /// Returns whether the tag equals `expected`, ignoring ASCII case.
    pub fn is_tag(&self, expected: &str) -> bool {
        self.tag.eq_ignore_ascii_case(expected)
    }
}

/// Strips `@` delimiters from a cross-reference token.
///
/// Returns `None` for values that are not `@...@` references.
pub fn xref_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix('@')?.strip_suffix('@')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}
