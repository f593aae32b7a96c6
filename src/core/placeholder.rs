//! Bracket placeholder scanning and substitution.
//!
//! A placeholder is the text between a `[` and the next `]`. Scanning runs left to
//! right and never nests: once a `[` opens a span, everything up to the following `]`
//! (including further `[` characters, whitespace and newlines) is the name. A `[` with
//! no closing `]` after it is plain text, and so is everything after it.
//!
//! Extraction and substitution both walk the same [`spans`] iterator, so a name is
//! always matched as literal text and never interpreted as a pattern.
//!
//! ```
//! use indexmap::IndexMap;
//! use promptdeck::core::placeholder::{extract_placeholders, render};
//!
//! let content = "Hello [name], you are a [role]. Welcome, [name].";
//! assert_eq!(extract_placeholders(content), vec!["name", "role"]);
//!
//! let mut values = IndexMap::new();
//! values.insert("name".to_string(), "Ada".to_string());
//! values.insert("role".to_string(), "reviewer".to_string());
//! assert_eq!(render(content, &values), "Hello Ada, you are a reviewer. Welcome, Ada.");
//! ```

use indexmap::{IndexMap, IndexSet};

/// A bracketed span found in template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// Byte offset of the opening `[`
    pub start: usize,
    /// Byte offset one past the closing `]`
    pub end: usize,
    /// Text between the brackets
    pub name: &'a str,
}

/// Iterator over the placeholder spans of a string, in order of appearance.
#[derive(Debug, Clone)]
pub struct Spans<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Iterator for Spans<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.cursor..];
        let open = rest.find('[')?;
        let close = rest[open + 1..].find(']')?;

        let start = self.cursor + open;
        let name_start = start + 1;
        let name_end = name_start + close;
        self.cursor = name_end + 1;

        Some(Span {
            start,
            end: self.cursor,
            name: &self.text[name_start..name_end],
        })
    }
}

/// Scan `text` for placeholder spans.
pub fn spans(text: &str) -> Spans<'_> {
    Spans { text, cursor: 0 }
}

/// Distinct placeholder names in first-occurrence order.
pub fn extract_placeholders(content: &str) -> Vec<String> {
    spans(content)
        .map(|span| span.name)
        .collect::<IndexSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Substitute every span whose name is a key of `values` with that value.
///
/// Spans with names absent from `values` are copied through unchanged. Values are
/// inserted as-is and are not scanned again, so a value that itself looks like
/// `[other]` stays in the output literally.
pub fn render(content: &str, values: &IndexMap<String, String>) -> String {
    let mut output = String::with_capacity(content.len());
    let mut copied_to = 0;

    for span in spans(content) {
        if let Some(value) = values.get(span.name) {
            output.push_str(&content[copied_to..span.start]);
            output.push_str(value);
            copied_to = span.end;
        }
    }

    output.push_str(&content[copied_to..]);
    output
}

/// Format `name` as a placeholder token ready to insert into template content.
pub fn token(name: &str) -> String {
    format!("[{name}]")
}
