//! Source documents: raw text plus its comment-free form.

use std::sync::Arc;

use super::prepare::strip_comments;

/// Line separator used by a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineSeparator {
    #[default]
    Lf,
    CrLf,
}

impl LineSeparator {
    /// Detect the separator of `text`: CRLF if it occurs anywhere, else LF.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineSeparator::CrLf
        } else {
            LineSeparator::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
        }
    }
}

/// A document under analysis.
///
/// The cleaned text is derived once at construction and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDocument {
    raw: Arc<str>,
    cleaned: Arc<str>,
    separator: LineSeparator,
}

impl SourceDocument {
    /// Create a document, stripping comments from the cleaned form when
    /// `strip_comments` is set.
    pub fn new(raw: impl Into<Arc<str>>, strip: bool) -> Self {
        let raw = raw.into();
        let cleaned = if strip {
            Arc::from(strip_comments(&raw))
        } else {
            Arc::clone(&raw)
        };
        let separator = LineSeparator::detect(&raw);

        Self {
            raw,
            cleaned,
            separator,
        }
    }

    /// The text as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text with comments removed (or the raw text when stripping is off).
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    pub fn line_separator(&self) -> LineSeparator {
        self.separator
    }

    /// Lines of the raw text, without line terminators.
    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        split_lines(&self.raw)
    }

    /// Lines of the cleaned text, without line terminators.
    pub fn cleaned_lines(&self) -> impl Iterator<Item = &str> {
        split_lines(&self.cleaned)
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
