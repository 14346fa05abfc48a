//! Log module - the textual content handed to extractors

use std::io::Read;

/// Immutable, line-addressable log text
///
/// Every extractor receives the same `&LogStream` and walks it from the
/// start; nothing an extractor does can move or alter what the next one
/// sees.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogStream {
    text: String,
}

impl LogStream {
    /// Wrap already-loaded text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a whole source into memory
    ///
    /// Invalid UTF-8 is replaced rather than rejected; logs from older
    /// programs occasionally carry Latin-1 bytes in comment lines.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Full text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fresh iterator over lines, without line terminators
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the log has no content
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the log has nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

impl From<&str> for LogStream {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for LogStream {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
