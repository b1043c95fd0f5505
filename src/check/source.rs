//! Source units handed to the analysis passes.

use std::fs;
use std::path::Path;

use super::types::CheckError;

/// One input file: the full text buffer plus its physical lines.
///
/// Immutable once read. Both passes iterate `lines()`; line numbers are
/// 1-indexed by the consumer via `enumerate`.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: String,
    text: String,
}

impl SourceUnit {
    /// Read a unit from disk. The file handle is released as soon as the
    /// buffer is captured.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, CheckError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            path: path.display().to_string(),
            text,
        })
    }

    /// Build a unit from an in-memory buffer.
    pub fn from_text(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }
}
