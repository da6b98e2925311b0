//! Received text as shown to the user.

use crate::domain::error::{TermLinkError, TermLinkResult};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Anything that accepts flushed blocks of text.
pub trait LineSink {
    /// Append a block; the block may hold several `\n`-separated lines.
    fn append_block(&mut self, block: &str);
}

/// In-memory transcript with an optional line cap.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: VecDeque<String>,
    limit: usize,
}

impl Transcript {
    /// Create a transcript keeping at most `limit` lines (0 = unlimited).
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            limit,
        }
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whole transcript as one string.
    pub fn text(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    /// Write the transcript as UTF-8, adding `.txt` when the file name has no
    /// extension dot. Returns the path actually written.
    pub fn save(&self, path: impl AsRef<Path>) -> TermLinkResult<PathBuf> {
        let path = with_default_extension(path.as_ref());
        fs::write(&path, self.text()).map_err(|e| {
            TermLinkError::Output(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!("Saved {} transcript lines to {}", self.lines.len(), path.display());
        Ok(path)
    }

    fn trim_to_limit(&mut self) {
        if self.limit == 0 {
            return;
        }
        while self.lines.len() > self.limit {
            self.lines.pop_front();
        }
    }
}

impl LineSink for Transcript {
    fn append_block(&mut self, block: &str) {
        self.lines.extend(block.split('\n').map(str::to_string));
        self.trim_to_limit();
    }
}

fn with_default_extension(path: &Path) -> PathBuf {
    let has_dot = path
        .file_name()
        .map(|name| name.to_string_lossy().contains('.'))
        .unwrap_or(false);
    if has_dot {
        path.to_path_buf()
    } else {
        path.with_extension("txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blocks_become_lines() {
        let mut transcript = Transcript::new(0);
        transcript.append_block("one\ntwo");
        transcript.append_block("three");

        assert_eq!(transcript.lines().collect::<Vec<_>>(), vec!["one", "two", "three"]);
        assert_eq!(transcript.text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_line_limit() {
        let mut transcript = Transcript::new(2);
        transcript.append_block("a\nb\nc");

        assert_eq!(transcript.lines().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_save_adds_txt_extension() {
        let temp_dir = TempDir::new().unwrap();
        let mut transcript = Transcript::new(0);
        transcript.append_block("hello\nworld");

        let written = transcript.save(temp_dir.path().join("capture")).unwrap();
        assert_eq!(written, temp_dir.path().join("capture.txt"));
        assert_eq!(fs::read_to_string(&written).unwrap(), "hello\nworld");

        let written = transcript.save(temp_dir.path().join("capture.log")).unwrap();
        assert_eq!(written, temp_dir.path().join("capture.log"));
    }

    #[test]
    fn test_clear() {
        let mut transcript = Transcript::new(0);
        transcript.append_block("x");
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
