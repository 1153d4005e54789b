use thiserror::Error;

use crate::editing::Delta;

/// Errors for structural edits whose preconditions do not hold
///
/// These are caller errors, not data corruption: the session layer treats
/// them as no-ops and the document is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("line {0} does not exist")]
    LineOutOfRange(usize),
    #[error("line 0 has no previous line to merge into")]
    MergeAtFirstLine,
    #[error("cannot delete the only remaining line")]
    LastLineDeletion,
}

/// Ordered sequence of text lines, the canonical note buffer
///
/// Invariant: a document always has at least one line. An empty document is
/// a single empty line. Structural operations return a [`Delta`] describing
/// the line-index change so the timestamp index can be renumbered in the
/// same logical step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
    /// Version counter incremented on each applied command (enables change detection)
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document (one empty line)
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            version: 0,
        }
    }

    /// Create a document from joined text, splitting on `'\n'`
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            version: 0,
        }
    }

    /// The joined text, one `'\n'` separator per line boundary
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total length of the joined text in characters
    pub fn char_len(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        chars + self.lines.len() - 1
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Replace a line's content in place (no structural change)
    pub(crate) fn replace_line(&mut self, index: usize, text: &str) -> Result<(), EditError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(EditError::LineOutOfRange(index))?;
        text.clone_into(line);
        Ok(())
    }

    /// Insert a new line at `index`, shifting later lines down
    pub(crate) fn insert_line(&mut self, index: usize, text: &str) -> Result<Delta, EditError> {
        if index > self.lines.len() {
            return Err(EditError::LineOutOfRange(index));
        }
        self.lines.insert(index, text.to_string());
        Ok(Delta::insert(index))
    }

    /// Split the line at `index` at char offset `at`; the tail becomes a new
    /// line inserted immediately after. Offsets past the end of the line are
    /// clamped, producing an empty tail.
    pub(crate) fn split_line(&mut self, index: usize, at: usize) -> Result<Delta, EditError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(EditError::LineOutOfRange(index))?;
        let byte_at = line
            .char_indices()
            .nth(at)
            .map_or(line.len(), |(byte, _)| byte);
        let tail = line.split_off(byte_at);
        self.lines.insert(index + 1, tail);
        Ok(Delta::insert(index + 1))
    }

    /// Concatenate line `index` onto the end of line `index - 1` and remove it
    pub(crate) fn merge_with_previous(&mut self, index: usize) -> Result<Delta, EditError> {
        if index == 0 {
            return Err(EditError::MergeAtFirstLine);
        }
        if index >= self.lines.len() {
            return Err(EditError::LineOutOfRange(index));
        }
        let removed = self.lines.remove(index);
        self.lines[index - 1].push_str(&removed);
        Ok(Delta::remove(index))
    }

    /// Remove the line outright; the last remaining line cannot be deleted
    pub(crate) fn delete_line(&mut self, index: usize) -> Result<Delta, EditError> {
        if self.lines.len() <= 1 {
            return Err(EditError::LastLineDeletion);
        }
        if index >= self.lines.len() {
            return Err(EditError::LineOutOfRange(index));
        }
        self.lines.remove(index);
        Ok(Delta::remove(index))
    }
}
