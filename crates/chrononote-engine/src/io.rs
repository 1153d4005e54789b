use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Notes file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a notes file into a document
pub fn load_notes(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(Document::from_text(&content))
}

/// Write the document's joined text to a notes file
pub fn save_notes(path: &Path, doc: &Document) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.text())?;
    Ok(())
}
