//! # Artifact Assembler
//!
//! Concatenates a header (package declaration + imports) with an ordered
//! sequence of blocks into one artifact, and writes artifacts with an
//! atomic-replace discipline so a half-written file is never visible.

use crate::error::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// An output unit: fixed header followed by extracted/projected blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Package/namespace declaration plus import list.
    pub header: String,
    /// Block texts in final emission order.
    pub blocks: Vec<String>,
}

impl Artifact {
    /// Creates an artifact from a header and its blocks.
    pub fn new(header: impl Into<String>, blocks: Vec<String>) -> Self {
        Self {
            header: header.into(),
            blocks,
        }
    }

    /// Renders the artifact text: header, then each block separated by one
    /// blank line, with a trailing newline. Deterministic for a fixed input.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.header.len() + self.blocks.iter().map(|b| b.len() + 2).sum::<usize>(),
        );
        out.push_str(self.header.trim_end());
        out.push('\n');
        for block in &self.blocks {
            out.push('\n');
            out.push_str(block.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Writes `content` to `path`, replacing any existing file atomically.
///
/// The content is rendered to a sibling `.tmp` file first and renamed into
/// place, so concurrent readers outside the process never observe a partial
/// write. Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    fs::write(&tmp, content)?;
    fs::rename(&tmp, path).map_err(|e| {
        // Leave no stray staging file behind on a failed rename.
        let _ = fs::remove_file(&tmp);
        AppError::Io(e)
    })?;

    Ok(())
}
