//! Desktop entry ("key file") documents.
//!
//! This module handles:
//! - Line-preserving parsing of the INI-like key file format
//! - Group/key enumeration and raw value access
//! - Loading from and saving to disk

pub mod document;

pub use document::{KeyFile, SyntaxError};

use crate::error::{DtweaksError, Result};
use std::path::Path;

/// Parse key file text, attributing syntax errors to `path`.
pub fn parse_key_file_str(content: &str, path: &Path) -> Result<KeyFile> {
	KeyFile::parse(content).map_err(|err| DtweaksError::KeyFileParse {
		path: path.to_path_buf(),
		line: err.line,
		reason: err.reason,
	})
}

/// Load a target document from disk.
pub fn load_target(path: &Path) -> Result<KeyFile> {
	let content = std::fs::read_to_string(path).map_err(|source| DtweaksError::TargetRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_key_file_str(&content, path)
}

/// Write a document back to `path`.
pub fn save_target(document: &KeyFile, path: &Path) -> Result<()> {
	std::fs::write(path, document.render()).map_err(|source| DtweaksError::TargetWrite {
		path: path.to_path_buf(),
		source,
	})
}
