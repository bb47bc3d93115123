//! Target discovery for dtweaks.
//!
//! This module handles:
//! - Reading target paths from standard input
//! - Resolving bare application names to installed desktop files

use crate::error::{DtweaksError, Result};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable listing the system data directories.
pub const DATA_DIRS_ENV_VAR: &str = "XDG_DATA_DIRS";

/// Data directories used when `XDG_DATA_DIRS` is unset or empty.
pub const DEFAULT_DATA_DIRS: [&str; 2] = ["/usr/local/share", "/usr/share"];

/// Read one target path per line into `targets`. Blank lines are skipped.
///
/// Reading stops at the first I/O or encoding error; the lines pushed
/// before it stay in `targets`.
pub fn read_targets<R: BufRead>(reader: R, targets: &mut Vec<String>) -> Result<()> {
	for line in reader.lines() {
		let line = line.map_err(|source| DtweaksError::StdinRead { source })?;
		let line = line.trim_end_matches('\r');
		if !line.is_empty() {
			targets.push(line.to_string());
		}
	}
	Ok(())
}

/// The system data directories, honoring `XDG_DATA_DIRS`.
pub fn system_data_dirs() -> Vec<PathBuf> {
	match std::env::var_os(DATA_DIRS_ENV_VAR) {
		Some(value) if !value.is_empty() => std::env::split_paths(&value)
			.filter(|dir| !dir.as_os_str().is_empty())
			.collect(),
		_ => DEFAULT_DATA_DIRS.iter().map(PathBuf::from).collect(),
	}
}

/// Locate `<dir>/applications/<name>.desktop` in the first data directory that has it.
pub fn find_application(name: &str, data_dirs: &[PathBuf]) -> Result<PathBuf> {
	let basename = format!("{name}.desktop");

	for dir in data_dirs {
		let path = dir.join("applications").join(&basename);
		debug!("Searching for application {}: {}", name, path.display());
		if path.exists() {
			return Ok(path);
		}
	}

	Err(DtweaksError::ApplicationNotFound {
		name: name.to_string(),
	})
}

/// Turn a command-line or stdin target into a path.
///
/// With `resolve_names`, a target without any `/` is treated as an
/// application name; everything else is taken as a path verbatim.
pub fn resolve_target(target: &str, resolve_names: bool, data_dirs: &[PathBuf]) -> Result<PathBuf> {
	if resolve_names && !target.contains('/') {
		let path = find_application(target, data_dirs)?;
		debug!("Resolved as {}.", path.display());
		return Ok(path);
	}

	Ok(Path::new(target).to_path_buf())
}
