use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding extra `:`-separated rule directories.
pub const PATH_ENV_VAR: &str = "DTWEAKS_PATH";

/// Rule directories searched after the ones from [`PATH_ENV_VAR`].
pub const DEFAULT_RULE_DIRS: [&str; 3] = [
	"/etc/dtweaks.d",
	"/usr/local/share/dtweaks.d",
	"/usr/share/dtweaks.d",
];

/// Rule directories in search order, honoring `DTWEAKS_PATH`.
pub fn rule_dirs() -> Vec<PathBuf> {
	let extra = std::env::var_os(PATH_ENV_VAR);
	if let Some(ref value) = extra {
		debug!("Read {}: {}", PATH_ENV_VAR, value.to_string_lossy());
	}
	rule_dirs_from(extra.as_deref())
}

/// Rule directories for an explicit `DTWEAKS_PATH` value.
///
/// Directories from `extra` come first, in order, followed by
/// [`DEFAULT_RULE_DIRS`]. Empty components are ignored.
pub fn rule_dirs_from(extra: Option<&OsStr>) -> Vec<PathBuf> {
	let mut dirs: Vec<PathBuf> = extra
		.map(|value| {
			std::env::split_paths(value)
				.filter(|dir| !dir.as_os_str().is_empty())
				.collect()
		})
		.unwrap_or_default();

	dirs.extend(DEFAULT_RULE_DIRS.iter().map(PathBuf::from));
	dirs
}

/// Find the rule file for a target with the given file name.
///
/// The first directory containing a file of that name wins; rule files
/// are never merged across directories.
pub fn find_rule_file(dirs: &[PathBuf], basename: &OsStr) -> Option<PathBuf> {
	for dir in dirs {
		let candidate = dir.join(basename);
		debug!(
			"Searching for tweak for {}: {}",
			Path::new(basename).display(),
			candidate.display()
		);
		if candidate.is_file() {
			return Some(candidate);
		}
	}

	debug!("Search failed.");
	None
}
