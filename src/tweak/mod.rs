//! Applying rule files to desktop entries.
//!
//! This module handles:
//! - Rewriting a document with a rule set
//! - Processing one target end to end (rule lookup, load, apply, output)

pub mod applier;

pub use applier::{Applied, TweakReport, apply, apply_rules};

use crate::config::find_rule_file;
use crate::error::{DtweaksError, Result};
use crate::keyfile::{load_target, save_target};
use crate::rules::{TemplateEngine, read_rule_file};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a rewritten document goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
	/// Write the document back to its own path.
	Persist,

	/// Print the document, tagged with its path, without touching disk.
	Preview,
}

/// Process one target file.
///
/// Returns `Ok(true)` on full success, including when no rule file exists
/// for the target. Returns `Ok(false)` when the rule file had recoverable
/// errors (the remaining rules are still applied and the output still
/// produced). Errors are fatal for this target only.
pub fn process_target<W: Write>(
	path: &Path,
	rule_dirs: &[PathBuf],
	mode: OutputMode,
	engine: &TemplateEngine,
	out: &mut W,
) -> Result<bool> {
	let Some(basename) = path.file_name() else {
		debug!("{} has no file name; nothing to do.", path.display());
		return Ok(true);
	};
	let Some(rule_path) = find_rule_file(rule_dirs, basename) else {
		return Ok(true);
	};

	let mut document = load_target(path)?;
	let tweaks = read_rule_file(&rule_path)?;

	let applied = apply(&mut document, &tweaks, engine);
	for err in &applied.errors {
		warn!("{}: {}", rule_path.display(), err);
	}
	debug!(
		"{}: {} group(s) matched, {} key(s) rewritten, {} key(s) skipped",
		path.display(),
		applied.report.groups_matched,
		applied.report.keys_rewritten,
		applied.report.keys_skipped
	);

	match mode {
		OutputMode::Preview => {
			write!(
				out,
				"\n=========={}==========\n\n{}\n",
				path.display(),
				document.render()
			)
			.map_err(|source| DtweaksError::PreviewWrite {
				path: path.to_path_buf(),
				source,
			})?;
		}
		OutputMode::Persist => save_target(&document, path)?,
	}

	Ok(applied.is_ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	struct Fixture {
		_dir: TempDir,
		rules: PathBuf,
		target: PathBuf,
	}

	fn fixture(target: &str, tweaks: Option<&str>) -> Fixture {
		let dir = tempfile::tempdir().unwrap();
		let rules = dir.path().join("rules");
		let apps = dir.path().join("apps");
		fs::create_dir(&rules).unwrap();
		fs::create_dir(&apps).unwrap();

		let target_path = apps.join("app.desktop");
		fs::write(&target_path, target).unwrap();
		if let Some(tweaks) = tweaks {
			fs::write(rules.join("app.desktop"), tweaks).unwrap();
		}

		Fixture {
			_dir: dir,
			rules,
			target: target_path,
		}
	}

	fn process(fx: &Fixture, mode: OutputMode) -> (Result<bool>, String) {
		let mut out = Vec::new();
		let result = process_target(
			&fx.target,
			&[fx.rules.clone()],
			mode,
			&TemplateEngine::new(),
			&mut out,
		);
		(result, String::from_utf8(out).unwrap())
	}

	#[test]
	fn test_persist_rewrites_file() {
		let fx = fixture("[Desktop Entry]\nName=Old\n", Some("[Desktop Entry]\nName = New\n"));
		let (result, out) = process(&fx, OutputMode::Persist);
		assert!(result.unwrap());
		assert!(out.is_empty());
		assert_eq!(
			fs::read_to_string(&fx.target).unwrap(),
			"[Desktop Entry]\nName=New\n"
		);
	}

	#[test]
	fn test_preview_leaves_file_alone() {
		let original = "[Desktop Entry]\nName=Old\n";
		let fx = fixture(original, Some("[Desktop Entry]\nName = New\n"));
		let (result, out) = process(&fx, OutputMode::Preview);
		assert!(result.unwrap());
		assert_eq!(fs::read_to_string(&fx.target).unwrap(), original);
		assert_eq!(
			out,
			format!(
				"\n=========={}==========\n\n[Desktop Entry]\nName=New\n\n",
				fx.target.display()
			)
		);
	}

	#[test]
	fn test_no_rule_file_is_success() {
		let original = "[Desktop Entry]\nName=Old\n";
		let fx = fixture(original, None);
		let (result, out) = process(&fx, OutputMode::Preview);
		assert!(result.unwrap());
		assert!(out.is_empty());
	}

	#[test]
	fn test_no_rule_file_does_not_read_target() {
		let dir = tempfile::tempdir().unwrap();
		let mut out = Vec::new();
		let result = process_target(
			&dir.path().join("missing.desktop"),
			&[dir.path().to_path_buf()],
			OutputMode::Persist,
			&TemplateEngine::new(),
			&mut out,
		);
		assert!(result.unwrap());
	}

	#[test]
	fn test_rule_errors_mark_failure_but_still_write() {
		let fx = fixture(
			"[Desktop Entry]\nName=Old\n",
			Some("[Desktop Entry]\nIcon$ = x\nName = New\n"),
		);
		let (result, _) = process(&fx, OutputMode::Persist);
		assert!(!result.unwrap());
		assert_eq!(
			fs::read_to_string(&fx.target).unwrap(),
			"[Desktop Entry]\nName=New\n"
		);
	}

	#[test]
	fn test_unparsable_target_is_fatal() {
		let fx = fixture("Name=no group\n", Some("[Desktop Entry]\nName = New\n"));
		let (result, _) = process(&fx, OutputMode::Persist);
		assert!(matches!(result, Err(DtweaksError::KeyFileParse { .. })));
	}

	#[test]
	fn test_unparsable_rule_file_is_fatal() {
		let original = "[Desktop Entry]\nName=Old\n";
		let fx = fixture(original, Some("garbage\n"));
		let (result, _) = process(&fx, OutputMode::Persist);
		assert!(matches!(result, Err(DtweaksError::KeyFileParse { .. })));
		assert_eq!(fs::read_to_string(&fx.target).unwrap(), original);
	}

	#[test]
	fn test_missing_target_with_rule_file_is_fatal() {
		let fx = fixture("[A]\n", Some("[A]\n"));
		fs::remove_file(&fx.target).unwrap();
		let (result, _) = process(&fx, OutputMode::Persist);
		assert!(matches!(result, Err(DtweaksError::TargetRead { .. })));
	}
}
