use std::path::PathBuf;

/// Library-level structured errors for dtweaks.
///
/// Every variant is fatal for the target being processed, never for the
/// whole run. The CLI binary wraps these with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum DtweaksError {
	#[error("Failed to read target file: {path}")]
	TargetRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to save target file: {path}")]
	TargetWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read rule file: {path}")]
	RuleFileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse {path}, line {line}: {reason}")]
	KeyFileParse {
		path: PathBuf,
		line: usize,
		reason: String,
	},

	#[error("Application {name} does not exist")]
	ApplicationNotFound { name: String },

	#[error("Error reading from stdin")]
	StdinRead {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write preview of {path}")]
	PreviewWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias using DtweaksError.
pub type Result<T> = std::result::Result<T, DtweaksError>;

/// A recoverable problem in a rule file.
///
/// Loading continues past these; the rule set stays usable but the
/// target that used it is reported as failed.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
	#[error("Invalid key {group}.{key} referenced in regex assignment")]
	InvalidRule { group: String, key: String },

	#[error("Key {group}.{key} has more than one regex")]
	DuplicateRegex { group: String, key: String },

	#[error("Failed to compile {group}.{key}$: {source}")]
	RegexCompile {
		group: String,
		key: String,
		#[source]
		source: regex::Error,
	},
}

impl RuleError {
	/// The rule file group the error belongs to.
	pub fn group(&self) -> &str {
		match self {
			RuleError::InvalidRule { group, .. }
			| RuleError::DuplicateRegex { group, .. }
			| RuleError::RegexCompile { group, .. } => group,
		}
	}

	/// The base key (without the regex suffix) the error belongs to.
	pub fn key(&self) -> &str {
		match self {
			RuleError::InvalidRule { key, .. }
			| RuleError::DuplicateRegex { key, .. }
			| RuleError::RegexCompile { key, .. } => key,
		}
	}
}
