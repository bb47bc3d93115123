use crate::error::{DtweaksError, Result, RuleError};
use crate::keyfile::{KeyFile, parse_key_file_str};
use crate::rules::types::{GroupRule, KeyRule, REGEX_SUFFIX, RuleSet};
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// A rule set together with every recoverable error hit while building it.
#[derive(Debug, Default)]
pub struct LoadedRules {
	/// Best-effort rules; usable even when `errors` is non-empty.
	pub rules: RuleSet,

	/// Problems in file order.
	pub errors: Vec<RuleError>,
}

impl LoadedRules {
	/// True when the rule file loaded without any error.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Build a rule set from a parsed rule file.
///
/// Each group becomes a [`GroupRule`] in file order. Plain keys define
/// templates (a repeated key replaces the template and keeps any
/// extractor). Keys ending in `$` attach an extractor to the plain key of
/// the same base name in the same group, wherever in the group that key
/// is declared. Errors are collected and loading carries on.
pub fn load_rules(tweaks: &KeyFile) -> LoadedRules {
	let mut loaded = LoadedRules::default();

	for group in tweaks.groups() {
		let mut rule = GroupRule::new(group);

		for (key, value) in tweaks.entries(group) {
			if key.ends_with(REGEX_SUFFIX) {
				continue;
			}
			rule.transformers
				.entry(key.to_string())
				.and_modify(|existing| existing.template = value.to_string())
				.or_insert_with(|| KeyRule::new(value));
		}

		for (key, value) in tweaks.entries(group) {
			let Some(base) = key.strip_suffix(REGEX_SUFFIX) else {
				continue;
			};
			if let Err(err) = attach_extractor(&mut rule, base, value) {
				loaded.errors.push(err);
			}
		}

		debug!(
			"Loaded group {} with {} key rule(s)",
			rule.pattern,
			rule.transformers.len()
		);
		loaded.rules.groups.push(rule);
	}

	loaded
}

/// Compile `pattern` and attach it to the key rule named `base`.
fn attach_extractor(
	group: &mut GroupRule,
	base: &str,
	pattern: &str,
) -> std::result::Result<(), RuleError> {
	let Some(key_rule) = group.transformers.get_mut(base) else {
		return Err(RuleError::InvalidRule {
			group: group.pattern.clone(),
			key: base.to_string(),
		});
	};

	if key_rule.extractor.is_some() {
		return Err(RuleError::DuplicateRegex {
			group: group.pattern.clone(),
			key: base.to_string(),
		});
	}

	let regex = Regex::new(pattern).map_err(|source| RuleError::RegexCompile {
		group: group.pattern.clone(),
		key: base.to_string(),
		source,
	})?;
	key_rule.extractor = Some(regex);

	Ok(())
}

/// Parse rule file text and build its rule set.
pub fn load_rules_str(content: &str, path: &Path) -> Result<LoadedRules> {
	let tweaks = parse_key_file_str(content, path)?;
	Ok(load_rules(&tweaks))
}

/// Read and parse the rule file at `path`.
pub fn read_rule_file(path: &Path) -> Result<KeyFile> {
	let content = std::fs::read_to_string(path).map_err(|source| DtweaksError::RuleFileRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_key_file_str(&content, path)
}
