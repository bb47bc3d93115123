use crate::rules::matcher::glob_match;
use crate::rules::template::TemplateEngine;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Trailing character that turns a rule key into a regex assignment.
pub const REGEX_SUFFIX: char = '$';

/// How one key should be rewritten.
#[derive(Debug, Clone)]
pub struct KeyRule {
	/// Template rendered into the key's new value.
	pub template: String,

	/// Regex run against the current value; its captures feed the template.
	pub extractor: Option<Regex>,
}

/// Outcome of running a key rule's extractor against a value.
#[derive(Debug)]
pub enum Extraction<'h> {
	/// The rule has no extractor.
	Unconfigured,

	/// The extractor did not match; the key must be left alone.
	NoMatch,

	/// The extractor matched.
	Matched(Captures<'h>),
}

impl KeyRule {
	pub fn new(template: impl Into<String>) -> Self {
		KeyRule {
			template: template.into(),
			extractor: None,
		}
	}

	/// Run the extractor, if any, against `raw`.
	pub fn extract<'h>(&self, raw: &'h str) -> Extraction<'h> {
		match &self.extractor {
			None => Extraction::Unconfigured,
			Some(re) => match re.captures(raw) {
				Some(caps) => Extraction::Matched(caps),
				None => Extraction::NoMatch,
			},
		}
	}

	/// Compute the new value for a key currently set to `raw`.
	///
	/// Returns `None` when the extractor does not match.
	pub fn transform(&self, engine: &TemplateEngine, raw: &str) -> Option<String> {
		match self.extract(raw) {
			Extraction::Unconfigured => Some(engine.render(&self.template, raw, None)),
			Extraction::Matched(caps) => Some(engine.render(&self.template, raw, Some(&caps))),
			Extraction::NoMatch => None,
		}
	}
}

/// Key rules that apply to every target group matching `pattern`.
#[derive(Debug, Clone)]
pub struct GroupRule {
	/// `*`/`?` glob matched against whole group names.
	pub pattern: String,

	/// Key name to rule, sorted by key name.
	pub transformers: BTreeMap<String, KeyRule>,
}

impl GroupRule {
	pub fn new(pattern: impl Into<String>) -> Self {
		GroupRule {
			pattern: pattern.into(),
			transformers: BTreeMap::new(),
		}
	}

	/// Check if this group rule applies to the named target group.
	pub fn matches(&self, group: &str) -> bool {
		glob_match(&self.pattern, group)
	}

	/// The rule for `key`, if this group transforms it.
	pub fn key_rule(&self, key: &str) -> Option<&KeyRule> {
		self.transformers.get(key)
	}
}

/// All group rules of one rule file, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	pub groups: Vec<GroupRule>,
}

impl RuleSet {
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, GroupRule> {
		self.groups.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_extractor(template: &str, pattern: &str) -> KeyRule {
		KeyRule {
			template: template.to_string(),
			extractor: Some(Regex::new(pattern).unwrap()),
		}
	}

	#[test]
	fn test_extract_without_extractor() {
		let rule = KeyRule::new("x");
		assert!(matches!(rule.extract("anything"), Extraction::Unconfigured));
	}

	#[test]
	fn test_extract_match_and_miss() {
		let rule = with_extractor("$1", r"^(\w+)$");
		assert!(matches!(rule.extract("World"), Extraction::Matched(_)));
		assert!(matches!(rule.extract("two words"), Extraction::NoMatch));
	}

	#[test]
	fn test_transform() {
		let engine = TemplateEngine::new();
		let rule = with_extractor("Hello, $1!", r"^(\w+)$");
		assert_eq!(rule.transform(&engine, "World"), Some("Hello, World!".to_string()));
		assert_eq!(rule.transform(&engine, "two words"), None);

		let plain = KeyRule::new("[${*}]");
		assert_eq!(plain.transform(&engine, "v"), Some("[v]".to_string()));
	}

	#[test]
	fn test_extractor_is_unanchored() {
		let engine = TemplateEngine::new();
		let rule = with_extractor("$1", r"--(\w+)");
		assert_eq!(
			rule.transform(&engine, "app --profile default"),
			Some("profile".to_string())
		);
	}

	#[test]
	fn test_group_rule_matches() {
		let group = GroupRule::new("Desktop Action *");
		assert!(group.matches("Desktop Action new-window"));
		assert!(!group.matches("Desktop Entry"));
	}
}
