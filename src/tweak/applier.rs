use crate::error::RuleError;
use crate::keyfile::KeyFile;
use crate::rules::{RuleSet, TemplateEngine, find_matching_group, load_rules};
use tracing::debug;

/// What applying a rule set changed in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TweakReport {
	/// Target groups that matched a group rule.
	pub groups_matched: usize,

	/// Keys whose value was rewritten.
	pub keys_rewritten: usize,

	/// Keys left alone because their extractor did not match.
	pub keys_skipped: usize,
}

/// Result of applying a whole rule file to a document.
#[derive(Debug, Default)]
pub struct Applied {
	pub report: TweakReport,

	/// Recoverable errors from loading the rule file.
	pub errors: Vec<RuleError>,
}

impl Applied {
	/// True when the rule file had no errors.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Load the rules in `tweaks` and apply them to `document`.
pub fn apply(document: &mut KeyFile, tweaks: &KeyFile, engine: &TemplateEngine) -> Applied {
	let loaded = load_rules(tweaks);
	let report = apply_rules(document, &loaded.rules, engine);

	Applied {
		report,
		errors: loaded.errors,
	}
}

/// Apply a rule set to `document` in place.
///
/// Each target group is rewritten by at most one group rule, the first
/// one whose pattern matches. Only keys present in both the target group
/// and the group rule are touched.
pub fn apply_rules(document: &mut KeyFile, rules: &RuleSet, engine: &TemplateEngine) -> TweakReport {
	let mut report = TweakReport::default();

	let groups: Vec<String> = document.groups().into_iter().map(String::from).collect();
	for group in &groups {
		let Some(group_rule) = find_matching_group(rules, group) else {
			continue;
		};
		debug!("Match found; applying tweaks.");
		report.groups_matched += 1;

		let keys: Vec<String> = document.keys(group).into_iter().map(String::from).collect();
		for key in &keys {
			let Some(key_rule) = group_rule.key_rule(key) else {
				debug!("Transform missing key {}.", key);
				continue;
			};
			let Some(raw) = document.get(group, key).map(String::from) else {
				continue;
			};

			match key_rule.transform(engine, &raw) {
				Some(value) => {
					document.set(group, key, &value);
					report.keys_rewritten += 1;
				}
				None => {
					debug!(
						"Desktop file key {} failed to match regex {}.",
						key,
						key_rule.extractor.as_ref().map_or("", |re| re.as_str())
					);
					report.keys_skipped += 1;
				}
			}
		}
	}

	report
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run(target: &str, tweaks: &str) -> (String, Applied) {
		let mut document = KeyFile::parse(target).unwrap();
		let tweaks = KeyFile::parse(tweaks).unwrap();
		let applied = apply(&mut document, &tweaks, &TemplateEngine::new());
		(document.render(), applied)
	}

	#[test]
	fn test_extractor_and_template() {
		let (out, applied) = run(
			"[App]\nName = World\n",
			"[App]\nName$ = ^(\\w+)$\nName = Hello, $1!\n",
		);
		assert!(applied.is_ok());
		assert_eq!(out, "[App]\nName=Hello, World!\n");
		assert_eq!(applied.report.keys_rewritten, 1);
	}

	#[test]
	fn test_extractor_miss_leaves_key_unchanged() {
		let target = "[App]\nName = two words\n";
		let (out, applied) = run(target, "[App]\nName$ = ^(\\w+)$\nName = Hello, $1!\n");
		assert!(applied.is_ok());
		assert_eq!(out, target);
		assert_eq!(applied.report.keys_skipped, 1);
		assert_eq!(applied.report.keys_rewritten, 0);
	}

	#[test]
	fn test_first_declared_group_wins() {
		let (out, _) = run("[App]\nName=x\n", "[App*]\nName=glob\n[App]\nName=exact\n");
		assert_eq!(out, "[App]\nName=glob\n");
	}

	#[test]
	fn test_unmatched_groups_and_keys_untouched() {
		let target = "\
# comment
[Desktop Entry]
Name = Editor
Comment = Edit   text
Exec=gedit %U

[Desktop Action new]
Name = New
";
		let (out, applied) = run(target, "[Desktop Entry]\nExec = env GTK_THEME=Adwaita ${*}\n");
		assert!(applied.is_ok());
		assert_eq!(
			out,
			target.replace("Exec=gedit %U", "Exec=env GTK_THEME=Adwaita gedit %U")
		);
		assert_eq!(applied.report.groups_matched, 1);
	}

	#[test]
	fn test_rule_keys_missing_from_target_are_not_added() {
		let target = "[Desktop Entry]\nName=A\n";
		let (out, _) = run(target, "[Desktop Entry]\nNoDisplay = true\n");
		assert_eq!(out, target);
	}

	#[test]
	fn test_glob_applies_to_every_matching_group() {
		let (out, applied) = run(
			"[Desktop Action a]\nExec=app --a\n[Desktop Action b]\nExec=app --b\n",
			"[Desktop Action *]\nExec = flatpak run ${*}\n",
		);
		assert_eq!(
			out,
			"[Desktop Action a]\nExec=flatpak run app --a\n[Desktop Action b]\nExec=flatpak run app --b\n"
		);
		assert_eq!(applied.report.groups_matched, 2);
	}

	#[test]
	fn test_locale_variant_needs_its_own_rule() {
		let (out, _) = run(
			"[Desktop Entry]\nName=Editor\nName[de]=Editor\n",
			"[Desktop Entry]\nName = Text Editor\n",
		);
		assert_eq!(out, "[Desktop Entry]\nName=Text Editor\nName[de]=Editor\n");
	}

	#[test]
	fn test_rule_errors_do_not_stop_other_rules() {
		let (out, applied) = run(
			"[App]\nName=World\nIcon=old\n",
			"[App]\nFoo$ = x\nIcon = new\n",
		);
		assert!(!applied.is_ok());
		assert_eq!(applied.errors.len(), 1);
		assert_eq!(out, "[App]\nName=World\nIcon=new\n");
	}

	#[test]
	fn test_named_captures() {
		let (out, _) = run(
			"[Desktop Entry]\nExec=/usr/bin/app %F\n",
			"[Desktop Entry]\nExec$ = ^(?P<bin>\\S+) (?P<args>.*)$\nExec = ${bin} --ozone-platform=wayland ${args}\n",
		);
		assert_eq!(
			out,
			"[Desktop Entry]\nExec=/usr/bin/app --ozone-platform=wayland %F\n"
		);
	}

	#[test]
	fn test_unused_group_rules_are_fine() {
		let target = "[Desktop Entry]\nName=A\n";
		let (out, applied) = run(target, "[Nothing Here]\nName = B\n");
		assert!(applied.is_ok());
		assert_eq!(out, target);
		assert_eq!(applied.report, TweakReport::default());
	}
}
