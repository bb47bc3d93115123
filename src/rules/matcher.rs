use crate::rules::types::{GroupRule, RuleSet};
use tracing::debug;

/// Match `text` against a glob `pattern` as a whole.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character, everything else matches itself.
pub fn glob_match(pattern: &str, text: &str) -> bool {
	let pattern: Vec<char> = pattern.chars().collect();
	let text: Vec<char> = text.chars().collect();

	let (mut p, mut t) = (0, 0);
	// Position of the last `*` seen and the text position it was tried at.
	let mut backtrack: Option<(usize, usize)> = None;

	while t < text.len() {
		match pattern.get(p).copied() {
			Some('*') => {
				backtrack = Some((p, t));
				p += 1;
			}
			Some(c) if c == '?' || c == text[t] => {
				p += 1;
				t += 1;
			}
			_ => match backtrack {
				Some((star, star_t)) => {
					p = star + 1;
					t = star_t + 1;
					backtrack = Some((star, star_t + 1));
				}
				None => return false,
			},
		}
	}

	pattern[p..].iter().all(|&c| c == '*')
}

/// Find the first group rule, in declaration order, that applies to `group`.
pub fn find_matching_group<'a>(rules: &'a RuleSet, group: &str) -> Option<&'a GroupRule> {
	rules.iter().find(|rule| {
		debug!("Try to match section {} against {}", group, rule.pattern);
		rule.matches(group)
	})
}
