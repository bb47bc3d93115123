use regex::{Captures, Regex};
use tracing::warn;

/// Recognizes `${name}`, `$name`, `$*` and `$$`. Everything between matches is literal text.
const TOKEN_PATTERN: &str = r"\$\{([^}]*)\}|\$([0-9A-Za-z_]+)|\$(\*)|\$\$";

/// A variable reference inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var<'t> {
	/// `${*}`: the key's raw value before transformation.
	Wildcard,

	/// A named capture group of the extractor.
	Named(&'t str),

	/// A numbered capture group of the extractor.
	Positional(usize),
}

impl<'t> Var<'t> {
	/// Classify a variable name.
	///
	/// All-digit names are positional. Regex group names cannot start with
	/// a digit, so a named lookup for them would always miss anyway.
	pub fn parse(name: &'t str) -> Self {
		if name == "*" {
			return Var::Wildcard;
		}
		if !name.is_empty()
			&& name.bytes().all(|b| b.is_ascii_digit())
			&& let Ok(index) = name.parse()
		{
			return Var::Positional(index);
		}
		Var::Named(name)
	}

	/// Resolve the variable. Anything that cannot be resolved is empty.
	pub fn resolve<'a>(&self, raw: &'a str, captures: Option<&Captures<'a>>) -> &'a str {
		let group = match (self, captures) {
			(Var::Wildcard, _) => return raw,
			(_, None) => return "",
			(Var::Named(name), Some(caps)) => caps.name(name),
			(Var::Positional(index), Some(caps)) => caps.get(*index),
		};
		group.map_or("", |m| m.as_str())
	}
}

/// One lexical piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
	Literal(&'t str),
	Var(Var<'t>),
}

/// Tokenizes and renders value templates.
///
/// Build one engine and share it by reference; rendering never mutates it.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
	tokenizer: Regex,
}

impl Default for TemplateEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl TemplateEngine {
	pub fn new() -> Self {
		TemplateEngine {
			tokenizer: Regex::new(TOKEN_PATTERN).expect("template token pattern is valid"),
		}
	}

	/// Split a template into literal text and variable references.
	pub fn tokenize<'t>(&self, template: &'t str) -> Vec<Token<'t>> {
		let mut tokens = Vec::new();
		let mut last = 0;

		for caps in self.tokenizer.captures_iter(template) {
			let Some(whole) = caps.get(0) else {
				continue;
			};

			if whole.start() > last {
				tokens.push(Token::Literal(&template[last..whole.start()]));
			}

			let token = if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
				Token::Var(Var::parse(name.as_str()))
			} else if caps.get(3).is_some() {
				warn!(
					"Template {:?} contains `$*`, which is literal text; use `${{*}}` for the current value",
					template
				);
				Token::Literal(whole.as_str())
			} else {
				// `$$`
				Token::Literal(&template[whole.start()..whole.start() + 1])
			};
			tokens.push(token);
			last = whole.end();
		}

		if last < template.len() {
			tokens.push(Token::Literal(&template[last..]));
		}

		tokens
	}

	/// Render `template` for a key whose current value is `raw`.
	///
	/// `captures` is the extractor's match, or `None` when the key rule
	/// has no extractor.
	pub fn render(&self, template: &str, raw: &str, captures: Option<&Captures<'_>>) -> String {
		let mut out = String::with_capacity(template.len());
		for token in self.tokenize(template) {
			match token {
				Token::Literal(text) => out.push_str(text),
				Token::Var(var) => out.push_str(var.resolve(raw, captures)),
			}
		}
		out
	}
}

/// Resolve a single variable name against a raw value and optional match.
pub fn resolve_var<'a>(name: &str, raw: &'a str, captures: Option<&Captures<'a>>) -> &'a str {
	Var::parse(name).resolve(raw, captures)
}
