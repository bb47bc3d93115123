use std::fmt;

/// One physical line of a key file.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
	/// Blank line or `#` comment, kept verbatim.
	Comment(String),

	/// `[name]` group header.
	Group { raw: String, name: String },

	/// `key=value` pair. `raw` is what gets written back.
	Entry {
		raw: String,
		key: String,
		value: String,
	},
}

impl Line {
	fn raw(&self) -> &str {
		match self {
			Line::Comment(raw) | Line::Group { raw, .. } | Line::Entry { raw, .. } => raw,
		}
	}
}

/// A syntax error found while parsing a key file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
	/// 1-based line number.
	pub line: usize,

	/// What was wrong with the line.
	pub reason: String,
}

impl fmt::Display for SyntaxError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "line {}: {}", self.line, self.reason)
	}
}

/// An INI-like desktop entry document.
///
/// The document keeps every line it was parsed from, so comments, blank
/// lines, locale variants (`Name[de]`) and the original spacing of
/// untouched entries survive a load/render cycle unchanged. Only entries
/// written through [`KeyFile::set`] are normalized to `key=value`.
///
/// Groups may appear more than once; they behave as a single group whose
/// entries are the concatenation of every occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
	lines: Vec<Line>,
	trailing_newline: bool,
}

impl KeyFile {
	/// Parse key file text.
	pub fn parse(content: &str) -> Result<Self, SyntaxError> {
		let mut pieces: Vec<&str> = content.split('\n').collect();
		let trailing_newline = content.ends_with('\n');
		if trailing_newline || content.is_empty() {
			pieces.pop();
		}

		let mut lines = Vec::with_capacity(pieces.len());
		let mut in_group = false;

		for (index, raw) in pieces.into_iter().enumerate() {
			let fail = |reason: &str| SyntaxError {
				line: index + 1,
				reason: reason.to_string(),
			};

			let text = raw.trim_end_matches('\r').trim_start();

			if text.is_empty() || text.starts_with('#') {
				lines.push(Line::Comment(raw.to_string()));
			} else if text.starts_with('[') {
				let name = parse_group_header(text).map_err(fail)?;
				in_group = true;
				lines.push(Line::Group {
					raw: raw.to_string(),
					name: name.to_string(),
				});
			} else if let Some((key, value)) = text.split_once('=') {
				let key = key.trim_end();
				if key.is_empty() {
					return Err(fail("Key-value pair has an empty key"));
				}
				if !in_group {
					return Err(fail("Key file does not start with a group"));
				}
				lines.push(Line::Entry {
					raw: raw.to_string(),
					key: key.to_string(),
					value: value.trim_start().to_string(),
				});
			} else {
				return Err(fail("Line is not a group, a comment, or a key-value pair"));
			}
		}

		Ok(KeyFile {
			lines,
			trailing_newline,
		})
	}

	/// Group names in first-seen order, each listed once.
	pub fn groups(&self) -> Vec<&str> {
		let mut groups: Vec<&str> = Vec::new();
		for line in &self.lines {
			if let Line::Group { name, .. } = line
				&& !groups.contains(&name.as_str())
			{
				groups.push(name);
			}
		}
		groups
	}

	/// Every `(key, value)` pair of `group` in file order, duplicates included.
	pub fn entries<'a>(&'a self, group: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
		self.indexed_entries(group).map(|(_, key, value)| (key, value))
	}

	/// Keys of `group` in first-seen order, each listed once.
	pub fn keys(&self, group: &str) -> Vec<&str> {
		let mut keys: Vec<&str> = Vec::new();
		for (key, _) in self.entries(group) {
			if !keys.contains(&key) {
				keys.push(key);
			}
		}
		keys
	}

	/// Raw value of `key` in `group`. The last occurrence wins.
	pub fn get(&self, group: &str, key: &str) -> Option<&str> {
		self.entries(group)
			.filter(|(k, _)| *k == key)
			.last()
			.map(|(_, value)| value)
	}

	/// Set the raw value of an existing `key` in `group`.
	///
	/// The last occurrence is rewritten as `key=value`, keeping the line's
	/// `\r` if it had one. Returns false when the key is not present.
	pub fn set(&mut self, group: &str, key: &str, value: &str) -> bool {
		let Some(index) = self
			.indexed_entries(group)
			.filter(|(_, k, _)| *k == key)
			.last()
			.map(|(index, _, _)| index)
		else {
			return false;
		};

		let cr = if self.lines[index].raw().ends_with('\r') {
			"\r"
		} else {
			""
		};
		self.lines[index] = Line::Entry {
			raw: format!("{key}={value}{cr}"),
			key: key.to_string(),
			value: value.to_string(),
		};
		true
	}

	/// Render the document back to text.
	pub fn render(&self) -> String {
		let mut out = self
			.lines
			.iter()
			.map(Line::raw)
			.collect::<Vec<_>>()
			.join("\n");
		if self.trailing_newline {
			out.push('\n');
		}
		out
	}

	fn indexed_entries<'a>(
		&'a self,
		group: &str,
	) -> impl Iterator<Item = (usize, &'a str, &'a str)> {
		let mut current: Option<&str> = None;
		self.lines
			.iter()
			.enumerate()
			.filter_map(move |(index, line)| match line {
				Line::Group { name, .. } => {
					current = Some(name.as_str());
					None
				}
				Line::Entry { key, value, .. } if current == Some(group) => {
					Some((index, key.as_str(), value.as_str()))
				}
				_ => None,
			})
	}
}

/// Validate a `[name]` header and return the name.
fn parse_group_header(text: &str) -> Result<&str, &'static str> {
	let inner = &text[1..];
	let close = inner
		.find(']')
		.ok_or("Group header is missing its closing bracket")?;
	let (name, rest) = inner.split_at(close);

	if !rest[1..].trim_matches([' ', '\t']).is_empty() {
		return Err("Unexpected text after group header");
	}
	if name.is_empty() {
		return Err("Group name is empty");
	}
	if name.contains('[') || name.chars().any(char::is_control) {
		return Err("Group name contains invalid characters");
	}

	Ok(name)
}
