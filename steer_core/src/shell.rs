//! `{{{TOKEN}}}` substitution for protocol shells.
//!
//! A shell is a markdown file holding triple-brace tokens that build tooling
//! fills in, typically with a section pulled out of a richer document by
//! [`extract_section`](crate::extract_section). This is plain find and
//! replace: no escaping, no nesting, no expressions.

use std::collections::BTreeMap;

const TOKEN_OPEN: &str = "{{{";
const TOKEN_CLOSE: &str = "}}}";

/// The names of every `{{{NAME}}}` token in `text`, in order of first
/// appearance and without duplicates.
pub fn shell_tokens(text: &str) -> Vec<&str> {
	let mut names: Vec<&str> = Vec::new();
	for (_, _, name) in token_spans(text) {
		if !names.contains(&name) {
			names.push(name);
		}
	}
	names
}

/// Replace each `{{{NAME}}}` whose name is a key of `values`. Tokens without
/// a value are left in place.
///
/// ```
/// use std::collections::BTreeMap;
///
/// use steer_core::substitute_tokens;
///
/// let values = BTreeMap::from([("BODY".to_string(), "## Rules".to_string())]);
/// let rendered = substitute_tokens("# Shell\n{{{BODY}}}\n{{{OTHER}}}", &values);
/// assert_eq!(rendered, "# Shell\n## Rules\n{{{OTHER}}}");
/// ```
pub fn substitute_tokens(text: &str, values: &BTreeMap<String, String>) -> String {
	let mut rendered = String::with_capacity(text.len());
	let mut cursor = 0;

	for (start, end, name) in token_spans(text) {
		let Some(value) = values.get(name) else {
			continue;
		};

		rendered.push_str(&text[cursor..start]);
		rendered.push_str(value);
		cursor = end;
	}

	rendered.push_str(&text[cursor..]);
	rendered
}

/// Diagnostic text a caller can put in place of a section that could not be
/// found, when it prefers a visible marker over failing the build.
pub fn missing_section_comment(query: &str) -> String {
	format!("<!-- steer: section `{query}` not found -->")
}

/// Byte ranges and names of well-formed tokens.
fn token_spans(text: &str) -> Vec<(usize, usize, &str)> {
	let mut spans = Vec::new();
	let mut from = 0;

	while let Some(found) = text[from..].find(TOKEN_OPEN) {
		let start = from + found;
		let name_start = start + TOKEN_OPEN.len();
		let name_len = text[name_start..]
			.bytes()
			.take_while(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
			.count();
		let name_end = name_start + name_len;

		if name_len > 0 && text[name_end..].starts_with(TOKEN_CLOSE) {
			let end = name_end + TOKEN_CLOSE.len();
			spans.push((start, end, &text[name_start..name_end]));
			from = end;
		} else {
			from = start + 1;
		}
	}

	spans
}
