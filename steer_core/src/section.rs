use std::path::Path;

use derive_more::Deref;
use derive_more::DerefMut;

use crate::SteerError;
use crate::SteerResult;
use crate::slug::slugify;

/// Minimum number of backticks that opens a fenced code block.
pub const MIN_FENCE_LEN: usize = 3;

/// HTML elements that never take a closing tag. They are treated like
/// self-closing tags so a stray `<br>` cannot swallow the rest of a document.
const VOID_ELEMENTS: [&str; 14] = [
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// The names of the xml-like tags that are currently open, innermost last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct TagStack(Vec<String>);

/// The scope the scanner is in at the start of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParserState {
	/// Heading lines are only recognized in this scope.
	#[default]
	Normal,
	/// Inside a fenced code block opened by `fence_len` backticks. Only a
	/// backtick run at least this long closes it.
	InCodeBlock { fence_len: usize },
	/// Inside one or more xml-like tags. Reverts to [`ParserState::Normal`]
	/// once every opened tag has been closed.
	InXmlTag { stack: TagStack },
}

/// A heading found in normal scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
	/// Number of leading `#` characters.
	pub level: usize,
	/// The heading text with surrounding whitespace removed.
	pub title: String,
	/// 1-indexed line number.
	pub line: usize,
	/// Byte offset of the start of the heading line.
	pub start: usize,
	/// Byte offset just past the heading line, excluding the line break.
	pub end: usize,
}

impl Heading {
	/// The anchor slug for this heading.
	pub fn slug(&self) -> String {
		slugify(&self.title)
	}
}

/// The span of a located section.
///
/// `end` is the offset of the next heading at the same or a shallower level,
/// or the length of the document when there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMatch {
	pub level: usize,
	pub start: usize,
	pub end: usize,
}

impl SectionMatch {
	/// The section text with trailing whitespace removed.
	pub fn content<'a>(&self, text: &'a str) -> &'a str {
		text[self.start..self.end].trim_end()
	}
}

/// How a query string selects a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionQuery<'a> {
	/// Exact, case-sensitive comparison with the trimmed heading text.
	Title(&'a str),
	/// Comparison with [`slugify`] applied to the heading text.
	Slug(&'a str),
}

impl<'a> SectionQuery<'a> {
	/// A leading `#` selects slug matching against the rest of the query.
	pub fn parse(query: &'a str) -> Self {
		match query.strip_prefix('#') {
			Some(anchor) => Self::Slug(anchor),
			None => Self::Title(query),
		}
	}

	pub fn matches(&self, title: &str) -> bool {
		match self {
			Self::Title(expected) => title == *expected,
			Self::Slug(anchor) => slugify(title) == *anchor,
		}
	}
}

/// Line-oriented scanner that tracks code fences and xml-like tags so that
/// heading syntax inside them is not mistaken for document structure.
#[derive(Debug, Clone, Default)]
pub struct ScopeScanner {
	state: ParserState,
}

impl ScopeScanner {
	pub fn new() -> Self {
		Self::default()
	}

	/// The scope the next line will start in.
	pub fn state(&self) -> &ParserState {
		&self.state
	}

	/// Advance the scanner over one line (without its `\n`). Returns the
	/// heading level and title when the line is a real heading.
	pub fn scan_line<'a>(&mut self, line: &'a str) -> Option<(usize, &'a str)> {
		let line = line.strip_suffix('\r').unwrap_or(line);

		match self.state {
			ParserState::InCodeBlock { fence_len } => {
				if fence_run(line) >= fence_len {
					tracing::trace!(fence_len, "closed code block");
					self.state = ParserState::Normal;
				}
				None
			}
			ParserState::Normal => {
				let run = fence_run(line);
				if run >= MIN_FENCE_LEN {
					tracing::trace!(fence_len = run, "opened code block");
					self.state = ParserState::InCodeBlock { fence_len: run };
					return None;
				}

				let heading = parse_heading(line);
				self.track_tags(line);
				heading
			}
			ParserState::InXmlTag { .. } => {
				self.track_tags(line);
				None
			}
		}
	}

	fn track_tags(&mut self, line: &str) {
		for event in tag_events(line) {
			match event {
				TagEvent::Open(name) => self.push_tag(name),
				TagEvent::Close(name) => self.pop_tag(name),
			}
		}
	}

	fn push_tag(&mut self, name: &str) {
		tracing::trace!(tag = name, "opened tag");
		if let ParserState::InXmlTag { stack } = &mut self.state {
			stack.push(name.to_string());
			return;
		}

		self.state = ParserState::InXmlTag {
			stack: TagStack(vec![name.to_string()]),
		};
	}

	fn pop_tag(&mut self, name: &str) {
		let ParserState::InXmlTag { stack } = &mut self.state else {
			return;
		};

		// Only the innermost tag can be closed.
		if stack
			.last()
			.is_some_and(|open| open.eq_ignore_ascii_case(name))
		{
			tracing::trace!(tag = name, "closed tag");
			stack.pop();
		}

		if stack.is_empty() {
			self.state = ParserState::Normal;
		}
	}
}

/// Collect every heading that sits in normal scope, in document order.
pub fn headings(text: &str) -> Vec<Heading> {
	let mut scanner = ScopeScanner::new();
	let mut found = Vec::new();
	let mut offset = 0;

	for (index, line) in text.split('\n').enumerate() {
		let line_end = offset + line.len();
		if let Some((level, title)) = scanner.scan_line(line) {
			found.push(Heading {
				level,
				title: title.to_string(),
				line: index + 1,
				start: offset,
				end: line_end - usize::from(line.ends_with('\r')),
			});
		}
		offset = line_end + 1; // +1 for the \n
	}

	found
}

/// Locate the section selected by `query`.
///
/// The first matching heading wins. The section ends before the next heading
/// whose level is less than or equal to the matched one; deeper headings stay
/// inside the section.
pub fn find_section(text: &str, query: &str) -> SteerResult<SectionMatch> {
	let section_query = SectionQuery::parse(query);
	let found = headings(text);

	let Some(index) = found
		.iter()
		.position(|heading| section_query.matches(&heading.title))
	else {
		tracing::debug!(query, headings = found.len(), "section not found");
		return Err(SteerError::SectionNotFound {
			query: query.to_string(),
		});
	};

	let matched = &found[index];
	let end = found[index + 1..]
		.iter()
		.find(|heading| heading.level <= matched.level)
		.map_or(text.len(), |heading| heading.start);

	tracing::debug!(
		query,
		level = matched.level,
		line = matched.line,
		"matched section"
	);

	Ok(SectionMatch {
		level: matched.level,
		start: matched.start,
		end,
	})
}

/// Extract the section selected by `query` from `text`.
///
/// `query` is either the exact heading text or `#` followed by the heading's
/// slug. The returned slice starts at the heading line and has its trailing
/// whitespace removed.
///
/// ```
/// use steer_core::extract_section;
///
/// let doc = "# Intro\nsome text\n## Details\ndeep content\n# Next\nother text\n";
/// let section = extract_section(doc, "Intro").unwrap();
/// assert_eq!(section, "# Intro\nsome text\n## Details\ndeep content");
///
/// let section = extract_section(doc, "#details").unwrap();
/// assert_eq!(section, "## Details\ndeep content");
/// ```
pub fn extract_section<'a>(text: &'a str, query: &str) -> SteerResult<&'a str> {
	let section = find_section(text, query)?;
	Ok(section.content(text))
}

/// Read a markdown file and extract a section from it. A file that cannot be
/// read is reported as [`SteerError::FileRead`], never as a missing section.
pub fn extract_section_from_file(path: impl AsRef<Path>, query: &str) -> SteerResult<String> {
	let path = path.as_ref();
	let content = std::fs::read_to_string(path).map_err(|source| {
		SteerError::FileRead {
			path: path.to_path_buf(),
			source,
		}
	})?;

	extract_section(&content, query).map(str::to_string)
}

fn fence_run(line: &str) -> usize {
	line.trim_start().bytes().take_while(|&b| b == b'`').count()
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
	let level = line.bytes().take_while(|&b| b == b'#').count();
	if level == 0 {
		return None;
	}

	let title = line[level..].strip_prefix(' ')?;
	Some((level, title.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagEvent<'a> {
	Open(&'a str),
	Close(&'a str),
}

/// Find the opening and closing tags on a single line. Self-closing and void
/// tags produce no event. Backtick code spans are skipped.
///
/// A tag is `<`, an optional `/`, then a name matching
/// `[A-Za-z][A-Za-z0-9_-]*` followed by whitespace, `/` or `>`. Prose such as
/// `Vec<T>` therefore opens a `T` scope that hides every later heading until
/// a matching `</T>`; write it as a code span (`` `Vec<T>` ``) instead.
fn tag_events(line: &str) -> Vec<TagEvent<'_>> {
	let bytes = line.as_bytes();
	let mut events = Vec::new();
	let mut index = 0;

	while index < bytes.len() {
		match bytes[index] {
			b'`' => {
				let run = bytes[index..].iter().take_while(|&&b| b == b'`').count();
				index = closing_code_span(bytes, index + run, run).unwrap_or(index + run);
			}
			b'<' => {
				match parse_tag(line, index) {
					Some((event, next)) => {
						events.extend(event);
						index = next;
					}
					None => index += 1,
				}
			}
			_ => index += 1,
		}
	}

	events
}

/// Return the offset just past a backtick run of exactly `run` characters,
/// searching from `from`.
fn closing_code_span(bytes: &[u8], from: usize, run: usize) -> Option<usize> {
	let mut index = from;
	while index < bytes.len() {
		if bytes[index] == b'`' {
			let len = bytes[index..].iter().take_while(|&&b| b == b'`').count();
			if len == run {
				return Some(index + len);
			}
			index += len;
		} else {
			index += 1;
		}
	}
	None
}

/// Parse a tag starting at the `<` at `start`. Returns the event (if any) and
/// the offset just past the closing `>`, or `None` when the text there is not
/// a tag.
fn parse_tag(line: &str, start: usize) -> Option<(Option<TagEvent<'_>>, usize)> {
	let bytes = line.as_bytes();
	let closing = bytes.get(start + 1) == Some(&b'/');
	let name_start = start + 1 + usize::from(closing);

	if !bytes.get(name_start)?.is_ascii_alphabetic() {
		return None;
	}

	let name_end = name_start
		+ bytes[name_start..]
			.iter()
			.take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
			.count();

	match bytes.get(name_end) {
		Some(b'>') => {}
		Some(b'/') if !closing => {}
		Some(b) if b.is_ascii_whitespace() => {}
		_ => return None,
	}

	let gt = find_tag_end(bytes, name_end)?;
	let name = &line[name_start..name_end];

	if closing {
		return Some((Some(TagEvent::Close(name)), gt + 1));
	}

	let self_closing = line[name_end..gt].trim_end().ends_with('/');
	if self_closing || is_void_element(name) {
		return Some((None, gt + 1));
	}

	Some((Some(TagEvent::Open(name)), gt + 1))
}

/// Find the `>` that ends a tag, ignoring any inside quoted attribute values.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
	let mut quote: Option<u8> = None;

	for (offset, &b) in bytes[from..].iter().enumerate() {
		match quote {
			Some(q) if b == q => quote = None,
			Some(_) => {}
			None if b == b'"' || b == b'\'' => quote = Some(b),
			None if b == b'>' => return Some(from + offset),
			None => {}
		}
	}

	None
}

fn is_void_element(name: &str) -> bool {
	VOID_ELEMENTS
		.iter()
		.any(|void| void.eq_ignore_ascii_case(name))
}
