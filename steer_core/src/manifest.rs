use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use globset::GlobBuilder;
use globset::GlobMatcher;
use ignore::WalkBuilder;
use serde::Deserialize;
use serde::Serialize;

use crate::SteerError;
use crate::SteerResult;

/// The placeholder in a `dest` pattern that is replaced with the matched
/// file's name.
pub const NAME_PLACEHOLDER: &str = "{name}";

const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

/// A distribution channel. Mappings can be restricted to a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
	/// The published npm package.
	Npm,
	/// A local development build.
	Dev,
	/// Files embedded in the CLI installer.
	Cli,
	/// IDE power bundles.
	Power,
}

impl BuildTarget {
	pub const ALL: [Self; 4] = [Self::Npm, Self::Dev, Self::Cli, Self::Power];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Npm => "npm",
			Self::Dev => "dev",
			Self::Cli => "cli",
			Self::Power => "power",
		}
	}
}

impl fmt::Display for BuildTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BuildTarget {
	type Err = SteerError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|target| target.as_str().eq_ignore_ascii_case(value.trim()))
			.ok_or_else(|| SteerError::UnknownTarget(value.to_string()))
	}
}

/// A declarative rule describing how source files map to destinations.
///
/// ```toml
/// [[mappings]]
/// src = "steering/*.md"
/// dest = "steering/{name}.md"
/// targets = ["npm", "cli"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapping {
	/// A path or glob pattern relative to the base directory.
	pub src: String,
	/// The destination path. For glob sources `{name}` is replaced with each
	/// matched file's name without its final extension.
	pub dest: String,
	/// Targets this mapping applies to. Empty means every target.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub targets: Vec<BuildTarget>,
}

impl FileMapping {
	pub fn new(src: impl Into<String>, dest: impl Into<String>) -> Self {
		Self {
			src: src.into(),
			dest: dest.into(),
			targets: Vec::new(),
		}
	}

	/// Restrict the mapping to the given targets.
	#[must_use]
	pub fn targets(mut self, targets: impl IntoIterator<Item = BuildTarget>) -> Self {
		self.targets = targets.into_iter().collect();
		self
	}

	pub fn applies_to(&self, target: BuildTarget) -> bool {
		self.targets.is_empty() || self.targets.contains(&target)
	}
}

/// A concrete source and destination produced by expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedMapping {
	pub src: String,
	pub dest: String,
}

/// Options for [`expand_mappings_with_options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandOptions {
	/// Fail with [`SteerError::DuplicateDestination`] when two expanded
	/// entries share a `dest`. When false, later entries silently win at
	/// copy time.
	pub strict_destinations: bool,
}

/// Whether `src` contains a glob wildcard.
///
/// `[` and `{` count as wildcards, so a literal source such as
/// `docs/[draft].md` is globbed rather than passed through, and contributes
/// nothing when no file matches. Escape such names as a character class:
/// `docs/[[]draft].md`.
pub fn has_glob(src: &str) -> bool {
	src.contains(GLOB_CHARS)
}

/// Resolve `pattern` to the files under `base_dir` that match it.
///
/// Paths are returned relative to `base_dir` with `/` separators and sorted.
/// `*` and `?` do not cross directory boundaries; use `**` for that. Hidden
/// files and directories are not matched. Symbolic links are followed, so a
/// linked file is matched under the link's path; dangling links and link
/// cycles are skipped. A missing `base_dir` yields no matches.
pub fn resolve_glob(pattern: &str, base_dir: &Path) -> SteerResult<Vec<String>> {
	let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
	let matcher = compile_glob(pattern)?;
	let prefix = literal_prefix(pattern);
	let walk_root = if prefix.as_os_str().is_empty() {
		base_dir.to_path_buf()
	} else {
		base_dir.join(prefix)
	};

	if !walk_root.is_dir() {
		tracing::debug!(pattern, root = %walk_root.display(), "glob root does not exist");
		return Ok(Vec::new());
	}

	let mut matches = Vec::new();
	let walker = WalkBuilder::new(&walk_root)
		.standard_filters(false)
		.hidden(true)
		.follow_links(true)
		.build();

	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) if is_unresolvable_link(&err) => {
				tracing::debug!(pattern, error = %err, "skipping unresolvable link");
				continue;
			}
			Err(err) => return Err(err.into()),
		};

		if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
			continue;
		}

		let Ok(relative) = entry.path().strip_prefix(base_dir) else {
			continue;
		};

		let relative = to_slash_path(relative);
		if matcher.is_match(&relative) {
			matches.push(relative);
		}
	}

	matches.sort();
	tracing::debug!(pattern, count = matches.len(), "resolved glob");

	Ok(matches)
}

/// Link cycles, and links whose target no longer exists.
fn is_unresolvable_link(error: &ignore::Error) -> bool {
	match error {
		ignore::Error::Loop { .. } => true,
		ignore::Error::WithPath { err, .. }
		| ignore::Error::WithDepth { err, .. }
		| ignore::Error::WithLineNumber { err, .. } => is_unresolvable_link(err),
		_ => {
			error
				.io_error()
				.is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
		}
	}
}

/// Expand `mappings` for `target` into concrete source and destination
/// pairs.
///
/// Mappings whose targets exclude `target` contribute nothing. Glob sources
/// produce one entry per matched file, with `{name}` in `dest` replaced by the
/// file's stem. Literal sources are copied verbatim without touching the
/// filesystem. Input order is preserved.
pub fn expand_mappings(
	mappings: &[FileMapping],
	base_dir: &Path,
	target: BuildTarget,
) -> SteerResult<Vec<ExpandedMapping>> {
	expand_mappings_with_options(mappings, base_dir, target, &ExpandOptions::default())
}

/// Like [`expand_mappings`], with control over destination collision checks.
pub fn expand_mappings_with_options(
	mappings: &[FileMapping],
	base_dir: &Path,
	target: BuildTarget,
	options: &ExpandOptions,
) -> SteerResult<Vec<ExpandedMapping>> {
	let mut expanded = Vec::new();

	for mapping in mappings {
		if !mapping.applies_to(target) {
			tracing::debug!(src = %mapping.src, %target, "skipping mapping for target");
			continue;
		}

		if !has_glob(&mapping.src) {
			expanded.push(ExpandedMapping {
				src: mapping.src.clone(),
				dest: mapping.dest.clone(),
			});
			continue;
		}

		for src in resolve_glob(&mapping.src, base_dir)? {
			let dest = mapping.dest.replace(NAME_PLACEHOLDER, file_stem(&src));
			expanded.push(ExpandedMapping { src, dest });
		}
	}

	if options.strict_destinations {
		check_unique_destinations(&expanded)?;
	}

	Ok(expanded)
}

/// Expand `mappings` and keep only the destination paths.
pub fn destinations(
	mappings: &[FileMapping],
	base_dir: &Path,
	target: BuildTarget,
) -> SteerResult<Vec<String>> {
	let expanded = expand_mappings(mappings, base_dir, target)?;
	Ok(expanded.into_iter().map(|mapping| mapping.dest).collect())
}

/// Destination paths of the steering files shipped with the CLI installer.
pub fn steering_files_for_cli(base_dir: &Path) -> SteerResult<Vec<String>> {
	destinations(&default_mappings(), base_dir, BuildTarget::Cli)
}

/// Destination paths of the power bundle files shipped with the CLI
/// installer.
pub fn power_files_for_cli(base_dir: &Path) -> SteerResult<Vec<String>> {
	destinations(&default_power_mappings(), base_dir, BuildTarget::Cli)
}

/// The built-in mappings for steering and agent documents.
pub fn default_mappings() -> Vec<FileMapping> {
	vec![
		FileMapping::new("steering/*.md", "steering/{name}.md"),
		FileMapping::new("agents/*.md", "agents/{name}.md").targets([
			BuildTarget::Npm,
			BuildTarget::Dev,
			BuildTarget::Cli,
		]),
		FileMapping::new("dev/steering/*.md", "steering/{name}.md").targets([BuildTarget::Dev]),
		FileMapping::new("README.md", "README.md").targets([BuildTarget::Npm]),
		FileMapping::new("LICENSE", "LICENSE").targets([BuildTarget::Npm]),
	]
}

/// The built-in mappings for power bundles.
pub fn default_power_mappings() -> Vec<FileMapping> {
	vec![
		FileMapping::new("power/POWER.md", "POWER.md"),
		FileMapping::new("power/steering/*.md", "steering/{name}.md"),
		FileMapping::new("power/mcp.json", "mcp.json").targets([BuildTarget::Power]),
	]
}

fn check_unique_destinations(expanded: &[ExpandedMapping]) -> SteerResult<()> {
	let mut seen: HashMap<&str, &str> = HashMap::new();

	for mapping in expanded {
		if let Some(first_src) = seen.insert(&mapping.dest, &mapping.src) {
			return Err(SteerError::DuplicateDestination {
				dest: mapping.dest.clone(),
				first_src: first_src.to_string(),
				second_src: mapping.src.clone(),
			});
		}
	}

	Ok(())
}

fn compile_glob(pattern: &str) -> SteerResult<GlobMatcher> {
	let glob = GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()
		.map_err(|e| SteerError::InvalidGlob {
			pattern: pattern.to_string(),
			reason: e.kind().to_string(),
		})?;

	Ok(glob.compile_matcher())
}

/// The leading directories of `pattern` that contain no wildcards. Walking
/// starts there instead of at the base directory.
fn literal_prefix(pattern: &str) -> PathBuf {
	let segments: Vec<&str> = pattern.split('/').collect();
	let Some((_, directories)) = segments.split_last() else {
		return PathBuf::new();
	};

	directories
		.iter()
		.take_while(|segment| !has_glob(segment) && !segment.is_empty())
		.collect()
}

fn to_slash_path(path: &Path) -> String {
	path.components()
		.filter_map(|component| {
			match component {
				Component::Normal(part) => Some(part.to_string_lossy()),
				Component::ParentDir => Some(Cow::Borrowed("..")),
				_ => None,
			}
		})
		.collect::<Vec<_>>()
		.join("/")
}

/// The file name of a `/` separated path without its final extension.
fn file_stem(path: &str) -> &str {
	let name = path.rsplit('/').next().unwrap_or(path);
	match name.rfind('.') {
		Some(0) | None => name,
		Some(dot) => &name[..dot],
	}
}
