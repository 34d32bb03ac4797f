use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::SteerError;
use crate::SteerResult;
use crate::manifest::ExpandOptions;
use crate::manifest::FileMapping;
use crate::manifest::default_mappings;
use crate::manifest::default_power_mappings;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["steer.toml", ".steer.toml", ".config/steer.toml"];

/// Configuration loaded from a `steer.toml` file.
///
/// ```toml
/// base_dir = "src"
/// strict_destinations = true
///
/// [[mappings]]
/// src = "steering/*.md"
/// dest = "steering/{name}.md"
///
/// [[mappings]]
/// src = "README.md"
/// dest = "README.md"
/// targets = ["npm"]
///
/// [[power_mappings]]
/// src = "power/steering/*.md"
/// dest = "steering/{name}.md"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SteerConfig {
	/// Directory that mapping sources are resolved against, relative to the
	/// project root.
	#[serde(default = "default_base_dir")]
	pub base_dir: PathBuf,
	/// Fail expansion when two entries produce the same destination.
	#[serde(default)]
	pub strict_destinations: bool,
	/// Mappings for steering and agent documents. Falls back to the built-in
	/// manifest when empty.
	#[serde(default)]
	pub mappings: Vec<FileMapping>,
	/// Mappings for power bundles. Falls back to the built-in manifest when
	/// empty.
	#[serde(default)]
	pub power_mappings: Vec<FileMapping>,
}

impl Default for SteerConfig {
	fn default() -> Self {
		Self {
			base_dir: default_base_dir(),
			strict_destinations: false,
			mappings: Vec::new(),
			power_mappings: Vec::new(),
		}
	}
}

fn default_base_dir() -> PathBuf {
	PathBuf::from(".")
}

impl SteerConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SteerResult<Option<SteerConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Load the config at `root`, or the defaults when there is none.
	pub fn load_or_default(root: &Path) -> SteerResult<SteerConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn parse(content: &str) -> SteerResult<SteerConfig> {
		toml::from_str(content).map_err(|e| SteerError::ConfigParse(e.to_string()))
	}

	/// The absolute directory globs are resolved against.
	pub fn base_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.base_dir)
	}

	/// Configured steering mappings, or the built-in ones.
	pub fn mappings(&self) -> Vec<FileMapping> {
		if self.mappings.is_empty() {
			default_mappings()
		} else {
			self.mappings.clone()
		}
	}

	/// Configured power mappings, or the built-in ones.
	pub fn power_mappings(&self) -> Vec<FileMapping> {
		if self.power_mappings.is_empty() {
			default_power_mappings()
		} else {
			self.power_mappings.clone()
		}
	}

	pub fn expand_options(&self) -> ExpandOptions {
		ExpandOptions {
			strict_destinations: self.strict_destinations,
		}
	}
}
