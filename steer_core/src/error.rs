use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SteerError {
	#[error(transparent)]
	#[diagnostic(code(steer::io_error))]
	Io(#[from] std::io::Error),

	#[error("no section matching `{query}` was found")]
	#[diagnostic(
		code(steer::section_not_found),
		help(
			"headings inside fenced code blocks and xml-like tags are ignored; use `steer \
			 outline` to list the real headings"
		)
	)]
	SectionNotFound { query: String },

	#[error("failed to read `{path}`")]
	#[diagnostic(code(steer::file_read))]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid glob pattern `{pattern}`: {reason}")]
	#[diagnostic(code(steer::invalid_glob))]
	InvalidGlob { pattern: String, reason: String },

	#[error("failed to walk directory: {0}")]
	#[diagnostic(code(steer::walk))]
	Walk(#[from] ignore::Error),

	#[error("destination `{dest}` is produced by both `{first_src}` and `{second_src}`")]
	#[diagnostic(
		code(steer::duplicate_destination),
		help("add a `{{name}}` placeholder to the mapping's `dest` so each matched file gets its own path")
	)]
	DuplicateDestination {
		dest: String,
		first_src: String,
		second_src: String,
	},

	#[error("unknown build target: `{0}`")]
	#[diagnostic(
		code(steer::unknown_target),
		help("available targets: npm, dev, cli, power")
	)]
	UnknownTarget(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(steer::config_parse),
		help("check that steer.toml is valid TOML with `[[mappings]]` entries")
	)]
	ConfigParse(String),
}

pub type SteerResult<T> = Result<T, SteerError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
