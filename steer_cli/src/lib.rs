use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use steer_core::BuildTarget;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Extract sections from steering documents and expand distribution manifests.",
	long_about = "steer is the build tooling for steering and agent prompt documents.\n\nIt pulls \
	              named sections out of markdown while ignoring heading syntax inside code \
	              fences and xml-like instruction tags, and expands the file manifest into \
	              concrete source and destination paths for each distribution target.\n\nQuick \
	              start:\n  steer outline doc.md          List real headings\n  steer extract \
	              doc.md Setup    Print one section\n  steer manifest --target npm   Show \
	              expanded mappings\n  steer check                   Validate the manifest"
)]
pub struct SteerCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `steer.toml` in the project root.
	///
	/// The sample lists the built-in mappings so they can be edited. If a
	/// config file already exists, this command is a no-op.
	Init,
	/// Print one section of a markdown document.
	///
	/// The query is either the exact heading text or `#` followed by the
	/// heading's slug (for example `#getting-started`). The section runs from
	/// the heading to the next heading of the same or a shallower level.
	Extract {
		/// The markdown file to read.
		file: PathBuf,

		/// Heading text, or `#slug`.
		query: String,
	},
	/// List the real headings of a markdown document.
	///
	/// Headings inside fenced code blocks and xml-like tags are not listed.
	Outline {
		/// The markdown file to read.
		file: PathBuf,

		/// Output format.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the expanded file mappings for a build target.
	Manifest {
		/// Build target to expand for: npm, dev, cli or power.
		#[arg(long, short, default_value_t = BuildTarget::Cli)]
		target: BuildTarget,

		/// Expand the power bundle mappings instead of the steering mappings.
		#[arg(long, default_value_t = false)]
		power: bool,

		/// Fail when two mappings produce the same destination.
		#[arg(long, default_value_t = false)]
		strict: bool,

		/// Output format.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print only the destination paths for a build target.
	///
	/// This is the list embedded into generated installer code.
	Files {
		/// Build target to expand for: npm, dev, cli or power.
		#[arg(long, short, default_value_t = BuildTarget::Cli)]
		target: BuildTarget,

		/// List the power bundle files instead of the steering files.
		#[arg(long, default_value_t = false)]
		power: bool,
	},
	/// Fill a `{{{TOKEN}}}` in a shell document with a section of another
	/// document.
	Inject {
		/// The shell document containing the token.
		shell: PathBuf,

		/// Token name, without the surrounding braces.
		#[arg(long)]
		token: String,

		/// The document to extract the section from.
		#[arg(long)]
		from: PathBuf,

		/// Heading text, or `#slug`, of the section to inject.
		#[arg(long)]
		section: String,

		/// Replace a missing section with a visible comment instead of
		/// failing.
		#[arg(long, default_value_t = false)]
		allow_missing: bool,

		/// Write the result to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Validate the manifest for a build target.
	///
	/// Expands the mappings with destination collision checks enabled and
	/// verifies that every literal source exists. Exits with a non-zero code
	/// when a problem is found.
	Check {
		/// Build target to check. All targets are checked when omitted.
		#[arg(long, short)]
		target: Option<BuildTarget>,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
