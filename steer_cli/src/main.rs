use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use steer_cli::Commands;
use steer_cli::OutputFormat;
use steer_cli::SteerCli;
use steer_core::BuildTarget;
use steer_core::ExpandOptions;
use steer_core::FileMapping;
use steer_core::SteerConfig;
use steer_core::SteerError;
use steer_core::expand_mappings_with_options;
use steer_core::extract_section;
use steer_core::extract_section_from_file;
use steer_core::has_glob;
use steer_core::headings;
use steer_core::missing_section_comment;
use steer_core::shell_tokens;
use steer_core::substitute_tokens;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable that overrides the log filter.
const LOG_ENV: &str = "STEER_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SteerCli::parse();

	// Respect NO_COLOR, the --no-color flag and whether stderr is a terminal.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Extract { file, query }) => run_extract(&args, file, query),
		Some(Commands::Outline { file, format }) => run_outline(&args, file, *format),
		Some(Commands::Manifest {
			target,
			power,
			strict,
			format,
		}) => run_manifest(&args, *target, *power, *strict, *format),
		Some(Commands::Files { target, power }) => run_files(&args, *target, *power),
		Some(Commands::Inject {
			shell,
			token,
			from,
			section,
			allow_missing,
			output,
		}) => {
			run_inject(
				&args,
				&InjectRequest {
					shell,
					token,
					from,
					section,
					allow_missing: *allow_missing,
					output: output.as_deref(),
				},
			)
		}
		Some(Commands::Check { target }) => run_check(&args, *target),
		None => {
			eprintln!("No subcommand specified. Run `steer --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<SteerError>() {
			Ok(steer_err) => {
				let report: miette::Report = (*steer_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `STEER_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
	let default_filter = if verbose { "warn,steer_core=debug" } else { "warn" };
	let env_filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn resolve_root(args: &SteerCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn read_file(path: &Path) -> Result<String, SteerError> {
	std::fs::read_to_string(path).map_err(|source| {
		SteerError::FileRead {
			path: path.to_path_buf(),
			source,
		}
	})
}

fn run_init(args: &SteerCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = SteerConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let sample_config = "# steer configuration\n# Sources are resolved against \
	                     `base_dir`. Omit `[[mappings]]` to use the built-in manifest.\n\nbase_dir \
	                     = \".\"\nstrict_destinations = false\n\n[[mappings]]\nsrc = \
	                     \"steering/*.md\"\ndest = \"steering/{name}.md\"\n\n[[mappings]]\nsrc = \
	                     \"agents/*.md\"\ndest = \"agents/{name}.md\"\ntargets = [\"npm\", \"dev\", \
	                     \"cli\"]\n\n[[mappings]]\nsrc = \"dev/steering/*.md\"\ndest = \
	                     \"steering/{name}.md\"\ntargets = [\"dev\"]\n\n[[mappings]]\nsrc = \
	                     \"README.md\"\ndest = \"README.md\"\ntargets = [\"npm\"]\n\n[[mappings]]\nsrc \
	                     = \"LICENSE\"\ndest = \"LICENSE\"\ntargets = [\"npm\"]\n";

	std::fs::write(root.join("steer.toml"), sample_config)?;
	println!("Created steer.toml");
	println!();
	println!("Next steps:");
	println!("  1. Adjust the mappings in steer.toml");
	println!("  2. Run `steer manifest --target npm` to preview the expanded files");
	println!("  3. Run `steer check` to validate the manifest");

	Ok(())
}

fn run_extract(args: &SteerCli, file: &Path, query: &str) -> Result<(), Box<dyn std::error::Error>> {
	let path = resolve_root(args).join(file);
	let text = read_file(&path)?;
	let section = extract_section(&text, query)?;
	println!("{section}");
	Ok(())
}

#[derive(Serialize)]
struct OutlineEntry {
	level: usize,
	title: String,
	slug: String,
	line: usize,
}

fn run_outline(
	args: &SteerCli,
	file: &Path,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let path = resolve_root(args).join(file);
	let text = read_file(&path)?;
	let entries: Vec<OutlineEntry> = headings(&text)
		.into_iter()
		.map(|heading| {
			OutlineEntry {
				slug: heading.slug(),
				level: heading.level,
				title: heading.title,
				line: heading.line,
			}
		})
		.collect();

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&entries)?);
		}
		OutputFormat::Text => {
			if entries.is_empty() {
				println!("No headings found in {}", file.display());
				return Ok(());
			}

			for entry in &entries {
				let indent = "  ".repeat(entry.level.saturating_sub(1));
				println!(
					"{indent}{} {}  {}",
					"#".repeat(entry.level),
					entry.title,
					colored!(format!("#{} (line {})", entry.slug, entry.line), dimmed)
				);
			}
		}
	}

	Ok(())
}

fn selected_mappings(config: &SteerConfig, power: bool) -> Vec<FileMapping> {
	if power {
		config.power_mappings()
	} else {
		config.mappings()
	}
}

fn run_manifest(
	args: &SteerCli,
	target: BuildTarget,
	power: bool,
	strict: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = SteerConfig::load_or_default(&root)?;
	let mut options = config.expand_options();
	options.strict_destinations |= strict;

	let expanded = expand_mappings_with_options(
		&selected_mappings(&config, power),
		&config.base_dir(&root),
		target,
		&options,
	)?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&expanded)?);
		}
		OutputFormat::Text => {
			if expanded.is_empty() {
				println!("No files map to target `{target}`.");
				return Ok(());
			}

			for mapping in &expanded {
				println!("{} {} {}", mapping.src, colored!("->", dimmed), mapping.dest);
			}

			if args.verbose {
				println!();
				println!("{} file(s) for target `{target}`", expanded.len());
			}
		}
	}

	Ok(())
}

fn run_files(
	args: &SteerCli,
	target: BuildTarget,
	power: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = SteerConfig::load_or_default(&root)?;
	let expanded = expand_mappings_with_options(
		&selected_mappings(&config, power),
		&config.base_dir(&root),
		target,
		&config.expand_options(),
	)?;

	for mapping in expanded {
		println!("{}", mapping.dest);
	}

	Ok(())
}

struct InjectRequest<'a> {
	shell: &'a Path,
	token: &'a str,
	from: &'a Path,
	section: &'a str,
	allow_missing: bool,
	output: Option<&'a Path>,
}

fn run_inject(args: &SteerCli, request: &InjectRequest<'_>) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let shell = read_file(&root.join(request.shell))?;

	if !shell_tokens(&shell).contains(&request.token) {
		eprintln!(
			"{} {} has no `{{{{{{{}}}}}}}` token",
			colored!("warning:", yellow),
			request.shell.display(),
			request.token
		);
	}

	let content = match extract_section_from_file(root.join(request.from), request.section) {
		Ok(content) => content,
		Err(SteerError::SectionNotFound { query }) if request.allow_missing => {
			eprintln!(
				"{} section `{query}` not found in {}",
				colored!("warning:", yellow),
				request.from.display()
			);
			missing_section_comment(&query)
		}
		Err(e) => return Err(e.into()),
	};

	let values = BTreeMap::from([(request.token.to_string(), content)]);
	let rendered = substitute_tokens(&shell, &values);

	match request.output {
		Some(output) => {
			let output_path = root.join(output);
			std::fs::write(&output_path, &rendered)?;
			println!("Wrote {}", output_path.display());
		}
		None => print!("{rendered}"),
	}

	Ok(())
}

/// Problems found by `steer check` for a single mapping set and target.
fn check_mappings(
	mappings: &[FileMapping],
	base_dir: &Path,
	target: BuildTarget,
	label: &str,
) -> Vec<String> {
	let options = ExpandOptions {
		strict_destinations: true,
	};

	let mut problems = Vec::new();
	if let Err(e) = expand_mappings_with_options(mappings, base_dir, target, &options) {
		problems.push(format!("[{label} {target}] {e}"));
	}

	for mapping in mappings {
		if !mapping.applies_to(target) || has_glob(&mapping.src) {
			continue;
		}

		if !base_dir.join(&mapping.src).exists() {
			problems.push(format!(
				"[{label} {target}] source `{}` does not exist",
				mapping.src
			));
		}
	}

	problems
}

fn run_check(
	args: &SteerCli,
	target: Option<BuildTarget>,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = SteerConfig::load_or_default(&root)?;
	let base_dir = config.base_dir(&root);
	let targets = target.map_or_else(|| BuildTarget::ALL.to_vec(), |target| vec![target]);

	let mappings = config.mappings();
	let power_mappings = config.power_mappings();
	let mut problems = Vec::new();

	for target in &targets {
		problems.extend(check_mappings(&mappings, &base_dir, *target, "steering"));
		problems.extend(check_mappings(
			&power_mappings,
			&base_dir,
			*target,
			"power",
		));
	}

	if problems.is_empty() {
		println!(
			"{} manifest is valid for {} target(s).",
			colored!("Check passed:", green),
			targets.len()
		);
		return Ok(());
	}

	for problem in &problems {
		eprintln!("{} {problem}", colored!("error:", red));
	}
	eprintln!();
	eprintln!("{} problem(s) found.", problems.len());
	process::exit(1);
}
