mod common;

use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use steer_core::AnyEmptyResult;

const GUIDE: &str = "# Guide\nIntro.\n## Setup\n```bash\n# install deps\nnpm \
                     install\n```\n<definition>\n# Not a heading\n</definition>\n## Usage\nRun \
                     it.\n# Appendix\n";

#[test]
fn extract_prints_section_with_scoped_markup() -> AnyEmptyResult {
	let tmp = common::project(&[("guide.md", GUIDE)])?;

	common::steer_cmd()
		.arg("extract")
		.arg("guide.md")
		.arg("Setup")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			"## Setup\n```bash\n# install deps\nnpm install\n```\n<definition>\n# Not a \
			 heading\n</definition>\n",
		);

	Ok(())
}

#[test]
fn extract_accepts_slug_query() -> AnyEmptyResult {
	let tmp = common::project(&[("guide.md", GUIDE)])?;

	common::steer_cmd()
		.arg("extract")
		.arg("guide.md")
		.arg("#usage")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("## Usage\nRun it.\n");

	Ok(())
}

#[test]
fn extract_ignores_headings_inside_code_and_tags() -> AnyEmptyResult {
	let tmp = common::project(&[("guide.md", GUIDE)])?;

	for query in ["install deps", "Not a heading"] {
		common::steer_cmd()
			.arg("extract")
			.arg("guide.md")
			.arg(query)
			.arg("--path")
			.arg(tmp.path())
			.assert()
			.code(2)
			.stderr(predicates::str::contains("no section matching"));
	}

	Ok(())
}

#[test]
fn extract_reports_missing_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::steer_cmd()
		.arg("extract")
		.arg("missing.md")
		.arg("Setup")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to read"));

	Ok(())
}

#[test]
fn outline_lists_real_headings() -> AnyEmptyResult {
	let tmp = common::project(&[("guide.md", GUIDE)])?;

	common::steer_cmd()
		.arg("outline")
		.arg("guide.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			"# Guide  #guide (line 1)\n  ## Setup  #setup (line 3)\n  ## Usage  #usage (line \
			 11)\n# Appendix  #appendix (line 13)\n",
		)
		.stdout(predicates::str::contains("install deps").not());

	Ok(())
}

#[test]
fn outline_json_output() -> AnyEmptyResult {
	let tmp = common::project(&[("guide.md", GUIDE)])?;

	let output = common::steer_cmd()
		.arg("outline")
		.arg("guide.md")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	let entries = json.as_array().ok_or("expected an array")?;
	assert_eq!(entries.len(), 4);
	assert_eq!(entries[1]["title"], "Setup");
	assert_eq!(entries[1]["slug"], "setup");
	assert_eq!(entries[1]["level"], 2);
	assert_eq!(entries[3]["line"], 13);

	Ok(())
}

#[test]
fn outline_of_document_without_headings() -> AnyEmptyResult {
	let tmp = common::project(&[("plain.md", "```md\n# fenced\n```\n")])?;

	common::steer_cmd()
		.arg("outline")
		.arg("plain.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No headings found"));

	Ok(())
}
