mod common;

use steer_core::AnyEmptyResult;
use steer_core::AnyResult;
use tempfile::TempDir;

const SHELL: &str = "# Protocol\n\n{{{RULES}}}\n";
const SOURCE: &str = "# Source\n## Rules\nBe kind.\n```md\n## Example\n```\n\n## Other\nIgnored.\n";

fn shell_project() -> AnyResult<TempDir> {
	common::project(&[("shell.md", SHELL), ("source.md", SOURCE)])
}

#[test]
fn inject_fills_token_with_section() -> AnyEmptyResult {
	let tmp = shell_project()?;

	common::steer_cmd()
		.arg("inject")
		.arg("shell.md")
		.arg("--token")
		.arg("RULES")
		.arg("--from")
		.arg("source.md")
		.arg("--section")
		.arg("Rules")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("# Protocol\n\n## Rules\nBe kind.\n```md\n## Example\n```\n");

	Ok(())
}

#[test]
fn inject_writes_output_file() -> AnyEmptyResult {
	let tmp = shell_project()?;

	common::steer_cmd()
		.arg("inject")
		.arg("shell.md")
		.arg("--token")
		.arg("RULES")
		.arg("--from")
		.arg("source.md")
		.arg("--section")
		.arg("#rules")
		.arg("--output")
		.arg("protocol.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote"));

	let written = std::fs::read_to_string(tmp.path().join("protocol.md"))?;
	similar_asserts::assert_eq!(
		written,
		"# Protocol\n\n## Rules\nBe kind.\n```md\n## Example\n```\n"
	);

	Ok(())
}

#[test]
fn inject_fails_on_missing_section() -> AnyEmptyResult {
	let tmp = shell_project()?;

	common::steer_cmd()
		.arg("inject")
		.arg("shell.md")
		.arg("--token")
		.arg("RULES")
		.arg("--from")
		.arg("source.md")
		.arg("--section")
		.arg("Example")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no section matching"));

	Ok(())
}

#[test]
fn inject_allow_missing_leaves_marker() -> AnyEmptyResult {
	let tmp = shell_project()?;

	common::steer_cmd()
		.arg("inject")
		.arg("shell.md")
		.arg("--token")
		.arg("RULES")
		.arg("--from")
		.arg("source.md")
		.arg("--section")
		.arg("Missing")
		.arg("--allow-missing")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("# Protocol\n\n<!-- steer: section `Missing` not found -->\n")
		.stderr(predicates::str::contains("warning: section `Missing` not found"));

	Ok(())
}

#[test]
fn inject_warns_when_token_is_absent() -> AnyEmptyResult {
	let tmp = shell_project()?;

	common::steer_cmd()
		.arg("inject")
		.arg("shell.md")
		.arg("--token")
		.arg("BODY")
		.arg("--from")
		.arg("source.md")
		.arg("--section")
		.arg("Rules")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(SHELL)
		.stderr(predicates::str::contains("has no `{{{BODY}}}` token"));

	Ok(())
}
