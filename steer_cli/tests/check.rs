mod common;

use rstest::rstest;
use steer_core::AnyEmptyResult;

const COMPLETE: &[(&str, &str)] = &[
	("steering/a.md", "# A\n"),
	("README.md", "# Readme\n"),
	("LICENSE", "MIT\n"),
	("power/POWER.md", "# Power\n"),
	("power/mcp.json", "{}\n"),
];

#[test]
fn check_passes_for_complete_tree() -> AnyEmptyResult {
	let tmp = common::project(COMPLETE)?;

	common::steer_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: manifest is valid for 4 target(s).",
		));

	Ok(())
}

#[rstest]
#[case::readme("README.md", "source `README.md` does not exist")]
#[case::license("LICENSE", "source `LICENSE` does not exist")]
#[case::power_manifest("power/mcp.json", "[power power] source `power/mcp.json` does not exist")]
fn check_reports_missing_literal_source(
	#[case] missing: &str,
	#[case] expected: &str,
) -> AnyEmptyResult {
	let files: Vec<_> = COMPLETE
		.iter()
		.copied()
		.filter(|(path, _)| *path != missing)
		.collect();
	let tmp = common::project(&files)?;

	common::steer_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(expected))
		.stderr(predicates::str::contains("problem(s) found"));

	Ok(())
}

#[test]
fn check_limits_to_target() -> AnyEmptyResult {
	// README and LICENSE only ship with the npm package.
	let tmp = common::project(&[("power/POWER.md", "# Power\n")])?;

	common::steer_cmd()
		.arg("check")
		.arg("--target")
		.arg("cli")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("valid for 1 target(s)"));

	common::steer_cmd()
		.arg("check")
		.arg("--target")
		.arg("npm")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("source `README.md` does not exist"));

	Ok(())
}

#[test]
fn check_reports_destination_collisions() -> AnyEmptyResult {
	let tmp = common::project(&[
		(
			"steer.toml",
			"[[mappings]]\nsrc = \"steering/*.md\"\ndest = \"steering/{name}.md\"\n\n[[mappings]]\nsrc \
			 = \"overrides/*.md\"\ndest = \"steering/{name}.md\"\n\n[[power_mappings]]\nsrc = \
			 \"power/POWER.md\"\ndest = \"POWER.md\"\n",
		),
		("steering/style.md", "# Style\n"),
		("overrides/style.md", "# Override\n"),
		("power/POWER.md", "# Power\n"),
	])?;

	common::steer_cmd()
		.arg("check")
		.arg("--target")
		.arg("dev")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(
			"destination `steering/style.md` is produced by both `steering/style.md` and \
			 `overrides/style.md`",
		));

	Ok(())
}
