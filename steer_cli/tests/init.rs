mod common;

use steer_core::AnyEmptyResult;
use steer_core::BuildTarget;
use steer_core::SteerConfig;
use steer_core::default_mappings;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::steer_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created steer.toml"));

	let config = SteerConfig::load(tmp.path())?.ok_or("config was not created")?;
	assert!(!config.strict_destinations);
	similar_asserts::assert_eq!(config.mappings, default_mappings());
	assert!(config.mappings[1].applies_to(BuildTarget::Cli));
	assert!(!config.mappings[1].applies_to(BuildTarget::Power));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = common::project(&[(".config/steer.toml", "base_dir = \"src\"\n")])?;

	common::steer_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert!(!tmp.path().join("steer.toml").exists());
	let content = std::fs::read_to_string(tmp.path().join(".config/steer.toml"))?;
	assert_eq!(content, "base_dir = \"src\"\n");

	Ok(())
}

#[test]
fn no_subcommand_prints_usage_hint() {
	common::steer_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("steer --help"));
}
