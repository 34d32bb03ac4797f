#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use steer_core::AnyResult;
use tempfile::TempDir;

pub fn steer_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("steer"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("STEER_LOG");
	cmd
}

/// Create a temporary project containing `files`, given as `(path, content)`
/// pairs relative to the project root.
pub fn project(files: &[(&str, &str)]) -> AnyResult<TempDir> {
	let tmp = tempfile::tempdir()?;
	for (path, content) in files {
		write(tmp.path(), path, content)?;
	}
	Ok(tmp)
}

pub fn write(root: &Path, path: &str, content: &str) -> AnyResult<()> {
	let full = root.join(path);
	if let Some(parent) = full.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(full, content)?;
	Ok(())
}
