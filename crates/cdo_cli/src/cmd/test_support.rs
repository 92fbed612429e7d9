use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use cdo_testkit::target_dir as workspace_target_dir;

static CDO_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> String {
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("fixture writes");
	path.to_string_lossy().into_owned()
}

pub(crate) fn run_cdo(args: &[&str]) -> Output {
	Command::new(cdo_bin()).args(args).output().expect("cdo command executes")
}

pub(crate) fn run_cdo_json(args: &[&str]) -> serde_json::Value {
	let output = run_cdo(args);
	assert!(
		output.status.success(),
		"cdo command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn cdo_bin() -> &'static PathBuf {
	CDO_BIN.get_or_init(resolve_cdo_bin)
}

fn resolve_cdo_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_cdo") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "cdo.exe" } else { "cdo" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "cdo"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build cdo binary at {}", bin.display());

	bin
}
