//! Shared E2E test helpers for `roost` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables the config loader reads.
/// Removed so that the developer's shell cannot leak into assertions.
const ROOST_ENV_VARS: &[&str] = &[
    "ROOST_LOGIN_PATH",
    "ROOST_DEFAULT_FALLBACK",
    "ROOST_SESSION_TIMEOUT_MS",
    "ROOST_ORACLE_TIMEOUT_MS",
    "ROOST_UNKNOWN_ROLE",
    "RUST_LOG",
];

/// Build a Command for the `roost` binary rooted at a fresh project dir.
///
/// Global config is skipped. Returns (command, _guard); keep the guard
/// alive for the test's duration.
pub fn roost_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp project dir");
    let cmd = roost_cmd_in(tmp.path());
    (cmd, tmp)
}

/// Build a Command for the `roost` binary rooted at `project`.
pub fn roost_cmd_in(project: &Path) -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("roost");
    cmd.timeout(TIMEOUT_BASIC);
    for var in ROOST_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--no-global")
        .args(["-C", project.to_str().expect("valid utf8")]);
    cmd
}

/// Write `.roost/config.toml` under `project`.
pub fn write_project_config(project: &Path, contents: &str) {
    let dir = project.join(".roost");
    std::fs::create_dir_all(&dir).expect("create .roost dir");
    std::fs::write(dir.join("config.toml"), contents).expect("write project config");
}
