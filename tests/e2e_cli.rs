//! CLI end-to-end tests
//!
//! A small shell script stands in for ffmpeg so no media tools are needed.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the ffmpegwrapper binary
#[allow(deprecated)]
fn ffmpegwrapper_cmd() -> Command {
    Command::cargo_bin("ffmpegwrapper").unwrap()
}

const JOB: &str = r#"
duration_secs = 4.0

[[inputs]]
path = "in.mp4"

[[outputs]]
path = "out.mp4"
overwrite = true
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("job.toml"), JOB).unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    /// Install a fake ffmpeg running `body` and point the config at it.
    fn with_fake_ffmpeg(body: &str) -> Self {
        let fixture = Self::new();
        let script = fixture.dir.path().join("fake-ffmpeg");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(
            fixture.config(),
            format!("[ffmpeg]\nbinary = {:?}\n", script.to_string_lossy()),
        )
        .unwrap();
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> PathBuf {
        self.path("config.toml")
    }

    fn job(&self) -> PathBuf {
        self.path("job.toml")
    }

    fn cmd(&self, args: &[&str], job: &Path) -> Command {
        let mut cmd = ffmpegwrapper_cmd();
        cmd.arg("--config").arg(self.config()).args(args).arg(job);
        cmd
    }
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = ffmpegwrapper_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = ffmpegwrapper_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpegwrapper"));
}

#[test]
fn test_cli_args_prints_command_line() {
    let fixture = Fixture::new();
    fixture
        .cmd(&["args"], &fixture.job())
        .assert()
        .success()
        .stdout(predicate::str::diff("ffmpeg -i in.mp4 -y out.mp4\n"));
}

#[test]
fn test_cli_validate_job() {
    let fixture = Fixture::new();
    fixture
        .cmd(&["validate"], &fixture.job())
        .assert()
        .success()
        .stdout(predicate::str::contains("Job is valid"))
        .stdout(predicate::str::contains("Inputs: 1"));
}

#[test]
fn test_cli_validate_rejects_missing_job() {
    let fixture = Fixture::new();
    fixture
        .cmd(&["validate"], &fixture.path("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read job file"));
}

#[test]
fn test_cli_run_reports_progress() {
    let fixture = Fixture::with_fake_ffmpeg(
        "echo 'frame=   48 fps= 24 q=28.0 size=     128kB time=00:00:02.00 bitrate= 524.3kbits/s speed=1.0x' >&2",
    );
    fixture
        .cmd(&["run"], &fixture.job())
        .assert()
        .success()
        .stdout(predicate::str::contains("50.0%"))
        .stdout(predicate::str::contains("frame=48"));
}

#[test]
fn test_cli_run_json_progress() {
    let fixture = Fixture::with_fake_ffmpeg(
        "echo 'frame=   96 fps= 24 q=28.0 size=     256kB time=00:00:04.00 bitrate= 524.3kbits/s speed=1.0x' >&2",
    );
    fixture
        .cmd(&["run", "--json"], &fixture.job())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""frame":96"#))
        .stdout(predicate::str::contains(r#""time_secs":4.0"#));
}

#[test]
fn test_cli_run_passes_arguments_to_binary() {
    let fixture = Fixture::with_fake_ffmpeg(r#"echo "$@" > "$(dirname "$0")/argv.txt""#);
    fixture.cmd(&["run"], &fixture.job()).assert().success();

    let argv = fs::read_to_string(fixture.path("argv.txt")).unwrap();
    assert_eq!(argv.trim(), "-i in.mp4 -y out.mp4");
}

#[test]
fn test_cli_run_propagates_exit_code() {
    let fixture = Fixture::with_fake_ffmpeg("echo 'in.mp4: No such file or directory' >&2; exit 2");
    fixture.cmd(&["run"], &fixture.job()).assert().code(2);
}

#[test]
fn test_cli_run_missing_binary_fails() {
    let fixture = Fixture::new();
    fs::write(fixture.config(), "[ffmpeg]\nbinary = \"nonexistent_tool_xyz_12345\"\n").unwrap();
    fixture
        .cmd(&["run"], &fixture.job())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to start"));
}
