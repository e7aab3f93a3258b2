//! Shared test infrastructure for CLI integration tests.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Engine command that checks its HTML input and writes a minimal PDF.
pub const FAKE_ENGINE: &str =
    "sh -c 'grep -q \"<html>\" \"$1\" && printf \"%%PDF-1.4 fake\" > \"$2\"' fake-engine";

fn manifest_dir() -> PathBuf {
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()))
}

pub fn fixture_path(name: &str) -> PathBuf {
    manifest_dir().join("tests").join("fixtures").join(name)
}

/// Scratch working directory for one `resume-pdf` run.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy a fixture into the sandbox under `resume_data.yaml`.
    pub fn with_fixture(self, name: &str) -> Self {
        std::fs::copy(fixture_path(name), self.path().join("resume_data.yaml"))
            .expect("copy fixture");
        self
    }

    pub fn with_data(self, yaml: &str) -> Self {
        std::fs::write(self.path().join("resume_data.yaml"), yaml).expect("write data");
        self
    }

    /// Run the binary inside the sandbox with a scrubbed engine/token environment.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_resume-pdf"))
            .args(args)
            .current_dir(self.path())
            .env_remove("RESUME_PDF_ENGINE")
            .env_remove("GITHUB_TOKEN")
            .env_remove("RUST_LOG")
            .output()
            .expect("run resume-pdf")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
