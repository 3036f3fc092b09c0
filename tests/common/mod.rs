#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::{assert::Assert, Command};
use assert_fs::TempDir;
use serde_json::Value;

pub const SCRIPT_ENV: &str = "FUNGISTOCK_CLI_SCRIPT";
pub const HOME_ENV: &str = "FUNGISTOCK_HOME";

/// An isolated Fungistock home directory driven through script mode.
pub struct ScriptHome {
    dir: TempDir,
}

impl ScriptHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp home"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("fungistock.json")
    }

    /// Runs the shell once with `lines` on stdin.
    pub fn run(&self, lines: &[&str]) -> Assert {
        let mut input = lines.join("\n");
        input.push('\n');
        Command::cargo_bin("fungistock_cli")
            .expect("binary built")
            .env(SCRIPT_ENV, "1")
            .env(HOME_ENV, self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .write_stdin(input)
            .assert()
    }

    /// Runs the shell and returns its stdout.
    pub fn stdout(&self, lines: &[&str]) -> String {
        let output = self.run(lines).success().get_output().stdout.clone();
        String::from_utf8(output).expect("utf-8 output")
    }

    pub fn snapshot(&self) -> Value {
        let text = std::fs::read_to_string(self.data_file()).expect("data file exists");
        serde_json::from_str(&text).expect("data file is JSON")
    }
}
