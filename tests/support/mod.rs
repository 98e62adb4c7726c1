#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub const USERS: &str = "Code,Name,Email,Password\n\
1,Alice,alice@example.com,pw1\n\
2,Bob,bob@example.com,pw2\n";

pub const TASKS_HEADER: &str = "Code,Name,Status,Rep_User_Code\n";
pub const LOGS_HEADER: &str = "Task_Code,Change_User_Code,Status,Change_Date\n";

pub const ALICE: (&str, &str) = ("alice@example.com", "pw1");
pub const BOB: (&str, &str) = ("bob@example.com", "pw2");

/// A data directory seeded with two users and empty task/log tables.
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn seeded() -> std::io::Result<Self> {
        let data = Self::empty()?;
        data.write("users.csv", USERS)?;
        data.write("tasks.csv", TASKS_HEADER)?;
        data.write("logs.csv", LOGS_HEADER)?;
        Ok(data)
    }

    /// No files at all.
    pub fn empty() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.file(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read(&self, name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.file(name))
    }

    /// `taskapp --data-dir <dir>` with no credentials.
    pub fn cmd(&self) -> Command {
        let mut cmd = taskapp_cmd();
        cmd.arg("--data-dir").arg(self.path());
        cmd
    }

    /// `taskapp --data-dir <dir>` logged in through the environment.
    pub fn cmd_as(&self, (email, password): (&str, &str)) -> Command {
        let mut cmd = self.cmd();
        cmd.env("TASKAPP_EMAIL", email)
            .env("TASKAPP_PASSWORD", password);
        cmd
    }
}

/// The binary with every taskapp environment variable cleared.
pub fn taskapp_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskapp").expect("taskapp binary");
    cmd.env_remove("TASKAPP_DATA_DIR")
        .env_remove("TASKAPP_EMAIL")
        .env_remove("TASKAPP_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

pub fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("json output")
}
