#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestFixture {
    temp_dir: TempDir,
    db_path: PathBuf,
    config_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("store.db3");
        let config_path = temp_dir.path().join("config.toml");

        Self { temp_dir, db_path, config_path }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("botcheck").expect("failed to locate botcheck binary");
        cmd.arg("--db").arg(&self.db_path).arg("--config").arg(&self.config_path);
        cmd
    }

    /// Path to a scratch file under this fixture's temp dir, for fixture
    /// JSON payloads.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}
