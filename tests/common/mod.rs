//! Common test utilities and fixtures
//!
//! Every test gets its own temporary working directory and HOME so the
//! binary never picks up a real configuration or save file.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Isolated environment for running the binary
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The save file used when no override is given
    pub fn default_data_file(&self) -> PathBuf {
        self.root().join("dados_jogo.txt")
    }

    /// Copy a fixture into the environment under `name`
    pub fn install_fixture(&self, fixture: &str, name: &str) -> PathBuf {
        let dest = self.root().join(name);
        fs::copy(fixture_path(fixture), &dest).unwrap();
        dest
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.root().join(name)).unwrap()
    }

    /// A command for the attrpg binary running inside this environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("attrpg").unwrap();
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join(".config"))
            .env_remove("ATTRPG_CONFIG")
            .env_remove("ATTRPG_DATA_FILE")
            .env_remove("ATTRPG_LOG_LEVEL")
            .env_remove("ATTRPG_LOG_FILE")
            .env_remove("ATTRPG_LOG_JSON")
            .env_remove("RUST_LOG");
        cmd
    }
}
