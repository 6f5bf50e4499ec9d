//! Deploy directory and package source fixtures

#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xtool_core::Settings;
use xtool_extensions::PackageManager;

/// A temporary deploy directory plus a place for sources outside of it
pub struct TestDeploy {
    temp: TempDir,
}

impl TestDeploy {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("deploy")).unwrap();
        fs::create_dir_all(temp.path().join("external")).unwrap();
        Self { temp }
    }

    pub fn deploy_dir(&self) -> PathBuf {
        self.temp.path().join("deploy")
    }

    pub fn external_dir(&self) -> PathBuf {
        self.temp.path().join("external")
    }

    pub fn manager(&self) -> PackageManager {
        PackageManager::open(&self.deploy_dir(), None).unwrap()
    }

    pub fn manager_with(&self, settings: Settings) -> PackageManager {
        PackageManager::with_settings(&self.deploy_dir(), None, settings).unwrap()
    }

    /// Package folder outside the source root with `<name>.exe`, a readme
    /// and an optional package config document
    pub fn external_package(&self, name: &str, config: Option<Value>) -> PathBuf {
        write_package(&self.external_dir(), name, config)
    }

    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.deploy_dir().join("target").join(name)
    }

    pub fn source_archive(&self, name: &str) -> PathBuf {
        self.deploy_dir()
            .join("source")
            .join(format!("{name}.tar.gz"))
    }

    pub fn shortcuts_dir(&self) -> PathBuf {
        self.deploy_dir().join("shortcuts")
    }
}

pub fn write_package(parent: &Path, name: &str, config: Option<Value>) -> PathBuf {
    let dir = parent.join(name);
    fs::create_dir_all(dir.join("docs")).unwrap();
    fs::write(dir.join(format!("{name}.exe")), b"MZ").unwrap();
    fs::write(dir.join("readme.txt"), b"read me").unwrap();
    fs::write(dir.join("docs").join("manual.txt"), b"manual").unwrap();
    if let Some(config) = config {
        fs::write(
            dir.join("xtool.json"),
            serde_json::to_vec_pretty(&config).unwrap(),
        )
        .unwrap();
    }
    dir
}

pub fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
