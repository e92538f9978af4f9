#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};
use tempfile::TempDir;

// Tests in one binary run on parallel threads. A child forked while another
// thread still has a script open for writing inherits that handle, and exec
// of the script then fails with ETXTBSY. Script writes hold the lock
// exclusively; anything that spawns holds `spawn_guard()`.
static SCRIPT_LOCK: RwLock<()> = RwLock::new(());

/// Hold while running anything that forks. Never hold it across `Project`
/// setup calls; those take the write side.
pub fn spawn_guard() -> RwLockReadGuard<'static, ()> {
    SCRIPT_LOCK.read().unwrap_or_else(|e| e.into_inner())
}

pub const CONFIG: &str =
    "apiVersion: app.example.com/v1alpha1\nkind: AppService\nprojectName: app-operator\n";

/// Scratch operator project with the two build scripts and a config file.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.build_script("echo compiled");
        project.image_script("echo \"built $IMAGE\"\ntouch image-ran");
        project.config(CONFIG);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn build_script(&self, body: &str) -> &Self {
        self.script("tmp/build/build.sh", body)
    }

    pub fn image_script(&self, body: &str) -> &Self {
        self.script("tmp/build/docker_build.sh", body)
    }

    pub fn config(&self, content: &str) -> &Self {
        let path = self.root().join("config/config.yaml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn remove_config(&self) -> &Self {
        fs::remove_file(self.root().join("config/config.yaml")).unwrap();
        self
    }

    pub fn image_ran(&self) -> bool {
        self.root().join("image-ran").exists()
    }

    pub fn operator_yaml(&self) -> PathBuf {
        self.root().join("deploy/operator.yaml")
    }

    fn script(&self, rel: &str, body: &str) -> &Self {
        let _guard = SCRIPT_LOCK.write().unwrap_or_else(|e| e.into_inner());
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        self
    }
}
