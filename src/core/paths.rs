use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const BUILD_SCRIPT: &str = "tmp/build/build.sh";
pub const IMAGE_BUILD_SCRIPT: &str = "tmp/build/docker_build.sh";
pub const CONFIG_YAML: &str = "config/config.yaml";
pub const DEPLOY_DIR: &str = "deploy";
pub const OPERATOR_YAML: &str = "operator.yaml";

/// Fixed file layout of an operator project, anchored at its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Anchor the layout at `root`. Relative roots are resolved against the
    /// current directory so scripts resolve the same way after `current_dir`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            current_dir()?.join(root)
        };
        Ok(Self { root })
    }

    /// Layout rooted at the current working directory.
    pub fn current() -> Result<Self> {
        Ok(Self {
            root: current_dir()?,
        })
    }

    /// Layout rooted at a user-supplied path (`~` and `$VAR` are expanded).
    pub fn from_arg(raw: &str) -> Result<Self> {
        let expanded = shellexpand::full(raw).map_err(|e| {
            Error::validation_invalid_argument(
                "project_dir",
                format!("Cannot expand project directory '{}': {}", raw, e),
                None,
            )
        })?;
        Self::new(PathBuf::from(expanded.as_ref()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_script(&self) -> PathBuf {
        self.root.join(BUILD_SCRIPT)
    }

    pub fn image_build_script(&self) -> PathBuf {
        self.root.join(IMAGE_BUILD_SCRIPT)
    }

    pub fn config_yaml(&self) -> PathBuf {
        self.root.join(CONFIG_YAML)
    }

    pub fn deploy_dir(&self) -> PathBuf {
        self.root.join(DEPLOY_DIR)
    }

    pub fn operator_yaml(&self) -> PathBuf {
        self.deploy_dir().join(OPERATOR_YAML)
    }
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("resolve current directory".to_string())))
}
