//! Project configuration read from `config/config.yaml`.
//!
//! The file names the custom resource the operator manages and the operator
//! itself; the manifest generator derives every name it renders from here.

use crate::error::{Error, Result};
use heck::{ToKebabCase, ToUpperCamelCase};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

// <group>/<version>, group is a DNS subdomain
static API_VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9.-]*[a-z0-9])?/v[0-9]+[a-z0-9]*$").unwrap()
});

static KIND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

// DNS-1123 label
static PROJECT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub api_version: String,
    pub kind: String,
    pub project_name: String,
}

impl GeneratorConfig {
    /// API group, e.g. `app.example.com`.
    pub fn group(&self) -> &str {
        self.api_version
            .split_once('/')
            .map(|(group, _)| group)
            .unwrap_or(self.api_version.as_str())
    }

    /// API version, e.g. `v1alpha1`.
    pub fn version(&self) -> &str {
        self.api_version
            .split_once('/')
            .map(|(_, version)| version)
            .unwrap_or_default()
    }

    pub fn kind_singular(&self) -> String {
        self.kind.to_lowercase()
    }

    pub fn kind_plural(&self) -> String {
        format!("{}s", self.kind_singular())
    }

    /// CRD object name, `<plural>.<group>`.
    pub fn crd_name(&self) -> String {
        format!("{}.{}", self.kind_plural(), self.group())
    }

    /// Check field shapes. `path` is only used for error context.
    pub fn validate(&self, path: &str) -> Result<()> {
        if !API_VERSION_PATTERN.is_match(&self.api_version) {
            return Err(Error::config_invalid_value(
                path,
                "apiVersion",
                Some(self.api_version.clone()),
                "expected <group>/<version>, e.g. app.example.com/v1alpha1",
            ));
        }

        if !KIND_PATTERN.is_match(&self.kind) {
            let err = Error::config_invalid_value(
                path,
                "kind",
                Some(self.kind.clone()),
                "expected an alphanumeric name starting with an uppercase letter",
            );
            return Err(suggest(err, "kind", self.kind.to_upper_camel_case()));
        }

        if !PROJECT_NAME_PATTERN.is_match(&self.project_name) {
            let err = Error::config_invalid_value(
                path,
                "projectName",
                Some(self.project_name.clone()),
                "expected a DNS-1123 label (lowercase alphanumerics and '-', at most 63 chars)",
            );
            return Err(suggest(err, "projectName", self.project_name.to_kebab_case()));
        }

        Ok(())
    }
}

fn suggest(err: Error, key: &str, candidate: String) -> Error {
    if candidate.is_empty() {
        err
    } else {
        err.with_hint(format!("Try {}: {}", key, candidate))
    }
}

/// Parse and validate YAML content. `path` is only used for error context.
pub fn parse(content: &str, path: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig =
        serde_yml::from_str(content).map_err(|e| Error::config_invalid_yaml(path, e))?;
    config.validate(path)?;
    Ok(config)
}

/// Read, parse and validate the config file at `path`.
pub fn load(path: &Path) -> Result<GeneratorConfig> {
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| Error::config_read_failed(&display, e.to_string()))?;
    parse(&content, &display)
}
