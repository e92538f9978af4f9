//! Deployment manifest rendering.
//!
//! Produces `deploy/operator.yaml`: the CustomResourceDefinition for the
//! configured kind followed by the operator Deployment running `image`.

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::paths::ProjectLayout;
use crate::utils::io;
use crate::utils::template::{self, TemplateVars};
use std::path::PathBuf;

const CRD_TEMPLATE: &str = r#"apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: {{kindPlural}}.{{group}}
spec:
  group: {{group}}
  names:
    kind: {{kind}}
    listKind: {{kind}}List
    plural: {{kindPlural}}
    singular: {{kindSingular}}
  scope: Namespaced
  version: {{version}}
"#;

const DEPLOYMENT_TEMPLATE: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{projectName}}
spec:
  replicas: 1
  selector:
    matchLabels:
      name: {{projectName}}
  template:
    metadata:
      labels:
        name: {{projectName}}
    spec:
      containers:
        - name: {{projectName}}
          image: "{{image}}"
          command:
          - {{projectName}}
          imagePullPolicy: Always
          env:
            - name: WATCH_NAMESPACE
              valueFrom:
                fieldRef:
                  fieldPath: metadata.namespace
            - name: OPERATOR_NAME
              value: "{{projectName}}"
"#;

/// Render the operator manifest as a multi-document YAML string.
pub fn render_operator_yaml(config: &GeneratorConfig, image: &str) -> String {
    let kind_singular = config.kind_singular();
    let kind_plural = config.kind_plural();
    let image = escape_double_quoted(image);

    let vars = [
        (TemplateVars::PROJECT_NAME, config.project_name.as_str()),
        (TemplateVars::IMAGE, image.as_str()),
        (TemplateVars::KIND, config.kind.as_str()),
        (TemplateVars::KIND_SINGULAR, kind_singular.as_str()),
        (TemplateVars::KIND_PLURAL, kind_plural.as_str()),
        (TemplateVars::GROUP, config.group()),
        (TemplateVars::VERSION, config.version()),
    ];

    format!(
        "{}---\n{}",
        template::render(CRD_TEMPLATE, &vars),
        template::render(DEPLOYMENT_TEMPLATE, &vars)
    )
}

// Escape for a YAML double-quoted scalar.
fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Render and write every deploy file for `image`. Returns the written paths.
pub fn render_deploy_files(
    config: &GeneratorConfig,
    image: &str,
    layout: &ProjectLayout,
) -> Result<Vec<PathBuf>> {
    let operator_yaml = layout.operator_yaml();
    let display = operator_yaml.display().to_string();

    let content = render_operator_yaml(config, image);

    io::ensure_dir(&layout.deploy_dir(), "create deploy dir")
        .and_then(|_| io::write_file_atomic(&operator_yaml, &content, "write operator.yaml"))
        .map_err(|e| Error::manifest_render_failed(&display, describe(&e)))?;

    Ok(vec![operator_yaml])
}

fn describe(err: &Error) -> String {
    match err.details.get("error").and_then(|v| v.as_str()) {
        Some(inner) => format!("{}: {}", err.message, inner),
        None => err.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            api_version: "app.example.com/v1alpha1".to_string(),
            kind: "AppService".to_string(),
            project_name: "app-operator".to_string(),
        }
    }

    #[test]
    fn operator_yaml_has_crd_then_deployment() {
        let yaml = render_operator_yaml(&config(), "quay.io/example/app-operator:v0.0.1");
        let docs: Vec<&str> = yaml.split("---\n").collect();

        assert_eq!(docs.len(), 2);
        assert!(docs[0].contains("kind: CustomResourceDefinition"));
        assert!(docs[0].contains("name: appservices.app.example.com"));
        assert!(docs[0].contains("listKind: AppServiceList"));
        assert!(docs[0].contains("singular: appservice"));
        assert!(docs[0].contains("version: v1alpha1"));
        assert!(docs[1].contains("kind: Deployment"));
        assert!(docs[1].contains("image: \"quay.io/example/app-operator:v0.0.1\""));
        assert!(docs[1].contains("value: \"app-operator\""));
        assert!(!yaml.contains("{{"));
    }

    #[test]
    fn operator_yaml_parses_as_yaml() {
        let yaml = render_operator_yaml(&config(), "registry/app:latest");

        for doc in yaml.split("---\n") {
            let value: serde_yml::Value = serde_yml::from_str(doc).unwrap();
            assert!(value.get("apiVersion").is_some());
        }
    }

    #[test]
    fn render_deploy_files_creates_deploy_dir() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path()).unwrap();

        let written = render_deploy_files(&config(), "registry/app:v2", &layout).unwrap();

        assert_eq!(written, vec![layout.operator_yaml()]);
        let content = fs::read_to_string(layout.operator_yaml()).unwrap();
        assert!(content.contains("image: \"registry/app:v2\""));
    }

    #[test]
    fn render_deploy_files_reports_render_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the deploy directory should be.
        fs::write(dir.path().join("deploy"), "not a dir").unwrap();
        let layout = ProjectLayout::new(dir.path()).unwrap();

        let err = render_deploy_files(&config(), "registry/app:v2", &layout).unwrap_err();

        assert_eq!(err.code.as_str(), "manifest.render_failed");
        assert!(err.message.contains("operator.yaml"));
        assert!(err.message.contains("os error"));
    }

    #[test]
    fn image_with_yaml_syntax_round_trips() {
        let image = "registry/app:v1 #tag \"quoted\" \\ end";
        let yaml = render_operator_yaml(&config(), image);
        let deployment = yaml.split("---\n").nth(1).unwrap();

        let value: serde_yml::Value = serde_yml::from_str(deployment).unwrap();
        let container = &value["spec"]["template"]["spec"]["containers"][0];

        assert_eq!(container["image"].as_str(), Some(image));
    }
}
