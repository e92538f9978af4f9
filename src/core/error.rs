use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationInvalidArgument,

    ConfigReadFailed,
    ConfigInvalidYaml,
    ConfigInvalidValue,

    BuildCompileFailed,
    BuildImageFailed,

    ManifestRenderFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ConfigReadFailed => "config.read_failed",
            ErrorCode::ConfigInvalidYaml => "config.invalid_yaml",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::BuildCompileFailed => "build.compile_failed",
            ErrorCode::BuildImageFailed => "build.image_failed",

            ErrorCode::ManifestRenderFailed => "manifest.render_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFileDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub path: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptFailedDetails {
    pub script: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRenderDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        usage: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            usage,
        });

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    pub fn config_read_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        let message = format!("failed to read config file {}: ({})", path, error);
        let details = to_details(ConfigFileDetails { path, error });

        Self::new(ErrorCode::ConfigReadFailed, message, details)
            .with_hint("Run the build from the project root, or pass --project-dir")
    }

    pub fn config_invalid_yaml(path: impl Into<String>, err: serde_yml::Error) -> Self {
        let path = path.into();
        let error = err.to_string();
        let message = format!("failed to unmarshal config file {}: ({})", path, error);
        let details = to_details(ConfigFileDetails { path, error });

        Self::new(ErrorCode::ConfigInvalidYaml, message, details)
    }

    pub fn config_invalid_value(
        path: impl Into<String>,
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let key = key.into();
        let problem = problem.into();
        let message = format!("invalid '{}' in config file {}: {}", key, path, problem);
        let details = to_details(ConfigInvalidValueDetails {
            path,
            key,
            value,
            problem,
        });

        Self::new(ErrorCode::ConfigInvalidValue, message, details)
    }

    pub fn build_compile_failed(details: ScriptFailedDetails) -> Self {
        let message = format!("failed to build: ({})", combined(&details));

        Self::new(ErrorCode::BuildCompileFailed, message, to_details(details))
    }

    pub fn build_image_failed(details: ScriptFailedDetails) -> Self {
        let message = format!(
            "failed to output build image {}: ({})",
            details.image.as_deref().unwrap_or_default(),
            combined(&details)
        );

        Self::new(ErrorCode::BuildImageFailed, message, to_details(details))
    }

    pub fn manifest_render_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        let message = format!("failed to generate {}: ({})", path, error);
        let details = to_details(ManifestRenderDetails { path, error });

        Self::new(ErrorCode::ManifestRenderFailed, message, details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

fn combined(details: &ScriptFailedDetails) -> String {
    format!("{}{}", details.stdout, details.stderr)
}
