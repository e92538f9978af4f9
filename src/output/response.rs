//! CLI response formatting and output.
//!
//! Provides JSON envelope, text error rendering, and exit code mapping.
//! Results go to stdout; errors always go to stderr.

use opkit::error::Hint;
use opkit::{Error, ErrorCode, Result};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn write_line(mut handle: impl Write, payload: &str, context: &str) -> Result<()> {
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(e.to_string(), Some(context.to_string())));
    }
    Ok(())
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    let payload = response.to_json()?;
    write_line(io::stdout().lock(), &payload, "write stdout")
}

fn eprint_response(response: &CliResponse<()>) -> Result<()> {
    let payload = response.to_json()?;
    write_line(io::stderr().lock(), &payload, "write stderr")
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => eprint_response(&CliResponse::<()>::from_error(&err)),
    }
}

/// Print raw text as produced by the command.
pub fn print_text(content: &str) -> Result<()> {
    let mut handle = io::stdout().lock();
    if let Err(e) = write!(handle, "{}", content) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(Error::internal_io(e.to_string(), Some("write stdout".to_string())));
    }
    Ok(())
}

/// Human-readable error: message, underlying cause, usage lines, then hints.
pub fn format_error_text(err: &Error) -> String {
    let mut text = format!("error: {}", err.message);

    if let Some(cause) = err.details.get("error").and_then(|v| v.as_str()) {
        if !err.message.contains(cause) {
            text.push_str(&format!("\n  cause: {}", cause));
        }
    }

    if let Some(usage) = err.details.get("usage").and_then(|v| v.as_array()) {
        for line in usage.iter().filter_map(|v| v.as_str()) {
            text.push_str(&format!("\n  {}", line));
        }
    }

    for hint in &err.hints {
        text.push_str(&format!("\nhint: {}", hint.message));
    }

    text
}

pub fn print_error_text(err: &Error) -> Result<()> {
    write_line(io::stderr().lock(), &format_error_text(err), "write stderr")
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::ConfigReadFailed
        | ErrorCode::ConfigInvalidYaml
        | ErrorCode::ConfigInvalidValue => 3,

        ErrorCode::ManifestRenderFailed => 4,

        ErrorCode::BuildCompileFailed | ErrorCode::BuildImageFailed => 20,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError => 1,
    }
}
