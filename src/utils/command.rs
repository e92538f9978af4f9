//! Process execution primitives for pipeline scripts.

use serde::Serialize;
use std::path::Path;
use std::process::{Command, Output};

/// Captured output from command execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Result of running one script to completion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOutput {
    pub script: String,
    pub exit_code: i32,
    pub success: bool,
    #[serde(flatten)]
    pub output: CapturedOutput,
}

impl ScriptOutput {
    pub fn combined(&self) -> String {
        self.output.combined()
    }

    fn from_output(script: &Path, out: Output) -> Self {
        Self {
            script: script.display().to_string(),
            exit_code: out.status.code().unwrap_or(-1),
            success: out.status.success(),
            output: CapturedOutput::new(
                String::from_utf8_lossy(&out.stdout).to_string(),
                String::from_utf8_lossy(&out.stderr).to_string(),
            ),
        }
    }

    fn spawn_failed(script: &Path, err: std::io::Error) -> Self {
        Self {
            script: script.display().to_string(),
            exit_code: -1,
            success: false,
            output: CapturedOutput::new(
                String::new(),
                format!("Command error: {}: {}", script.display(), err),
            ),
        }
    }
}

/// Run an executable script directly (no shell) and block until it exits.
///
/// `env` pairs are added on top of the inherited environment. A spawn
/// failure is reported as an unsuccessful run with exit code -1 and the
/// OS error in stderr, so callers handle both cases the same way.
pub fn run_script(script: &Path, dir: &Path, env: &[(&str, &str)]) -> ScriptOutput {
    let mut cmd = Command::new(script);
    cmd.current_dir(dir);

    if !env.is_empty() {
        cmd.envs(env.iter().copied());
    }

    match cmd.output() {
        Ok(out) => ScriptOutput::from_output(script, out),
        Err(e) => ScriptOutput::spawn_failed(script, e),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::RwLock;
    use tempfile::TempDir;

    // A child forked by a parallel test inherits any script file still open
    // for writing, and exec of that script then fails with ETXTBSY. Writes
    // take the lock exclusively, spawns share it.
    static SCRIPT_LOCK: RwLock<()> = RwLock::new(());

    fn run(script: &Path, dir: &Path, env: &[(&str, &str)]) -> ScriptOutput {
        let _guard = SCRIPT_LOCK.read().unwrap_or_else(|e| e.into_inner());
        run_script(script, dir, env)
    }

    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let _guard = SCRIPT_LOCK.write().unwrap_or_else(|e| e.into_inner());
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn run_script_captures_both_streams() {
        let dir = TempDir::new().unwrap();
        let script = write_script(dir.path(), "ok.sh", "echo out\necho err >&2");

        let result = run(&script, dir.path(), &[]);

        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output.stdout, "out\n");
        assert_eq!(result.output.stderr, "err\n");
        assert_eq!(result.combined(), "out\nerr\n");
    }

    #[test]
    fn run_script_reports_exit_code() {
        let dir = TempDir::new().unwrap();
        let script = write_script(dir.path(), "fail.sh", "echo broken\nexit 3");

        let result = run(&script, dir.path(), &[]);

        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.output.stdout, "broken\n");
    }

    #[test]
    fn run_script_adds_env_pairs() {
        let dir = TempDir::new().unwrap();
        let script = write_script(dir.path(), "env.sh", "echo \"$GREETING\"");

        let result = run(&script, dir.path(), &[("GREETING", "hello")]);

        assert_eq!(result.output.stdout, "hello\n");
    }

    #[test]
    fn run_script_runs_in_given_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("marker"), "here").unwrap();
        let script = write_script(dir.path(), "cat.sh", "cat marker");

        let result = run(&script, dir.path(), &[]);

        assert_eq!(result.output.stdout, "here");
    }

    #[test]
    fn run_script_missing_file_is_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.sh");

        let result = run(&missing, dir.path(), &[]);

        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert!(result.output.stderr.starts_with("Command error:"));
    }
}

