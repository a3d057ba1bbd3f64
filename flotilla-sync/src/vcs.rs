//! Version-control boundary.
//!
//! Every git operation goes through [`Git::run`]: an argument list executed
//! in a working directory. [`GitCli`] shells out to the real executable;
//! tests substitute a recording fake.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Captured output of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

/// Errors from invoking git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The executable could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error("`{command}` failed ({status}): {}", output.trim())]
    Failed {
        command: String,
        status: String,
        /// Combined stdout + stderr.
        output: String,
    },
}

impl GitError {
    /// Combined tool output, when the command got far enough to produce any.
    pub fn output(&self) -> Option<&str> {
        match self {
            GitError::Spawn { .. } => None,
            GitError::Failed { output, .. } => Some(output),
        }
    }
}

/// Runs git commands against a working directory.
pub trait Git {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, GitError>;
}

/// [`Git`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Git for GitCli {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
        let command = self.command_line(args);
        tracing::debug!(dir = %dir.display(), command = %command, "running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        let captured = GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                status: output.status.to_string(),
                output: captured.combined(),
            });
        }
        Ok(captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn failed_command_captures_output() {
        let dir = TempDir::new().unwrap();
        let err = GitCli::default()
            .run(dir.path(), &["rev-parse", "HEAD"])
            .unwrap_err();
        assert!(matches!(err, GitError::Failed { .. }), "got: {err}");
        assert!(!err.output().unwrap_or_default().is_empty());
        assert!(err.to_string().contains("git rev-parse HEAD"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = TempDir::new().unwrap();
        let err = GitCli::new("/nonexistent/flotilla-git")
            .run(dir.path(), &["status"])
            .unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }), "got: {err}");
        assert!(err.output().is_none());
    }

    #[test]
    fn successful_command_returns_stdout() {
        let dir = TempDir::new().unwrap();
        let out = GitCli::default().run(dir.path(), &["--version"]).unwrap();
        assert!(out.stdout.starts_with("git version"));
    }
}
