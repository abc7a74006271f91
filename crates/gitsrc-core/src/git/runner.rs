//! External process execution, restricted to an allow-list of commands.

use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

/// Environment variables that would redirect git away from the working directory.
const GIT_ENV_OVERRIDES: [&str; 4] = ["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE", "GIT_COMMON_DIR"];

/// Commands a [`ProcessRunner`] may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedCommand {
    Git,
}

impl SupportedCommand {
    pub fn program(self) -> &'static str {
        match self {
            SupportedCommand::Git => "git",
        }
    }
}

impl FromStr for SupportedCommand {
    type Err = ProcessError;

    fn from_str(command: &str) -> Result<Self, Self::Err> {
        match command {
            "git" => Ok(SupportedCommand::Git),
            other => Err(ProcessError::UnsupportedCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Unsupported command \"{0}\"")]
    UnsupportedCommand(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {output}")]
    Failed {
        program: &'static str,
        status: String,
        output: String,
    },
}

impl ProcessError {
    /// Replace every occurrence of `secret` in captured output.
    pub fn redact(self, secret: &str) -> Self {
        match self {
            ProcessError::Failed {
                program,
                status,
                output,
            } if !secret.is_empty() => ProcessError::Failed {
                program,
                status,
                output: output.replace(secret, "***"),
            },
            other => other,
        }
    }
}

/// Runs external commands on behalf of the fetcher.
pub trait ProcessRunner: Send + Sync {
    /// Run `command` with `args` inside `dir` and return combined stdout and stderr.
    ///
    /// Commands outside [`SupportedCommand`] fail with
    /// [`ProcessError::UnsupportedCommand`] and are never spawned.
    fn run(&self, dir: &Path, command: &str, args: &[&str]) -> Result<Vec<u8>, ProcessError>;
}

/// [`ProcessRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, dir: &Path, command: &str, args: &[&str]) -> Result<Vec<u8>, ProcessError> {
        let program = command.parse::<SupportedCommand>()?.program();

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        for key in GIT_ENV_OVERRIDES {
            cmd.env_remove(key);
        }
        // Never block on an interactive credential prompt.
        cmd.env("GIT_TERMINAL_PROMPT", "0");

        debug!(program, dir = %dir.display(), "Running command");
        let output = cmd
            .output()
            .map_err(|source| ProcessError::Spawn { program, source })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            return Err(ProcessError::Failed {
                program,
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&combined).trim().to_string(),
            });
        }
        Ok(combined)
    }
}
