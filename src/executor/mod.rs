//! Command execution abstraction for vsinstall.
//!
//! This module provides:
//! - [`CommandSpec`]: Specification for commands to execute
//! - [`ExecutionResult`]: Result of command execution
//! - [`CommandExecutor`]: Trait for command execution strategies
//! - [`RealCommandExecutor`]: Production implementation using `std::process::Command`

mod pipe;
mod real;

use std::time::Duration;

use anyhow::Result;

pub use real::RealCommandExecutor;

/// Exit codes every command accepts unless told otherwise.
pub const DEFAULT_SUCCESS_CODES: &[i32] = &[0];

/// Command-line arguments of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArgs {
    /// Individually quoted arguments
    List(Vec<String>),
    /// A pre-formatted command line passed verbatim (installers parse their own
    /// command line and expect `/flag "value"` quoting)
    Raw(String),
}

impl CommandArgs {
    /// Renders the arguments for logs and error messages.
    pub fn display(&self) -> String {
        match self {
            Self::List(args) => args
                .iter()
                .map(|a| format!("{:?}", a))
                .collect::<Vec<_>>()
                .join(" "),
            Self::Raw(line) => line.clone(),
        }
    }
}

/// Specification for a command to be executed
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The command to execute (e.g., "7z", or a path to the installer)
    pub command: String,
    /// Command arguments
    pub args: CommandArgs,
    /// Kill the command if it runs longer than this
    pub timeout: Option<Duration>,
    /// Exit codes treated as success
    pub success_codes: Vec<i32>,
}

impl CommandSpec {
    /// Creates a new CommandSpec with command and individual args
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args: CommandArgs::List(args),
            timeout: None,
            success_codes: DEFAULT_SUCCESS_CODES.to_vec(),
        }
    }

    /// Creates a new CommandSpec whose command line is passed verbatim
    #[must_use]
    pub fn raw(command: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            args: CommandArgs::Raw(command_line.into()),
            ..Self::new(command, Vec::new())
        }
    }

    /// Sets the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the accepted exit codes
    #[must_use]
    pub fn with_success_codes(mut self, codes: &[i32]) -> Self {
        self.success_codes = codes.to_vec();
        self
    }
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Not run (dry-run mode)
    Skipped,
    /// Exited with a code
    Code(i32),
    /// Terminated without an exit code (e.g., by a signal)
    Terminated,
}

/// Result of command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    pub outcome: ExitOutcome,
}

impl ExecutionResult {
    /// Result of a command that was not run.
    pub fn skipped() -> Self {
        Self {
            outcome: ExitOutcome::Skipped,
        }
    }

    /// Result of a command that exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self {
            outcome: ExitOutcome::Code(code),
        }
    }

    /// Returns true if the command was accepted by `spec`.
    ///
    /// In dry-run mode (outcome is `Skipped`), this always returns true.
    pub fn success(&self, spec: &CommandSpec) -> bool {
        match self.outcome {
            ExitOutcome::Skipped => true,
            ExitOutcome::Code(code) => spec.success_codes.contains(&code),
            ExitOutcome::Terminated => false,
        }
    }

    /// Returns the exit code if available
    pub fn code(&self) -> Option<i32> {
        match self.outcome {
            ExitOutcome::Code(code) => Some(code),
            _ => None,
        }
    }

    /// Describes the outcome for error messages.
    pub fn describe(&self) -> String {
        match self.outcome {
            ExitOutcome::Skipped => "not executed".to_string(),
            ExitOutcome::Code(code) => format!("exit code: {}", code),
            ExitOutcome::Terminated => "terminated without exit code".to_string(),
        }
    }
}

/// Trait for command execution.
///
/// Implementations must be `Send + Sync` so one executor can be shared
/// (`Arc<dyn CommandExecutor>`) by the extractor and the orchestrator.
pub trait CommandExecutor: Send + Sync {
    /// Executes a command with the given specification.
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult>;
}

/// Executes `spec` and fails unless its exit code is accepted.
pub fn execute_checked(
    executor: &dyn CommandExecutor,
    spec: &CommandSpec,
) -> Result<ExecutionResult> {
    let result = executor.execute(spec)?;
    if !result.success(spec) {
        return Err(crate::error::VsInstallError::Execution {
            command: format!("{} {}", spec.command, spec.args.display()),
            status: result.describe(),
        }
        .into());
    }
    Ok(result)
}
