//! Real command executor implementation.
//!
//! This module provides [`RealCommandExecutor`], which executes commands
//! using `std::process::Command` with real-time output streaming and an
//! optional timeout.

use std::process::{Child, Command, Stdio};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use which::which;

use super::pipe::{StreamType, panic_message, read_pipe_to_log};
use super::{CommandArgs, CommandExecutor, CommandSpec, ExecutionResult, ExitOutcome};
use crate::error::VsInstallError;

/// Interval between exit checks while a command with a timeout runs.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Kills a child process and joins its reader threads.
fn cleanup_child_process<I>(child: &mut Child, handles: I)
where
    I: IntoIterator<Item = JoinHandle<()>>,
{
    let pid = child.id();
    if let Err(e) = child.kill() {
        tracing::debug!(pid = pid, "kill returned error (process may have already exited): {}", e);
    }
    if let Err(e) = child.wait() {
        tracing::warn!(pid = pid, "failed to wait for child process after kill: {}", e);
    }
    for handle in handles {
        if let Err(e) = handle.join() {
            tracing::warn!("reader thread panicked during cleanup: {}", panic_message(&*e));
        }
    }
}

/// Splits a raw command line on whitespace, grouping double-quoted runs.
///
/// Only used where the OS has no raw command line (non-Windows); quotes are
/// removed and backslashes kept literally.
#[cfg_attr(windows, allow(dead_code))]
pub(crate) fn split_command_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

fn apply_args(command: &mut Command, args: &CommandArgs) {
    match args {
        CommandArgs::List(list) => {
            command.args(list);
        }
        CommandArgs::Raw(line) => {
            #[cfg(windows)]
            {
                use std::os::windows::process::CommandExt;
                command.raw_arg(line);
            }
            #[cfg(not(windows))]
            {
                command.args(split_command_line(line));
            }
        }
    }
}

fn execution_error(spec: &CommandSpec, status: String) -> anyhow::Error {
    VsInstallError::Execution {
        command: format!("{} {}", spec.command, spec.args.display()),
        status,
    }
    .into()
}

/// Command executor that runs actual system commands.
///
/// When `dry_run` is true, commands are logged but not executed,
/// and `execute()` returns a `Skipped` result.
pub struct RealCommandExecutor {
    pub dry_run: bool,
}

impl RealCommandExecutor {
    /// Waits for `child`, killing it once `timeout` has elapsed.
    fn wait_with_timeout(
        child: &mut Child,
        timeout: Option<Duration>,
    ) -> std::io::Result<Option<std::process::ExitStatus>> {
        let Some(timeout) = timeout else {
            return child.wait().map(Some);
        };
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if started.elapsed() >= timeout {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
        if self.dry_run {
            tracing::info!("dry run: {} {}", spec.command, spec.args.display());
            return Ok(ExecutionResult::skipped());
        }

        let cmd = which(&spec.command).map_err(|_| VsInstallError::CommandNotFound {
            command: spec.command.clone(),
        })?;
        tracing::trace!("command found: {}: {}", spec.command, cmd.to_string_lossy());

        let mut command = Command::new(&cmd);
        apply_args(&mut command, &spec.args);

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let mut child = command.spawn().with_context(|| {
            format!("failed to spawn command `{}` with args {}", spec.command, spec.args.display())
        })?;

        tracing::debug!("spawned command: {}: pid={}", spec.command, child.id());

        let program = cmd
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| spec.command.clone());

        let stdout_pipe = child.stdout.take();
        let stdout_program = program.clone();
        let stdout_handle = match thread::Builder::new()
            .name("stdout-reader".to_string())
            .spawn(move || read_pipe_to_log(stdout_pipe, StreamType::Stdout, stdout_program))
        {
            Ok(handle) => handle,
            Err(e) => {
                cleanup_child_process(&mut child, []);
                return Err(execution_error(
                    spec,
                    format!("failed to spawn stdout reader thread: {}", e),
                ));
            }
        };

        let stderr_pipe = child.stderr.take();
        let stderr_handle = match thread::Builder::new()
            .name("stderr-reader".to_string())
            .spawn(move || read_pipe_to_log(stderr_pipe, StreamType::Stderr, program))
        {
            Ok(handle) => handle,
            Err(e) => {
                cleanup_child_process(&mut child, [stdout_handle]);
                return Err(execution_error(
                    spec,
                    format!("failed to spawn stderr reader thread: {}", e),
                ));
            }
        };

        let status = match Self::wait_with_timeout(&mut child, spec.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                cleanup_child_process(&mut child, [stdout_handle, stderr_handle]);
                let secs = spec.timeout.map(|t| t.as_secs()).unwrap_or_default();
                return Err(execution_error(spec, format!("timed out after {}s", secs)));
            }
            Err(e) => {
                cleanup_child_process(&mut child, [stdout_handle, stderr_handle]);
                return Err(execution_error(spec, format!("failed to wait for command: {}", e)));
            }
        };

        for (name, handle) in [("stdout", stdout_handle), ("stderr", stderr_handle)] {
            if let Err(e) = handle.join() {
                tracing::error!(stream = name, panic = panic_message(&*e), "reader thread panicked");
            }
        }

        let outcome = match status.code() {
            Some(code) => ExitOutcome::Code(code),
            None => ExitOutcome::Terminated,
        };
        tracing::debug!("executed command: {}: {:?}", spec.command, outcome);

        Ok(ExecutionResult { outcome })
    }
}
