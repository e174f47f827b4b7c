//! Domain-specific error types for vsinstall.
//!
//! This module defines `VsInstallError`, a `thiserror`-based enum that
//! provides typed error variants for the failure modes of an install run.
//! Capability traits and orchestration return `anyhow::Result`, and
//! `VsInstallError` converts into `anyhow::Error` through `?`, so callers can
//! still `downcast_ref` to match on the kind of failure.

use std::io;

/// Formats an IO error kind into a human-readable message.
///
/// Provides consistent messages for common IO error kinds
/// (e.g., "I/O error: not found") instead of the OS-level messages
/// (e.g., "No such file or directory (os error 2)"). Unrecognized kinds
/// fall back to the OS-level message.
pub(crate) fn io_error_kind_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "I/O error: not found".to_string(),
        io::ErrorKind::PermissionDenied => "I/O error: permission denied".to_string(),
        io::ErrorKind::IsADirectory => "I/O error: is a directory".to_string(),
        _ => format!("I/O error: {}", err),
    }
}

/// Domain-specific error type for vsinstall.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VsInstallError {
    /// A manifest validation constraint was violated.
    #[error("validation error: {0}")]
    Validation(String),

    /// A manifest could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command could not be run or exited with a code outside the accepted set.
    #[error("command execution failed: {command}: {status}")]
    Execution {
        /// The command that was executed.
        command: String,
        /// Exit code, timeout, or a description of the internal failure.
        status: String,
    },

    /// A command was not found on `PATH`.
    #[error("command not found in PATH: {command}")]
    CommandNotFound {
        /// The command name that was looked up.
        command: String,
    },

    /// An answer-file template was missing or failed to render.
    #[error("template error: {template}: {reason}")]
    Template {
        /// Template name (file name or built-in id).
        template: String,
        /// Renderer message.
        reason: String,
    },

    /// A downloaded or local file did not match the expected SHA-256 digest.
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    Checksum {
        path: String,
        expected: String,
        actual: String,
    },

    /// A remote source could not be fetched.
    #[error("download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    /// An I/O operation failed with contextual information.
    #[error("{context}: {message}")]
    Io {
        /// What was being done, usually including the path.
        context: String,
        /// Derived from [`io_error_kind_message`].
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl VsInstallError {
    /// Creates an `Io` variant with the `message` derived from `source`.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: io_error_kind_message(&source),
            source,
        }
    }
}
