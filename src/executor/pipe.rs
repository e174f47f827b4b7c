//! Streaming of child process output into the log.

use std::io::{BufRead, BufReader, Read};

/// Type of output stream for logging purposes.
#[derive(Clone, Copy)]
pub(super) enum StreamType {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Extracts a human-readable message from a thread panic.
pub(super) fn panic_message(err: &(dyn std::any::Any + Send)) -> &str {
    err.downcast_ref::<&str>()
        .copied()
        .or_else(|| err.downcast_ref::<String>().map(|s| s.as_str()))
        .unwrap_or("unknown panic")
}

/// Reads from a pipe and logs each line tagged with the program name.
///
/// stdout is logged at INFO, stderr at WARN. Read errors stop the reader but
/// never fail the command; the exit code decides success.
pub(super) fn read_pipe_to_log<R: Read>(pipe: Option<R>, stream_type: StreamType, program: String) {
    let Some(pipe) = pipe else {
        tracing::error!(stream = %stream_type, program = %program, "pipe was not captured");
        return;
    };

    let mut reader = BufReader::new(pipe);
    let mut line_buf = Vec::new();

    loop {
        line_buf.clear();
        match reader.read_until(b'\n', &mut line_buf) {
            Ok(0) => break,
            Ok(_) => {
                let content = line_buf.strip_suffix(b"\n").unwrap_or(&line_buf);
                log_line(content, stream_type, &program);
            }
            Err(e) => {
                tracing::error!(stream = %stream_type, program = %program, error = %e, "I/O error, stopping read");
                break;
            }
        }
    }
}

/// Logs one line, skipping blank lines (7-Zip and setup bootstrappers print many).
fn log_line(line: &[u8], stream_type: StreamType, program: &str) {
    let text = String::from_utf8_lossy(line);
    let trimmed = text.trim_end_matches('\r');
    if trimmed.trim().is_empty() {
        return;
    }
    match stream_type {
        StreamType::Stdout => tracing::info!(program = %program, "{}", trimmed),
        StreamType::Stderr => tracing::warn!(program = %program, "{}", trimmed),
    }
}
