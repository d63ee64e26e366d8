//! Blocking child-process capture.
//!
//! The process always runs to completion and both streams are drained before
//! anything is parsed. Stdin is written concurrently with the drain. There is no timeout: a hung compiler stalls the run.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use super::InvokeError;

/// Maximum number of stderr characters carried into logs.
pub const STDERR_EXCERPT_CHARS: usize = 512;

/// Everything a finished compiler process produced.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    /// Stdout of a successful process.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::ProcessFailed`] for a non-zero exit or a
    /// signal-terminated process.
    pub fn into_success_stdout(self) -> Result<Vec<u8>, InvokeError> {
        if self.status.success() {
            Ok(self.stdout)
        } else {
            Err(InvokeError::ProcessFailed {
                status: self.status.to_string(),
                stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
            })
        }
    }
}

/// Run `program args...` in `cwd`, optionally feeding `stdin`, and wait for
/// it to exit.
///
/// # Errors
///
/// Returns [`InvokeError::Spawn`] if the process cannot be started and
/// [`InvokeError::Io`] if waiting fails, or if writing stdin fails for a
/// process that then exits successfully.
pub fn run_captured(
    program: &Path,
    args: &[String],
    cwd: &Path,
    stdin: Option<&[u8]>,
) -> Result<CapturedOutput, InvokeError> {
    tracing::debug!(program = %program.display(), ?args, cwd = %cwd.display(), "spawning compiler");

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

    let mut child = command.spawn().map_err(|e| InvokeError::Spawn {
        program: program.display().to_string(),
        detail: e.to_string(),
    })?;

    // Stdin is fed on its own thread while both output streams drain.
    // Dropping the handle closes the pipe so the compiler sees EOF.
    let pipe = child.stdin.take();
    let (output, stdin_result) = thread::scope(|scope| {
        let writer = scope.spawn(move || match (stdin, pipe) {
            (Some(bytes), Some(mut pipe)) => pipe.write_all(bytes),
            _ => Ok(()),
        });
        let output = child.wait_with_output();
        let stdin_result = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
        (output, stdin_result)
    });
    let output = output.map_err(|e| InvokeError::Io {
        detail: format!("wait: {e}"),
    })?;
    tracing::debug!(status = %output.status, stdout_bytes = output.stdout.len(), "compiler exited");

    if let Err(e) = stdin_result {
        if output.status.success() {
            return Err(InvokeError::Io {
                detail: format!("write stdin: {e}"),
            });
        }
    }

    Ok(CapturedOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// First [`STDERR_EXCERPT_CHARS`] characters of `text`, trimmed, with a
/// trailing ellipsis when truncated.
#[must_use]
pub fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    let mut out: String = trimmed.chars().take(STDERR_EXCERPT_CHARS).collect();
    if trimmed.chars().count() > STDERR_EXCERPT_CHARS {
        out.push('…');
    }
    out
}
