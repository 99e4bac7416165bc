//! Process execution primitives with consistent error handling.
//!
//! [`run_command`] spawns one process, blocks until it exits and returns its
//! captured output as text. The exit status is deliberately not inspected:
//! callers that care about failures read the output themselves.

use std::io::{self, Read};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Where a standard stream of the child goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Piped,
    Inherit,
    Null,
}

/// Where the child's standard error goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStream {
    /// Same destination as stdout (`2>&1`).
    MergeIntoStdout,
    /// Captured separately and discarded.
    Piped,
    Inherit,
    Null,
}

/// Overrides for how [`run_command`] spawns the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Run through `sh -c` (`cmd /C` on Windows). Without a shell the command
    /// text is split on whitespace into program and arguments.
    pub use_shell: bool,
    pub stdin: StreamMode,
    pub stdout: StreamMode,
    pub stderr: ErrorStream,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            use_shell: true,
            stdin: StreamMode::Piped,
            stdout: StreamMode::Piped,
            stderr: ErrorStream::MergeIntoStdout,
        }
    }
}

/// Run a command and return everything it wrote to the captured stream.
///
/// Returns an empty string when stdout is not piped. Fails with
/// `process.launch_failed` if the process cannot start and
/// `process.invalid_utf8` if the captured bytes are not UTF-8.
pub fn run_command(command: &str, options: &ProcessOptions) -> Result<String> {
    let mut cmd = base_command(command, options.use_shell)?;
    cmd.stdin(stdio_for(options.stdin));

    let captured = match (options.stdout, options.stderr) {
        (StreamMode::Piped, ErrorStream::MergeIntoStdout) => run_merged(cmd, command)?,
        (stdout, stderr) => {
            cmd.stdout(stdio_for(stdout));
            cmd.stderr(match stderr {
                ErrorStream::MergeIntoStdout => stdio_for(stdout),
                ErrorStream::Piped => Stdio::piped(),
                ErrorStream::Inherit => Stdio::inherit(),
                ErrorStream::Null => Stdio::null(),
            });

            let mut child = cmd
                .spawn()
                .map_err(|e| Error::process_launch_failed(command, e))?;
            drop(child.stdin.take());

            let output = child.wait_with_output().map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("wait for {}", command)))
            })?;
            output.stdout
        }
    };

    String::from_utf8(captured).map_err(|e| Error::process_invalid_utf8(command, e))
}

/// Spawn with stdout and stderr sharing one pipe and read it to EOF.
fn run_merged(mut cmd: Command, command: &str) -> Result<Vec<u8>> {
    let (mut reader, writer) = io::pipe()
        .map_err(|e| Error::internal_io(e.to_string(), Some("create output pipe".to_string())))?;
    let error_writer = writer
        .try_clone()
        .map_err(|e| Error::internal_io(e.to_string(), Some("clone output pipe".to_string())))?;

    cmd.stdout(writer).stderr(error_writer);

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::process_launch_failed(command, e))?;

    // `cmd` still owns the parent's write ends; the reader only sees EOF once they close.
    drop(cmd);
    drop(child.stdin.take());

    let mut captured = Vec::new();
    reader.read_to_end(&mut captured).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read output of {}", command)))
    })?;

    child
        .wait()
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("wait for {}", command))))?;

    Ok(captured)
}

fn base_command(command: &str, use_shell: bool) -> Result<Command> {
    if use_shell {
        #[cfg(windows)]
        let cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        };

        #[cfg(not(windows))]
        let cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        return Ok(cmd);
    }

    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        Error::validation_invalid_argument("command", "Command is empty", None)
    })?;

    let mut cmd = Command::new(program);
    cmd.args(parts);
    Ok(cmd)
}

fn stdio_for(mode: StreamMode) -> Stdio {
    match mode {
        StreamMode::Piped => Stdio::piped(),
        StreamMode::Inherit => Stdio::inherit(),
        StreamMode::Null => Stdio::null(),
    }
}
