use clicache_core::{CommandLine, Error, Result, INTERNAL_ERROR_EXIT_CODE};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// Trait for executing the wrapped command
/// This abstraction lets the cache state machine be tested with a
/// scripted executor instead of real subprocesses
pub trait CommandExecutor {
    /// Resolve the executable named by `command` on the search path
    fn locate(&self, command: &CommandLine) -> Result<PathBuf>;

    /// Run `command` to completion, copying its standard output into `stdout`.
    ///
    /// A non-zero exit is not an error: it is reported in the outcome.
    fn execute(
        &self,
        program: &Path,
        command: &CommandLine,
        stdout: &mut dyn Write,
    ) -> Result<ExitOutcome>;
}

/// How the wrapped command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exited normally with this status
    Exited(i32),
    /// Terminated abnormally, e.g. killed by a signal
    Terminated { signal: Option<i32> },
}

impl ExitOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }

    /// Status the wrapper should exit with; abnormal termination maps to 1
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => *code,
            ExitOutcome::Terminated { .. } => INTERNAL_ERROR_EXIT_CODE,
        }
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitOutcome::Exited(code),
            None => ExitOutcome::Terminated {
                signal: termination_signal(&status),
            },
        }
    }
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Production implementation that spawns real subprocesses
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

fn program_name(command: &CommandLine) -> Result<&OsStr> {
    command
        .program()
        .ok_or_else(|| Error::command_execution("", Vec::new(), "no command supplied"))
}

fn launch_error(command: &CommandLine, message: String) -> Error {
    let name = command
        .program()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Error::command_execution(name, command.display_args(), message)
}

impl CommandExecutor for SystemCommandExecutor {
    fn locate(&self, command: &CommandLine) -> Result<PathBuf> {
        let name = program_name(command)?;
        let resolved = which::which(name)
            .map_err(|e| launch_error(command, format!("couldn't find executable: {e}")))?;
        debug!(program = %name.to_string_lossy(), path = %resolved.display(), "resolved executable");
        Ok(resolved)
    }

    fn execute(
        &self,
        program: &Path,
        command: &CommandLine,
        stdout: &mut dyn Write,
    ) -> Result<ExitOutcome> {
        let name = program_name(command)?;
        let mut cmd = Command::new(program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(name);
        }
        cmd.args(command.args())
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdout(Stdio::piped());

        debug!(command = %command, "running command");
        let mut child = cmd
            .spawn()
            .map_err(|e| launch_error(command, format!("failed to launch command: {e}")))?;

        debug!(pid = child.id(), "waiting for command to finish");
        // The pipe is dropped before waiting so a child still writing after
        // a failed forward gets EPIPE instead of blocking forever.
        let forwarded = match child.stdout.take() {
            Some(mut pipe) => io::copy(&mut pipe, &mut *stdout).and_then(|_| stdout.flush()),
            None => Ok(()),
        };

        let status = child
            .wait()
            .map_err(|e| launch_error(command, format!("failed to wait for command: {e}")))?;
        forwarded.map_err(|e| Error::io("forwarding command output", e))?;

        let outcome = ExitOutcome::from(status);
        let name = name.to_string_lossy();
        match outcome {
            ExitOutcome::Exited(0) => debug!("command completed without error"),
            ExitOutcome::Exited(code) => debug!(code, "{name} returned exit status {code}"),
            ExitOutcome::Terminated { signal } => {
                warn!(signal = ?signal, "{name} terminated without an exit status")
            }
        }
        Ok(outcome)
    }
}
