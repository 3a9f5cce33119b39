//! Leaf task: one shell command run with an environment snapshot.
//!
//! A `Task` owns at most one live process at a time. The handle is replaced
//! on every `run`, so running the same `Task` from two places at once (for
//! example a named task referenced by two concurrent parents) leaves only the
//! most recent process reachable from `terminate()`. That reuse is not
//! supported.

use std::collections::HashMap;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::shell::{self, Shell};
use crate::{ylog, ylog_debug, ylog_trace};

/// Environment variables passed to task processes.
pub type Environment = HashMap<String, String>;

/// Lifecycle of the process owned by a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// No process has been started yet.
    Idle,
    /// A process was spawned and has not been observed to exit.
    Running {
        /// OS process id, if the platform reported one.
        pid: Option<u32>,
        /// Whether `terminate()` has already signalled this process.
        terminating: bool,
    },
    /// The last process exited with this status.
    Exited(ExitStatus),
}

/// A single shell command.
#[derive(Debug)]
pub struct Task {
    command: String,
    env: Arc<Environment>,
    shell: Shell,
    /// Shared with the waiter of the live process, which records its exit.
    process: Arc<Mutex<ProcessState>>,
}

impl Task {
    /// Create a task running `command` with the given environment.
    pub fn new(command: impl Into<String>, env: Arc<Environment>) -> Self {
        let command = command.into();
        ylog_debug!("Creating task with command \"{}\"", command);
        Self {
            command,
            env,
            shell: Shell::default(),
            process: Arc::new(Mutex::new(ProcessState::Idle)),
        }
    }

    /// Run the command through `shell` instead of the platform default.
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    /// The base command, without extra arguments.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Current process state.
    pub fn state(&self) -> ProcessState {
        *self.process()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state(), ProcessState::Running { .. })
    }

    /// Exit status of the last process, once it has exited.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self.state() {
            ProcessState::Exited(status) => Some(status),
            _ => None,
        }
    }

    fn process(&self) -> MutexGuard<'_, ProcessState> {
        lock(&self.process)
    }

    /// Run the command, appending `args` (each shell-quoted) when given.
    ///
    /// Resolves once the process exits. A non-zero exit is an error, so a
    /// failing step aborts the list it belongs to.
    ///
    /// The process is awaited by a spawned waiter. Dropping this future (a
    /// concurrent sibling failed first) leaves the process running, and its
    /// exit is still recorded in [`Task::state`].
    pub async fn run(&self, args: &[String]) -> Result<()> {
        let line = shell::with_args(&self.command, args);
        ylog!("{}", line);

        let mut child = self
            .shell
            .command(&line)
            .env_clear()
            .envs(self.env.iter())
            .spawn()
            .map_err(|source| Error::Spawn {
                command: line.clone(),
                source,
            })?;

        let pid = child.id();
        *self.process() = ProcessState::Running {
            pid,
            terminating: false,
        };
        ylog_trace!("Spawned pid={:?} for \"{}\"", pid, line);

        let process = Arc::clone(&self.process);
        let waiter = tokio::spawn(async move {
            let waited = child.wait().await;
            let mut state = lock(&process);
            let terminating = matches!(
                *state,
                ProcessState::Running {
                    terminating: true,
                    ..
                }
            );
            *state = match &waited {
                Ok(status) => ProcessState::Exited(*status),
                Err(_) => ProcessState::Idle,
            };
            waited.map(|status| (status, terminating))
        });

        let (status, terminating) = waiter
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        ylog_trace!("\"{}\" exited: {}", line, status);

        if status.success() {
            Ok(())
        } else if terminating {
            Err(Error::Terminated { command: line })
        } else {
            Err(Error::CommandFailed {
                command: line,
                status,
            })
        }
    }

    /// Ask the running process, if any, to stop.
    ///
    /// Sends SIGTERM once; further calls and calls on an idle or exited task
    /// do nothing.
    pub fn terminate(&self) {
        let mut state = self.process();
        if let ProcessState::Running { pid, terminating } = &mut *state {
            if *terminating {
                return;
            }
            *terminating = true;
            ylog_debug!("Terminating {}", self.command);
            if let Some(pid) = *pid {
                send_terminate(pid);
            }
        }
    }
}

fn lock(process: &Mutex<ProcessState>) -> MutexGuard<'_, ProcessState> {
    process.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(unix)]
fn send_terminate(pid: u32) {
    // SAFETY: kill(2) takes plain integers and touches no memory of ours.
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        ylog_debug!(
            "SIGTERM to pid {} failed: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn send_terminate(pid: u32) {
    crate::ylog_warn!(
        "Graceful termination is not supported on this platform (pid {})",
        pid
    );
}
