//! Child process management for external helpers.
//!
//! The camera source, the raw preview window and the recorder all talk to
//! an external ffmpeg/ffplay process over pipes, and the landmark detector
//! talks to its sidecar the same way. This module handles spawning, stderr
//! draining and graceful termination for all of them.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long a helper gets to exit after SIGINT before it is killed.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors that can occur while running a helper process.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{program} not found in PATH")]
    NotFound { program: String },

    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which standard streams of the helper are piped back to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipes {
    pub stdin: bool,
    pub stdout: bool,
}

impl Pipes {
    /// Frames are written to the helper (preview, recording).
    pub const INPUT: Pipes = Pipes {
        stdin: true,
        stdout: false,
    };

    /// Frames are read from the helper (camera capture).
    pub const OUTPUT: Pipes = Pipes {
        stdin: false,
        stdout: true,
    };

    /// Request/response over both pipes (detector sidecar).
    pub const DUPLEX: Pipes = Pipes {
        stdin: true,
        stdout: true,
    };
}

/// A running helper process.
pub struct HelperProcess {
    program: String,
    child: Child,
    stderr_thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for HelperProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperProcess")
            .field("program", &self.program)
            .field("pid", &self.child.id())
            .finish_non_exhaustive()
    }
}

impl HelperProcess {
    /// Spawn `program` with `args`.
    ///
    /// Stderr is always drained on a background thread and forwarded to the
    /// log at debug level, so a chatty helper can never block on a full pipe.
    pub fn spawn<S: AsRef<str>>(
        program: &str,
        args: &[S],
        pipes: Pipes,
    ) -> Result<Self, ProcessError> {
        let mut cmd = Command::new(program);
        cmd.args(args.iter().map(|a| a.as_ref()))
            .stdin(if pipes.stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(if pipes.stdout { Stdio::piped() } else { Stdio::null() })
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: program.to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    program: program.to_string(),
                    source: e,
                }
            }
        })?;

        let tag = program.to_string();
        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let reader = BufReader::new(stderr);
                for line in reader.lines() {
                    match line {
                        Ok(l) => log::debug!("[{}] {}", tag, l),
                        Err(_) => break,
                    }
                }
            })
        });

        log::debug!("Spawned {} (pid {})", program, child.id());

        Ok(Self {
            program: program.to_string(),
            child,
            stderr_thread,
        })
    }

    /// Name of the spawned program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Take ownership of the helper's stdin pipe.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    /// Take ownership of the helper's stdout pipe.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Check if the process is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Request a graceful shutdown.
    ///
    /// Sends SIGINT (so ffmpeg finalizes its output file) and waits for the
    /// process to exit. If it doesn't exit within the timeout it is killed.
    pub fn shutdown(&mut self) -> Result<ExitStatus, ProcessError> {
        if let Some(status) = self.child.try_wait()? {
            self.join_stderr();
            return Ok(status);
        }

        #[cfg(unix)]
        {
            // SAFETY: kill(2) with a pid we own; failure is reported via the
            // wait below.
            unsafe {
                libc::kill(self.child.id() as i32, libc::SIGINT);
            }
        }

        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }

        let status = match self.wait_timeout(SHUTDOWN_TIMEOUT)? {
            Some(status) => status,
            None => {
                log::warn!("{} did not exit after SIGINT, killing it", self.program);
                let _ = self.child.kill();
                self.child.wait()?
            }
        };

        self.join_stderr();
        Ok(status)
    }

    /// Wait up to `timeout` for the process to exit on its own.
    ///
    /// # Returns
    /// The exit status, or `None` if it is still running.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<Option<ExitStatus>, ProcessError> {
        let start = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(Some(status));
            }
            if start.elapsed() > timeout {
                return Ok(None);
            }
            thread::sleep(Duration::from_millis(50));
        }
    }

    fn join_stderr(&mut self) {
        if let Some(handle) = self.stderr_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HelperProcess {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_missing_program() {
        let result = HelperProcess::spawn(
            "definitely-not-a-real-program-xyz",
            &["-version"],
            Pipes::OUTPUT,
        );
        match result {
            Err(ProcessError::NotFound { program }) => {
                assert_eq!(program, "definitely-not-a-real-program-xyz")
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_message_names_program() {
        let err = ProcessError::NotFound {
            program: "ffplay".to_string(),
        };
        assert_eq!(err.to_string(), "ffplay not found in PATH");
    }

    #[test]
    fn test_pipes_presets() {
        assert!(Pipes::INPUT.stdin);
        assert!(!Pipes::INPUT.stdout);
        assert!(!Pipes::OUTPUT.stdin);
        assert!(Pipes::OUTPUT.stdout);
        assert!(Pipes::DUPLEX.stdin && Pipes::DUPLEX.stdout);
    }
}
