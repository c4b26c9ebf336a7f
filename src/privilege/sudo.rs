//! `sudo`-backed executor
//!
//! Every command runs as `sudo -S -k -p "" -- sh -c <command>`:
//! - `-S` reads the password from stdin, where we write it once
//! - `-k` ignores cached timestamps so the supplied password is always checked
//! - `-p ""` keeps the prompt out of captured stderr
//!
//! Output is read on one thread per stream and forwarded through a channel,
//! so the caller sees chunks in the order they arrive. The calling thread
//! polls the child for exit between chunks and kills it at the deadline.

use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{CommandOutput, Credential, OutputChunk, PrivilegedExecutor, RunOptions, StreamKind};
use crate::error::{DevsetupError, Result, exec, spawn_failed};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// How often a running command is checked for exit
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long output is still read after the command has exited
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Printed by the credential probe when sudo accepted the password
const PROBE_MARKER: &str = "devsetup-sudo-ok";

/// Stderr fragments sudo prints for a rejected password
const REJECTION_MARKERS: &[&str] = &["Sorry, try again", "incorrect password"];

#[derive(Debug, Clone)]
pub struct SudoExecutor {
    program: PathBuf,
    leading_args: Vec<String>,
    command_timeout: Duration,
    probe_timeout: Duration,
}

impl Default for SudoExecutor {
    fn default() -> Self {
        Self::new("sudo")
    }
}

impl SudoExecutor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Arguments placed before sudo's own flags, for wrapper launchers.
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn with_timeouts(mut self, command: Duration, probe: Duration) -> Self {
        self.command_timeout = command;
        self.probe_timeout = probe;
        self
    }

    fn spawn(&self, command: &str, credential: &Credential) -> Result<Child> {
        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .args(["-S", "-k", "-p", "", "--", "sh", "-c", command])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_failed(command, e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Dropping stdin afterwards gives the command an empty input
            let written = stdin
                .write_all(credential.expose().as_bytes())
                .and_then(|()| stdin.write_all(b"\n"));
            if let Err(e) = written {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(spawn_failed(command, e.to_string()));
                }
                tracing::debug!(command, "privileged process closed stdin early");
            }
        }

        Ok(child)
    }

    /// Stream output until the process exits, then drain what is left.
    ///
    /// Exit is observed with `try_wait`, not by the pipes closing: a
    /// background child may keep them open after the command is done, and
    /// a command may close them and keep running. The deadline holds until
    /// the exit is seen.
    fn collect(
        mut child: Child,
        command: &str,
        timeout: Duration,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<CommandOutput> {
        let (tx, rx) = mpsc::channel();
        let readers = [
            spawn_reader(child.stdout.take(), StreamKind::Stdout, tx.clone()),
            spawn_reader(child.stderr.take(), StreamKind::Stderr, tx),
        ];

        let deadline = Instant::now() + timeout;
        let mut output = CommandOutput::default();
        let mut pipes_open = true;
        // Exit status and the end of the drain window
        let mut exited: Option<(ExitStatus, Instant)> = None;

        let status = loop {
            if exited.is_none() {
                let polled = child
                    .try_wait()
                    .map_err(|e| spawn_failed(command, e.to_string()))?;
                exited = polled.map(|status| (status, Instant::now() + DRAIN_GRACE));
            }

            let now = Instant::now();
            let wake = match exited {
                Some((status, drain_until)) => {
                    if !pipes_open || now >= drain_until {
                        if pipes_open {
                            tracing::debug!(command, "output still open after exit, not waiting for it");
                        }
                        break status;
                    }
                    drain_until
                }
                None if now >= deadline => {
                    tracing::warn!(command, timeout_secs = timeout.as_secs(), "killing timed out command");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(exec::timed_out(command, timeout));
                }
                None => deadline.min(now + POLL_INTERVAL),
            };
            let wait = wake.saturating_duration_since(now);

            if !pipes_open {
                thread::sleep(wait);
                continue;
            }
            match rx.recv_timeout(wait) {
                Ok(chunk) => {
                    output.push(&chunk);
                    on_chunk(&chunk);
                }
                Err(RecvTimeoutError::Disconnected) => pipes_open = false,
                Err(RecvTimeoutError::Timeout) => {}
            }
        };

        // With pipes still held by a leftover process the readers stay
        // detached and end when that process closes them.
        if !pipes_open {
            for reader in readers.into_iter().flatten() {
                let _ = reader.join();
            }
        }

        output.exit_code = status.code();
        if status.success() {
            Ok(output)
        } else {
            Err(DevsetupError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    source: Option<R>,
    stream: StreamKind,
    tx: Sender<OutputChunk>,
) -> Option<JoinHandle<()>> {
    let source = source?;
    Some(thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let chunk = OutputChunk {
                        stream,
                        data: String::from_utf8_lossy(&line).into_owned(),
                    };
                    if tx.send(chunk).is_err() {
                        break;
                    }
                }
            }
        }
    }))
}

/// Decide whether probe output shows an accepted password.
fn probe_accepted(output: &str) -> bool {
    if REJECTION_MARKERS.iter().any(|m| output.contains(m)) {
        return false;
    }
    output.contains(PROBE_MARKER)
}

impl PrivilegedExecutor for SudoExecutor {
    fn verify_credential(&self, credential: &Credential) -> bool {
        if credential.is_empty() {
            return false;
        }

        let mut seen = String::new();
        let result = self.run_streaming(
            &format!("echo {PROBE_MARKER}"),
            credential,
            &RunOptions::with_timeout(self.probe_timeout),
            &mut |chunk| seen.push_str(&chunk.data),
        );

        match result {
            Ok(_) => probe_accepted(&seen),
            Err(e) => {
                tracing::debug!(error = %e, "credential probe failed");
                false
            }
        }
    }

    fn run_streaming(
        &self,
        command: &str,
        credential: &Credential,
        options: &RunOptions,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<CommandOutput> {
        let timeout = options.timeout.unwrap_or(self.command_timeout);
        tracing::debug!(command, "running privileged command");
        let child = self.spawn(command, credential)?;
        Self::collect(child, command, timeout, on_chunk)
    }
}
