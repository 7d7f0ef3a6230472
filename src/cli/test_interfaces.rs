//! Runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the three operations that touch the outside world:
//! - Build invocation (run the build command once, abort on failure)
//! - Fixture discovery (list the fixture directory)
//! - Fixture execution (spawn the interpreter, enforce the timeout, capture output)
//!
//! The orchestration in `test_runner.rs` only sees these traits, so it can be driven by in-memory fakes.
//! Default implementations talk to the real filesystem and processes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use ecltest_core::{Fixture, RunOutcome};
use miette::Diagnostic;
use thiserror::Error;

use super::config::DEFAULT_POLL_INTERVAL_MILLIS;

/// Environment errors that abort the whole run before any fixture executes.
///
/// Per-fixture failures are never reported through this type; they become result records.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    #[error("build failed:\n{diagnostic}")]
    #[diagnostic(code(ecltest::build_failed), help("fix the build errors above and run again"))]
    BuildFailed { diagnostic: String },

    #[error("failed to launch build command `{command}`")]
    #[diagnostic(code(ecltest::build_launch), help("is the build tool installed and on PATH?"))]
    BuildLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture directory `{}` does not exist", .path.display())]
    #[diagnostic(
        code(ecltest::missing_fixture_dir),
        help("run from the interpreter's workspace root or pass --fixtures <DIR>")
    )]
    MissingFixtureDir { path: PathBuf },

    #[error("failed to read fixture directory `{}`", .path.display())]
    #[diagnostic(code(ecltest::fixture_dir_unreadable))]
    FixtureDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Build Interface
// ============================================================================

/// Produce the interpreter binary that fixtures run against.
pub trait BuildInvoker {
    /// Run the build once. Any error is fatal for the run.
    fn build(&self) -> Result<(), RunnerError>;
}

/// Run an external build command synchronously (default: `cargo build --release`).
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command: Vec<String>,
}

impl CommandBuilder {
    /// `command` is the program followed by its arguments.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl BuildInvoker for CommandBuilder {
    #[tracing::instrument(skip_all, fields(command = %self.command.join(" ")))]
    fn build(&self) -> Result<(), RunnerError> {
        let Some((program, args)) = self.command.split_first() else {
            tracing::warn!("empty build command, nothing to build");
            return Ok(());
        };

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RunnerError::BuildLaunch {
                command: self.command.join(" "),
                source,
            })?;

        if output.status.success() {
            tracing::debug!("build succeeded");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let diagnostic = [stderr.trim(), stdout.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("build exited with {}", output.status));
        tracing::debug!(status = %output.status, "build failed");
        Err(RunnerError::BuildFailed { diagnostic })
    }
}

/// Leave whatever binary is on disk in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipBuild;

impl BuildInvoker for SkipBuild {
    fn build(&self) -> Result<(), RunnerError> {
        tracing::debug!("build step skipped");
        Ok(())
    }
}

// ============================================================================
// Fixture Discovery Interface
// ============================================================================

pub trait FixtureDiscovery {
    /// List every fixture. A missing directory is fatal.
    fn discover(&self) -> Result<Vec<Fixture>, RunnerError>;
}

/// Immediate regular files of one directory whose name ends in `.<extension>`.
///
/// Fixtures are returned sorted by name so the report order does not depend on the platform's listing order.
#[derive(Debug, Clone)]
pub struct DirectoryDiscovery {
    dir: PathBuf,
    extension: String,
}

impl DirectoryDiscovery {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        name.strip_suffix(self.extension.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }
}

impl FixtureDiscovery for DirectoryDiscovery {
    #[tracing::instrument(skip_all, fields(dir = %self.dir.display()))]
    fn discover(&self) -> Result<Vec<Fixture>, RunnerError> {
        if !self.dir.is_dir() {
            return Err(RunnerError::MissingFixtureDir { path: self.dir.clone() });
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|source| RunnerError::FixtureDirUnreadable {
            path: self.dir.clone(),
            source,
        })?;

        let mut fixtures: Vec<Fixture> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable fixture directory entry");
                    None
                }
            })
            .filter(|path| !path.is_dir())
            .filter_map(|path| Fixture::from_path(&path))
            .filter(|fixture| self.matches(&fixture.name))
            .collect();

        fixtures.sort();
        tracing::debug!(count = fixtures.len(), "discovered fixtures");
        Ok(fixtures)
    }
}

// ============================================================================
// Fixture Executor Interface
// ============================================================================

/// Run one fixture through the interpreter.
///
/// Every way a run can end is folded into [`RunOutcome`]; executors never fail.
pub trait FixtureExecutor {
    fn execute(&self, fixture: &Fixture) -> RunOutcome;
}

/// Spawn `<binary> <fixture_path>` with a wall-clock timeout.
///
/// The deadline covers the whole run: waiting for the interpreter to exit and draining its output. A
/// background process that keeps stdout or stderr open past the deadline makes the fixture time out.
///
/// On unix the interpreter is started in its own process group. On timeout the whole group is killed and the
/// direct child is reaped, so nothing the fixture started outlives it.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    binary: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
}

impl ProcessExecutor {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MILLIS),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, fixture: &Fixture) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(&fixture.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        command
    }
}

impl FixtureExecutor for ProcessExecutor {
    #[tracing::instrument(skip_all, fields(fixture = %fixture.name))]
    fn execute(&self, fixture: &Fixture) -> RunOutcome {
        let mut child = match self.command(fixture).spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(error = %e, "spawn failed");
                return RunOutcome::LaunchError(format!("{}: {}", self.binary.display(), e));
            }
        };

        let started_at = Instant::now();
        let deadline = started_at + self.timeout;

        let (tx, rx) = mpsc::channel();
        let mut pending = 0usize;
        if let Some(pipe) = child.stdout.take() {
            drain(pipe, Stream::Stdout, tx.clone());
            pending += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            drain(pipe, Stream::Stderr, tx.clone());
            pending += 1;
        }
        drop(tx);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    tracing::debug!(timeout_ms = self.timeout.as_millis() as u64, "fixture timed out");
                    kill_fixture(&mut child);
                    return RunOutcome::TimedOut;
                }
                Ok(None) => thread::sleep(self.poll_interval.min(deadline.saturating_duration_since(Instant::now()))),
                Err(e) => {
                    kill_fixture(&mut child);
                    return RunOutcome::LaunchError(format!("failed to wait for {}: {}", self.binary.display(), e));
                }
            }
        };
        tracing::debug!(%status, elapsed_ms = started_at.elapsed().as_millis() as u64, "fixture exited");

        let mut stdout = String::new();
        let mut stderr = String::new();
        while pending > 0 {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok((Stream::Stdout, text)) => stdout = text,
                Ok((Stream::Stderr, text)) => stderr = text,
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!("output still open at deadline");
                    kill_fixture(&mut child);
                    return RunOutcome::TimedOut;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
            pending -= 1;
        }

        RunOutcome::Completed {
            exit_code: status.code(),
            stdout,
            stderr,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Read `pipe` to the end on a detached thread and send the text once it closes.
fn drain<R: Read + Send + 'static>(mut pipe: R, stream: Stream, tx: Sender<(Stream, String)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // A read error keeps whatever arrived before it.
        let _ = pipe.read_to_end(&mut buf);
        // The receiver is gone once the fixture timed out.
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
}

/// Kill everything the fixture started and reap the direct child.
fn kill_fixture(child: &mut Child) {
    kill_process_group(child);
    // The group kill already covers the child; this handles non-unix targets and a child that left the group.
    let _ = child.kill();
    if let Err(e) = child.wait() {
        tracing::warn!(error = %e, "failed to reap fixture process");
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn kill_process_group(child: &Child) {
    // The child was spawned with `process_group(0)`, so its pid is the group id.
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill(2) only takes integer arguments and touches no memory of this process.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!(error = %err, pgid, "failed to kill fixture process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_match_requires_dot() {
        let discovery = DirectoryDiscovery::new("tests", "ecl");
        assert!(discovery.matches("ok.ecl"));
        assert!(discovery.matches("a.b.ecl"));
        assert!(!discovery.matches("decl"));
        assert!(!discovery.matches("ok.ecl.bak"));
        assert!(!discovery.matches("ok.ECL"));
    }

    #[test]
    fn test_extension_leading_dot_ignored() {
        let discovery = DirectoryDiscovery::new("tests", ".ecl");
        assert!(discovery.matches("ok.ecl"));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let discovery = DirectoryDiscovery::new("definitely/not/a/real/dir", "ecl");
        let err = discovery.discover().unwrap_err();
        assert!(matches!(err, RunnerError::MissingFixtureDir { .. }));
        assert!(err.to_string().contains("definitely/not/a/real/dir"));
    }

    #[test]
    fn test_empty_build_command_is_noop() {
        assert!(CommandBuilder::new(Vec::new()).build().is_ok());
    }

    #[test]
    fn test_build_launch_error() {
        let builder = CommandBuilder::new(vec!["ecltest-no-such-build-tool".to_string()]);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, RunnerError::BuildLaunch { .. }));
    }

    #[test]
    fn test_missing_binary_is_launch_error() {
        let executor = ProcessExecutor::new("ecltest-no-such-interpreter", Duration::from_secs(1));
        let outcome = executor.execute(&Fixture::new("ok.ecl", "tests/ok.ecl"));
        match outcome {
            RunOutcome::LaunchError(message) => assert!(message.starts_with("ecltest-no-such-interpreter: ")),
            other => panic!("expected launch error, got {other:?}"),
        }
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = RunnerError::BuildFailed {
            diagnostic: "error[E0308]".to_string(),
        };
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("ecltest::build_failed"));
        assert_eq!(err.to_string(), "build failed:\nerror[E0308]");
    }
}
