//! CLI module for the ECL acceptance runner
//!
//! Running `ecltest` with no arguments builds the interpreter, runs every fixture in `tests/` through it and
//! prints live progress followed by the consolidated report.
//!
//! ## Modules
//!
//! - `config` - Runner configuration and defaults
//! - `test_interfaces` - Build, discovery and execution boundaries
//! - `test_runner` - Orchestration and console reporting
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod config;
pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use config::{DEFAULT_EXTENSION, DEFAULT_FIXTURE_DIR, DEFAULT_TIMEOUT_SECS, RunnerConfig};
use test_interfaces::RunnerError;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Fatal runner errors are rendered through miette so codes and help text reach the operator.
impl From<RunnerError> for CliError {
    fn from(err: RunnerError) -> Self {
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Acceptance test runner for the ECL interpreter
#[derive(Parser, Debug)]
#[command(name = "ecltest")]
#[command(version = VERSION)]
#[command(about = "Build the ECL interpreter and run every fixture through it", long_about = None)]
pub struct Cli {
    /// Directory containing the fixtures
    #[arg(long = "fixtures", value_name = "DIR", default_value = DEFAULT_FIXTURE_DIR)]
    pub fixture_dir: PathBuf,

    /// Fixture file extension
    #[arg(long = "ext", value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Interpreter binary (default: target/release/ecl)
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Per-fixture timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Use the binary on disk without running the build
    #[arg(long)]
    pub skip_build: bool,

    /// Exit 0 even when fixtures fail
    #[arg(long)]
    pub report_only: bool,
}

impl Cli {
    /// Translate parsed flags into a runner configuration.
    pub fn config(&self) -> RunnerConfig {
        let config = RunnerConfig::new()
            .with_fixture_dir(&self.fixture_dir)
            .with_extension(&self.extension)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_skip_build(self.skip_build);
        match &self.binary {
            Some(binary) => config.with_binary(binary),
            None => config,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.config();
    tracing::debug!(?config, "starting acceptance run");
    test_runner::run_tests(&config, cli.report_only)
}

// ============================================================================
// Tests
// ============================================================================
