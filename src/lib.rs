#![deny(unsafe_code)]
//! ECL Acceptance Runner
//!
//! Builds the ECL interpreter, runs every fixture in a directory through the fresh binary and classifies each
//! run against an expectation policy: most fixtures must run cleanly, while fixtures whose names mark them as
//! error cases must make the interpreter exit abnormally.
//!
//! The pure policy, classification and report types live in `ecltest_core` and are re-exported here. This
//! crate adds the process and filesystem boundaries and the CLI.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Unsafe Policy
//!
//! `unsafe` is denied crate-wide. The one exception is the `kill(2)` call that signals a timed-out fixture's
//! process group on unix.

pub mod cli;

pub use ecltest_core::{
    Classification, ExpectationPolicy, Fixture, Report, ResultRecord, RunOutcome, Tally, Verdict, classify,
};

pub use cli::config::RunnerConfig;
pub use cli::test_interfaces::{
    BuildInvoker, CommandBuilder, DirectoryDiscovery, FixtureDiscovery, FixtureExecutor, ProcessExecutor, RunnerError,
    SkipBuild,
};
pub use cli::test_runner::{ConsoleReporter, RunSummary, TestReporter, run_suite, run_tests};
