//! Acceptance run orchestration
//!
//! ## TestReporter Trait
//!
//! The runner uses a `TestReporter` trait to separate console feedback from execution. Progress is streamed
//! per fixture as it finishes; the consolidated report is printed once every fixture has a record.
//!
//! ## I/O Boundaries
//!
//! Building, discovery and process execution go through the traits in `test_interfaces.rs`, so
//! [`run_suite`] can be driven by fakes in tests.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use ecltest_core::{Classification, ExpectationPolicy, Fixture, NO_OUTPUT_MARKER, Report, ResultRecord, Tally, classify};

use super::config::RunnerConfig;
use super::test_interfaces::{
    BuildInvoker, CommandBuilder, DirectoryDiscovery, FixtureDiscovery, FixtureExecutor, ProcessExecutor, RunnerError,
    SkipBuild,
};
use super::{CliError, CliResult, ExitCode};

/// Width of the `=` rule printed before the final report
const SEPARATOR_WIDTH: usize = 50;

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting run progress and the final report.
pub trait TestReporter {
    /// Called before the build command runs
    fn on_build_start(&mut self) {}

    /// Called once the build succeeded
    fn on_build_complete(&mut self) {}

    /// Called with the number of fixtures about to run
    fn on_collection_complete(&mut self, _fixture_count: usize) {}

    /// Called before a fixture is launched
    fn on_fixture_start(&mut self, fixture: &Fixture);

    /// Called as soon as a fixture has its record
    fn on_fixture_complete(&mut self, record: &ResultRecord);

    /// Called after every fixture has its record
    fn on_run_complete(&mut self, report: &Report, summary: &RunSummary);
}

/// Summary of a run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub tally: Tally,
    pub duration: Duration,
}

/// Default console reporter
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Console write errors are not worth aborting a run for.
impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_build_start(&mut self) {
        let _ = writeln!(self.out, "Building ECL...");
    }

    fn on_build_complete(&mut self) {
        let _ = writeln!(self.out, "Build complete. Running fixtures...\n");
    }

    fn on_collection_complete(&mut self, fixture_count: usize) {
        if fixture_count == 0 {
            let _ = writeln!(self.out, "No fixtures collected");
        }
    }

    fn on_fixture_start(&mut self, fixture: &Fixture) {
        let _ = writeln!(self.out, "testing: {}", fixture.name);
        let _ = self.out.flush();
    }

    fn on_fixture_complete(&mut self, record: &ResultRecord) {
        let line = match &record.classification {
            Classification::Passed { .. } => format!("  result: {}", record.detail()),
            Classification::MissingError { output } => {
                let output = if output.is_empty() { NO_OUTPUT_MARKER } else { output.as_str() };
                format!("  result: {} (expected an error)", output)
            }
            Classification::ExpectedError { error } => format!("  error: {} (expected error)", error),
            Classification::UnexpectedError { error } => format!("  error: {}", error),
            Classification::TimedOut => "  error: execution timed out".to_string(),
            Classification::LaunchFailed { message } => format!("  error: {}", message),
        };
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }

    fn on_run_complete(&mut self, report: &Report, summary: &RunSummary) {
        let _ = writeln!(self.out, "\n{}", "=".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(self.out, "Test run complete. Results:\n");
        let rendered = report.render();
        if !rendered.is_empty() {
            let _ = writeln!(self.out, "{}", rendered);
        }
        let _ = writeln!(
            self.out,
            "\n{} passed, {} failed in {:.2}s",
            summary.tally.passed,
            summary.tally.failed,
            summary.duration.as_secs_f64()
        );
        let _ = self.out.flush();
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Build, discover, then run and classify every fixture in order.
///
/// ## Errors
///
/// Only environment failures are returned: a missing fixture directory (checked before building) or a failed
/// build. No fixture runs in either case. Every per-fixture failure ends up in the returned [`Report`].
pub fn run_suite(
    builder: &dyn BuildInvoker,
    discovery: &dyn FixtureDiscovery,
    executor: &dyn FixtureExecutor,
    policy: &ExpectationPolicy,
    reporter: &mut dyn TestReporter,
) -> Result<Report, RunnerError> {
    let start_time = Instant::now();

    let fixtures = discovery.discover()?;

    reporter.on_build_start();
    builder.build()?;
    reporter.on_build_complete();

    reporter.on_collection_complete(fixtures.len());

    let report: Report = fixtures
        .iter()
        .map(|fixture| run_fixture(fixture, executor, policy, &mut *reporter))
        .collect();

    let summary = RunSummary {
        tally: report.tally(),
        duration: start_time.elapsed(),
    };
    tracing::info!(
        passed = summary.tally.passed,
        failed = summary.tally.failed,
        "run complete"
    );
    reporter.on_run_complete(&report, &summary);

    Ok(report)
}

#[tracing::instrument(skip_all, fields(fixture = %fixture.name))]
fn run_fixture(
    fixture: &Fixture,
    executor: &dyn FixtureExecutor,
    policy: &ExpectationPolicy,
    reporter: &mut dyn TestReporter,
) -> ResultRecord {
    reporter.on_fixture_start(fixture);

    let outcome = executor.execute(fixture);
    let expects_failure = policy.evaluate(&fixture.name);
    let record = classify(&fixture.name, expects_failure, &outcome);
    tracing::debug!(expects_failure, verdict = %record.verdict(), "classified");

    reporter.on_fixture_complete(&record);
    record
}

/// Run a full acceptance pass with console output.
///
/// With `report_only`, failing fixtures do not change the exit code.
pub fn run_tests(config: &RunnerConfig, report_only: bool) -> CliResult<ExitCode> {
    let builder: Box<dyn BuildInvoker> = if config.skip_build {
        Box::new(SkipBuild)
    } else {
        Box::new(CommandBuilder::new(config.build_command.clone()))
    };
    let discovery = DirectoryDiscovery::new(&config.fixture_dir, &config.extension);
    let executor = ProcessExecutor::new(&config.binary, config.timeout).with_poll_interval(config.poll_interval);
    let mut reporter = ConsoleReporter::stdout();

    let report = run_suite(builder.as_ref(), &discovery, &executor, &config.policy, &mut reporter)?;

    if report.has_failures() && !report_only {
        // Report already printed
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
