//! Runner configuration
//!
//! Defaults reproduce a plain `ecltest` invocation from the interpreter's workspace root: build with
//! `cargo build --release`, then run every `tests/*.ecl` through `target/release/ecl`.

use std::path::PathBuf;
use std::time::Duration;

use ecltest_core::ExpectationPolicy;

/// Directory scanned for fixtures
pub const DEFAULT_FIXTURE_DIR: &str = "tests";
/// Fixture file extension (without the dot)
pub const DEFAULT_EXTENSION: &str = "ecl";
/// Per-fixture wall-clock limit in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// How often a running fixture is polled for exit
pub const DEFAULT_POLL_INTERVAL_MILLIS: u64 = 50;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory whose immediate entries are fixtures
    pub fixture_dir: PathBuf,
    /// Fixture extension, matched against the file name
    pub extension: String,
    /// Interpreter invoked as `<binary> <fixture_path>`
    pub binary: PathBuf,
    /// Program followed by its arguments
    pub build_command: Vec<String>,
    /// Skip the build step and use whatever binary is on disk
    pub skip_build: bool,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub policy: ExpectationPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            binary: default_binary(),
            build_command: ["cargo", "build", "--release"].map(String::from).to_vec(),
            skip_build: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MILLIS),
            policy: ExpectationPolicy::default(),
        }
    }
}

/// `target/release/ecl` with the platform's executable suffix.
pub fn default_binary() -> PathBuf {
    PathBuf::from("target")
        .join("release")
        .join(format!("ecl{}", std::env::consts::EXE_SUFFIX))
}

impl RunnerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    /// Set the fixture extension; a leading dot is ignored
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_build_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_policy(mut self, policy: ExpectationPolicy) -> Self {
        self.policy = policy;
        self
    }
}
