//! Provide the pure semantic core of the ECL acceptance runner.
//!
//! This crate decides, for one fixture, whether the observed run of the interpreter matches what was expected,
//! and folds the per-fixture decisions into an ordered report.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, no process handling.
//! - Process spawning, timeouts, directory listing and console output live in the `ecltest` crate and feed
//!   [`RunOutcome`] values into [`classify`].
//!
//! ## Examples
//! ```rust
//! use ecltest_core::{classify, ExpectationPolicy, RunOutcome, Verdict};
//!
//! let policy = ExpectationPolicy::default();
//! let outcome = RunOutcome::completed(Some(1), "", "TypeError: mismatch");
//! let record = classify("type_error.ecl", policy.evaluate("type_error.ecl"), &outcome);
//!
//! assert_eq!(record.verdict(), Verdict::Pass);
//! assert_eq!(record.detail(), "TypeError: mismatch");
//! ```

pub mod classify;
pub mod fixture;
pub mod outcome;
pub mod policy;
pub mod report;

pub use classify::{Classification, ResultRecord, Verdict, classify};
pub use fixture::Fixture;
pub use outcome::RunOutcome;
pub use policy::ExpectationPolicy;
pub use report::{Report, Tally};

/// Shown in place of stdout when a fixture ran to completion without printing anything.
pub const NO_OUTPUT_MARKER: &str = "[no output]";

/// Shown when a fixture exited abnormally with both output streams empty.
pub const UNKNOWN_ERROR_MARKER: &str = "unknown error";

/// Detail of a fixture whose process did not finish within the timeout.
pub const TIMEOUT_MARKER: &str = "timeout";

/// Detail of an error fixture that ran to completion.
pub const MISSING_ERROR_MARKER: &str = "expected error but none occurred";
