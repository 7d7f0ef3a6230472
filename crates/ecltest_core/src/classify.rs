//! Compare an observed run against the expectation for its fixture.
//!
//! | Observed outcome        | expects success                 | expects failure                 |
//! |-------------------------|---------------------------------|---------------------------------|
//! | exit code 0             | Pass, detail = stdout           | Fail, detail = missing error    |
//! | exit code != 0 / signal | Fail, detail = error text       | Pass, detail = error text       |
//! | timed out               | Fail, detail = `timeout`        | Fail, detail = `timeout`        |
//! | launch error            | Fail, detail = launch message   | Fail, detail = launch message   |

use std::fmt;

use crate::{MISSING_ERROR_MARKER, NO_OUTPUT_MARKER, RunOutcome, TIMEOUT_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn symbol(self) -> &'static str {
        match self {
            Verdict::Pass => "✓",
            Verdict::Fail => "✗",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Which cell of the classification table a run landed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Clean run of an ordinary fixture. `output` is trimmed stdout, possibly empty.
    Passed { output: String },
    /// Abnormal exit of an error fixture.
    ExpectedError { error: String },
    /// Clean run of an error fixture. `output` is kept as supporting detail.
    MissingError { output: String },
    /// Abnormal exit of an ordinary fixture.
    UnexpectedError { error: String },
    TimedOut,
    LaunchFailed { message: String },
}

impl Classification {
    pub fn verdict(&self) -> Verdict {
        match self {
            Classification::Passed { .. } | Classification::ExpectedError { .. } => Verdict::Pass,
            Classification::MissingError { .. }
            | Classification::UnexpectedError { .. }
            | Classification::TimedOut
            | Classification::LaunchFailed { .. } => Verdict::Fail,
        }
    }
}

/// The classification of one fixture's run. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub fixture_name: String,
    pub classification: Classification,
}

impl ResultRecord {
    pub fn verdict(&self) -> Verdict {
        self.classification.verdict()
    }

    /// The free-form message attached to the verdict.
    pub fn detail(&self) -> &str {
        match &self.classification {
            Classification::Passed { output } if output.is_empty() => NO_OUTPUT_MARKER,
            Classification::Passed { output } => output.as_str(),
            Classification::ExpectedError { error } | Classification::UnexpectedError { error } => error.as_str(),
            Classification::MissingError { .. } => MISSING_ERROR_MARKER,
            Classification::TimedOut => TIMEOUT_MARKER,
            Classification::LaunchFailed { message } => message.as_str(),
        }
    }

    /// One report line for this record.
    pub fn summary_line(&self) -> String {
        let symbol = self.verdict().symbol();
        let name = &self.fixture_name;
        match &self.classification {
            Classification::Passed { .. } => format!("{symbol} {name} - passed"),
            Classification::ExpectedError { .. } => format!("{symbol} {name} - passed (expected error)"),
            Classification::MissingError { .. } => format!("{symbol} {name} - failed ({MISSING_ERROR_MARKER})"),
            Classification::UnexpectedError { error } => format!("{symbol} {name} - failed - {error}"),
            Classification::TimedOut => format!("{symbol} {name} - {TIMEOUT_MARKER}"),
            Classification::LaunchFailed { message } => format!("{symbol} {name} - exception - {message}"),
        }
    }
}

/// Classify one observed run. Total over every outcome and expectation.
pub fn classify(fixture_name: &str, expects_failure: bool, outcome: &RunOutcome) -> ResultRecord {
    let classification = match outcome {
        RunOutcome::Completed { stdout, .. } if outcome.is_success() => {
            let output = stdout.trim().to_string();
            if expects_failure {
                Classification::MissingError { output }
            } else {
                Classification::Passed { output }
            }
        }
        RunOutcome::Completed { .. } => {
            let error = outcome.error_text().unwrap_or_default();
            if expects_failure {
                Classification::ExpectedError { error }
            } else {
                Classification::UnexpectedError { error }
            }
        }
        RunOutcome::TimedOut => Classification::TimedOut,
        RunOutcome::LaunchError(message) => Classification::LaunchFailed {
            message: message.clone(),
        },
    };

    ResultRecord {
        fixture_name: fixture_name.to_string(),
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNKNOWN_ERROR_MARKER;

    #[test]
    fn test_clean_run_of_ordinary_fixture_passes() {
        let record = classify("ok.ecl", false, &RunOutcome::completed(Some(0), "5\n", ""));
        assert_eq!(record.verdict(), Verdict::Pass);
        assert_eq!(record.detail(), "5");
        assert_eq!(record.summary_line(), "✓ ok.ecl - passed");
    }

    #[test]
    fn test_clean_run_without_output() {
        let record = classify("quiet.ecl", false, &RunOutcome::completed(Some(0), "  \n", ""));
        assert_eq!(record.verdict(), Verdict::Pass);
        assert_eq!(record.detail(), NO_OUTPUT_MARKER);
    }

    #[test]
    fn test_expected_error_passes() {
        let outcome = RunOutcome::completed(Some(1), "", "TypeError: mismatch\n");
        let record = classify("type_error.ecl", true, &outcome);
        assert_eq!(record.verdict(), Verdict::Pass);
        assert_eq!(record.detail(), "TypeError: mismatch");
        assert_eq!(record.summary_line(), "✓ type_error.ecl - passed (expected error)");
    }

    #[test]
    fn test_missing_error_fails() {
        let record = classify("type_error.ecl", true, &RunOutcome::completed(Some(0), "", ""));
        assert_eq!(record.verdict(), Verdict::Fail);
        assert_eq!(record.detail(), MISSING_ERROR_MARKER);
        assert_eq!(
            record.summary_line(),
            "✗ type_error.ecl - failed (expected error but none occurred)"
        );
    }

    #[test]
    fn test_missing_error_keeps_stdout() {
        let record = classify("bounds.ecl", true, &RunOutcome::completed(Some(0), "42\n", ""));
        assert_eq!(
            record.classification,
            Classification::MissingError {
                output: "42".to_string()
            }
        );
    }

    #[test]
    fn test_unexpected_error_fails_with_stderr() {
        let outcome = RunOutcome::completed(Some(1), "", "conversion failed");
        let record = classify("explicit_conversion_test.ecl", false, &outcome);
        assert_eq!(record.verdict(), Verdict::Fail);
        assert_eq!(record.detail(), "conversion failed");
        assert_eq!(
            record.summary_line(),
            "✗ explicit_conversion_test.ecl - failed - conversion failed"
        );
    }

    #[test]
    fn test_unexpected_error_without_output() {
        let record = classify("ok.ecl", false, &RunOutcome::completed(Some(3), "", ""));
        assert_eq!(record.detail(), UNKNOWN_ERROR_MARKER);
    }

    #[test]
    fn test_signal_termination_is_abnormal_exit() {
        let record = classify("ok.ecl", false, &RunOutcome::completed(None, "", "killed"));
        assert_eq!(record.verdict(), Verdict::Fail);
        let record = classify("type_error.ecl", true, &RunOutcome::completed(None, "", "killed"));
        assert_eq!(record.verdict(), Verdict::Pass);
    }

    #[test]
    fn test_timeout_fails_regardless_of_expectation() {
        for expects_failure in [false, true] {
            let record = classify("loop.ecl", expects_failure, &RunOutcome::TimedOut);
            assert_eq!(record.verdict(), Verdict::Fail);
            assert_eq!(record.detail(), TIMEOUT_MARKER);
            assert_eq!(record.summary_line(), "✗ loop.ecl - timeout");
        }
    }

    #[test]
    fn test_launch_error_fails_regardless_of_expectation() {
        for expects_failure in [false, true] {
            let outcome = RunOutcome::LaunchError("No such file or directory (os error 2)".to_string());
            let record = classify("error_case.ecl", expects_failure, &outcome);
            assert_eq!(record.verdict(), Verdict::Fail);
            assert_eq!(record.detail(), "No such file or directory (os error 2)");
            assert_eq!(
                record.summary_line(),
                "✗ error_case.ecl - exception - No such file or directory (os error 2)"
            );
        }
    }
}
