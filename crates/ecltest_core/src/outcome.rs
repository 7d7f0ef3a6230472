//! What was observed when the interpreter ran one fixture.

use crate::UNKNOWN_ERROR_MARKER;

/// The observed result of executing one fixture.
///
/// Launch failures are a variant rather than an error so the classifier sees every way a run can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited on its own.
    ///
    /// `exit_code` is `None` when the process was terminated by a signal.
    Completed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The process did not finish within the timeout and was killed.
    TimedOut,
    /// The process could not be started.
    LaunchError(String),
}

impl RunOutcome {
    pub fn completed(exit_code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Completed {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// `true` only for a process that exited with code 0.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { exit_code: Some(0), .. })
    }

    /// Error text of a completed run: stderr, else stdout, else [`UNKNOWN_ERROR_MARKER`].
    ///
    /// ## Returns
    /// - `None` for [`RunOutcome::TimedOut`] and [`RunOutcome::LaunchError`].
    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::Completed { stdout, stderr, .. } => {
                let text = [stderr.trim(), stdout.trim()]
                    .into_iter()
                    .find(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_ERROR_MARKER);
                Some(text.to_string())
            }
            Self::TimedOut | Self::LaunchError(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_only_for_zero_exit() {
        assert!(RunOutcome::completed(Some(0), "", "").is_success());
        assert!(!RunOutcome::completed(Some(2), "", "").is_success());
        assert!(!RunOutcome::completed(None, "", "").is_success());
        assert!(!RunOutcome::TimedOut.is_success());
        assert!(!RunOutcome::LaunchError("missing".into()).is_success());
    }

    #[test]
    fn test_error_text_prefers_stderr() {
        let outcome = RunOutcome::completed(Some(1), "partial\n", "  boom\n");
        assert_eq!(outcome.error_text().as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_text_falls_back_to_stdout() {
        let outcome = RunOutcome::completed(Some(1), "Error: bad\n", " \n");
        assert_eq!(outcome.error_text().as_deref(), Some("Error: bad"));
    }

    #[test]
    fn test_error_text_placeholder() {
        let outcome = RunOutcome::completed(Some(1), "", "");
        assert_eq!(outcome.error_text().as_deref(), Some(UNKNOWN_ERROR_MARKER));
        assert_eq!(RunOutcome::TimedOut.error_text(), None);
    }
}
