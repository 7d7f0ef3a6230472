//! Aggregate result records into the final report.

use crate::{ResultRecord, Verdict};

/// Pass/fail counts over a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Ordered, append-only sequence of result records.
///
/// Records keep insertion order; nothing is filtered, sorted or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    records: Vec<ResultRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tally(&self) -> Tally {
        self.records.iter().fold(Tally::default(), |mut tally, record| {
            match record.verdict() {
                Verdict::Pass => tally.passed += 1,
                Verdict::Fail => tally.failed += 1,
            }
            tally
        })
    }

    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.verdict() == Verdict::Fail)
    }

    /// Newline-joined summary lines in insertion order. Empty for an empty report.
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(ResultRecord::summary_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<ResultRecord> for Report {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<ResultRecord> for Report {
    fn extend<I: IntoIterator<Item = ResultRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RunOutcome, classify};

    fn sample() -> Report {
        [
            classify("b.ecl", false, &RunOutcome::completed(Some(0), "1", "")),
            classify("a_error.ecl", true, &RunOutcome::completed(Some(0), "", "")),
            classify("c.ecl", false, &RunOutcome::TimedOut),
            classify("d_error.ecl", true, &RunOutcome::completed(Some(1), "", "boom")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_report_renders_empty_string() {
        let report = Report::new();
        assert!(report.is_empty());
        assert_eq!(report.render(), "");
        assert_eq!(report.tally(), Tally::default());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_render_keeps_insertion_order() {
        let rendered = sample().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            [
                "✓ b.ecl - passed",
                "✗ a_error.ecl - failed (expected error but none occurred)",
                "✗ c.ecl - timeout",
                "✓ d_error.ecl - passed (expected error)",
            ]
        );
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn test_tally_counts_verdicts() {
        let report = sample();
        let tally = report.tally();
        assert_eq!(tally.passed, 2);
        assert_eq!(tally.failed, 2);
        assert_eq!(tally.total(), report.len());
        assert!(report.has_failures());
    }

    #[test]
    fn test_push_appends() {
        let mut report = Report::new();
        report.push(classify("x.ecl", false, &RunOutcome::completed(Some(0), "", "")));
        report.extend([classify("y.ecl", false, &RunOutcome::completed(Some(0), "", ""))]);
        let names: Vec<_> = report.records().iter().map(|r| r.fixture_name.as_str()).collect();
        assert_eq!(names, ["x.ecl", "y.ecl"]);
    }
}
