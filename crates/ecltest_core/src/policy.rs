//! Decide whether a fixture is expected to make the interpreter report an error.
//!
//! The policy is two disjoint lists:
//! - an **allow-list** of exact fixture names that must run to completion, and
//! - a **keyword set**; a fixture whose name contains any keyword (case-insensitive) is an error fixture.
//!
//! The allow-list is consulted first. It exists to carve out error-sounding names (e.g. `test_error.ecl`)
//! that are ordinary fixtures.
//!
//! ## Examples
//! ```rust
//! use ecltest_core::ExpectationPolicy;
//!
//! let policy = ExpectationPolicy::default();
//! assert!(policy.evaluate("Bounds_Check.ecl"));
//! assert!(!policy.evaluate("test_error.ecl")); // allow-listed
//! assert!(!policy.evaluate("ok.ecl"));
//! ```

/// Fixture names that always expect a clean run.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "explicit_conversion_test.ecl",
    "test_error.ecl",
    "test_simple_error.ecl",
    "simple_conversion.ecl",
];

/// Name fragments that mark a fixture as an error fixture.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "strict_type_test.ecl",
    "super_example.ecl",
    "complete_super_example",
    "error",
    "bounds",
    "undefined",
    "type_error",
    "conversion",
    "comprehensive_errors",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationPolicy {
    allow_list: Vec<String>,
    /// Stored lowercased.
    keywords: Vec<String>,
}

impl Default for ExpectationPolicy {
    fn default() -> Self {
        let policy = DEFAULT_ALLOW_LIST
            .iter()
            .fold(Self::empty(), |policy, name| policy.with_allowed(*name));
        DEFAULT_KEYWORDS
            .iter()
            .fold(policy, |policy, keyword| policy.with_keyword(*keyword))
    }
}

impl ExpectationPolicy {
    /// A policy that expects every fixture to run cleanly.
    pub fn empty() -> Self {
        Self {
            allow_list: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Add an exact fixture name that must run to completion.
    pub fn with_allowed(mut self, name: impl Into<String>) -> Self {
        self.allow_list.push(name.into());
        self
    }

    /// Add a name fragment that marks fixtures as error fixtures.
    pub fn with_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keywords.push(keyword.as_ref().to_lowercase());
        self
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Return `true` when `fixture_name` is expected to make the interpreter exit abnormally.
    ///
    /// ## Notes
    /// - Allow-list membership is an exact, case-sensitive comparison and wins over any keyword match.
    /// - Keyword matching is a case-insensitive substring test.
    pub fn evaluate(&self, fixture_name: &str) -> bool {
        if self.allow_list.iter().any(|allowed| allowed == fixture_name) {
            return false;
        }
        let name = fixture_name.to_lowercase();
        self.keywords.iter().any(|keyword| name.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_expects_success() {
        assert!(!ExpectationPolicy::default().evaluate("ok.ecl"));
    }

    #[test]
    fn test_keyword_marks_error_fixture() {
        let policy = ExpectationPolicy::default();
        assert!(policy.evaluate("type_error.ecl"));
        assert!(policy.evaluate("array_bounds.ecl"));
        assert!(policy.evaluate("undefined_var.ecl"));
        assert!(policy.evaluate("complete_super_example_2.ecl"));
    }

    #[test]
    fn test_keyword_match_ignores_case() {
        let policy = ExpectationPolicy::default();
        assert!(policy.evaluate("TYPE_ERROR.ECL"));
        assert!(policy.evaluate("Undefined.ecl"));
    }

    #[test]
    fn test_allow_list_wins_over_keyword() {
        let policy = ExpectationPolicy::default();
        // each of these contains "error" or "conversion"
        for name in DEFAULT_ALLOW_LIST {
            assert!(!policy.evaluate(name), "{name} should expect success");
        }
    }

    #[test]
    fn test_allow_list_is_exact() {
        let policy = ExpectationPolicy::default();
        assert!(policy.evaluate("TEST_ERROR.ecl"));
        assert!(policy.evaluate("test_error.ecl.bak"));
    }

    #[test]
    fn test_keywords_are_stored_lowercase() {
        let policy = ExpectationPolicy::empty().with_keyword("Panic");
        assert_eq!(policy.keywords().to_vec(), vec!["panic".to_string()]);
        assert!(policy.evaluate("will_PANIC.ecl"));
    }

    #[test]
    fn test_empty_policy_expects_success_everywhere() {
        let policy = ExpectationPolicy::empty();
        assert!(!policy.evaluate("type_error.ecl"));
        assert!(!policy.evaluate(""));
    }
}
