//! Basename pattern matching.
//!
//! # Invariants
//! - Matching is always full-string: `txt` does not match `a.txt`.
//! - An empty pattern list matches nothing; callers that want "match
//!   everything by default" substitute a `.*` pattern themselves.

use regex::Regex;

use crate::error::SampleError;

/// A set of basename patterns compiled into one anchored alternation.
#[derive(Clone, Debug)]
pub struct PatternSet {
    regex: Option<Regex>,
}

impl PatternSet {
    /// Compile `patterns` into a full-match predicate.
    ///
    /// Each pattern is wrapped in a non-capturing group and the alternation
    /// is anchored on both ends, so every pattern must match the entire
    /// basename. `option` names the originating flag in error messages.
    pub fn compile(patterns: &[String], option: &'static str) -> Result<Self, SampleError> {
        if patterns.is_empty() {
            return Ok(Self { regex: None });
        }
        let alternation = patterns
            .iter()
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!("^(?:{alternation})$"))
            .map_err(|source| SampleError::InvalidPattern { option, source })?;
        Ok(Self { regex: Some(regex) })
    }

    /// A set matching every basename.
    pub fn match_all() -> Self {
        Self::compile(&[String::from(".*")], "--include")
            .expect("'.*' always compiles")
    }

    /// True iff `basename` fully matches at least one pattern.
    pub fn matches(&self, basename: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(basename))
    }

    /// True when no patterns were supplied.
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(patterns: &[&str]) -> PatternSet {
        let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        PatternSet::compile(&owned, "--exclude").unwrap()
    }

    #[test]
    fn full_match_not_substring() {
        let s = set(&[r"\d+"]);
        assert!(s.matches("123"));
        assert!(!s.matches("a123"));
        assert!(!s.matches("123b"));
    }

    #[test]
    fn alternation_over_multiple_patterns() {
        let s = set(&[r".*\.txt", r".*\.md"]);
        assert!(s.matches("notes.txt"));
        assert!(s.matches("README.md"));
        assert!(!s.matches("image.png"));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let s = set(&[]);
        assert!(s.is_empty());
        assert!(!s.matches("anything"));
        assert!(!s.matches(""));
    }

    #[test]
    fn match_all_matches_everything() {
        let s = PatternSet::match_all();
        assert!(s.matches("a.txt"));
        assert!(s.matches(""));
        assert!(s.matches(".hidden"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = PatternSet::compile(&[String::from("(")], "--include").unwrap_err();
        assert!(matches!(
            err,
            SampleError::InvalidPattern {
                option: "--include",
                ..
            }
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn pattern_with_alternation_stays_grouped() {
        // Without per-pattern grouping, `a|b` would anchor only one branch.
        let s = set(&["a|b"]);
        assert!(s.matches("a"));
        assert!(s.matches("b"));
        assert!(!s.matches("ab"));
        assert!(!s.matches("xa"));
    }
}
