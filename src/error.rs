//! Error type for the sampling pipeline.
//!
//! # Design Notes
//! - Configuration mistakes and runtime failures share one enum but map to
//!   different process exit codes (2 and 1 respectively).
//! - Per-entry traversal failures are not represented here: the traverser
//!   skips the offending entry and counts it instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::config::SAMPLE_COUNT_MAX;

/// Fatal error raised by configuration validation, traversal, sampling, or
/// materialization.
#[derive(Debug)]
pub enum SampleError {
    /// A `--include` or `--exclude` pattern failed to compile.
    InvalidPattern {
        option: &'static str,
        source: regex::Error,
    },
    /// `--count` outside `[1, SAMPLE_COUNT_MAX]`.
    CountOutOfRange(usize),
    /// No input paths were supplied.
    NoInputs,
    /// No output directory was supplied.
    MissingOutput,
    /// One or more input paths do not exist.
    InputNotFound(Vec<PathBuf>),
    /// The output directory already exists.
    OutputExists(PathBuf),
    /// Traversal produced nothing to sample.
    NoCandidates,
    /// A selected entry could not be linked, copied, or extracted.
    Materialize { dest: PathBuf, source: io::Error },
    /// Any other I/O failure (e.g. writing dry-run output).
    Io(io::Error),
}

impl SampleError {
    /// Process exit code for this error: 2 for configuration/usage errors
    /// detected before traversal, 1 for runtime failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            SampleError::InvalidPattern { .. }
            | SampleError::CountOutOfRange(_)
            | SampleError::NoInputs
            | SampleError::MissingOutput => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::InvalidPattern { option, source } => {
                write!(f, "invalid regular expression for {option}: {source}")
            }
            SampleError::CountOutOfRange(n) => {
                write!(f, "--count must be between 1 and {SAMPLE_COUNT_MAX} (got {n})")
            }
            SampleError::NoInputs => write!(f, "at least one input path is required"),
            SampleError::MissingOutput => write!(f, "--output is required"),
            SampleError::InputNotFound(paths) => {
                let joined = paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "no such file or directory: {joined}")
            }
            SampleError::OutputExists(path) => {
                write!(f, "output directory already exists: {}", path.display())
            }
            SampleError::NoCandidates => write!(f, "no candidates found"),
            SampleError::Materialize { dest, source } => {
                write!(f, "cannot produce '{}': {source}", dest.display())
            }
            SampleError::Io(source) => write!(f, "i/o error: {source}"),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SampleError::InvalidPattern { source, .. } => Some(source),
            SampleError::Materialize { source, .. } => Some(source),
            SampleError::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for SampleError {
    fn from(source: io::Error) -> Self {
        SampleError::Io(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        assert_eq!(SampleError::CountOutOfRange(0).exit_code(), 2);
        assert_eq!(SampleError::NoInputs.exit_code(), 2);
        assert_eq!(SampleError::MissingOutput.exit_code(), 2);
    }

    #[test]
    fn runtime_errors_exit_with_one() {
        assert_eq!(SampleError::NoCandidates.exit_code(), 1);
        assert_eq!(SampleError::OutputExists(PathBuf::from("/x")).exit_code(), 1);
        assert_eq!(
            SampleError::InputNotFound(vec![PathBuf::from("/missing")]).exit_code(),
            1
        );
    }

    #[test]
    fn messages_are_single_line() {
        let errs: Vec<SampleError> = vec![
            SampleError::CountOutOfRange(9999),
            SampleError::NoCandidates,
            SampleError::InputNotFound(vec![PathBuf::from("/a"), PathBuf::from("/b")]),
        ];
        for e in errs {
            let msg = e.to_string();
            assert!(!msg.contains('\n'), "multi-line message: {msg:?}");
            assert!(!msg.is_empty());
        }
    }
}
