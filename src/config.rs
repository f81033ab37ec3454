//! Run configuration and shared constants.
//!
//! # Design Notes
//! - All knobs live in one struct with named fields; `validate` runs once at
//!   startup so the rest of the pipeline can assume a consistent config.
//! - Mutually exclusive weighting flags are resolved into a single enum at
//!   the CLI boundary; the config cannot represent the conflicting state.

use std::path::PathBuf;

use crate::error::SampleError;

/// Sentinel file name. A directory containing it is invisible to traversal,
/// and every output directory receives one on success.
pub const SKIP_MARKER_NAME: &str = ".mksample.skip";

/// Reserved metadata directory name (Synology `@eaDir`), never traversed.
pub const METADATA_DIR_NAME: &str = "@eaDir";

/// Separator between an archive path and a member name in printed
/// identities, e.g. `photos.zip!2024/img_0001.jpg`.
pub const ZIP_SEP: char = '!';

/// Upper bound (inclusive) for `--count`, also its default.
pub const SAMPLE_COUNT_MAX: usize = 2500;

/// How candidate selection probability scales with the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WeightMode {
    /// Probability proportional to byte size (zero-byte files are excluded).
    #[default]
    Size,
    /// Every file weighs 1, regardless of size.
    Uniform,
}

/// Validated configuration for one sampling run.
#[derive(Clone, Debug)]
pub struct SampleConfig {
    /// Files and directories to sample from.
    pub inputs: Vec<PathBuf>,
    /// Output directory; must not exist yet.
    pub output: PathBuf,
    /// Report the sample instead of materializing it.
    pub dry_run: bool,
    /// Basename patterns to exclude; wins over `include`.
    pub exclude: Vec<String>,
    /// Basename patterns a file must match; empty means match everything.
    pub include: Vec<String>,
    /// Size-weighted (default) or uniform selection.
    pub weight_mode: WeightMode,
    /// Enumerate members of `.zip` files as candidates.
    pub zip_members: bool,
    /// Number of files to sample, `1..=SAMPLE_COUNT_MAX`.
    pub count: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::new(),
            dry_run: false,
            exclude: Vec::new(),
            include: Vec::new(),
            weight_mode: WeightMode::default(),
            zip_members: false,
            count: SAMPLE_COUNT_MAX,
        }
    }
}

impl SampleConfig {
    /// Check invariants the CLI also enforces, so library callers get the
    /// same contract. Cheap; called once before traversal.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.inputs.is_empty() {
            return Err(SampleError::NoInputs);
        }
        if self.output.as_os_str().is_empty() {
            return Err(SampleError::MissingOutput);
        }
        if self.count == 0 || self.count > SAMPLE_COUNT_MAX {
            return Err(SampleError::CountOutOfRange(self.count));
        }
        Ok(())
    }
}
