//! Fair random sampling of file collections.
//!
//! ## Scope
//! This crate draws a weighted random sample from a set of input paths
//! (plain files, directory trees, and optionally zip archive members) and
//! materializes it into a fresh, bucketed output directory.
//!
//! ## Key invariants
//! - Selection is without replacement; the sample never repeats an identity.
//! - Exclude patterns are evaluated before include patterns and win.
//! - A directory containing `.mksample.skip` is invisible to traversal, and
//!   every output directory receives that marker, so one run's output is
//!   inert to the next run's scan.
//! - The final sample order is shuffled independently of weight, so output
//!   indices carry no information about size or traversal order.
//!
//! ## Pipeline flow
//! `Paths -> collect (matcher) -> Candidates -> sample -> produce -> Output dir`
//!
//! ## Notable entry points
//! - [`pipeline::run`]: the whole pipeline behind the CLI.
//! - [`collect::collect_candidates`] / [`sample::draw_sample_with_rng`] /
//!   [`output::produce_sample`]: the individual stages.
//! - [`config::SampleConfig`]: one validated configuration object.

pub mod collect;
pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod sample;

pub use collect::{collect_candidates, Candidate, Collection, Origin};
pub use config::{
    SampleConfig, WeightMode, METADATA_DIR_NAME, SAMPLE_COUNT_MAX, SKIP_MARKER_NAME, ZIP_SEP,
};
pub use error::SampleError;
pub use matcher::PatternSet;
pub use output::{destination, produce_sample, ENTRIES_PER_BUCKET};
pub use pipeline::{run, RunReport};
pub use sample::{draw_sample, draw_sample_with_rng};
