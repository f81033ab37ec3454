//! End-to-end pipeline: validate, compile, collect, sample, produce.
//!
//! The three stages run strictly in sequence. The full candidate list is
//! in memory before sampling starts, and the sample is fully drawn before
//! anything is written.

use std::io::Write;

use rand::Rng;

use crate::collect::collect_candidates;
use crate::config::SampleConfig;
use crate::error::SampleError;
use crate::matcher::PatternSet;
use crate::output::produce_sample;
use crate::sample::draw_sample_with_rng;

/// Counters from a completed run.
#[derive(Clone, Copy, Debug)]
pub struct RunReport {
    /// Candidates discovered by traversal.
    pub candidates: usize,
    /// Candidates selected and produced (or reported, in a dry run).
    pub selected: usize,
    /// Entries skipped because of I/O errors.
    pub entry_errors: u64,
}

/// Run one sampling pass over `cfg`.
///
/// `cmdline` is recorded in the output's skip marker; `out` receives the
/// dry-run report (one identity per line) and is untouched otherwise.
pub fn run<R: Rng + ?Sized, W: Write>(
    cfg: &SampleConfig,
    cmdline: &str,
    rng: &mut R,
    out: &mut W,
) -> Result<RunReport, SampleError> {
    cfg.validate()?;
    let include = if cfg.include.is_empty() {
        PatternSet::match_all()
    } else {
        PatternSet::compile(&cfg.include, "--include")?
    };
    let exclude = PatternSet::compile(&cfg.exclude, "--exclude")?;

    let collection = collect_candidates(cfg, &include, &exclude)?;
    if collection.candidates.is_empty() {
        return Err(SampleError::NoCandidates);
    }
    let candidates = collection.candidates.len();

    let selected = draw_sample_with_rng(collection.candidates, |c| c.weight, cfg.count, rng);
    produce_sample(&selected, &cfg.output, cfg.dry_run, cmdline, out)?;

    Ok(RunReport {
        candidates,
        selected: selected.len(),
        entry_errors: collection.entry_errors,
    })
}
