//! Sample materialization.
//!
//! Lays the ordered sample out as `outputdir/<bucket>/<index> <basename>`,
//! 25 entries per bucket. Plain files are hard-linked into place, falling
//! back to a byte copy when linking fails (cross-device, permissions);
//! archive members are extracted. The skip marker is written into the
//! fresh output directory before any sample file, so even a partially
//! materialized output is already invisible to future traversals.
//!
//! # Invariants
//! - The output directory must not exist beforehand, dry run included.
//! - A failure on any selected entry aborts the run; the partial output is
//!   left in place for inspection.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::collect::{Candidate, Origin};
use crate::config::SKIP_MARKER_NAME;
use crate::error::SampleError;

/// Consecutive sample indices sharing one output subdirectory.
pub const ENTRIES_PER_BUCKET: usize = 25;

/// Materialize the ordered sample into `outdir`, or report it to `out`
/// when `dry_run` is set.
///
/// `cmdline` is recorded in the skip marker so the output directory stays
/// inert to future runs that scan the same tree.
pub fn produce_sample<W: Write>(
    selected: &[Candidate],
    outdir: &Path,
    dry_run: bool,
    cmdline: &str,
    out: &mut W,
) -> Result<(), SampleError> {
    if outdir.exists() {
        return Err(SampleError::OutputExists(outdir.to_path_buf()));
    }
    if dry_run {
        for candidate in selected {
            writeln!(out, "{}", candidate.identity())?;
        }
        return Ok(());
    }

    fs::create_dir_all(outdir).map_err(|source| SampleError::Materialize {
        dest: outdir.to_path_buf(),
        source,
    })?;
    let marker = outdir.join(SKIP_MARKER_NAME);
    fs::write(&marker, format!("{cmdline}\n")).map_err(|source| SampleError::Materialize {
        dest: marker,
        source,
    })?;

    for (index, candidate) in selected.iter().enumerate() {
        let dest = destination(outdir, index, &candidate.basename);
        let bucket = dest.parent().expect("destination has a bucket directory");
        fs::create_dir_all(bucket).map_err(|source| SampleError::Materialize {
            dest: bucket.to_path_buf(),
            source,
        })?;
        let result = match &candidate.origin {
            Origin::File { path } => link_or_copy(path, &dest),
            Origin::ZipMember { archive, member } => extract_member(archive, member, &dest),
        };
        result.map_err(|source| SampleError::Materialize { dest, source })?;
    }
    Ok(())
}

/// Destination path for sample index `index`: bucket `index / 25` as a
/// two-digit directory, then `"{index:04} {basename}"`.
pub fn destination(outdir: &Path, index: usize, basename: &str) -> PathBuf {
    outdir
        .join(format!("{:02}", index / ENTRIES_PER_BUCKET))
        .join(format!("{index:04} {}", sanitize_basename(basename)))
}

/// Replace path separators, NUL, and line breaks so the destination name
/// stays a single safe path component.
fn sanitize_basename(basename: &str) -> String {
    basename
        .chars()
        .map(|c| match c {
            '\0' | '/' | '\\' | '\n' | '\r' => '_',
            other => other,
        })
        .collect()
}

fn link_or_copy(src: &Path, dest: &Path) -> io::Result<()> {
    if fs::hard_link(src, dest).is_ok() {
        return Ok(());
    }
    fs::copy(src, dest).map(|_| ())
}

fn extract_member(archive: &Path, member: &str, dest: &Path) -> io::Result<()> {
    let file = fs::File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(io::Error::from)?;
    let mut entry = zip.by_name(member).map_err(io::Error::from)?;
    let mut out = fs::File::create(dest)?;
    io::copy(&mut entry, &mut out)?;
    Ok(())
}
