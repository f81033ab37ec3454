//! Candidate discovery.
//!
//! Walks the input paths and produces the weighted candidate list the
//! sampler draws from. Filtering happens basename-first: hidden names, the
//! reserved metadata directory, and excluded names prune the walk before
//! their children are ever enumerated, and a directory containing the skip
//! marker is invisible as a whole.
//!
//! # Invariants
//! - Every emitted candidate has `weight > 0`.
//! - Exclude is evaluated before include and wins.
//! - Archives nested inside archives are never opened.
//! - Per-entry I/O failures are counted and skipped, never fatal here.

use std::fs::File;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::config::{SampleConfig, WeightMode, METADATA_DIR_NAME, SKIP_MARKER_NAME, ZIP_SEP};
use crate::error::SampleError;
use crate::matcher::PatternSet;

/// Where a candidate's bytes live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// A plain file on disk.
    File { path: PathBuf },
    /// A member of a zip archive.
    ZipMember { archive: PathBuf, member: String },
}

/// A discovered file or archive member eligible for sampling.
///
/// The identity is fixed at discovery time; the sampler never mutates
/// candidates, only reorders and discards them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub origin: Origin,
    /// Final path component, used for matching and output naming.
    pub basename: String,
    /// Selection weight: byte size under size weighting, 1 under uniform.
    pub weight: u64,
}

impl Candidate {
    /// Printable locator: the path, or `archive!member` for zip members.
    pub fn identity(&self) -> String {
        match &self.origin {
            Origin::File { path } => path.display().to_string(),
            Origin::ZipMember { archive, member } => {
                format!("{}{ZIP_SEP}{member}", archive.display())
            }
        }
    }
}

/// Result of candidate discovery.
#[derive(Debug, Default)]
pub struct Collection {
    pub candidates: Vec<Candidate>,
    /// Entries skipped due to I/O errors (unreadable subtrees, bad
    /// archives, failed stats).
    pub entry_errors: u64,
}

/// Walk `cfg.inputs` and collect every candidate that survives filtering.
///
/// All input paths are existence-checked up front; a missing path is fatal
/// before any traversal starts. Individual unreadable entries inside an
/// existing tree are skipped and counted instead.
pub fn collect_candidates(
    cfg: &SampleConfig,
    include: &PatternSet,
    exclude: &PatternSet,
) -> Result<Collection, SampleError> {
    let missing: Vec<PathBuf> = cfg
        .inputs
        .iter()
        .filter(|p| !p.exists())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(SampleError::InputNotFound(missing));
    }

    let mut collection = Collection::default();
    for input in &cfg.inputs {
        // Resolve to a real path so roots like `.` get their actual
        // basename instead of tripping the hidden-name rule.
        let root = match std::fs::canonicalize(input) {
            Ok(root) => root,
            Err(_) => {
                collection.entry_errors += 1;
                continue;
            }
        };
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| descend(entry, exclude));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => {
                    collection.entry_errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                // Directories are handled by the walker; symlinks and
                // special files are skipped.
                continue;
            }
            let basename = entry.file_name().to_string_lossy().into_owned();
            if cfg.zip_members && has_zip_suffix(&basename) {
                if collect_zip_members(entry.path(), cfg, include, exclude, &mut collection)
                    .is_err()
                {
                    collection.entry_errors += 1;
                }
                continue;
            }
            if !include.matches(&basename) {
                continue;
            }
            let weight = match cfg.weight_mode {
                WeightMode::Size => match entry.metadata() {
                    Ok(meta) => meta.len(),
                    Err(_) => {
                        collection.entry_errors += 1;
                        continue;
                    }
                },
                WeightMode::Uniform => 1,
            };
            if weight == 0 {
                // Size-weighted mode: an empty file is unselectable.
                continue;
            }
            collection.candidates.push(Candidate {
                origin: Origin::File {
                    path: entry.into_path(),
                },
                basename,
                weight,
            });
        }
    }
    Ok(collection)
}

/// Pruning predicate applied to every walked entry, the root included.
///
/// The skip-marker check runs before any child is enumerated, so a marked
/// directory's children are never even stat'd.
fn descend(entry: &DirEntry, exclude: &PatternSet) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || name == METADATA_DIR_NAME || exclude.matches(&name) {
        return false;
    }
    if entry.file_type().is_dir() && entry.path().join(SKIP_MARKER_NAME).is_file() {
        return false;
    }
    true
}

/// Enumerate the members of one zip archive as candidates.
///
/// Member basenames go through the same hidden/metadata/exclude/include
/// checks as plain files. A member that is itself a `.zip` is sampled like
/// any other member but never opened.
fn collect_zip_members(
    archive: &Path,
    cfg: &SampleConfig,
    include: &PatternSet,
    exclude: &PatternSet,
    out: &mut Collection,
) -> Result<(), ZipError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    for index in 0..zip.len() {
        let member = match zip.by_index(index) {
            Ok(member) => member,
            Err(_) => {
                out.entry_errors += 1;
                continue;
            }
        };
        if member.is_dir() {
            continue;
        }
        let name = member.name().to_string();
        let weight = match cfg.weight_mode {
            WeightMode::Size => member.size(),
            WeightMode::Uniform => 1,
        };

        let trimmed = name.trim_end_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        let basename = member_basename(trimmed);
        if basename.starts_with('.')
            || basename == METADATA_DIR_NAME
            || exclude.matches(basename)
            || !include.matches(basename)
        {
            continue;
        }
        if weight == 0 {
            continue;
        }
        let basename = basename.to_string();
        out.candidates.push(Candidate {
            origin: Origin::ZipMember {
                archive: archive.to_path_buf(),
                member: name,
            },
            basename,
            weight,
        });
    }
    Ok(())
}

/// Final `/`-separated component of a member path, `"unnamed"` if empty.
fn member_basename(member: &str) -> &str {
    let base = member.rsplit('/').next().unwrap_or(member);
    if base.is_empty() {
        "unnamed"
    } else {
        base
    }
}

/// ASCII case-insensitive `.zip` suffix check, byte-wise so non-UTF-8
/// lossy conversions cannot split a character.
fn has_zip_suffix(name: &str) -> bool {
    let bytes = name.as_bytes();
    let suffix = b".zip";
    if bytes.len() < suffix.len() {
        return false;
    }
    bytes[bytes.len() - suffix.len()..]
        .iter()
        .zip(suffix)
        .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    // TempDir's default prefix is `.tmp`, which the hidden-name rule would
    // prune at the root.
    fn tree() -> TempDir {
        tempfile::Builder::new()
            .prefix("mksample-test")
            .tempdir()
            .unwrap()
    }

    fn config_for(dir: &TempDir) -> SampleConfig {
        SampleConfig {
            inputs: vec![dir.path().to_path_buf()],
            output: dir.path().join("out"),
            ..SampleConfig::default()
        }
    }

    fn collect(cfg: &SampleConfig, include: &[&str], exclude: &[&str]) -> Collection {
        let include: Vec<String> = include.iter().map(|p| p.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|p| p.to_string()).collect();
        let include = if include.is_empty() {
            PatternSet::match_all()
        } else {
            PatternSet::compile(&include, "--include").unwrap()
        };
        let exclude = PatternSet::compile(&exclude, "--exclude").unwrap();
        collect_candidates(cfg, &include, &exclude).unwrap()
    }

    fn basenames(collection: &Collection) -> Vec<&str> {
        let mut names: Vec<&str> = collection
            .candidates
            .iter()
            .map(|c| c.basename.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn include_filters_files() {
        let dir = tree();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("c.dat"), "c").unwrap();

        let got = collect(&config_for(&dir), &[r".*\.txt"], &[]);
        assert_eq!(basenames(&got), ["a.txt", "b.txt"]);
    }

    #[test]
    fn exclude_wins_over_include() {
        let dir = tree();
        fs::write(dir.path().join("secret.txt"), "s").unwrap();
        fs::write(dir.path().join("open.txt"), "o").unwrap();

        let got = collect(&config_for(&dir), &[r".*"], &[r"secret.*"]);
        assert_eq!(basenames(&got), ["open.txt"]);
    }

    #[test]
    fn skip_marker_hides_whole_subtree() {
        let dir = tree();
        fs::write(dir.path().join("top.txt"), "x").unwrap();
        let marked = dir.path().join("sample_out");
        fs::create_dir(&marked).unwrap();
        fs::write(marked.join(SKIP_MARKER_NAME), "").unwrap();
        fs::write(marked.join("nested.txt"), "y").unwrap();
        let deep = marked.join("deeper");
        fs::create_dir(&deep).unwrap();
        fs::write(deep.join("keep.txt"), "z").unwrap();
        let other = dir.path().join("other");
        fs::create_dir(&other).unwrap();
        fs::write(other.join("other.txt"), "w").unwrap();

        let got = collect(&config_for(&dir), &[], &[]);
        assert_eq!(basenames(&got), ["other.txt", "top.txt"]);
    }

    #[test]
    fn hidden_and_metadata_names_are_pruned() {
        let dir = tree();
        fs::write(dir.path().join("normal"), "x").unwrap();
        fs::write(dir.path().join(".hidden"), "x").unwrap();
        let meta = dir.path().join(METADATA_DIR_NAME);
        fs::create_dir(&meta).unwrap();
        fs::write(meta.join("thumb"), "x").unwrap();
        let dot = dir.path().join(".cache");
        fs::create_dir(&dot).unwrap();
        fs::write(dot.join("f"), "x").unwrap();

        let got = collect(&config_for(&dir), &[], &[]);
        assert_eq!(basenames(&got), ["normal"]);
    }

    #[test]
    fn recurses_into_subdirectories() {
        let dir = tree();
        fs::write(dir.path().join("a"), "a").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b"), "b").unwrap();

        let got = collect(&config_for(&dir), &[], &[]);
        assert_eq!(basenames(&got), ["a", "b"]);
    }

    #[test]
    fn excluded_directory_is_not_descended() {
        let dir = tree();
        let skipped = dir.path().join("node_modules");
        fs::create_dir(&skipped).unwrap();
        fs::write(skipped.join("dep.txt"), "d").unwrap();
        fs::write(dir.path().join("keep.txt"), "k").unwrap();

        let got = collect(&config_for(&dir), &[], &["node_modules"]);
        assert_eq!(basenames(&got), ["keep.txt"]);
    }

    #[test]
    fn size_weight_is_byte_size_and_skips_empty() {
        let dir = tree();
        fs::write(dir.path().join("five"), "12345").unwrap();
        fs::write(dir.path().join("empty"), "").unwrap();

        let got = collect(&config_for(&dir), &[], &[]);
        assert_eq!(got.candidates.len(), 1);
        assert_eq!(got.candidates[0].basename, "five");
        assert_eq!(got.candidates[0].weight, 5);
    }

    #[test]
    fn uniform_weight_keeps_empty_files() {
        let dir = tree();
        fs::write(dir.path().join("five"), "12345").unwrap();
        fs::write(dir.path().join("empty"), "").unwrap();

        let cfg = SampleConfig {
            weight_mode: WeightMode::Uniform,
            ..config_for(&dir)
        };
        let got = collect(&cfg, &[], &[]);
        assert_eq!(basenames(&got), ["empty", "five"]);
        assert!(got.candidates.iter().all(|c| c.weight == 1));
    }

    #[test]
    fn file_input_path_is_a_candidate() {
        let dir = tree();
        let file = dir.path().join("only.txt");
        fs::write(&file, "x").unwrap();

        let cfg = SampleConfig {
            inputs: vec![file.clone()],
            ..config_for(&dir)
        };
        let got = collect(&cfg, &[], &[]);
        assert_eq!(basenames(&got), ["only.txt"]);
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tree();
        let cfg = SampleConfig {
            inputs: vec![dir.path().join("nope")],
            ..config_for(&dir)
        };
        let include = PatternSet::match_all();
        let exclude = PatternSet::compile(&[], "--exclude").unwrap();
        let err = collect_candidates(&cfg, &include, &exclude).unwrap_err();
        assert!(matches!(err, SampleError::InputNotFound(ref p) if p.len() == 1));
    }

    #[test]
    fn zip_members_respect_include() {
        let dir = tree();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("x.txt", b"x"), ("y.dat", b"y")]);

        let cfg = SampleConfig {
            zip_members: true,
            ..config_for(&dir)
        };
        let got = collect(&cfg, &[r".*\.txt"], &[]);
        assert_eq!(got.candidates.len(), 1);
        let c = &got.candidates[0];
        assert_eq!(c.basename, "x.txt");
        assert!(matches!(
            &c.origin,
            Origin::ZipMember { member, .. } if member == "x.txt"
        ));
        assert!(c.identity().contains(ZIP_SEP));
    }

    #[test]
    fn zip_member_basename_uses_final_component() {
        let dir = tree();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("2024/deep/img.jpg", b"j"), ("2024/.thumb", b"t")]);

        let cfg = SampleConfig {
            zip_members: true,
            ..config_for(&dir)
        };
        let got = collect(&cfg, &[], &[]);
        assert_eq!(basenames(&got), ["img.jpg"]);
    }

    #[test]
    fn nested_zip_member_is_listed_but_never_opened() {
        let dir = tree();
        let mut inner = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        inner.start_file("buried.txt", options).unwrap();
        inner.write_all(b"buried").unwrap();
        let inner_bytes = inner.finish().unwrap().into_inner();

        let archive = dir.path().join("outer.zip");
        write_zip(&archive, &[("inner.zip", &inner_bytes), ("plain.txt", b"p")]);

        let cfg = SampleConfig {
            zip_members: true,
            ..config_for(&dir)
        };
        let got = collect(&cfg, &[], &[]);
        assert_eq!(basenames(&got), ["inner.zip", "plain.txt"]);
    }

    #[test]
    fn zip_disabled_treats_archive_as_plain_file() {
        let dir = tree();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("x.txt", b"x")]);

        let got = collect(&config_for(&dir), &[], &[]);
        assert_eq!(basenames(&got), ["a.zip"]);
        assert!(matches!(got.candidates[0].origin, Origin::File { .. }));
    }

    #[test]
    fn corrupt_zip_counts_one_entry_error() {
        let dir = tree();
        fs::write(dir.path().join("bad.zip"), b"PK\x03\x04not a real archive").unwrap();
        fs::write(dir.path().join("good.txt"), "g").unwrap();

        let cfg = SampleConfig {
            zip_members: true,
            ..config_for(&dir)
        };
        let got = collect(&cfg, &[], &[]);
        assert_eq!(basenames(&got), ["good.txt"]);
        assert_eq!(got.entry_errors, 1);
    }

    #[test]
    fn zip_suffix_is_case_insensitive() {
        assert!(has_zip_suffix("a.zip"));
        assert!(has_zip_suffix("a.ZIP"));
        assert!(has_zip_suffix("a.Zip"));
        assert!(!has_zip_suffix("zip"));
        assert!(!has_zip_suffix("a.zipx"));
        assert!(!has_zip_suffix("a.tar.gz"));
    }

    #[test]
    #[cfg(unix)]
    fn unreadable_subdir_is_skipped_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tree();
        fs::write(dir.path().join("readable.txt"), "r").unwrap();
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("unreachable.txt"), "u").unwrap();
        fs::set_permissions(&blocked, fs::Permissions::from_mode(0o000)).unwrap();

        let got = collect(&config_for(&dir), &[], &[]);

        fs::set_permissions(&blocked, fs::Permissions::from_mode(0o755)).unwrap();

        if got.entry_errors == 0 {
            // Privileged runs (root) can read 0o000 directories; the walk
            // then sees everything.
            assert_eq!(basenames(&got), ["readable.txt", "unreachable.txt"]);
        } else {
            assert_eq!(basenames(&got), ["readable.txt"]);
        }
    }
}
