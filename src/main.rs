//! mksample CLI
//!
//! Produces a fair random sample of a set of files. Candidates are gathered
//! from the given paths (descending into directories and, with `--zip`,
//! into zip archives), weighted by size or uniformly, sampled without
//! replacement, and hard-linked or extracted into a fresh output directory
//! as `outputdir/<bucket>/<index> <basename>`.
//!
//! # Output
//!
//! Dry runs print one selected identity per line to stdout. Completion
//! statistics are written to stderr:
//! `candidates=N selected=N entry_errors=N elapsed_ms=N`
//!
//! # Exit Codes
//!
//! - `0`: Success (including the zero-argument usage path)
//! - `1`: Runtime failure (missing input, existing output directory, no
//!   candidates, materialization error)
//! - `2`: Invalid arguments or configuration error

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use mksample::{pipeline, SampleConfig, WeightMode, SAMPLE_COUNT_MAX};

fn print_usage(mut to: impl Write) {
    let _ = writeln!(
        to,
        "usage: mksample filename+ --output outputdir [OPTIONS]

Produces a fair random sample of a set of files.

OPTIONS:
    --output <dir>          Output directory; required, must not already exist
    --dryrun                Print the files that would be sampled, write nothing
    --exclude <pattern>     Regular expression of basenames to ignore; takes
                            precedence over --include (repeatable)
    --include <pattern>     Regular expression a file basename must match
                            (repeatable; default: match everything)
    --size                  Weight selection by file size (default)
    --uniform               Give every file an equal selection probability
    --zip                   Consider members of zip files as candidates
    --count <n>             Number of files to sample, 1..={SAMPLE_COUNT_MAX}
                            (default: {SAMPLE_COUNT_MAX})
    --help, -h              Show this help message"
    );
}

fn flag_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> OsString {
    args.next().unwrap_or_else(|| {
        eprintln!("mksample: {flag} requires a value");
        process::exit(2);
    })
}

fn utf8_flag_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> String {
    flag_value(args, flag).into_string().unwrap_or_else(|_| {
        eprintln!("mksample: {flag} value must be valid UTF-8");
        process::exit(2);
    })
}

fn main() {
    let raw: Vec<OsString> = env::args_os().collect();
    if raw.len() <= 1 {
        print_usage(io::stdout());
        return;
    }
    // Recorded in the output's skip marker.
    let cmdline = raw
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    let mut cfg = SampleConfig::default();
    let mut size_given = false;
    let mut uniform_given = false;

    let mut args = raw.into_iter().skip(1);
    while let Some(arg) = args.next() {
        if let Some(flag) = arg.to_str() {
            match flag {
                "--help" | "-h" => {
                    print_usage(io::stdout());
                    return;
                }
                "--dryrun" => {
                    cfg.dry_run = true;
                    continue;
                }
                "--size" => {
                    size_given = true;
                    continue;
                }
                "--uniform" => {
                    uniform_given = true;
                    continue;
                }
                "--zip" => {
                    cfg.zip_members = true;
                    continue;
                }
                "--output" => {
                    cfg.output = PathBuf::from(flag_value(&mut args, "--output"));
                    continue;
                }
                "--exclude" => {
                    cfg.exclude.push(utf8_flag_value(&mut args, "--exclude"));
                    continue;
                }
                "--include" => {
                    cfg.include.push(utf8_flag_value(&mut args, "--include"));
                    continue;
                }
                "--count" => {
                    let value = utf8_flag_value(&mut args, "--count");
                    cfg.count = value.parse().unwrap_or_else(|_| {
                        eprintln!("mksample: invalid --count value: {value}");
                        process::exit(2);
                    });
                    continue;
                }
                _ if flag.starts_with('-') && flag.len() > 1 => {
                    eprintln!("mksample: unknown flag: {flag}");
                    print_usage(io::stderr());
                    process::exit(2);
                }
                _ => {}
            }
        }
        cfg.inputs.push(PathBuf::from(arg));
    }

    if size_given && uniform_given {
        eprintln!("mksample: --size and --uniform are mutually exclusive");
        process::exit(2);
    }
    cfg.weight_mode = if uniform_given {
        WeightMode::Uniform
    } else {
        WeightMode::Size
    };

    let start = Instant::now();
    let mut rng = rand::rng();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match pipeline::run(&cfg, &cmdline, &mut rng, &mut out) {
        Ok(report) => {
            let _ = out.flush();
            eprintln!(
                "candidates={} selected={} entry_errors={} elapsed_ms={}",
                report.candidates,
                report.selected,
                report.entry_errors,
                start.elapsed().as_millis()
            );
        }
        Err(err) => {
            eprintln!("mksample: {err}");
            process::exit(err.exit_code());
        }
    }
}
