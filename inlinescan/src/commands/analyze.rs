//! The default scan command: analyze every listing and report the classes.

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cfg::CfgStore;
use crate::config::MatcherConfig;
use crate::listing::FunctionListing;
use crate::matcher::{MatchedClass, SubgraphMatcher};
use crate::output::{
    create_progress_bar, print_header, print_matched_classes, print_scan_stats,
    print_summary_pills, InlineFinding,
};
use crate::primes::shared_primes;

use super::find_listing_files;

/// Options of one scan run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Matcher tunables.
    pub config: MatcherConfig,
    /// Emit raw JSON findings instead of tables.
    pub json: bool,
    /// Write the textual class report here.
    pub report: Option<PathBuf>,
    /// Write one matcher state file per function into this directory.
    pub state_dir: Option<PathBuf>,
    /// Suppress progress output.
    pub quiet: bool,
}

struct FileOutcome {
    path: PathBuf,
    function: String,
    total_blocks: usize,
    classes: Vec<MatchedClass>,
    cfg: CfgStore,
    report: String,
    state: Option<String>,
    error: Option<String>,
}

/// Executes the scan over every listing found under `paths`.
///
/// Returns the total number of reported classes.
///
/// # Errors
///
/// Returns an error if writing output files or the terminal fails. Listing
/// failures are reported per file and do not abort the scan.
pub fn run_analyze<W: Write>(
    paths: &[PathBuf],
    options: &AnalyzeOptions,
    writer: &mut W,
) -> Result<usize> {
    let files = find_listing_files(paths);

    let progress = if options.quiet || options.json {
        None
    } else {
        Some(create_progress_bar(files.len() as u64))
    };

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|file| {
            let outcome = analyze_listing(file, options);
            if let Some(pb) = &progress {
                pb.inc(1);
            }
            outcome
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if let Some(dir) = &options.state_dir {
        fs::create_dir_all(dir)?;
        for outcome in &outcomes {
            if let Some(state) = &outcome.state {
                let stem = outcome
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("function");
                fs::write(dir.join(format!("{stem}.state")), state)?;
            }
        }
    }

    if let Some(report_path) = &options.report {
        let mut combined = String::new();
        for outcome in &outcomes {
            combined.push_str(&outcome.report);
        }
        fs::write(report_path, combined)?;
    }

    let total_classes: usize = outcomes.iter().map(|o| o.classes.len()).sum();

    if options.json {
        let findings: Vec<InlineFinding> = outcomes
            .iter()
            .flat_map(|o| {
                o.classes
                    .iter()
                    .map(|c| InlineFinding::from_class(c, &o.cfg, &o.function, &o.path))
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&findings)?)?;
        return Ok(total_classes);
    }

    print_header(writer)?;
    for outcome in &outcomes {
        if let Some(error) = &outcome.error {
            writeln!(
                writer,
                "{} {}: {}",
                "[SKIP]".yellow().bold(),
                outcome.path.display(),
                error
            )?;
            continue;
        }
        let title = format!("{} ({})", outcome.function, outcome.path.display());
        print_matched_classes(writer, &title, &outcome.classes, &outcome.cfg)?;
    }

    let functions_with_duplicates = outcomes.iter().filter(|o| !o.classes.is_empty()).count();
    let occurrences: usize = outcomes
        .iter()
        .flat_map(|o| o.classes.iter().map(|c| c.paths.len()))
        .sum();
    let total_blocks: usize = outcomes.iter().map(|o| o.total_blocks).sum();

    print_summary_pills(writer, total_classes, occurrences, functions_with_duplicates)?;
    print_scan_stats(writer, outcomes.iter().filter(|o| o.error.is_none()).count(), total_blocks)?;

    Ok(total_classes)
}

fn analyze_listing(path: &Path, options: &AnalyzeOptions) -> FileOutcome {
    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        function: String::new(),
        total_blocks: 0,
        classes: Vec::new(),
        cfg: CfgStore::new(),
        report: String::new(),
        state: None,
        error: None,
    };

    let listing = match FunctionListing::from_path(path) {
        Ok(l) => l,
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };
    outcome.function = listing
        .name
        .as_ref()
        .map_or_else(|| format!("sub_{:x}", listing.entry), ToString::to_string);

    let decoder = listing.decoder();
    let primes = shared_primes();
    let mut matcher = match SubgraphMatcher::from_source(
        &decoder,
        primes,
        &listing,
        listing.entry,
        options.config,
    ) {
        Ok(m) => m,
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };

    match matcher.analyze() {
        Ok(classes) => outcome.classes = classes,
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    }

    outcome.total_blocks = matcher.cfg().len();

    let mut report = Vec::new();
    if matcher.write_report(&mut report).is_ok() {
        outcome.report = String::from_utf8_lossy(&report).into_owned();
    }
    if options.state_dir.is_some() {
        let mut state = Vec::new();
        if matcher.save_state(&mut state).is_ok() {
            outcome.state = Some(String::from_utf8_lossy(&state).into_owned());
        }
    }
    outcome.cfg = matcher.cfg().clone();
    outcome
}
