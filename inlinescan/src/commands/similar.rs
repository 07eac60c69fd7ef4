//! The `similar` subcommand: query the matched-subgraph stores.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::config::MatcherConfig;
use crate::listing::FunctionListing;
use crate::matcher::SubgraphMatcher;
use crate::primes::shared_primes;

/// Analyze one listing and print every subgraph matched with one containing
/// the queried blocks. Returns the number of matches.
///
/// # Errors
///
/// Returns an error if the listing cannot be loaded or analysis fails.
pub fn run_similar<W: Write>(
    listing_path: &Path,
    nodes: &[u32],
    json: bool,
    config: MatcherConfig,
    writer: &mut W,
) -> Result<usize> {
    let listing = FunctionListing::from_path(listing_path)
        .with_context(|| format!("loading {}", listing_path.display()))?;
    let decoder = listing.decoder();
    let primes = shared_primes();
    let mut matcher =
        SubgraphMatcher::from_source(&decoder, primes, &listing, listing.entry, config)?;
    matcher.analyze()?;

    let similar = matcher.find_similar(nodes);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&similar)?)?;
        return Ok(similar.len());
    }

    if similar.is_empty() {
        writeln!(writer, "{}", "No matched subgraph contains those blocks.".dimmed())?;
        return Ok(0);
    }
    writeln!(
        writer,
        "{}",
        format!("{} matched block sets:", similar.len()).bold()
    )?;
    for set in &similar {
        let nodes: Vec<String> = set.iter().map(ToString::to_string).collect();
        writeln!(writer, "  [{}]", nodes.join(", "))?;
    }
    Ok(similar.len())
}
