//! # Wiki Curator
//!
//! A curation pipeline that fetches, validates, deduplicates, and classifies
//! wiki article titles into a question pool for a trivia game.
//!
//! ## Features
//!
//! - Merges persisted title lists and filters them against a substring
//!   blacklist and length cap
//! - Collapses case-insensitive duplicate titles, first occurrence wins
//! - Fetches every title to partition valid / redirected / missing pages,
//!   resolving redirects to their canonical titles
//! - Buckets titles by inbound-link popularity via WhatLinksHere
//! - Flags disambiguation listings and prunes unpopular titles
//!
//! ## Usage
//!
//! ```sh
//! wiki_curator -o ./curated clean sources/
//! wiki_curator -o ./curated check ./curated/master.json
//! ```
//!
//! ## Architecture
//!
//! A linear pipeline over in-memory title collections: loader →
//! validator/deduplicator → optional network stages (redirect resolution,
//! link classification, disambiguation) → JSON persistence. Network batches
//! run sequentially and checkpoint partial results every few items.

use clap::Parser;
use std::collections::BTreeSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod batch;
mod cli;
mod config;
mod filters;
mod models;
mod sampler;
mod store;
mod wiki;

use cli::{Cli, Command};
use config::CuratorConfig;
use models::BatchOutcome;
use wiki::fetch::PageFetcher;
use wiki::redirect::HttpBrowser;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wiki_curator starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref())?;
    let output_dir = PathBuf::from(
        args.output_dir
            .as_deref()
            .unwrap_or(&config.output_dir),
    );

    match args.command {
        Command::Clean { sources } => {
            clean(resolve_sources(&sources, &config)?, &config, &output_dir)?
        }
        Command::Check { sources } => {
            check(resolve_sources(&sources, &config)?, &config, &output_dir).await?
        }
        Command::LinkCounts { sources } => {
            link_counts(resolve_sources(&sources, &config)?, &config, &output_dir).await?
        }
        Command::Disambiguation { sources } => {
            disambiguation(resolve_sources(&sources, &config)?, &config, &output_dir).await?
        }
        Command::People { sources } => {
            people(resolve_sources(&sources, &config)?, &config, &output_dir).await?
        }
        Command::Prune { counts, sources } => {
            prune(&counts, resolve_sources(&sources, &config)?, &config, &output_dir)?
        }
        Command::WordFreq { sources } => {
            word_freq(resolve_sources(&sources, &config)?, &output_dir)?
        }
        Command::PageLinks { title } => page_links(&title, &config, &output_dir).await?,
        Command::Sample {
            sources,
            rounds,
            per_round,
        } => sample(resolve_sources(&sources, &config)?, rounds, per_round)?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Sources named on the command line, falling back to the config file's
/// `source_paths` when the command names none.
fn resolve_sources<'a>(
    cli_sources: &'a [String],
    config: &'a CuratorConfig,
) -> Result<&'a [String], Box<dyn Error>> {
    if !cli_sources.is_empty() {
        Ok(cli_sources)
    } else if !config.source_paths.is_empty() {
        info!(sources = config.source_paths.len(), "Using source_paths from config");
        Ok(&config.source_paths)
    } else {
        Err("no sources given on the command line or in the config file".into())
    }
}

/// Merge title lists from files and directories into one exact-match set.
fn load_sources(sources: &[String]) -> Result<BTreeSet<String>, Box<dyn Error>> {
    let mut merged = BTreeSet::new();
    for source in sources {
        let set = if Path::new(source).is_dir() {
            store::load_merged_dir(source)?
        } else {
            store::load_merged(std::slice::from_ref(source))?
        };
        merged.extend(set);
    }
    Ok(merged)
}

/// Merged sources as an ordered sequence for the batch runners.
fn load_source_titles(sources: &[String]) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(load_sources(sources)?.into_iter().collect())
}

/// Offline cleanup: validate against the blacklist, collapse
/// case-insensitive duplicates, write the master list.
#[instrument(level = "info", skip_all)]
fn clean(
    sources: &[String],
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let merged = load_sources(sources)?;
    let valid = filters::validate_articles(&merged, config);
    let unique = filters::remove_duplicates(valid);
    store::write_titles(output_dir.join("master.json"), &unique)?;
    info!(count = unique.len(), "Wrote cleaned master list");
    Ok(())
}

/// Full network validation with checkpointed partial results.
#[instrument(level = "info", skip_all)]
async fn check(
    sources: &[String],
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let titles = load_source_titles(sources)?;
    let fetcher = PageFetcher::new(&config.wiki_base_url);
    let browser = HttpBrowser::new(Duration::from_millis(config.settle_delay_ms));

    let checkpoint_dir = output_dir.to_path_buf();
    let checkpoint = |outcome: &BatchOutcome| -> Result<(), Box<dyn Error>> {
        store::write_titles(checkpoint_dir.join("valid.json"), &outcome.valid)?;
        store::write_titles(checkpoint_dir.join("redirect.json"), &outcome.redirected)?;
        store::write_titles(checkpoint_dir.join("error.json"), &outcome.error)?;
        Ok(())
    };

    let outcome = batch::run_validation(&fetcher, &browser, &titles, config, checkpoint).await?;
    info!(
        valid = outcome.valid.len(),
        redirected = outcome.redirected.len(),
        error = outcome.error.len(),
        "Wrote validation partition"
    );
    Ok(())
}

/// Classify titles by inbound-link count and persist every bucket.
#[instrument(level = "info", skip_all)]
async fn link_counts(
    sources: &[String],
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let titles = load_source_titles(sources)?;
    let fetcher = PageFetcher::new(&config.wiki_base_url);
    let buckets = batch::run_link_counts(&fetcher, &titles, config).await;

    store::write_counts(output_dir.join("links_50.json"), &buckets.under_50)?;
    store::write_counts(output_dir.join("links_100.json"), &buckets.under_100)?;
    store::write_counts(output_dir.join("links_150.json"), &buckets.under_150)?;
    store::write_counts(output_dir.join("links_250.json"), &buckets.under_250)?;
    store::write_counts(output_dir.join("links_350.json"), &buckets.under_350)?;
    store::write_counts(output_dir.join("links_500.json"), &buckets.over_350)?;
    store::write_counts(output_dir.join("links_all.json"), &buckets.all)?;
    info!(classified = buckets.all.len(), "Wrote link buckets");
    Ok(())
}

/// Collect and persist disambiguation listings.
#[instrument(level = "info", skip_all)]
async fn disambiguation(
    sources: &[String],
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let titles = load_source_titles(sources)?;
    let fetcher = PageFetcher::new(&config.wiki_base_url);
    let flagged = batch::run_disambiguation(&fetcher, &titles).await;
    store::write_titles(output_dir.join("disambiguation.json"), &flagged)?;
    info!(flagged = flagged.len(), "Wrote disambiguation list");
    Ok(())
}

/// Collect and persist biography pages.
#[instrument(level = "info", skip_all)]
async fn people(
    sources: &[String],
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let titles = load_source_titles(sources)?;
    let fetcher = PageFetcher::new(&config.wiki_base_url);
    let flagged = batch::run_people(&fetcher, &titles).await;
    store::write_titles(output_dir.join("people.json"), &flagged)?;
    info!(flagged = flagged.len(), "Wrote person-article list");
    Ok(())
}

/// Prune titles whose recorded link count falls below the retain threshold.
#[instrument(level = "info", skip_all)]
fn prune(
    counts_path: &str,
    sources: &[String],
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let counts = store::read_counts(counts_path)?;
    let titles = load_source_titles(sources)?;
    let kept = batch::remove_articles(&counts, titles, config);
    store::write_titles(output_dir.join("pruned.json"), &kept)?;
    info!(kept = kept.len(), "Wrote pruned list");
    Ok(())
}

/// Render the title-word frequency report.
#[instrument(level = "info", skip_all)]
fn word_freq(sources: &[String], output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let titles = load_source_titles(sources)?;
    let report = filters::word_frequency_report(&titles);
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("word_frequencies.txt");
    std::fs::write(&path, report)?;
    info!(path = %path.display(), "Wrote word-frequency report");
    Ok(())
}

/// Extract and persist a single page's valid outbound article links.
#[instrument(level = "info", skip_all, fields(%title))]
async fn page_links(
    title: &str,
    config: &CuratorConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let fetcher = PageFetcher::new(&config.wiki_base_url);
    let links = wiki::links::extract_page_links(&fetcher, title, config).await?;
    store::write_titles(output_dir.join("page_links.json"), &links)?;
    info!(count = links.len(), "Wrote outbound links");
    Ok(())
}

/// Print random playtest rounds to stdout.
#[instrument(level = "info", skip_all, fields(rounds, per_round))]
fn sample(sources: &[String], rounds: usize, per_round: usize) -> Result<(), Box<dyn Error>> {
    let titles = load_source_titles(sources)?;
    let sampled = sampler::random_rounds(&titles, rounds, per_round);
    print!("{}", sampler::render_rounds(&sampled));
    Ok(())
}
