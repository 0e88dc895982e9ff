//! Command-line interface definitions for the curation pipeline.
//!
//! Each pipeline stage is its own subcommand so a run can apply exactly the
//! stages it needs. Sources are JSON title-list files, or directories of
//! them, merged by set union before the stage runs.

use clap::{Parser, Subcommand};

/// Command-line arguments for the wiki curator.
///
/// # Examples
///
/// ```sh
/// # Offline cleanup: validate, dedup, write the master list
/// wiki_curator -o ./curated clean sources/a.json sources/b.json
///
/// # Full network validation with checkpointed partial results
/// wiki_curator -o ./curated check ./curated/master.json
///
/// # Classify by inbound-link popularity
/// wiki_curator -o ./curated link-counts ./curated/valid.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file overriding the defaults
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for curated lists, buckets, and reports
    /// (overrides `output_dir` from the config file)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge sources, filter invalid titles, and collapse case-insensitive
    /// duplicates into a master list
    Clean {
        /// Title-list files or directories to merge; falls back to the
        /// config file's `source_paths` when empty
        sources: Vec<String>,
    },

    /// Fetch every title and partition into valid / redirected / error
    Check {
        sources: Vec<String>,
    },

    /// Bucket every title by its inbound-link count
    LinkCounts {
        sources: Vec<String>,
    },

    /// Collect titles whose page is a disambiguation listing
    Disambiguation {
        sources: Vec<String>,
    },

    /// Collect titles whose page looks like a biography (infobox "Born" row)
    People {
        sources: Vec<String>,
    },

    /// Drop titles whose recorded inbound-link count is below the retain
    /// threshold
    Prune {
        /// Title -> count mapping produced by link-counts
        counts: String,
        sources: Vec<String>,
    },

    /// Write a word-frequency report over all title words
    WordFreq {
        sources: Vec<String>,
    },

    /// Extract the valid outbound article links from a single page
    PageLinks {
        /// Slash-prefixed article title, e.g. /Apple_Inc.
        title: String,
    },

    /// Print random rounds of distinct titles for playtesting
    Sample {
        sources: Vec<String>,

        /// Number of rounds to draw
        #[arg(long, default_value_t = 300)]
        rounds: usize,

        /// Distinct titles per round
        #[arg(long, default_value_t = 8)]
        per_round: usize,
    },
}
