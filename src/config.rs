//! Runtime configuration for the curation pipeline.
//!
//! Historically every threshold and path in this tool was a hardcoded
//! constant. They now live in [`CuratorConfig`], which can be loaded from a
//! YAML file or fall back to the defaults that match the original curated
//! dataset runs.

use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{info, instrument};

/// Configuration for the article curation pipeline.
///
/// Every field has a default carrying the historical constant, so a config
/// file only needs to override what it changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// Base URL of the wiki, without a trailing slash.
    pub wiki_base_url: String,
    /// Maximum allowed title length, in characters.
    pub max_title_len: usize,
    /// Substrings that disqualify a title outright.
    pub blacklist: Vec<String>,
    /// Number of newly validated titles between checkpoint writes.
    pub checkpoint_interval: usize,
    /// How long to let client-side navigation settle before reading the
    /// final URL, in milliseconds.
    pub settle_delay_ms: u64,
    /// Upper bounds (exclusive) of the inbound-link-count buckets. Counts at
    /// or above the last bound land in the open-ended top bucket.
    pub bucket_bounds: [u32; 5],
    /// Titles with a recorded inbound-link count below this are pruned.
    pub retain_threshold: u32,
    /// Title-list files or directories merged when a command names no
    /// sources on the command line.
    pub source_paths: Vec<String>,
    /// Output directory used when none is given on the command line.
    pub output_dir: String,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            wiki_base_url: "https://en.m.wikipedia.org".to_string(),
            max_title_len: 25,
            blacklist: [":", "#", ",_", "List", "disambiguation", "(", "Outline"]
                .into_iter()
                .map(String::from)
                .collect(),
            checkpoint_interval: 10,
            settle_delay_ms: 400,
            bucket_bounds: [50, 100, 150, 250, 350],
            retain_threshold: 100,
            source_paths: Vec::new(),
            output_dir: "./curated".to_string(),
        }
    }
}

/// Load configuration from a YAML file, or return defaults when no path is
/// given.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub fn load_config(path: Option<&str>) -> Result<CuratorConfig, Box<dyn Error>> {
    let config = match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p)?;
            serde_yaml::from_str(&raw)?
        }
        None => CuratorConfig::default(),
    };
    info!(
        wiki_base_url = %config.wiki_base_url,
        max_title_len = config.max_title_len,
        checkpoint_interval = config.checkpoint_interval,
        "Loaded configuration"
    );
    Ok(config)
}
