//! Flat-file persistence for title lists and count mappings.
//!
//! The curated data survives between runs as JSON: either a list of title
//! strings or a title → inbound-link-count mapping. Title lists are always
//! written sorted case-insensitively so diffs between runs stay readable.
//!
//! Uses synchronous `std::fs` throughout (simpler error surface, and the
//! checkpoint callback in the batch runner must be callable from a plain
//! closure).

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Read a JSON list of titles.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_titles(path: impl AsRef<Path>) -> Result<Vec<String>, Box<dyn Error>> {
    let raw = fs::read_to_string(path.as_ref())?;
    let titles: Vec<String> = serde_json::from_str(&raw)?;
    info!(count = titles.len(), "Read title list");
    Ok(titles)
}

/// Write a title list as JSON, sorted case-insensitively.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = titles.len()))]
pub fn write_titles(path: impl AsRef<Path>, titles: &[String]) -> Result<(), Box<dyn Error>> {
    let mut sorted = titles.to_vec();
    sorted.sort_by_key(|t| t.to_lowercase());

    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path.as_ref(), serde_json::to_string_pretty(&sorted)?)?;
    info!("Wrote title list");
    Ok(())
}

/// Read a JSON title → count mapping.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_counts(path: impl AsRef<Path>) -> Result<BTreeMap<String, u32>, Box<dyn Error>> {
    let raw = fs::read_to_string(path.as_ref())?;
    let counts: BTreeMap<String, u32> = serde_json::from_str(&raw)?;
    info!(count = counts.len(), "Read count mapping");
    Ok(counts)
}

/// Write a title → count mapping as JSON. `BTreeMap` keeps the keys in a
/// stable order on disk.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = counts.len()))]
pub fn write_counts(
    path: impl AsRef<Path>,
    counts: &BTreeMap<String, u32>,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path.as_ref(), serde_json::to_string_pretty(counts)?)?;
    info!("Wrote count mapping");
    Ok(())
}

/// Merge several persisted title lists into one exact-match set.
///
/// Duplicates across files collapse structurally; titles differing only by
/// case both survive and are handled by the explicit dedup stage.
#[instrument(level = "info", skip_all, fields(sources = paths.len()))]
pub fn load_merged(paths: &[String]) -> Result<BTreeSet<String>, Box<dyn Error>> {
    let mut merged = BTreeSet::new();
    for path in paths {
        let titles = read_titles(path)?;
        info!(%path, count = titles.len(), "Merging source");
        merged.extend(titles);
    }
    info!(total = merged.len(), "Merged title sources");
    Ok(merged)
}

/// Merge every `.json` title list found directly inside a directory.
/// Other files (editor droppings, reports) are skipped with a warning.
#[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
pub fn load_merged_dir(dir: impl AsRef<Path>) -> Result<BTreeSet<String>, Box<dyn Error>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            sources.push(path.to_string_lossy().into_owned());
        } else {
            warn!(path = %path.display(), "Skipping non-JSON entry");
        }
    }
    sources.sort();
    load_merged(&sources)
}
