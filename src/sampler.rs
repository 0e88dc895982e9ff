//! Random round sampling for playtesting the question pool.
//!
//! Draws repeated rounds of unique titles and renders them the way players
//! would see them, with underscores replaced by spaces.

use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::fmt::Write;
use tracing::{instrument, warn};

/// Draw `rounds` rounds of `per_round` distinct titles each.
///
/// Titles may repeat across rounds but never within one. Returns no rounds
/// when the pool holds fewer distinct titles than a round needs; the draw
/// loop rejects repeats, so anything less would never fill a round.
#[instrument(level = "info", skip_all, fields(pool = titles.len(), rounds, per_round))]
pub fn random_rounds(titles: &[String], rounds: usize, per_round: usize) -> Vec<Vec<String>> {
    let distinct = titles.iter().collect::<HashSet<_>>().len();
    if distinct < per_round {
        warn!(distinct, per_round, "Pool too small to sample a round");
        return Vec::new();
    }

    let mut rng = rand::rng();
    let mut sampled = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let mut round: Vec<String> = Vec::with_capacity(per_round);
        while round.len() != per_round {
            let candidate = titles.choose(&mut rng).expect("pool is non-empty");
            if !round.contains(candidate) {
                round.push(candidate.clone());
            }
        }
        sampled.push(round);
    }
    sampled
}

/// Render sampled rounds as readable article names separated by dividers.
pub fn render_rounds(rounds: &[Vec<String>]) -> String {
    let mut out = String::new();
    for round in rounds {
        out.push_str("\n=========\n\n");
        for title in round {
            let readable = title.trim_start_matches('/').replace('_', " ");
            writeln!(out, "{readable}").expect("writing to a String cannot fail");
        }
    }
    out
}
