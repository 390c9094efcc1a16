//! Aggregate counters derived from a library snapshot.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{AnimeEntry, WatchStatus};

/// Derived library statistics. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    pub total_count: usize,
    pub completed_count: usize,
    pub total_episodes_watched: u64,
    /// Watch time in hours, rounded to one decimal.
    pub total_hours: f64,
    /// Most frequent genre, `None` when no entry has any genre.
    pub top_genre: Option<String>,
}

impl LibraryStats {
    pub fn compute(entries: &[AnimeEntry]) -> Self {
        let minutes: f64 = entries
            .iter()
            .map(|a| f64::from(a.episodes_watched) * a.minutes_per_episode())
            .sum();

        Self {
            total_count: entries.len(),
            completed_count: entries
                .iter()
                .filter(|a| a.status == WatchStatus::Completed)
                .count(),
            total_episodes_watched: entries.iter().map(|a| u64::from(a.episodes_watched)).sum(),
            total_hours: round_tenths(minutes / 60.0),
            top_genre: top_genre(entries),
        }
    }
}

/// Round half away from zero to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The genre with the highest count across all entries.
///
/// Ties go to the genre that first appeared, scanning entries in stored order
/// and each entry's genres in order.
pub fn top_genre(entries: &[AnimeEntry]) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for genre in entries.iter().flat_map(|a| a.genres.iter()) {
        let count = counts.entry(genre.as_str()).or_insert_with(|| {
            order.push(genre.as_str());
            0
        });
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for genre in order {
        let count = counts[genre];
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((genre, count));
        }
    }
    best.map(|(g, _)| g.to_string())
}
