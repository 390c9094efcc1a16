//! Pure projections from library state to display descriptions.
//!
//! Front-ends render these as they like; nothing here mutates state.

use animehub_api::traits::{CatalogSummary, MangaMatch, SeasonEntry};

use crate::bingo::{BingoState, BINGO_ITEMS};
use crate::catalog::DetailView;
use crate::models::{AnimeEntry, Profile, DEFAULT_PROFILE_NAME};
use crate::recommend::Recommendations;
use crate::stats::LibraryStats;

const DASH: &str = "–";

#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    Image(String),
    Initials(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub avatar: Avatar,
    pub mode_label: &'static str,
}

/// Up to two uppercase initials from a display name.
pub fn initials_from_name(name: &str) -> String {
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return "AF".into();
    };
    let mut initials = String::new();
    initials.extend(first.chars().next());
    if let Some(second) = words.next() {
        initials.extend(second.chars().next());
    }
    initials.to_uppercase()
}

pub fn profile_view(profile: &Profile, editing: bool) -> ProfileView {
    let name = if profile.name.is_empty() {
        DEFAULT_PROFILE_NAME.to_string()
    } else {
        profile.name.clone()
    };
    let avatar = if profile.avatar_url.is_empty() {
        Avatar::Initials(initials_from_name(&profile.name))
    } else {
        Avatar::Image(profile.avatar_url.clone())
    };
    ProfileView {
        name,
        avatar,
        mode_label: if editing { "Edit mode" } else { "Read-only" },
    }
}

/// One library card.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCard {
    pub local_id: String,
    pub title: String,
    pub status_pill: String,
    pub meta_line: String,
    pub episodes_line: String,
    /// Watched fraction in `[0, 1]`; zero when the total is unknown.
    pub progress: f64,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub actions_enabled: bool,
}

pub fn entry_card(entry: &AnimeEntry, editing: bool) -> EntryCard {
    let score = entry
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| DASH.into());
    let total = entry
        .total_episodes
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".into());

    EntryCard {
        local_id: entry.local_id().unwrap_or_default().to_string(),
        title: entry.title.clone(),
        status_pill: entry.status.as_str().to_uppercase(),
        meta_line: format!(
            "{} • {} • Score: {score}",
            entry.media_type.as_deref().unwrap_or(DASH),
            entry.airing_status.as_deref().unwrap_or("status?"),
        ),
        episodes_line: format!(
            "Ep {} / {total} ({} min/ep)",
            entry.episodes_watched,
            entry.minutes_per_episode()
        ),
        progress: progress_ratio(entry),
        tags: entry.tags.iter().filter(|t| !t.is_empty()).cloned().collect(),
        image_url: Some(entry.image_url.clone()).filter(|u| !u.is_empty()),
        actions_enabled: editing,
    }
}

pub fn progress_ratio(entry: &AnimeEntry) -> f64 {
    match entry.total_episodes.filter(|&t| t > 0) {
        Some(total) => (f64::from(entry.episodes_watched) / f64::from(total)).min(1.0),
        None => 0.0,
    }
}

/// Library listing; `cards` is empty exactly when the empty state shows.
pub fn library_view(entries: &[&AnimeEntry], editing: bool) -> Vec<EntryCard> {
    entries.iter().map(|e| entry_card(e, editing)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatTiles {
    pub total: String,
    pub completed: String,
    pub episodes: String,
    pub time: String,
    pub top_genre: String,
}

pub fn stat_tiles(stats: &LibraryStats) -> StatTiles {
    StatTiles {
        total: stats.total_count.to_string(),
        completed: stats.completed_count.to_string(),
        episodes: stats.total_episodes_watched.to_string(),
        time: format!("{} hrs", stats.total_hours),
        top_genre: stats.top_genre.clone().unwrap_or_else(|| DASH.into()),
    }
}

pub fn recommendation_lines(recs: &Recommendations<'_>) -> Vec<String> {
    if let Some(message) = recs.message() {
        return vec![message];
    }
    recs.picks()
        .iter()
        .map(|a| {
            format!(
                "{} ({}) – status: {}",
                a.title,
                a.media_type.as_deref().unwrap_or("?"),
                a.status
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BingoCell {
    pub index: usize,
    pub text: &'static str,
    pub done: bool,
}

pub fn bingo_grid(bingo: &BingoState) -> Vec<BingoCell> {
    BINGO_ITEMS
        .iter()
        .copied()
        .enumerate()
        .map(|(index, text)| BingoCell {
            index,
            text,
            done: bingo.is_done(index),
        })
        .collect()
}

pub fn search_line(hit: &CatalogSummary) -> String {
    format!(
        "{} • {} • {} eps • Score {}",
        hit.title,
        hit.media_type.as_deref().unwrap_or("?"),
        optional_count(hit.episodes),
        hit.score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".into())
    )
}

pub fn season_line(item: &SeasonEntry) -> String {
    format!(
        "{} • {} • {} eps",
        item.title,
        item.media_type.as_deref().unwrap_or("?"),
        optional_count(item.episodes)
    )
}

/// Header line of the details panel.
pub fn detail_summary(view: &DetailView) -> String {
    let d = &view.detail;
    format!(
        "{} • {} eps • {} • Score {}",
        d.media_type.as_deref().unwrap_or("?"),
        optional_count(d.episodes),
        d.airing_status.as_deref().unwrap_or("?"),
        d.score.map(|s| s.to_string()).unwrap_or_else(|| "?".into())
    )
}

pub fn manga_line(manga: Option<&MangaMatch>) -> String {
    match manga {
        Some(m) => format!(
            "{} • {} • {} chapters • {} volumes",
            m.title,
            m.status.as_deref().unwrap_or("status?"),
            optional_count(m.chapters),
            optional_count(m.volumes)
        ),
        None => "No manga match found or API failed. (Still, there might be a manga.)".into(),
    }
}

fn optional_count(n: Option<u32>) -> String {
    n.filter(|&n| n > 0)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".into())
}
