use serde::{Deserialize, Serialize};
use uuid::Uuid;

use animehub_api::traits::CatalogDetail;

use crate::error::AnimeHubError;

pub const DEFAULT_MINUTES_PER_EPISODE: f64 = 24.0;

/// User's watch status for a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchStatus {
    Watching,
    Rewatching,
    Completed,
    OnHold,
    Dropped,
    Plan,
}

impl WatchStatus {
    /// Persisted string representation (lowercase, kebab-case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watching => "watching",
            Self::Rewatching => "rewatching",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
            Self::Dropped => "dropped",
            Self::Plan => "plan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "watching" => Some(Self::Watching),
            "rewatching" => Some(Self::Rewatching),
            "completed" => Some(Self::Completed),
            "on-hold" | "on_hold" | "onhold" => Some(Self::OnHold),
            "dropped" => Some(Self::Dropped),
            "plan" | "plan-to-watch" | "plan_to_watch" => Some(Self::Plan),
            _ => None,
        }
    }

    pub const ALL: &[WatchStatus] = &[
        Self::Watching,
        Self::Rewatching,
        Self::Completed,
        Self::OnHold,
        Self::Dropped,
        Self::Plan,
    ];
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WatchStatus {
    type Err = AnimeHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AnimeHubError::Validation(format!("unknown status: {s}")))
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    #[default]
    Manual,
    /// Imported from the catalog. Older saves spell this `"jikan"`.
    #[serde(alias = "jikan")]
    Catalog,
}

/// One tracked anime/manga title.
///
/// Only `title` and `status` are required when reading saved data. Every
/// other field falls back to its default when it is missing or malformed, so
/// a fractional or negative count never costs the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeEntry {
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub local_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::source")]
    pub source: EntrySource,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub airing_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_episodes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub episodes_watched: u32,
    pub status: WatchStatus,
    #[serde(default, deserialize_with = "lenient::opt_f32")]
    pub score: Option<f32>,
    #[serde(default = "default_minutes", deserialize_with = "lenient::minutes")]
    pub minutes_per_ep: f64,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image_url: String,
}

/// Field decoders that map bad values to the field default instead of failing.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{EntrySource, DEFAULT_MINUTES_PER_EPISODE};

    /// A non-negative count, truncating fractions. Numeric strings are accepted.
    fn count(value: &Value) -> Option<u64> {
        let n = match value {
            Value::Number(n) => {
                if let Some(n) = n.as_u64() {
                    return Some(n);
                }
                n.as_f64()?
            }
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (n.is_finite() && n >= 0.0).then(|| n.trunc() as u64)
    }

    fn number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(count(&Value::deserialize(d)?))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(count(&Value::deserialize(d)?).and_then(|n| u32::try_from(n).ok()))
    }

    pub fn u32_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(opt_u32(d)?.unwrap_or(0))
    }

    pub fn opt_f32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f32>, D::Error> {
        Ok(number(&Value::deserialize(d)?).map(|n| n as f32))
    }

    pub fn minutes<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(number(&Value::deserialize(d)?).unwrap_or(DEFAULT_MINUTES_PER_EPISODE))
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_string(d)?.unwrap_or_default())
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn source<'de, D: Deserializer<'de>>(d: D) -> Result<EntrySource, D::Error> {
        Ok(EntrySource::deserialize(Value::deserialize(d)?).unwrap_or_default())
    }
}

fn default_minutes() -> f64 {
    DEFAULT_MINUTES_PER_EPISODE
}

/// Generate a fresh local identifier. Random, so ids from earlier sessions never collide.
pub fn new_local_id() -> String {
    format!("local-{}", Uuid::new_v4().simple())
}

/// Split a comma-separated tag string, trimming and dropping empty pieces.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

impl AnimeEntry {
    /// Build a catalog-sourced entry from a full detail record.
    pub fn from_catalog(detail: &CatalogDetail) -> Self {
        Self {
            local_id: None,
            source: EntrySource::Catalog,
            id: Some(detail.external_id),
            title: detail.title.clone(),
            media_type: detail.media_type.clone(),
            airing_status: detail.airing_status.clone(),
            total_episodes: detail.episodes.filter(|&n| n > 0),
            episodes_watched: 0,
            status: WatchStatus::Watching,
            score: detail.score,
            minutes_per_ep: DEFAULT_MINUTES_PER_EPISODE,
            genres: detail.genres.clone(),
            tags: Vec::new(),
            image_url: detail.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    /// Dedup key: `(source, id)` when the external id is set.
    pub fn identity(&self) -> Option<(EntrySource, u64)> {
        self.id.filter(|&id| id != 0).map(|id| (self.source, id))
    }

    /// Minutes per episode, falling back to 24 for unset or nonsensical values.
    pub fn minutes_per_episode(&self) -> f64 {
        if self.minutes_per_ep.is_finite() && self.minutes_per_ep > 0.0 {
            self.minutes_per_ep
        } else {
            DEFAULT_MINUTES_PER_EPISODE
        }
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// Raw input of the manual-add form.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub title: String,
    pub total_episodes: Option<u32>,
    pub minutes_per_ep: Option<f64>,
    pub episodes_watched: u32,
    pub status: WatchStatus,
    pub tags: String,
}

impl ManualEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            total_episodes: None,
            minutes_per_ep: None,
            episodes_watched: 0,
            status: WatchStatus::Watching,
            tags: String::new(),
        }
    }

    /// Validate the form and build a manual entry. Rejects a blank title.
    pub fn into_entry(self) -> Result<AnimeEntry, AnimeHubError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AnimeHubError::Validation("Title is required.".into()));
        }

        Ok(AnimeEntry {
            local_id: None,
            source: EntrySource::Manual,
            id: None,
            title: title.to_string(),
            media_type: Some("Manual".into()),
            airing_status: None,
            total_episodes: self.total_episodes.filter(|&n| n > 0),
            episodes_watched: self.episodes_watched,
            status: self.status,
            score: None,
            minutes_per_ep: self
                .minutes_per_ep
                .filter(|m| m.is_finite() && *m > 0.0)
                .unwrap_or(DEFAULT_MINUTES_PER_EPISODE),
            genres: Vec::new(),
            tags: parse_tags(&self.tags),
            image_url: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_strings() {
        for status in WatchStatus::ALL {
            assert_eq!(WatchStatus::parse(status.as_str()), Some(*status));
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(WatchStatus::parse("On_Hold"), Some(WatchStatus::OnHold));
        assert!(WatchStatus::parse("binging").is_none());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" comfy, ,isekai ,  ,"),
            vec!["comfy".to_string(), "isekai".to_string()]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_manual_entry_validation() {
        let err = ManualEntry::new("   ").into_entry().unwrap_err();
        assert!(matches!(err, AnimeHubError::Validation(_)));

        let mut form = ManualEntry::new("  Mushishi ");
        form.total_episodes = Some(0);
        form.minutes_per_ep = Some(0.0);
        form.tags = "slow, atmospheric".into();
        let entry = form.into_entry().unwrap();
        assert_eq!(entry.title, "Mushishi");
        assert_eq!(entry.source, EntrySource::Manual);
        assert_eq!(entry.media_type.as_deref(), Some("Manual"));
        assert!(entry.total_episodes.is_none());
        assert_eq!(entry.minutes_per_ep, DEFAULT_MINUTES_PER_EPISODE);
        assert_eq!(entry.tags, vec!["slow", "atmospheric"]);
        assert!(entry.identity().is_none());
    }

    #[test]
    fn test_from_catalog() {
        let detail = CatalogDetail {
            external_id: 52991,
            title: "Sousou no Frieren".into(),
            media_type: Some("TV".into()),
            episodes: Some(28),
            airing_status: Some("Finished Airing".into()),
            score: Some(9.3),
            image_url: None,
            genres: vec!["Adventure".into(), "Drama".into()],
            relations: vec![],
        };
        let entry = AnimeEntry::from_catalog(&detail);
        assert_eq!(entry.identity(), Some((EntrySource::Catalog, 52991)));
        assert_eq!(entry.status, WatchStatus::Watching);
        assert_eq!(entry.episodes_watched, 0);
        assert_eq!(entry.total_episodes, Some(28));
        assert!(entry.image_url.is_empty());
        assert!(entry.has_genre("Drama"));
    }

    #[test]
    fn test_legacy_entry_decodes() {
        let json = r#"{
            "source": "jikan",
            "id": 20,
            "title": "Naruto",
            "type": "TV",
            "totalEpisodes": 220,
            "episodesWatched": 12,
            "status": "on-hold",
            "score": 8.0,
            "airingStatus": null,
            "imageUrl": "",
            "minutesPerEp": 23,
            "genres": ["Action"],
            "tags": []
        }"#;
        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source, EntrySource::Catalog);
        assert!(entry.local_id.is_none());
        assert_eq!(entry.status, WatchStatus::OnHold);
        assert_eq!(entry.minutes_per_episode(), 23.0);
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let json = r#"{
            "source": "manual",
            "title": "Half",
            "status": "watching",
            "totalEpisodes": 12.5,
            "episodesWatched": -3,
            "score": "n/a",
            "minutesPerEp": null,
            "id": "abc",
            "genres": ["Drama", 7],
            "imageUrl": 0
        }"#;
        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.total_episodes, Some(12));
        assert_eq!(entry.episodes_watched, 0);
        assert_eq!(entry.score, None);
        assert_eq!(entry.minutes_per_ep, DEFAULT_MINUTES_PER_EPISODE);
        assert_eq!(entry.id, None);
        assert_eq!(entry.genres, vec!["Drama"]);
        assert!(entry.image_url.is_empty());
    }

    #[test]
    fn test_unknown_source_defaults_to_manual() {
        let entry: AnimeEntry =
            serde_json::from_str(r#"{"source": "kitsu", "title": "X", "status": "plan"}"#).unwrap();
        assert_eq!(entry.source, EntrySource::Manual);
        let entry: AnimeEntry =
            serde_json::from_str(r#"{"title": "Y", "status": "plan"}"#).unwrap();
        assert_eq!(entry.source, EntrySource::Manual);
    }

    #[test]
    fn test_title_and_status_are_required() {
        assert!(serde_json::from_str::<AnimeEntry>(r#"{"status": "plan"}"#).is_err());
        assert!(serde_json::from_str::<AnimeEntry>(r#"{"title": "Z"}"#).is_err());
        assert!(
            serde_json::from_str::<AnimeEntry>(r#"{"title": "Z", "status": "binging"}"#).is_err()
        );
    }

    #[test]
    fn test_new_local_ids_are_distinct() {
        let a = new_local_id();
        let b = new_local_id();
        assert_ne!(a, b);
        assert!(a.starts_with("local-"));
    }
}
