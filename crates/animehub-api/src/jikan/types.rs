use serde::Deserialize;

use crate::traits::{CatalogDetail, CatalogSummary, MangaMatch, RelatedEntry, SeasonEntry};

// ── Envelopes ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JikanListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct JikanSingleResponse<T> {
    pub data: T,
}

// ── Anime ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JikanAnimeSummary {
    pub mal_id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct JikanAnimeFull {
    pub mal_id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub score: Option<f32>,
    pub images: Option<JikanImages>,
    #[serde(default)]
    pub genres: Vec<JikanNamed>,
    #[serde(default)]
    pub relations: Vec<JikanRelation>,
}

#[derive(Debug, Deserialize)]
pub struct JikanImages {
    pub jpg: Option<JikanImage>,
}

#[derive(Debug, Deserialize)]
pub struct JikanImage {
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JikanNamed {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JikanRelation {
    pub relation: String,
    #[serde(default)]
    pub entry: Vec<JikanRelatedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct JikanRelatedEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JikanSeasonAnime {
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub episodes: Option<u32>,
}

// ── Manga ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JikanManga {
    pub title: String,
    pub status: Option<String>,
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
}

// ── Conversions to shared trait types ───────────────────────────

impl JikanAnimeSummary {
    pub fn into_summary(self) -> CatalogSummary {
        CatalogSummary {
            external_id: self.mal_id,
            title: self.title,
            media_type: self.media_type,
            episodes: self.episodes,
            score: self.score,
        }
    }
}

impl JikanAnimeFull {
    pub fn into_detail(self) -> CatalogDetail {
        let relations = self
            .relations
            .into_iter()
            .flat_map(|rel| {
                let relation = rel.relation;
                rel.entry.into_iter().map(move |e| RelatedEntry {
                    relation: relation.clone(),
                    name: e.name,
                    media_type: e.media_type,
                })
            })
            .collect();

        CatalogDetail {
            external_id: self.mal_id,
            title: self.title,
            media_type: self.media_type,
            episodes: self.episodes,
            airing_status: self.status,
            score: self.score,
            image_url: self.images.and_then(|i| i.jpg).and_then(|j| j.image_url),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            relations,
        }
    }
}

impl JikanSeasonAnime {
    pub fn into_season_entry(self) -> SeasonEntry {
        SeasonEntry {
            title: self.title,
            media_type: self.media_type,
            episodes: self.episodes,
        }
    }
}

impl JikanManga {
    pub fn into_manga_match(self) -> MangaMatch {
        MangaMatch {
            title: self.title,
            status: self.status,
            chapters: self.chapters,
            volumes: self.volumes,
        }
    }
}
