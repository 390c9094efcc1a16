//! Trait definitions for anime/manga catalog services.
//!
//! The catalog is read-only: it is searched and browsed, and its records are
//! handed to the library as import candidates. Nothing here ever writes back.

use std::future::Future;

/// A read-only anime/manga metadata service.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search anime by title. At most [`SEARCH_LIMIT`] results, best score first.
    fn search_anime(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<CatalogSummary>, Self::Error>> + Send;

    /// Fetch the full record for one anime, including genres and relations.
    fn anime_detail(
        &self,
        external_id: u64,
    ) -> impl Future<Output = Result<CatalogDetail, Self::Error>> + Send;

    /// Best single manga match for a title, if any.
    fn search_manga(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<MangaMatch>, Self::Error>> + Send;

    /// Anime airing in the current broadcast season.
    fn season_now(&self) -> impl Future<Output = Result<Vec<SeasonEntry>, Self::Error>> + Send;
}

/// Maximum number of search results returned by [`CatalogService::search_anime`].
pub const SEARCH_LIMIT: usize = 5;

/// A search hit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogSummary {
    pub external_id: u64,
    pub title: String,
    pub media_type: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f32>,
}

/// A full anime record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogDetail {
    pub external_id: u64,
    pub title: String,
    pub media_type: Option<String>,
    pub episodes: Option<u32>,
    pub airing_status: Option<String>,
    pub score: Option<f32>,
    pub image_url: Option<String>,
    pub genres: Vec<String>,
    pub relations: Vec<RelatedEntry>,
}

/// One entry related to an anime (sequel, prequel, adaptation, ...).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RelatedEntry {
    pub relation: String,
    pub name: String,
    pub media_type: Option<String>,
}

/// The best manga match for an anime title.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MangaMatch {
    pub title: String,
    pub status: Option<String>,
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
}

/// An anime airing this season.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeasonEntry {
    pub title: String,
    pub media_type: Option<String>,
    pub episodes: Option<u32>,
}

/// Order search hits by descending score, unscored last, and cap the list.
///
/// The sort is stable so equal scores keep the order the service returned.
pub fn rank_by_score(mut results: Vec<CatalogSummary>) -> Vec<CatalogSummary> {
    results.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    results.truncate(SEARCH_LIMIT);
    results
}
