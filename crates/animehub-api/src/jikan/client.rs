use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::JikanError;
use super::types::{
    JikanAnimeFull, JikanAnimeSummary, JikanListResponse, JikanManga, JikanSeasonAnime,
    JikanSingleResponse,
};
use crate::traits::{
    rank_by_score, CatalogDetail, CatalogService, CatalogSummary, MangaMatch, SeasonEntry,
    SEARCH_LIMIT,
};

pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

const USER_AGENT: &str = concat!("animehub/", env!("CARGO_PKG_VERSION"));

/// Jikan v4 client (unofficial MyAnimeList REST API, no auth).
pub struct JikanClient {
    base_url: String,
    http: Client,
}

impl JikanClient {
    /// Build a client against a custom endpoint, e.g. a self-hosted mirror.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, JikanError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, JikanError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Jikan API error");
            Err(JikanError::Api {
                status,
                message: body,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, JikanError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "Jikan request");
        let resp = self.http.get(&url).query(query).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| JikanError::Parse(e.to_string()))
    }
}

impl CatalogService for JikanClient {
    type Error = JikanError;

    async fn search_anime(&self, query: &str) -> Result<Vec<CatalogSummary>, JikanError> {
        let limit = SEARCH_LIMIT.to_string();
        let page: JikanListResponse<JikanAnimeSummary> = self
            .get_json(
                "/anime",
                &[
                    ("q", query),
                    ("limit", limit.as_str()),
                    ("order_by", "score"),
                    ("sort", "desc"),
                ],
            )
            .await?;

        Ok(rank_by_score(
            page.data
                .into_iter()
                .map(JikanAnimeSummary::into_summary)
                .collect(),
        ))
    }

    async fn anime_detail(&self, external_id: u64) -> Result<CatalogDetail, JikanError> {
        let resp: JikanSingleResponse<JikanAnimeFull> = self
            .get_json(&format!("/anime/{external_id}/full"), &[])
            .await?;
        Ok(resp.data.into_detail())
    }

    async fn search_manga(&self, title: &str) -> Result<Option<MangaMatch>, JikanError> {
        let page: JikanListResponse<JikanManga> = self
            .get_json(
                "/manga",
                &[
                    ("q", title),
                    ("limit", "1"),
                    ("order_by", "score"),
                    ("sort", "desc"),
                ],
            )
            .await?;
        Ok(page
            .data
            .into_iter()
            .next()
            .map(JikanManga::into_manga_match))
    }

    async fn season_now(&self) -> Result<Vec<SeasonEntry>, JikanError> {
        let page: JikanListResponse<JikanSeasonAnime> =
            self.get_json("/seasons/now", &[]).await?;
        Ok(page
            .data
            .into_iter()
            .map(JikanSeasonAnime::into_season_entry)
            .collect())
    }
}
