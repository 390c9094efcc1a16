//! Catalog lookups composed into what the library needs.

use animehub_api::traits::{CatalogDetail, CatalogService, MangaMatch};

/// Everything the details panel shows for one anime.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub detail: CatalogDetail,
    /// Best-effort manga match by title. `None` when nothing matched or the lookup failed.
    pub manga: Option<MangaMatch>,
}

impl DetailView {
    /// Related entries as `relation: name (type)` lines.
    pub fn watch_order(&self) -> Vec<String> {
        self.detail
            .relations
            .iter()
            .map(|r| {
                format!(
                    "{}: {} ({})",
                    r.relation,
                    r.name,
                    r.media_type.as_deref().unwrap_or("?")
                )
            })
            .collect()
    }
}

/// Fetch the full record, then look for a manga under the same title.
///
/// Only the anime lookup can fail the whole call; a manga failure is logged
/// and shown as "no match".
pub async fn load_details<C: CatalogService>(
    client: &C,
    external_id: u64,
) -> Result<DetailView, C::Error> {
    let detail = client.anime_detail(external_id).await?;

    let manga = match client.search_manga(&detail.title).await {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, title = %detail.title, "Manga search failed");
            None
        }
    };

    Ok(DetailView { detail, manga })
}

#[cfg(test)]
pub(crate) mod fake {
    //! An in-memory catalog for tests.

    use animehub_api::traits::{
        CatalogDetail, CatalogService, CatalogSummary, MangaMatch, RelatedEntry, SeasonEntry,
    };

    #[derive(Debug, thiserror::Error)]
    #[error("fake catalog: {0}")]
    pub struct FakeError(pub &'static str);

    #[derive(Default)]
    pub struct FakeCatalog {
        pub fail_anime: bool,
        pub fail_manga: bool,
    }

    pub fn frieren() -> CatalogDetail {
        CatalogDetail {
            external_id: 52991,
            title: "Sousou no Frieren".into(),
            media_type: Some("TV".into()),
            episodes: Some(28),
            airing_status: Some("Finished Airing".into()),
            score: Some(9.3),
            image_url: Some("https://cdn.example/frieren.jpg".into()),
            genres: vec!["Adventure".into(), "Drama".into(), "Fantasy".into()],
            relations: vec![RelatedEntry {
                relation: "Adaptation".into(),
                name: "Sousou no Frieren".into(),
                media_type: Some("manga".into()),
            }],
        }
    }

    impl CatalogService for FakeCatalog {
        type Error = FakeError;

        async fn search_anime(&self, query: &str) -> Result<Vec<CatalogSummary>, FakeError> {
            if self.fail_anime {
                return Err(FakeError("search down"));
            }
            Ok(vec![CatalogSummary {
                external_id: 52991,
                title: format!("{query} result"),
                media_type: Some("TV".into()),
                episodes: Some(28),
                score: Some(9.3),
            }])
        }

        async fn anime_detail(&self, _external_id: u64) -> Result<CatalogDetail, FakeError> {
            if self.fail_anime {
                return Err(FakeError("detail down"));
            }
            Ok(frieren())
        }

        async fn search_manga(&self, title: &str) -> Result<Option<MangaMatch>, FakeError> {
            if self.fail_manga {
                return Err(FakeError("manga down"));
            }
            Ok(Some(MangaMatch {
                title: title.to_string(),
                status: Some("Publishing".into()),
                chapters: None,
                volumes: Some(13),
            }))
        }

        async fn season_now(&self) -> Result<Vec<SeasonEntry>, FakeError> {
            if self.fail_anime {
                return Err(FakeError("season down"));
            }
            Ok(vec![SeasonEntry {
                title: "Dandadan".into(),
                media_type: Some("TV".into()),
                episodes: Some(12),
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeCatalog;
    use super::*;

    #[tokio::test]
    async fn test_details_with_manga() {
        let view = load_details(&FakeCatalog::default(), 52991).await.unwrap();
        assert_eq!(view.detail.external_id, 52991);
        assert_eq!(view.manga.unwrap().volumes, Some(13));
    }

    #[tokio::test]
    async fn test_manga_failure_is_not_fatal() {
        let catalog = FakeCatalog {
            fail_manga: true,
            ..Default::default()
        };
        let view = load_details(&catalog, 52991).await.unwrap();
        assert!(view.manga.is_none());
        assert_eq!(
            view.watch_order(),
            vec!["Adaptation: Sousou no Frieren (manga)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_anime_failure_fails_panel() {
        let catalog = FakeCatalog {
            fail_anime: true,
            ..Default::default()
        };
        assert!(load_details(&catalog, 1).await.is_err());
    }
}
