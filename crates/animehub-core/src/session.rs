//! One interactive session over the library.
//!
//! Holds the edit gate, the active list filter and the catalog panels, and
//! exposes every user intent as a method. Library mutations are refused while
//! edit mode is locked.

use animehub_api::traits::{CatalogDetail, CatalogService, CatalogSummary, SeasonEntry};

use crate::catalog::{self, DetailView};
use crate::error::AnimeHubError;
use crate::library::{LibraryStore, StatusFilter, UpsertOutcome};
use crate::lookup::{LookupToken, Panel};
use crate::models::entry::ManualEntry;
use crate::models::{AnimeEntry, Profile, WatchStatus};
use crate::persistence::KeyValueStore;
use crate::recommend::Recommendations;
use crate::stats::LibraryStats;

pub struct Session<S> {
    library: LibraryStore<S>,
    pin: String,
    editing: bool,
    filter: StatusFilter,
    season_limit: usize,
    search: Panel<Vec<CatalogSummary>>,
    details: Panel<DetailView>,
    season: Panel<Vec<SeasonEntry>>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(library: LibraryStore<S>, pin: impl Into<String>) -> Self {
        Self {
            library,
            pin: pin.into(),
            editing: false,
            filter: StatusFilter::All,
            season_limit: 30,
            search: Panel::new("search"),
            details: Panel::new("details"),
            season: Panel::new("season"),
        }
    }

    pub fn with_season_limit(mut self, limit: usize) -> Self {
        self.season_limit = limit;
        self
    }

    pub fn library(&self) -> &LibraryStore<S> {
        &self.library
    }

    // ── Edit gate ───────────────────────────────────────────────

    pub fn unlock(&mut self, pin: &str) -> Result<(), AnimeHubError> {
        if pin.trim() == self.pin {
            self.editing = true;
            tracing::info!("Edit mode unlocked");
            Ok(())
        } else {
            tracing::info!("Rejected edit-mode PIN");
            Err(AnimeHubError::WrongPin)
        }
    }

    pub fn lock(&mut self) {
        self.editing = false;
        tracing::info!("Edit mode locked");
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn require_edit(&self) -> Result<(), AnimeHubError> {
        if self.editing {
            Ok(())
        } else {
            Err(AnimeHubError::EditLocked)
        }
    }

    // ── Library intents ─────────────────────────────────────────

    pub fn save_profile(&mut self, name: &str, avatar_url: &str) -> Result<(), AnimeHubError> {
        self.require_edit()?;
        self.library.set_profile(Profile::from_input(name, avatar_url))
    }

    pub fn add_manual_entry(&mut self, form: ManualEntry) -> Result<UpsertOutcome, AnimeHubError> {
        self.require_edit()?;
        let entry = form.into_entry()?;
        self.library.upsert(entry)
    }

    pub fn import_catalog_entry(
        &mut self,
        detail: &CatalogDetail,
    ) -> Result<UpsertOutcome, AnimeHubError> {
        self.require_edit()?;
        self.library.upsert(AnimeEntry::from_catalog(detail))
    }

    /// Import whatever the details panel currently shows.
    pub fn import_shown_details(&mut self) -> Result<UpsertOutcome, AnimeHubError> {
        let detail = self
            .details
            .loaded()
            .map(|v| v.detail.clone())
            .ok_or_else(|| AnimeHubError::Validation("No details loaded to import.".into()))?;
        self.import_catalog_entry(&detail)
    }

    pub fn bump_episode(&mut self, local_id: &str) -> Result<u32, AnimeHubError> {
        self.require_edit()?;
        self.library.bump_episode(local_id)
    }

    pub fn set_status(&mut self, local_id: &str, status: WatchStatus) -> Result<(), AnimeHubError> {
        self.require_edit()?;
        self.library.set_status(local_id, status)
    }

    pub fn remove_entry(&mut self, local_id: &str) -> Result<bool, AnimeHubError> {
        self.require_edit()?;
        self.library.remove(local_id)
    }

    /// Bingo is a toy and stays clickable in read-only mode.
    pub fn toggle_bingo(&mut self, index: usize) -> Result<bool, AnimeHubError> {
        self.library.toggle_bingo(index)
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn visible_entries(&self) -> Vec<&AnimeEntry> {
        self.library.filter(self.filter)
    }

    // ── Derived views ───────────────────────────────────────────

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::compute(self.library.entries())
    }

    pub fn recommendations(&self) -> Recommendations<'_> {
        let stats = self.stats();
        Recommendations::select(self.library.entries(), stats.top_genre.as_deref())
    }

    // ── Catalog panels ──────────────────────────────────────────

    pub fn search_panel(&self) -> &Panel<Vec<CatalogSummary>> {
        &self.search
    }

    pub fn details_panel(&self) -> &Panel<DetailView> {
        &self.details
    }

    pub fn season_panel(&self) -> &Panel<Vec<SeasonEntry>> {
        &self.season
    }

    pub fn begin_search(&mut self) -> LookupToken {
        // A new search invalidates whatever details were showing.
        self.details.clear();
        self.search.begin()
    }

    pub fn finish_search<E: std::fmt::Display>(
        &mut self,
        token: LookupToken,
        result: Result<Vec<CatalogSummary>, E>,
    ) -> bool {
        self.search.complete(token, result)
    }

    pub fn begin_details(&mut self) -> LookupToken {
        self.details.begin()
    }

    pub fn finish_details<E: std::fmt::Display>(
        &mut self,
        token: LookupToken,
        result: Result<DetailView, E>,
    ) -> bool {
        self.details.complete(token, result)
    }

    pub fn begin_season(&mut self) -> LookupToken {
        self.season.begin()
    }

    pub fn finish_season<E: std::fmt::Display>(
        &mut self,
        token: LookupToken,
        result: Result<Vec<SeasonEntry>, E>,
    ) -> bool {
        let limit = self.season_limit;
        self.season.complete(
            token,
            result.map(|mut items| {
                items.truncate(limit);
                items
            }),
        )
    }

    /// Search the catalog. A blank query clears the panel without a request.
    pub async fn search<C: CatalogService>(&mut self, client: &C, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.search.clear();
            return;
        }
        let token = self.begin_search();
        let result = client.search_anime(query).await;
        self.finish_search(token, result);
    }

    pub async fn load_details<C: CatalogService>(&mut self, client: &C, external_id: u64) {
        let token = self.begin_details();
        let result = catalog::load_details(client, external_id).await;
        self.finish_details(token, result);
    }

    pub async fn load_season<C: CatalogService>(&mut self, client: &C) {
        let token = self.begin_season();
        let result = client.season_now().await;
        self.finish_season(token, result);
    }
}
