//! The owned library state and every operation that mutates it.
//!
//! All writes go through [`LibraryStore`] so the saved blob never drifts from
//! what is in memory: each mutation is followed by a full save.

use crate::error::AnimeHubError;
use crate::models::entry::new_local_id;
use crate::models::{AnimeEntry, AppState, Profile, WatchStatus};
use crate::persistence::{KeyValueStore, Persistence};

/// Which entries a library listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(WatchStatus),
}

impl StatusFilter {
    pub fn matches(&self, entry: &AnimeEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => entry.status == *status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = AnimeHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// What an upsert did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted { local_id: String },
    Updated { local_id: String },
}

impl UpsertOutcome {
    pub fn local_id(&self) -> &str {
        match self {
            Self::Inserted { local_id } | Self::Updated { local_id } => local_id,
        }
    }
}

/// Exclusive owner of [`AppState`].
pub struct LibraryStore<S> {
    state: AppState,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> LibraryStore<S> {
    /// Load saved state and make every entry addressable.
    pub fn open(persistence: Persistence<S>) -> Self {
        let state = persistence.load();
        let mut store = Self { state, persistence };
        if store.assign_missing_ids() > 0 {
            // Ids are only in memory until the next write; persist them now so
            // they stay stable across runs. A failure here is not fatal.
            if let Err(e) = store.persist() {
                tracing::warn!(error = %e, "Could not persist newly assigned ids");
            }
        }
        tracing::debug!(entries = store.state.anime.len(), "Library loaded");
        store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn entries(&self) -> &[AnimeEntry] {
        &self.state.anime
    }

    pub fn profile(&self) -> &Profile {
        &self.state.profile
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn get(&self, local_id: &str) -> Option<&AnimeEntry> {
        self.state
            .anime
            .iter()
            .find(|a| a.local_id() == Some(local_id))
    }

    /// Insert a new entry, or merge into the entry with the same `(source, id)`.
    ///
    /// Entries without an external id never match anything and always append.
    /// On merge the incoming record wins field by field; the existing local id
    /// is kept unless the incoming record carries its own.
    pub fn upsert(&mut self, mut entry: AnimeEntry) -> Result<UpsertOutcome, AnimeHubError> {
        let existing = entry.identity().and_then(|key| {
            self.state
                .anime
                .iter()
                .position(|a| a.identity() == Some(key))
        });

        let outcome = match existing {
            Some(idx) => {
                let current = &mut self.state.anime[idx];
                if entry.local_id.is_none() {
                    entry.local_id = current.local_id.take();
                }
                let local_id = entry.local_id.get_or_insert_with(new_local_id).clone();
                *current = entry;
                tracing::debug!(%local_id, "Updated library entry");
                UpsertOutcome::Updated { local_id }
            }
            None => {
                let local_id = entry.local_id.get_or_insert_with(new_local_id).clone();
                tracing::debug!(%local_id, title = %entry.title, "Added library entry");
                self.state.anime.push(entry);
                UpsertOutcome::Inserted { local_id }
            }
        };

        self.persist()?;
        Ok(outcome)
    }

    /// Delete the entry with `local_id`. Returns whether anything was removed.
    pub fn remove(&mut self, local_id: &str) -> Result<bool, AnimeHubError> {
        let before = self.state.anime.len();
        self.state.anime.retain(|a| a.local_id() != Some(local_id));
        let removed = self.state.anime.len() != before;
        if removed {
            tracing::debug!(%local_id, "Removed library entry");
        }
        self.persist()?;
        Ok(removed)
    }

    /// Give every entry without a local id a fresh one. Returns how many were assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for entry in self.state.anime.iter_mut().filter(|a| a.local_id.is_none()) {
            entry.local_id = Some(new_local_id());
            assigned += 1;
        }
        assigned
    }

    /// Entries matching `filter`, in stored order.
    pub fn filter(&self, filter: StatusFilter) -> Vec<&AnimeEntry> {
        self.state
            .anime
            .iter()
            .filter(|a| filter.matches(a))
            .collect()
    }

    /// Add one watched episode. Returns the new count.
    pub fn bump_episode(&mut self, local_id: &str) -> Result<u32, AnimeHubError> {
        let entry = self.entry_mut(local_id)?;
        entry.episodes_watched = entry.episodes_watched.saturating_add(1);
        let watched = entry.episodes_watched;
        self.persist()?;
        Ok(watched)
    }

    pub fn set_status(&mut self, local_id: &str, status: WatchStatus) -> Result<(), AnimeHubError> {
        self.entry_mut(local_id)?.status = status;
        self.persist()
    }

    pub fn set_profile(&mut self, profile: Profile) -> Result<(), AnimeHubError> {
        self.state.profile = profile;
        self.persist()
    }

    /// Flip a bingo cell and return its new value.
    pub fn toggle_bingo(&mut self, index: usize) -> Result<bool, AnimeHubError> {
        let done = self.state.bingo.toggle(index)?;
        self.persist()?;
        Ok(done)
    }

    fn entry_mut(&mut self, local_id: &str) -> Result<&mut AnimeEntry, AnimeHubError> {
        self.state
            .anime
            .iter_mut()
            .find(|a| a.local_id() == Some(local_id))
            .ok_or_else(|| AnimeHubError::NotFound(local_id.to_string()))
    }

    fn persist(&mut self) -> Result<(), AnimeHubError> {
        self.persistence.save(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ManualEntry;
    use crate::models::EntrySource;
    use crate::persistence::{MemoryStore, DEFAULT_STORAGE_KEY};

    fn store() -> LibraryStore<MemoryStore> {
        LibraryStore::open(Persistence::new(MemoryStore::default(), DEFAULT_STORAGE_KEY))
    }

    fn catalog_entry(id: u64, title: &str) -> AnimeEntry {
        let mut entry = ManualEntry::new(title).into_entry().unwrap();
        entry.source = EntrySource::Catalog;
        entry.id = Some(id);
        entry
    }

    fn manual(title: &str, status: WatchStatus) -> AnimeEntry {
        let mut form = ManualEntry::new(title);
        form.status = status;
        form.into_entry().unwrap()
    }

    #[test]
    fn test_upsert_same_identity_updates() {
        let mut lib = store();
        let first = lib.upsert(catalog_entry(52991, "Frieren")).unwrap();
        assert!(matches!(first, UpsertOutcome::Inserted { .. }));

        let mut again = catalog_entry(52991, "Sousou no Frieren");
        again.episodes_watched = 4;
        let second = lib.upsert(again).unwrap();
        assert!(matches!(second, UpsertOutcome::Updated { .. }));
        assert_eq!(first.local_id(), second.local_id());

        assert_eq!(lib.entries().len(), 1);
        assert_eq!(lib.entries()[0].title, "Sousou no Frieren");
        assert_eq!(lib.entries()[0].episodes_watched, 4);
    }

    #[test]
    fn test_same_id_different_source_does_not_match() {
        let mut lib = store();
        lib.upsert(catalog_entry(7, "A")).unwrap();
        let mut other = catalog_entry(7, "B");
        other.source = EntrySource::Manual;
        lib.upsert(other).unwrap();
        assert_eq!(lib.entries().len(), 2);
    }

    #[test]
    fn test_manual_entries_never_merge() {
        let mut lib = store();
        lib.upsert(manual("Same", WatchStatus::Plan)).unwrap();
        assert_eq!(lib.entries().len(), 1);
        lib.upsert(manual("Same", WatchStatus::Plan)).unwrap();
        assert_eq!(lib.entries().len(), 2);
        lib.upsert(manual("Other", WatchStatus::Dropped)).unwrap();
        assert_eq!(lib.entries().len(), 3);

        let ids: Vec<_> = lib.entries().iter().map(|a| a.local_id().unwrap()).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let mut lib = store();
        let id = lib
            .upsert(manual("Mushishi", WatchStatus::Watching))
            .unwrap()
            .local_id()
            .to_string();
        lib.bump_episode(&id).unwrap();
        lib.set_status(&id, WatchStatus::OnHold).unwrap();
        lib.toggle_bingo(8).unwrap();

        let saved = lib.persistence().load();
        assert_eq!(saved, *lib.state());
        assert_eq!(saved.anime[0].episodes_watched, 1);
        assert_eq!(saved.anime[0].status, WatchStatus::OnHold);
        assert!(saved.bingo.is_done(8));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut lib = store();
        lib.upsert(manual("Keep", WatchStatus::Plan)).unwrap();
        let before = lib.state().clone();
        assert!(!lib.remove("local-missing").unwrap());
        assert_eq!(*lib.state(), before);
    }

    #[test]
    fn test_remove_by_local_id() {
        let mut lib = store();
        let a = lib.upsert(manual("A", WatchStatus::Plan)).unwrap();
        lib.upsert(manual("B", WatchStatus::Plan)).unwrap();
        assert!(lib.get(a.local_id()).is_some());
        assert!(lib.remove(a.local_id()).unwrap());
        assert!(lib.get(a.local_id()).is_none());
        assert_eq!(lib.entries().len(), 1);
        assert_eq!(lib.entries()[0].title, "B");
    }

    #[test]
    fn test_mutating_unknown_entry_errors() {
        let mut lib = store();
        assert!(matches!(
            lib.bump_episode("nope"),
            Err(AnimeHubError::NotFound(_))
        ));
        assert!(matches!(
            lib.set_status("nope", WatchStatus::Completed),
            Err(AnimeHubError::NotFound(_))
        ));
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut lib = store();
        lib.upsert(manual("one", WatchStatus::Watching)).unwrap();
        lib.upsert(manual("two", WatchStatus::Plan)).unwrap();
        lib.upsert(manual("three", WatchStatus::Watching)).unwrap();

        let titles = |f| -> Vec<String> {
            lib.filter(f).iter().map(|a| a.title.clone()).collect()
        };
        assert_eq!(titles(StatusFilter::All), vec!["one", "two", "three"]);
        assert_eq!(
            titles(StatusFilter::Only(WatchStatus::Watching)),
            vec!["one", "three"]
        );
        for status in WatchStatus::ALL {
            let subset = lib.filter(StatusFilter::Only(*status));
            assert!(subset.iter().all(|a| a.status == *status));
        }
        assert!(lib
            .filter(StatusFilter::Only(WatchStatus::Dropped))
            .is_empty());
    }

    #[test]
    fn test_open_keeps_entries_with_odd_numbers_on_disk() {
        let mut kv = MemoryStore::default();
        kv.set(
            DEFAULT_STORAGE_KEY,
            r#"{"anime": [
                {"source": "manual", "title": "Whole", "status": "plan"},
                {"source": "manual", "title": "Half", "status": "watching",
                 "totalEpisodes": 12.5, "episodesWatched": -2}
            ]}"#,
        )
        .unwrap();
        let lib = LibraryStore::open(Persistence::new(kv, DEFAULT_STORAGE_KEY));
        assert_eq!(lib.entries().len(), 2);

        // Opening assigned ids and rewrote the blob; the odd entry is still in it.
        let blob = lib
            .persistence()
            .store()
            .get(DEFAULT_STORAGE_KEY)
            .unwrap()
            .unwrap();
        assert!(blob.contains("\"Half\""));
        let half = lib.entries()[1].local_id().unwrap();
        assert_eq!(lib.get(half).unwrap().total_episodes, Some(12));
    }

    #[test]
    fn test_loaded_entries_get_ids_once() {
        let mut kv = MemoryStore::default();
        kv.set(
            DEFAULT_STORAGE_KEY,
            r#"{"anime": [{"source": "manual", "title": "Old", "status": "plan"}]}"#,
        )
        .unwrap();
        let mut lib = LibraryStore::open(Persistence::new(kv, DEFAULT_STORAGE_KEY));
        let id = lib.entries()[0].local_id().unwrap().to_string();

        assert_eq!(lib.assign_missing_ids(), 0);
        assert_eq!(lib.entries()[0].local_id(), Some(id.as_str()));
        assert_eq!(
            lib.persistence().load().anime[0].local_id(),
            Some(id.as_str())
        );
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "on-hold".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(WatchStatus::OnHold)
        );
        assert!("whatever".parse::<StatusFilter>().is_err());
    }
}
