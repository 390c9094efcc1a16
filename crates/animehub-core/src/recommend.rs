use crate::models::{AnimeEntry, WatchStatus};

/// Maximum number of picks.
pub const MAX_PICKS: usize = 5;

/// Genre-based picks from the user's own unfinished entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations<'a> {
    /// No entry has a genre yet.
    NeedEntries,
    /// The top genre has nothing left to watch.
    NoPicks { genre: String },
    Picks {
        genre: String,
        entries: Vec<&'a AnimeEntry>,
    },
}

impl<'a> Recommendations<'a> {
    /// Select up to [`MAX_PICKS`] non-completed entries in `top_genre`, in stored order.
    pub fn select(entries: &'a [AnimeEntry], top_genre: Option<&str>) -> Self {
        let Some(genre) = top_genre else {
            return Self::NeedEntries;
        };

        let picks: Vec<&AnimeEntry> = entries
            .iter()
            .filter(|a| a.has_genre(genre) && a.status != WatchStatus::Completed)
            .take(MAX_PICKS)
            .collect();

        if picks.is_empty() {
            Self::NoPicks {
                genre: genre.to_string(),
            }
        } else {
            Self::Picks {
                genre: genre.to_string(),
                entries: picks,
            }
        }
    }

    pub fn picks(&self) -> &[&'a AnimeEntry] {
        match self {
            Self::Picks { entries, .. } => entries,
            _ => &[],
        }
    }

    /// Explanation shown instead of picks, if there are none.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NeedEntries => Some("Add some anime first to get recommendations.".into()),
            Self::NoPicks { genre } => Some(format!(
                "No obvious picks yet. Try adding more {genre} anime."
            )),
            Self::Picks { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ManualEntry;
    use crate::stats::top_genre;

    fn entry(title: &str, genres: &[&str], status: WatchStatus) -> AnimeEntry {
        let mut e = ManualEntry::new(title).into_entry().unwrap();
        e.genres = genres.iter().map(|g| g.to_string()).collect();
        e.status = status;
        e
    }

    #[test]
    fn test_scenario_top_genre_excludes_completed() {
        let lib = vec![
            entry("one", &["Action"], WatchStatus::Watching),
            entry("two", &["Action"], WatchStatus::Completed),
            entry("three", &["Romance"], WatchStatus::Plan),
        ];
        let genre = top_genre(&lib);
        assert_eq!(genre.as_deref(), Some("Action"));

        let recs = Recommendations::select(&lib, genre.as_deref());
        let titles: Vec<&str> = recs.picks().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["one"]);
        assert!(recs.message().is_none());
    }

    #[test]
    fn test_no_genre_needs_entries() {
        let lib = vec![entry("bare", &[], WatchStatus::Watching)];
        let recs = Recommendations::select(&lib, top_genre(&lib).as_deref());
        assert_eq!(recs, Recommendations::NeedEntries);
        assert!(recs.picks().is_empty());
        assert!(recs.message().unwrap().contains("Add some anime"));
    }

    #[test]
    fn test_all_completed_names_genre() {
        let lib = vec![entry("done", &["Horror"], WatchStatus::Completed)];
        let recs = Recommendations::select(&lib, top_genre(&lib).as_deref());
        assert!(recs.picks().is_empty());
        assert!(recs.message().unwrap().contains("Horror"));
    }

    #[test]
    fn test_capped_at_five_in_order() {
        let lib: Vec<AnimeEntry> = (0..8)
            .map(|i| entry(&format!("t{i}"), &["Slice of Life"], WatchStatus::Plan))
            .collect();
        let recs = Recommendations::select(&lib, Some("Slice of Life"));
        let titles: Vec<&str> = recs.picks().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["t0", "t1", "t2", "t3", "t4"]);
        assert!(recs.picks().len() <= MAX_PICKS);
    }
}
