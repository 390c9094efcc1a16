//! The fixed nine-cell anime bingo card.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AnimeHubError;

pub const BINGO_ITEMS: [&str; 9] = [
    "Cried because of anime",
    "Watched 100+ episodes",
    "Simps for a character",
    "Pulled an all-nighter",
    "Rewatched a series",
    "Argued about best girl",
    "Read manga after anime",
    "Watched filler knowingly",
    "Memorized an opening",
];

const KEY_PREFIX: &str = "bingo-";

/// Persisted key for the cell at `index`.
pub fn bingo_key(index: usize) -> String {
    format!("{KEY_PREFIX}{index}")
}

/// Cell index for a persisted key, if the key names a real cell.
///
/// Only the canonical spelling counts: `bingo-01` and `bingo-+1` are not keys.
pub fn parse_bingo_key(key: &str) -> Option<usize> {
    key.strip_prefix(KEY_PREFIX)?
        .parse::<usize>()
        .ok()
        .filter(|&i| i < BINGO_ITEMS.len() && bingo_key(i) == key)
}

/// Completion flags keyed by `bingo-<index>`. Absent keys are not done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BingoState(BTreeMap<String, bool>);

impl BingoState {
    /// Flip the cell at `index` and return its new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, AnimeHubError> {
        if index >= BINGO_ITEMS.len() {
            return Err(AnimeHubError::Validation(format!(
                "bingo cell {index} does not exist (0-{})",
                BINGO_ITEMS.len() - 1
            )));
        }
        let cell = self.0.entry(bingo_key(index)).or_insert(false);
        *cell = !*cell;
        Ok(*cell)
    }

    pub fn is_done(&self, index: usize) -> bool {
        self.0.get(&bingo_key(index)).copied().unwrap_or(false)
    }

    pub fn completed(&self) -> usize {
        (0..BINGO_ITEMS.len()).filter(|&i| self.is_done(i)).count()
    }

    /// Rebuild from a saved object, one cell at a time.
    ///
    /// Pairs with an unknown key or a non-boolean value are dropped; the rest survive.
    pub fn from_saved(fields: Map<String, Value>) -> Self {
        Self(
            fields
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::Bool(done) if parse_bingo_key(&key).is_some() => Some((key, done)),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
