use serde::{Deserialize, Serialize};

use super::{AnimeEntry, Profile};
use crate::bingo::BingoState;

/// Root persisted object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub profile: Profile,
    pub anime: Vec<AnimeEntry>,
    pub bingo: BingoState,
}
