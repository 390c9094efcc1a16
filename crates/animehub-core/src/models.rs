pub mod entry;
pub mod profile;
pub mod state;

pub use entry::{AnimeEntry, EntrySource, WatchStatus, DEFAULT_MINUTES_PER_EPISODE};
pub use profile::{Profile, DEFAULT_PROFILE_NAME};
pub use state::AppState;
