use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_NAME: &str = "Anime Fan";

/// The single local user's display profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub avatar_url: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            avatar_url: String::new(),
        }
    }
}

impl Profile {
    /// Build a profile from raw form input. Blank name falls back to the default.
    pub fn from_input(name: &str, avatar_url: &str) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_PROFILE_NAME.to_string()
            } else {
                name.to_string()
            },
            avatar_url: avatar_url.trim().to_string(),
        }
    }
}
