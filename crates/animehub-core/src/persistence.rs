//! Saving and restoring the whole [`AppState`] as one JSON blob.
//!
//! The blob lives under a single key in a local key-value store. Reads fail
//! soft (defaults win), writes fail loud.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};

use crate::bingo::BingoState;
use crate::error::AnimeHubError;
use crate::models::{AnimeEntry, AppState, Profile};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_kv_store.sql");

pub const DEFAULT_STORAGE_KEY: &str = "myAnimeHub_v1";

/// A string-keyed, string-valued local store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AnimeHubError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AnimeHubError>;
}

/// SQLite-backed key-value store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, AnimeHubError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA_V1)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, AnimeHubError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_V1)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, AnimeHubError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AnimeHubError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AnimeHubError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AnimeHubError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves [`AppState`] under one storage key.
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the saved state. Never fails: missing or unreadable data yields defaults.
    pub fn load(&self) -> AppState {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No saved state, starting fresh");
                return AppState::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved state, using defaults");
                return AppState::default();
            }
        };

        match decode_state(&raw) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load state, using defaults");
                AppState::default()
            }
        }
    }

    /// Serialize and write the full state.
    pub fn save(&mut self, state: &AppState) -> Result<(), AnimeHubError> {
        let json = serde_json::to_string(state)
            .map_err(|e| AnimeHubError::PersistenceWrite(e.to_string()))?;
        self.store.set(&self.key, &json).map_err(|e| {
            tracing::error!(error = %e, "Failed to save state");
            match e {
                AnimeHubError::PersistenceWrite(_) => e,
                other => AnimeHubError::PersistenceWrite(other.to_string()),
            }
        })
    }
}

/// Decode a saved blob field by field over the defaults.
///
/// Each known top-level key is decoded on its own; a key that fails to decode
/// keeps its default. Library entries are decoded one at a time, and only a
/// record without a title or with an unknown status is dropped. Bingo cells
/// are kept or dropped individually. Unknown keys are ignored.
pub fn decode_state(raw: &str) -> Result<AppState, AnimeHubError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| AnimeHubError::PersistenceRead(e.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(AnimeHubError::PersistenceRead(
            "saved state is not a JSON object".into(),
        ));
    };

    let mut state = AppState::default();

    if let Some(profile) = take_field::<Profile>(&mut fields, "profile") {
        state.profile = profile;
    }

    match fields.remove("anime") {
        Some(Value::Array(items)) => {
            state.anime = items
                .into_iter()
                .enumerate()
                .filter_map(|(idx, item)| match serde_json::from_value::<AnimeEntry>(item) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(index = idx, error = %e, "Dropping unreadable library entry");
                        None
                    }
                })
                .collect();
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            tracing::warn!(kind = %json_kind(&other), "Saved library is not a list, ignoring");
        }
    }

    match fields.remove("bingo") {
        Some(Value::Object(cells)) => state.bingo = BingoState::from_saved(cells),
        Some(Value::Null) | None => {}
        Some(other) => {
            tracing::warn!(kind = %json_kind(&other), "Saved bingo card is not an object, ignoring");
        }
    }

    if !fields.is_empty() {
        let keys: Vec<&String> = fields.keys().collect();
        tracing::debug!(?keys, "Ignoring unknown saved fields");
    }

    Ok(state)
}

fn take_field<T: serde::de::DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Option<T> {
    let value = fields.remove(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(field = key, error = %e, "Saved field unreadable, using default");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
