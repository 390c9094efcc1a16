use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnimeHubError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Stored state could not be read. Recovered by falling back to defaults.
    #[error("failed to read saved library: {0}")]
    PersistenceRead(String),

    /// Stored state could not be written. Always surfaced to the user.
    #[error("failed to save library: {0}")]
    PersistenceWrite(String),

    #[error("{0}")]
    Validation(String),

    #[error("edit mode is locked; unlock it with your PIN first")]
    EditLocked,

    #[error("wrong PIN")]
    WrongPin,

    #[error("no library entry with id {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
