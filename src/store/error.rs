// Settings load/save failures
// Only ever logged by SettingsManager, never handed to callers

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("invalid guild id {0:?}")]
    InvalidGuildId(String),
}
