use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameDataError {
    #[error("game data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("game data defines no stages")]
    NoStages,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("no random weapon pick is pending")]
    NoPendingPick,
    #[error("unknown weapon: {0}")]
    UnknownWeapon(String),
    #[error("unknown sort mode: {0} (expected name, availability or availabilityAndName)")]
    UnknownSortMode(String),
}
