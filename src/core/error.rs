use thiserror::Error;

use crate::core::types::PlayerIndex;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerIndex),

    #[error("Invalid AI context: {0}")]
    InvalidContext(String),

    #[error("Invalid behavior state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;
