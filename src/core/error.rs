use thiserror::Error;

use crate::core::types::ActorId;

#[derive(Error, Debug)]
pub enum DelveError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Order registry is full ({capacity} orders)")]
    RegistryFull { capacity: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DelveError>;
