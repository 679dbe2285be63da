use crate::domain::Entity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("source file for {entity} not found: {path}")]
    SourceUnavailable { entity: Entity, path: String },

    #[error("missing artifact for {entity}: {path} (run the previous stage first)")]
    ArtifactMissing { entity: Entity, path: String },

    #[error("{entity} validation failed: missing required columns {missing:?}")]
    Validation {
        entity: Entity,
        missing: Vec<String>,
    },

    #[error("warehouse connection failed: {message}")]
    Connection { message: String },

    #[error("warehouse query failed: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("warehouse operation failed: {message}")]
    Warehouse { message: String },

    #[error("{stage} stage failed for entities: {entities:?}")]
    StageFailed {
        stage: &'static str,
        entities: Vec<Entity>,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;
