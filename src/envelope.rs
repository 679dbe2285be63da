use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Bronze,
    Silver,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChecksumMeta {
    pub sha256: String,
}

/// Lineage metadata stamped on every dataset handed between stages. Silver
/// provenance embeds the bronze provenance it was derived from, so the full
/// chain back to the source survives until after load verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// Source path, or "generated" for fixture data.
    pub source: String,
    pub recorded_at: DateTime<Utc>,
    pub stage: PipelineStage,
    /// Version tag of the stage that produced this dataset.
    pub version: String,
    /// Identifies the pipeline invocation that produced this artifact.
    pub run_id: Uuid,
    /// Checksum of the serialized rows, set when the artifact is persisted.
    pub checksum: Option<ChecksumMeta>,
    /// Provenance of the dataset this one was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Provenance>>,
}

impl Provenance {
    pub fn bronze(source: String, version: &str, run_id: Uuid) -> Self {
        Self {
            source,
            recorded_at: Utc::now(),
            stage: PipelineStage::Bronze,
            version: version.to_string(),
            run_id,
            checksum: None,
            parent: None,
        }
    }

    /// Derive silver provenance from the bronze provenance it consumed.
    pub fn silver_from(parent: &Provenance, version: &str) -> Self {
        Self {
            source: parent.source.clone(),
            recorded_at: Utc::now(),
            stage: PipelineStage::Silver,
            version: version.to_string(),
            run_id: parent.run_id,
            checksum: None,
            parent: Some(Box::new(parent.clone())),
        }
    }
}

/// A dataset plus the provenance and raw column set that travel with it
/// across every stage boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset<T> {
    pub entity: Entity,
    pub provenance: Provenance,
    /// Column names observed at extraction, preserved so the transform
    /// validation gate can detect a structurally deficient source.
    pub columns: Vec<String>,
    pub rows: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn new(entity: Entity, provenance: Provenance, columns: Vec<String>, rows: Vec<T>) -> Self {
        Self {
            entity,
            provenance,
            columns,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Hex sha-256 of an artifact payload, recorded in its provenance.
pub fn payload_checksum(bytes: &[u8]) -> ChecksumMeta {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    ChecksumMeta {
        sha256: hex::encode(hasher.finalize()),
    }
}
