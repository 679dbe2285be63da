use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::EtlConfig;
use crate::domain::Entity;
use crate::envelope::{payload_checksum, Dataset, PipelineStage};
use crate::error::{EtlError, Result};

/// File-backed store for the bronze and silver layers. One self-describing
/// JSON artifact per entity per layer; a write overwrites any prior artifact
/// for that entity, which is what makes stage re-runs idempotent.
pub struct ArtifactStore {
    bronze_dir: PathBuf,
    silver_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(bronze_dir: PathBuf, silver_dir: PathBuf) -> Self {
        Self {
            bronze_dir,
            silver_dir,
        }
    }

    pub fn from_config(config: &EtlConfig) -> Self {
        Self::new(config.bronze_dir(), config.silver_dir())
    }

    fn layer_dir(&self, stage: PipelineStage) -> &Path {
        match stage {
            PipelineStage::Bronze => &self.bronze_dir,
            PipelineStage::Silver => &self.silver_dir,
        }
    }

    pub fn artifact_path(&self, entity: Entity, stage: PipelineStage) -> PathBuf {
        let name = match stage {
            PipelineStage::Bronze => entity.raw_artifact(),
            PipelineStage::Silver => entity.clean_artifact(),
        };
        self.layer_dir(stage).join(format!("{name}.json"))
    }

    /// Persist a dataset to its layer, stamping the row-payload checksum into
    /// the provenance before the envelope is written.
    pub fn write<T: Serialize>(&self, dataset: &mut Dataset<T>) -> Result<PathBuf> {
        let stage = dataset.provenance.stage;
        let dir = self.layer_dir(stage);
        fs::create_dir_all(dir)?;

        let rows_payload = serde_json::to_vec(&dataset.rows)?;
        dataset.provenance.checksum = Some(payload_checksum(&rows_payload));

        let path = self.artifact_path(dataset.entity, stage);
        let bytes = serde_json::to_vec(dataset)?;
        fs::write(&path, bytes)?;

        info!(
            "Saved {} rows to {} ({} columns)",
            dataset.len(),
            path.display(),
            dataset.columns.len()
        );
        Ok(path)
    }

    pub fn read<T: DeserializeOwned>(
        &self,
        entity: Entity,
        stage: PipelineStage,
    ) -> Result<Dataset<T>> {
        let path = self.artifact_path(entity, stage);
        if !path.exists() {
            return Err(EtlError::ArtifactMissing {
                entity,
                path: path.display().to_string(),
            });
        }
        let bytes = fs::read(&path)?;
        let dataset = serde_json::from_slice(&bytes)?;
        Ok(dataset)
    }
}
