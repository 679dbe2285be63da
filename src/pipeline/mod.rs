// The three-stage layered pipeline: extract (bronze), transform (silver),
// load (warehouse), strictly sequential.

pub mod extract;
pub mod load;
pub mod transform;

pub use extract::{ExtractReport, Extractor};
pub use load::{EntityLoadOutcome, LoadReport, Loader};
pub use transform::{TransformReport, Transformer};

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::config::EtlConfig;
use crate::domain::Entity;
use crate::error::Result;
use crate::store::ArtifactStore;
use crate::warehouse::SqliteWarehouse;

/// The externally observable result of one pipeline invocation: stage-level
/// reports plus the per-entity warehouse row counts.
#[derive(Debug, Serialize)]
pub struct PipelineOutcome {
    pub load: LoadReport,
    pub warehouse_counts: BTreeMap<Entity, u64>,
    #[serde(skip)]
    pub extract_reports: Vec<ExtractReport>,
    pub transform_reports: Vec<TransformReport>,
}

impl PipelineOutcome {
    pub fn success(&self) -> bool {
        self.load.success()
    }
}

/// Run extract -> transform -> load -> verify once, sequentially. Each stage
/// object is constructed fresh from config; retry and notification policy
/// belongs to the scheduler invoking this, not to the pipeline itself.
pub async fn run_pipeline(config: &EtlConfig) -> Result<PipelineOutcome> {
    let extractor = Extractor::new(
        ArtifactStore::from_config(config),
        config.sources.clone(),
    );
    let extract_reports = extractor.extract_all().await?;

    let transformer = Transformer::new(ArtifactStore::from_config(config));
    let transform_reports = transformer.transform_all().await?;

    let warehouse = Arc::new(SqliteWarehouse::open(&config.warehouse.path)?);
    let loader = Loader::new(
        ArtifactStore::from_config(config),
        warehouse,
        config.load.batch_size,
    );
    let load = loader.load_all().await?;
    let warehouse_counts = loader.verify_data_integrity().await?;

    info!(
        "Pipeline run finished (load success: {})",
        load.success()
    );
    Ok(PipelineOutcome {
        load,
        warehouse_counts,
        extract_reports,
        transform_reports,
    })
}
