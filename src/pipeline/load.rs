use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::{Claim, Entity, Patient, Prescription, Provider};
use crate::envelope::{Dataset, PipelineStage};
use crate::error::Result;
use crate::store::ArtifactStore;
use crate::warehouse::{ResolvedPrescription, Warehouse, WriteMode};

/// Reserved medication_id for prescription rows whose medication name has no
/// match in the reference table.
pub const UNRESOLVED_MEDICATION_ID: i64 = 0;

/// Per-entity result of a load attempt. Unresolved references are surfaced
/// here rather than silently coerced into valid-looking keys.
#[derive(Debug, Clone, Serialize)]
pub enum EntityLoadOutcome {
    Loaded {
        rows: usize,
        unresolved_medications: Vec<String>,
    },
    Failed {
        message: String,
    },
}

impl EntityLoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, EntityLoadOutcome::Loaded { .. })
    }
}

/// Outcome of a full load. Callers must inspect the per-entity map, not just
/// `success()`, to know which tables are safely queryable.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub outcomes: BTreeMap<Entity, EntityLoadOutcome>,
    pub provider_metrics_refreshed: bool,
}

impl LoadReport {
    pub fn success(&self) -> bool {
        self.outcomes.len() == Entity::LOAD_ORDER.len()
            && self.outcomes.values().all(EntityLoadOutcome::is_loaded)
    }

    pub fn failed_entities(&self) -> Vec<Entity> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_loaded())
            .map(|(entity, _)| *entity)
            .collect()
    }
}

/// Loads silver artifacts into the warehouse: dimensions full-replace, facts
/// in batches, then the provider-aggregate refresh. The only component that
/// touches the warehouse.
pub struct Loader {
    store: ArtifactStore,
    warehouse: Arc<dyn Warehouse>,
    batch_size: usize,
}

impl Loader {
    pub fn new(store: ArtifactStore, warehouse: Arc<dyn Warehouse>, batch_size: usize) -> Self {
        Self {
            store,
            warehouse,
            batch_size,
        }
    }

    /// Load every entity in dependency order. Per-entity failures are caught
    /// and recorded; all entities are attempted regardless. The provider
    /// aggregate refresh runs only when every entity loaded.
    pub async fn load_all(&self) -> Result<LoadReport> {
        info!("Starting full data loading process...");

        // Connectivity and schema problems are fatal to the whole load.
        self.warehouse.ping().await?;
        self.warehouse.ensure_schema().await?;

        let mut outcomes = BTreeMap::new();
        for entity in Entity::LOAD_ORDER {
            let result = match entity {
                Entity::Patients => self.load_patients().await,
                Entity::Providers => self.load_providers().await,
                Entity::Claims => self.load_claims().await,
                Entity::Prescriptions => self.load_prescriptions().await,
            };
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to load {entity} data: {e}");
                    EntityLoadOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            outcomes.insert(entity, outcome);
        }

        let mut report = LoadReport {
            outcomes,
            provider_metrics_refreshed: false,
        };

        if report.success() {
            match self.warehouse.refresh_provider_metrics().await {
                Ok(()) => report.provider_metrics_refreshed = true,
                Err(e) => error!("Failed to update provider metrics: {e}"),
            }
            info!("All data loaded successfully to warehouse");
        } else {
            error!(
                "Some data loading operations failed: {:?}",
                report.failed_entities()
            );
        }
        Ok(report)
    }

    /// Final row counts per base table, for audit and to gate downstream
    /// reporting.
    pub async fn verify_data_integrity(&self) -> Result<BTreeMap<Entity, u64>> {
        info!("Verifying data integrity...");
        let counts = self.warehouse.table_counts().await?;
        for (entity, count) in &counts {
            info!("{entity}: {count} records");
        }
        Ok(counts)
    }

    async fn load_patients(&self) -> Result<EntityLoadOutcome> {
        info!("Loading patients data to warehouse...");
        let silver: Dataset<Patient> = self.store.read(Entity::Patients, PipelineStage::Silver)?;
        let rows = self.warehouse.replace_patients(&silver.rows).await?;
        info!("Successfully loaded {rows} patients to warehouse");
        Ok(EntityLoadOutcome::Loaded {
            rows,
            unresolved_medications: Vec::new(),
        })
    }

    async fn load_providers(&self) -> Result<EntityLoadOutcome> {
        info!("Loading providers data to warehouse...");
        let silver: Dataset<Provider> =
            self.store.read(Entity::Providers, PipelineStage::Silver)?;
        let rows = self.warehouse.replace_providers(&silver.rows).await?;
        info!("Successfully loaded {rows} providers to warehouse");
        Ok(EntityLoadOutcome::Loaded {
            rows,
            unresolved_medications: Vec::new(),
        })
    }

    async fn load_claims(&self) -> Result<EntityLoadOutcome> {
        info!("Loading claims data to warehouse...");
        let silver: Dataset<Claim> = self.store.read(Entity::Claims, PipelineStage::Silver)?;

        let mut total = 0;
        if silver.is_empty() {
            // Still issue the replacing batch so a re-run over an empty
            // silver set clears stale rows.
            self.warehouse.write_claims(&[], WriteMode::Replace).await?;
        } else {
            for (index, batch) in silver.rows.chunks(self.batch_size).enumerate() {
                let mode = if index == 0 {
                    WriteMode::Replace
                } else {
                    WriteMode::Append
                };
                total += self.warehouse.write_claims(batch, mode).await?;
            }
        }
        info!("Successfully loaded {total} claims to warehouse");
        Ok(EntityLoadOutcome::Loaded {
            rows: total,
            unresolved_medications: Vec::new(),
        })
    }

    async fn load_prescriptions(&self) -> Result<EntityLoadOutcome> {
        info!("Loading prescriptions data to warehouse...");
        let silver: Dataset<Prescription> =
            self.store.read(Entity::Prescriptions, PipelineStage::Silver)?;

        let lookup = self.warehouse.medication_lookup().await?;
        let mut unresolved: Vec<String> = Vec::new();
        let resolved: Vec<ResolvedPrescription> = silver
            .rows
            .iter()
            .map(|rx| {
                let medication_id = match lookup.get(&rx.medication_name) {
                    Some(id) => *id,
                    None => {
                        if !unresolved.contains(&rx.medication_name) {
                            unresolved.push(rx.medication_name.clone());
                        }
                        UNRESOLVED_MEDICATION_ID
                    }
                };
                ResolvedPrescription {
                    medication_id,
                    rx: rx.clone(),
                }
            })
            .collect();

        if !unresolved.is_empty() {
            warn!(
                "Found {} unmapped medications: {:?}",
                unresolved.len(),
                unresolved
            );
        }

        let mut total = 0;
        if resolved.is_empty() {
            self.warehouse
                .write_prescriptions(&[], WriteMode::Replace)
                .await?;
        } else {
            for (index, batch) in resolved.chunks(self.batch_size).enumerate() {
                let mode = if index == 0 {
                    WriteMode::Replace
                } else {
                    WriteMode::Append
                };
                total += self.warehouse.write_prescriptions(batch, mode).await?;
            }
        }
        info!("Successfully loaded {total} prescriptions to warehouse");
        Ok(EntityLoadOutcome::Loaded {
            rows: total,
            unresolved_medications: unresolved,
        })
    }
}
