use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::domain::{Entity, RawClaim, RawPatient, RawPrescription, RawProvider};
use crate::envelope::{Dataset, PipelineStage, Provenance};
use crate::error::{EtlError, Result};
use crate::store::ArtifactStore;

pub mod clean;
pub mod derive;
pub mod validate;

use clean::CleanStats;

pub const TRANSFORM_VERSION: &str = "1.0.0";

/// Row accounting for one entity's bronze-to-silver transformation.
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub entity: Entity,
    pub rows_in: usize,
    pub duplicates_removed: usize,
    pub rows_rejected: usize,
    pub rows_out: usize,
}

/// Reads bronze artifacts, applies clean -> derive -> validate, and writes
/// silver artifacts. Constructed per run; `as_of` anchors the date-relative
/// derivations so a run is deterministic over its inputs.
pub struct Transformer {
    store: ArtifactStore,
    as_of: NaiveDate,
}

impl Transformer {
    pub fn new(store: ArtifactStore) -> Self {
        Self {
            store,
            as_of: Utc::now().date_naive(),
        }
    }

    /// Pin the reference date for patient-status derivation (tests).
    pub fn with_as_of(store: ArtifactStore, as_of: NaiveDate) -> Self {
        Self { store, as_of }
    }

    pub async fn transform_claims(&self) -> Result<TransformReport> {
        info!("Starting claims data transformation...");
        let bronze: Dataset<RawClaim> = self.store.read(Entity::Claims, PipelineStage::Bronze)?;
        let (cleaned, stats) = clean::clean_claims(&bronze.rows);
        info!("Removed {} duplicate claims", stats.duplicates_removed);
        info!("Claims data cleaned: {} records remaining", cleaned.len());

        let rows = derive::derive_claims(cleaned);

        validate::check_required_columns(Entity::Claims, &bronze.columns)?;
        validate::soft_check_claims(&rows);

        self.write_silver(
            &bronze.provenance,
            &bronze.columns,
            &derive::CLAIM_DERIVED_COLUMNS,
            Entity::Claims,
            rows,
            stats,
        )
    }

    pub async fn transform_patients(&self) -> Result<TransformReport> {
        info!("Starting patients data transformation...");
        let bronze: Dataset<RawPatient> =
            self.store.read(Entity::Patients, PipelineStage::Bronze)?;
        let (cleaned, stats) = clean::clean_patients(&bronze.rows);
        info!("Removed {} duplicate patients", stats.duplicates_removed);
        info!("Patients data cleaned: {} records remaining", cleaned.len());

        let rows = derive::derive_patients(cleaned, self.as_of);

        validate::check_required_columns(Entity::Patients, &bronze.columns)?;
        validate::soft_check_patients(&rows);

        self.write_silver(
            &bronze.provenance,
            &bronze.columns,
            &derive::PATIENT_DERIVED_COLUMNS,
            Entity::Patients,
            rows,
            stats,
        )
    }

    pub async fn transform_providers(&self) -> Result<TransformReport> {
        info!("Starting providers data transformation...");
        let bronze: Dataset<RawProvider> =
            self.store.read(Entity::Providers, PipelineStage::Bronze)?;
        let (cleaned, stats) = clean::clean_providers(&bronze.rows);
        info!("Removed {} duplicate providers", stats.duplicates_removed);
        info!("Providers data cleaned: {} records remaining", cleaned.len());

        let rows = derive::derive_providers(cleaned);

        validate::check_required_columns(Entity::Providers, &bronze.columns)?;

        self.write_silver(
            &bronze.provenance,
            &bronze.columns,
            &derive::PROVIDER_DERIVED_COLUMNS,
            Entity::Providers,
            rows,
            stats,
        )
    }

    pub async fn transform_prescriptions(&self) -> Result<TransformReport> {
        info!("Starting prescriptions data transformation...");
        let bronze: Dataset<RawPrescription> =
            self.store.read(Entity::Prescriptions, PipelineStage::Bronze)?;
        let (cleaned, stats) = clean::clean_prescriptions(&bronze.rows);
        info!("Removed {} duplicate prescriptions", stats.duplicates_removed);
        info!(
            "Prescriptions data cleaned: {} records remaining",
            cleaned.len()
        );

        let rows = derive::derive_prescriptions(cleaned);

        validate::check_required_columns(Entity::Prescriptions, &bronze.columns)?;

        self.write_silver(
            &bronze.provenance,
            &bronze.columns,
            &derive::PRESCRIPTION_DERIVED_COLUMNS,
            Entity::Prescriptions,
            rows,
            stats,
        )
    }

    /// Transform all four entities independently: one entity's fatal
    /// validation failure does not stop the others, but the overall result is
    /// failed if any entity failed.
    pub async fn transform_all(&self) -> Result<Vec<TransformReport>> {
        info!("Starting full data transformation...");
        let mut reports = Vec::new();
        let mut failed = Vec::new();

        let outcomes = [
            (Entity::Claims, self.transform_claims().await),
            (Entity::Patients, self.transform_patients().await),
            (Entity::Providers, self.transform_providers().await),
            (Entity::Prescriptions, self.transform_prescriptions().await),
        ];
        for (entity, outcome) in outcomes {
            match outcome {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("{entity} transformation failed: {e}");
                    failed.push(entity);
                }
            }
        }

        if !failed.is_empty() {
            return Err(EtlError::StageFailed {
                stage: "transform",
                entities: failed,
            });
        }
        info!("Data transformation completed successfully");
        Ok(reports)
    }

    fn write_silver<T: Serialize>(
        &self,
        bronze_provenance: &Provenance,
        bronze_columns: &[String],
        derived_columns: &[&str],
        entity: Entity,
        rows: Vec<T>,
        stats: CleanStats,
    ) -> Result<TransformReport> {
        let mut columns = bronze_columns.to_vec();
        for derived in derived_columns {
            if !columns.iter().any(|c| c == derived) {
                columns.push(derived.to_string());
            }
        }

        let provenance = Provenance::silver_from(bronze_provenance, TRANSFORM_VERSION);
        let mut silver = Dataset::new(entity, provenance, columns, rows);
        self.store.write(&mut silver)?;

        info!(
            "TRANSFORM - {entity}: {} rows, {} columns",
            silver.len(),
            silver.columns.len()
        );
        Ok(TransformReport {
            entity,
            rows_in: stats.rows_in,
            duplicates_removed: stats.duplicates_removed,
            rows_rejected: stats.rows_rejected,
            rows_out: silver.len(),
        })
    }
}
