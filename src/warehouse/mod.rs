use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{Claim, Entity, Patient, Prescription, Provider};
use crate::error::Result;

pub mod sqlite;

pub use sqlite::SqliteWarehouse;

/// How a fact-table batch is applied: the first batch of a run replaces the
/// table's contents, subsequent batches append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Replace,
    Append,
}

/// A prescription with its medication foreign key resolved against the
/// warehouse reference table. `medication_id` 0 is the documented sentinel
/// for names with no match.
#[derive(Debug, Clone)]
pub struct ResolvedPrescription {
    pub medication_id: i64,
    pub rx: Prescription,
}

/// Port to the shared warehouse. Only the loader touches this; swapping the
/// implementation (in-memory database, failure injection) is what keeps the
/// load stage testable.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Cheap connectivity probe, run before anything else; failure aborts
    /// the whole load.
    async fn ping(&self) -> Result<()>;

    /// Apply the warehouse schema (idempotent) and seed the reference tables.
    async fn ensure_schema(&self) -> Result<()>;

    /// Full-replace dimension loads.
    async fn replace_patients(&self, rows: &[Patient]) -> Result<usize>;
    async fn replace_providers(&self, rows: &[Provider]) -> Result<usize>;

    /// Batched fact loads; one transaction per call.
    async fn write_claims(&self, rows: &[Claim], mode: WriteMode) -> Result<usize>;
    async fn write_prescriptions(
        &self,
        rows: &[ResolvedPrescription],
        mode: WriteMode,
    ) -> Result<usize>;

    /// medication_name -> medication_id from the reference table.
    async fn medication_lookup(&self) -> Result<HashMap<String, i64>>;

    /// Recompute provider avg_cost/readmission_rate/patient_volume from the
    /// loaded claims. A derived materialization, not a source of truth.
    async fn refresh_provider_metrics(&self) -> Result<()>;

    /// Row counts per base table for integrity verification.
    async fn table_counts(&self) -> Result<BTreeMap<Entity, u64>>;
}
