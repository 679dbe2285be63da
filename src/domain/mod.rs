// Typed schema per entity: raw (bronze) shapes, cleaned/enriched (silver)
// shapes, and the categorical types derived between them.

pub mod categories;
pub mod claim;
pub mod patient;
pub mod prescription;
pub mod provider;
pub mod raw;

pub use categories::{
    AdherenceCategory, AgeCategory, CostCategory, Gender, HospitalSize, LosCategory, PatientStatus,
    RiskLevel,
};
pub use claim::Claim;
pub use patient::Patient;
pub use prescription::Prescription;
pub use provider::Provider;
pub use raw::{RawClaim, RawPatient, RawPrescription, RawProvider};

use serde::{Deserialize, Serialize};

/// The four entity types moving through the pipeline. Dimensions (patients,
/// providers) load before facts (claims, prescriptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Patients,
    Providers,
    Claims,
    Prescriptions,
}

impl Entity {
    pub const ALL: [Entity; 4] = [
        Entity::Claims,
        Entity::Patients,
        Entity::Providers,
        Entity::Prescriptions,
    ];

    /// Warehouse load order: dimensions before facts.
    pub const LOAD_ORDER: [Entity; 4] = [
        Entity::Patients,
        Entity::Providers,
        Entity::Claims,
        Entity::Prescriptions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Entity::Claims => "claims",
            Entity::Patients => "patients",
            Entity::Providers => "providers",
            Entity::Prescriptions => "prescriptions",
        }
    }

    /// Bronze artifact name, e.g. `claims_raw`.
    pub fn raw_artifact(&self) -> String {
        format!("{}_raw", self.name())
    }

    /// Silver artifact name, e.g. `claims_clean`.
    pub fn clean_artifact(&self) -> String {
        format!("{}_clean", self.name())
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
