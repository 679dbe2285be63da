use serde::{Deserialize, Serialize};

use super::categories::HospitalSize;

/// A cleaned provider dimension row. `beds > 0` is guaranteed by the
/// transform stage.
///
/// The performance fields (`avg_cost`, `readmission_rate`, `patient_volume`)
/// are placeholders in the silver layer; the loader recomputes them from the
/// loaded claims after all entities land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub provider_id: i64,
    pub hospital_name: String,
    pub provider_type: String,
    pub state: String,
    pub city: String,
    pub beds: i64,
    pub teaching_hospital: bool,

    // Derived columns
    pub hospital_size: HospitalSize,
    pub full_address: String,
    pub avg_cost: f64,
    pub readmission_rate: f64,
    pub patient_volume: i64,
}
