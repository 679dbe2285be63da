use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::categories::{AgeCategory, Gender, PatientStatus, RiskLevel};

/// A cleaned patient dimension row. `0 <= age <= 120` is guaranteed by the
/// transform stage; missing race/insurance are standardized to "Unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub age: i64,
    pub gender: Gender,
    pub race: String,
    pub zip_code: String,
    pub insurance_type: String,
    pub chronic_conditions: i64,
    pub last_visit_date: Option<NaiveDate>,

    // Derived columns
    pub age_category: AgeCategory,
    pub risk_level: RiskLevel,
    pub patient_status: PatientStatus,
}
