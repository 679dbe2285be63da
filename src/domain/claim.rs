use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::categories::{CostCategory, LosCategory};

/// A cleaned and enriched claim, as persisted in the silver layer and loaded
/// into the `claims` fact table.
///
/// Hard invariants guaranteed by the transform stage: `cost > 0` and
/// `0 <= length_of_stay <= 365`. Admission/discharge dates are optional
/// because source feeds can carry unparsable dates without invalidating the
/// row; derived fields that need them degrade (flag false, seasonal fields
/// absent) instead of rejecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: i64,
    pub patient_id: i64,
    pub provider_id: i64,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub diagnosis_code: Option<String>,
    pub procedure_code: Option<String>,
    pub cost: f64,
    pub insurance_type: String,
    pub length_of_stay: i64,
    pub readmission_date: Option<NaiveDate>,

    // Derived columns
    pub readmission_flag: bool,
    pub cost_per_day: f64,
    pub cost_category: CostCategory,
    pub los_category: LosCategory,
    pub admission_month: Option<u32>,
    pub admission_quarter: Option<u32>,
    pub admission_year: Option<i32>,
}
