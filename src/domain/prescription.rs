use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::categories::AdherenceCategory;

/// A cleaned and enriched prescription fact row. `days_supplied`,
/// `days_prescribed`, `quantity` and `cost` are all strictly positive after
/// cleaning; `adherence_rate` is clipped to [0,1].
///
/// `medication_id` is not part of the silver record: the loader resolves it
/// against the warehouse medications reference table at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: i64,
    pub patient_id: i64,
    pub provider_id: i64,
    pub medication_name: String,
    pub prescription_date: Option<NaiveDate>,
    pub days_supplied: i64,
    pub days_prescribed: i64,
    pub quantity: i64,
    pub cost: f64,

    // Derived columns
    pub adherence_rate: f64,
    pub adherence_category: AdherenceCategory,
    pub cost_per_day: f64,
    pub medication_category: String,
    pub prescription_month: Option<u32>,
    pub prescription_quarter: Option<u32>,
    pub prescription_year: Option<i32>,
}
