use serde::{Deserialize, Serialize};

// Bronze-layer records: everything is an optional string, exactly as it
// arrived from the source feed. Type coercion happens in the transform stage
// with a tolerant parse; a column absent from the source surfaces as None,
// never as a silent default.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClaim {
    #[serde(default)]
    pub claim_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub admission_date: Option<String>,
    #[serde(default)]
    pub discharge_date: Option<String>,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub procedure_code: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub insurance_type: Option<String>,
    #[serde(default)]
    pub length_of_stay: Option<String>,
    #[serde(default)]
    pub readmission_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPatient {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub insurance_type: Option<String>,
    #[serde(default)]
    pub chronic_conditions: Option<String>,
    #[serde(default)]
    pub last_visit_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProvider {
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub provider_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub beds: Option<String>,
    #[serde(default)]
    pub teaching_hospital: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPrescription {
    #[serde(default)]
    pub prescription_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub medication_name: Option<String>,
    #[serde(default)]
    pub prescription_date: Option<String>,
    #[serde(default)]
    pub days_supplied: Option<String>,
    #[serde(default)]
    pub days_prescribed: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
}

impl RawClaim {
    pub const COLUMNS: [&'static str; 11] = [
        "claim_id",
        "patient_id",
        "provider_id",
        "admission_date",
        "discharge_date",
        "diagnosis_code",
        "procedure_code",
        "cost",
        "insurance_type",
        "length_of_stay",
        "readmission_date",
    ];
}

impl RawPatient {
    pub const COLUMNS: [&'static str; 8] = [
        "patient_id",
        "age",
        "gender",
        "race",
        "zip_code",
        "insurance_type",
        "chronic_conditions",
        "last_visit_date",
    ];
}

impl RawProvider {
    pub const COLUMNS: [&'static str; 7] = [
        "provider_id",
        "hospital_name",
        "provider_type",
        "state",
        "city",
        "beds",
        "teaching_hospital",
    ];
}

impl RawPrescription {
    pub const COLUMNS: [&'static str; 9] = [
        "prescription_id",
        "patient_id",
        "provider_id",
        "medication_name",
        "prescription_date",
        "days_supplied",
        "days_prescribed",
        "quantity",
        "cost",
    ];
}
