use chrono::{Datelike, NaiveDate};

use crate::domain::categories::{
    AdherenceCategory, AgeCategory, CostCategory, HospitalSize, LosCategory, PatientStatus,
    RiskLevel,
};
use crate::domain::{Claim, Patient, Prescription, Provider};
use crate::reference::medication_category;

use super::clean::{CleanedClaim, CleanedPatient, CleanedPrescription, CleanedProvider};

// Derivation: the only place columns are added. Each function consumes the
// cleaned rows and produces the silver records with every derived column
// populated.

pub const CLAIM_DERIVED_COLUMNS: [&str; 7] = [
    "readmission_flag",
    "cost_per_day",
    "cost_category",
    "los_category",
    "admission_month",
    "admission_quarter",
    "admission_year",
];

pub const PATIENT_DERIVED_COLUMNS: [&str; 3] = ["age_category", "risk_level", "patient_status"];

pub const PROVIDER_DERIVED_COLUMNS: [&str; 5] = [
    "hospital_size",
    "full_address",
    "avg_cost",
    "readmission_rate",
    "patient_volume",
];

pub const PRESCRIPTION_DERIVED_COLUMNS: [&str; 7] = [
    "adherence_rate",
    "adherence_category",
    "cost_per_day",
    "medication_category",
    "prescription_month",
    "prescription_quarter",
    "prescription_year",
];

/// A claim counts as a readmission iff a readmission date exists and falls
/// within (0, 30] days after discharge. Absent either date, the flag is
/// false.
pub fn readmission_flag(
    discharge_date: Option<NaiveDate>,
    readmission_date: Option<NaiveDate>,
) -> bool {
    match (discharge_date, readmission_date) {
        (Some(discharge), Some(readmission)) => {
            let days = (readmission - discharge).num_days();
            days > 0 && days <= 30
        }
        _ => false,
    }
}

/// Fraction of prescribed days covered by supplied medication, clipped to
/// [0,1]. A non-positive denominator yields 0 rather than an error.
pub fn adherence_rate(days_supplied: i64, days_prescribed: i64) -> f64 {
    if days_prescribed <= 0 {
        return 0.0;
    }
    (days_supplied as f64 / days_prescribed as f64).clamp(0.0, 1.0)
}

fn quarter(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

pub fn derive_claims(rows: Vec<CleanedClaim>) -> Vec<Claim> {
    rows.into_iter()
        .map(|c| {
            let flag = readmission_flag(c.discharge_date, c.readmission_date);
            // +1 keeps same-day stays from dividing by zero.
            let cost_per_day = c.cost / (c.length_of_stay + 1) as f64;
            Claim {
                readmission_flag: flag,
                cost_per_day,
                cost_category: CostCategory::from_cost(c.cost),
                los_category: LosCategory::from_days(c.length_of_stay),
                admission_month: c.admission_date.map(|d| d.month()),
                admission_quarter: c.admission_date.map(|d| quarter(d.month())),
                admission_year: c.admission_date.map(|d| d.year()),
                claim_id: c.claim_id,
                patient_id: c.patient_id,
                provider_id: c.provider_id,
                admission_date: c.admission_date,
                discharge_date: c.discharge_date,
                diagnosis_code: c.diagnosis_code,
                procedure_code: c.procedure_code,
                cost: c.cost,
                insurance_type: c.insurance_type,
                length_of_stay: c.length_of_stay,
                readmission_date: c.readmission_date,
            }
        })
        .collect()
}

/// `as_of` anchors the days-since-last-visit computation so the derivation
/// is deterministic for a given input.
pub fn derive_patients(rows: Vec<CleanedPatient>, as_of: NaiveDate) -> Vec<Patient> {
    rows.into_iter()
        .map(|p| {
            let days_since_visit = p.last_visit_date.map(|d| (as_of - d).num_days());
            Patient {
                age_category: AgeCategory::from_age(p.age),
                risk_level: RiskLevel::from_chronic_conditions(p.chronic_conditions),
                patient_status: PatientStatus::from_days_since_visit(days_since_visit),
                patient_id: p.patient_id,
                age: p.age,
                gender: p.gender,
                race: p.race,
                zip_code: p.zip_code,
                insurance_type: p.insurance_type,
                chronic_conditions: p.chronic_conditions,
                last_visit_date: p.last_visit_date,
            }
        })
        .collect()
}

pub fn derive_providers(rows: Vec<CleanedProvider>) -> Vec<Provider> {
    rows.into_iter()
        .map(|p| Provider {
            hospital_size: HospitalSize::from_beds(p.beds),
            full_address: format!("{}, {}", p.city, p.state),
            // Performance metrics are recomputed from claims after load.
            avg_cost: 0.0,
            readmission_rate: 0.0,
            patient_volume: 0,
            provider_id: p.provider_id,
            hospital_name: p.hospital_name,
            provider_type: p.provider_type,
            state: p.state,
            city: p.city,
            beds: p.beds,
            teaching_hospital: p.teaching_hospital,
        })
        .collect()
}

pub fn derive_prescriptions(rows: Vec<CleanedPrescription>) -> Vec<Prescription> {
    rows.into_iter()
        .map(|rx| {
            let rate = adherence_rate(rx.days_supplied, rx.days_prescribed);
            Prescription {
                adherence_rate: rate,
                adherence_category: AdherenceCategory::from_rate(rate),
                cost_per_day: rx.cost / rx.days_supplied as f64,
                medication_category: medication_category(&rx.medication_name).to_string(),
                prescription_month: rx.prescription_date.map(|d| d.month()),
                prescription_quarter: rx.prescription_date.map(|d| quarter(d.month())),
                prescription_year: rx.prescription_date.map(|d| d.year()),
                prescription_id: rx.prescription_id,
                patient_id: rx.patient_id,
                provider_id: rx.provider_id,
                medication_name: rx.medication_name,
                prescription_date: rx.prescription_date,
                days_supplied: rx.days_supplied,
                days_prescribed: rx.days_prescribed,
                quantity: rx.quantity,
                cost: rx.cost,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn readmission_within_window_flags_true() {
        // 15 days after discharge: inside the 30-day window.
        assert!(readmission_flag(
            Some(date(2024, 1, 5)),
            Some(date(2024, 1, 20))
        ));
    }

    #[test]
    fn readmission_outside_window_flags_false() {
        // 40 days after discharge: outside the window.
        assert!(!readmission_flag(
            Some(date(2024, 1, 5)),
            Some(date(2024, 2, 14))
        ));
    }

    #[test]
    fn readmission_boundaries() {
        let discharge = Some(date(2024, 1, 1));
        assert!(!readmission_flag(discharge, Some(date(2024, 1, 1)))); // 0 days
        assert!(readmission_flag(discharge, Some(date(2024, 1, 2)))); // 1 day
        assert!(readmission_flag(discharge, Some(date(2024, 1, 31)))); // 30 days
        assert!(!readmission_flag(discharge, Some(date(2024, 2, 1)))); // 31 days
        assert!(!readmission_flag(discharge, Some(date(2023, 12, 20)))); // before discharge
        assert!(!readmission_flag(discharge, None));
        assert!(!readmission_flag(None, Some(date(2024, 1, 10))));
    }

    #[test]
    fn adherence_is_clipped_to_unit_interval() {
        assert_eq!(adherence_rate(90, 30), 1.0);
        assert_eq!(adherence_rate(15, 30), 0.5);
        assert_eq!(adherence_rate(0, 30), 0.0);
        assert_eq!(adherence_rate(30, 0), 0.0);
    }

    #[test]
    fn oversupplied_prescription_is_good_adherence() {
        let cleaned = CleanedPrescription {
            prescription_id: 1,
            patient_id: 1,
            provider_id: 1,
            medication_name: "Metformin".to_string(),
            prescription_date: Some(date(2024, 5, 10)),
            days_supplied: 90,
            days_prescribed: 30,
            quantity: 180,
            cost: 45.0,
        };
        let derived = derive_prescriptions(vec![cleaned]);
        assert_eq!(derived[0].adherence_rate, 1.0);
        assert_eq!(derived[0].adherence_category, AdherenceCategory::Good);
        assert_eq!(derived[0].medication_category, "Diabetes");
        assert_eq!(derived[0].prescription_quarter, Some(2));
    }

    #[test]
    fn claim_derivation_fills_every_column() {
        let cleaned = CleanedClaim {
            claim_id: 1,
            patient_id: 2,
            provider_id: 3,
            admission_date: Some(date(2024, 1, 1)),
            discharge_date: Some(date(2024, 1, 5)),
            diagnosis_code: Some("E11.9".to_string()),
            procedure_code: Some("99213".to_string()),
            cost: 4000.0,
            insurance_type: "Medicare".to_string(),
            length_of_stay: 4,
            readmission_date: Some(date(2024, 1, 20)),
        };
        let derived = derive_claims(vec![cleaned]);
        let claim = &derived[0];
        assert!(claim.readmission_flag);
        assert_eq!(claim.cost_per_day, 800.0);
        assert_eq!(claim.cost_category, CostCategory::Medium);
        assert_eq!(claim.los_category, LosCategory::Medium);
        assert_eq!(claim.admission_month, Some(1));
        assert_eq!(claim.admission_quarter, Some(1));
        assert_eq!(claim.admission_year, Some(2024));
    }

    #[test]
    fn patient_status_is_anchored_to_as_of_date() {
        let make = |last_visit: Option<NaiveDate>| CleanedPatient {
            patient_id: 1,
            age: 45,
            gender: crate::domain::Gender::Male,
            race: "Other".to_string(),
            zip_code: "10001".to_string(),
            insurance_type: "Private".to_string(),
            chronic_conditions: 3,
            last_visit_date: last_visit,
        };
        let as_of = date(2024, 6, 1);
        let derived = derive_patients(
            vec![
                make(Some(date(2024, 5, 1))),
                make(Some(date(2023, 9, 1))),
                make(Some(date(2022, 1, 1))),
                make(None),
            ],
            as_of,
        );
        assert_eq!(derived[0].patient_status, PatientStatus::Active);
        assert_eq!(derived[1].patient_status, PatientStatus::Inactive);
        assert_eq!(derived[2].patient_status, PatientStatus::Dormant);
        assert_eq!(derived[3].patient_status, PatientStatus::Dormant);
        assert_eq!(derived[0].risk_level, RiskLevel::High);
        assert_eq!(derived[0].age_category, AgeCategory::Adult);
    }

    #[test]
    fn provider_derivation_builds_address_and_size() {
        let cleaned = CleanedProvider {
            provider_id: 9,
            hospital_name: "Memorial Medical".to_string(),
            provider_type: "Hospital".to_string(),
            state: "TX".to_string(),
            city: "Austin".to_string(),
            beds: 450,
            teaching_hospital: true,
        };
        let derived = derive_providers(vec![cleaned]);
        assert_eq!(derived[0].full_address, "Austin, TX");
        assert_eq!(derived[0].hospital_size, HospitalSize::Large);
        assert_eq!(derived[0].avg_cost, 0.0);
        assert_eq!(derived[0].patient_volume, 0);
    }
}
