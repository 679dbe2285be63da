use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{RawClaim, RawPatient, RawPrescription, RawProvider};
use crate::reference::{DIAGNOSIS_REF, MEDICATIONS};

// Deterministic fixture datasets for environments without live feeds. Each
// generator reseeds its own RNG so the four entities are independently
// reproducible, run after run.

pub const FIXTURE_SEED: u64 = 42;

pub const CLAIM_COUNT: usize = 10_000;
pub const PATIENT_COUNT: usize = 5_000;
pub const PROVIDER_COUNT: usize = 100;
pub const PRESCRIPTION_COUNT: usize = 15_000;

const PROCEDURE_CODES: [&str; 8] = [
    "99213", "99214", "99215", "99281", "99282", "99283", "99284", "99285",
];

const INSURANCE_TYPES: [&str; 4] = ["Medicare", "Medicaid", "Private", "Self-Pay"];

const RACES: [&str; 5] = ["White", "Black", "Hispanic", "Asian", "Other"];

const HOSPITAL_NAMES: [&str; 10] = [
    "General Hospital",
    "City Medical Center",
    "Regional Health System",
    "University Hospital",
    "Community Health Center",
    "Metro General",
    "St. Mary's Hospital",
    "Children's Hospital",
    "Memorial Medical",
    "Valley Regional Hospital",
];

const PROVIDER_TYPES: [&str; 4] = ["Hospital", "Clinic", "Emergency", "Specialty"];

const STATES: [&str; 10] = ["CA", "NY", "TX", "FL", "IL", "PA", "OH", "GA", "NC", "MI"];

fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("static date")
}

/// Uniform date in the 2020-2023 generation window.
fn window_date(rng: &mut StdRng) -> NaiveDate {
    window_start() + Duration::days(rng.gen_range(0..1461))
}

/// Exponentially distributed sample via inverse transform.
fn exp_sample(rng: &mut StdRng, mean: f64) -> f64 {
    -mean * (1.0 - rng.gen::<f64>()).ln()
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

pub fn claims() -> Vec<RawClaim> {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
    let mut rows = Vec::with_capacity(CLAIM_COUNT);
    for claim_id in 1..=CLAIM_COUNT as i64 {
        let admission = window_date(&mut rng);
        let length_of_stay = rng.gen_range(0..=14i64);
        let discharge = admission + Duration::days(length_of_stay);
        // Roughly 15% of stays are followed by a readmission; the gap spans
        // the 30-day qualifying window on both sides.
        let readmission_date = if rng.gen_bool(0.15) {
            Some(discharge + Duration::days(rng.gen_range(1..=45)))
        } else {
            None
        };
        rows.push(RawClaim {
            claim_id: Some(claim_id.to_string()),
            patient_id: Some(rng.gen_range(1..=PATIENT_COUNT as i64).to_string()),
            provider_id: Some(rng.gen_range(1..=PROVIDER_COUNT as i64).to_string()),
            admission_date: Some(admission.to_string()),
            discharge_date: Some(discharge.to_string()),
            diagnosis_code: Some(
                DIAGNOSIS_REF[rng.gen_range(0..DIAGNOSIS_REF.len())]
                    .0
                    .to_string(),
            ),
            procedure_code: Some(pick(&mut rng, &PROCEDURE_CODES).to_string()),
            cost: Some(format!("{:.2}", exp_sample(&mut rng, 5000.0))),
            insurance_type: Some(pick(&mut rng, &INSURANCE_TYPES).to_string()),
            length_of_stay: Some(length_of_stay.to_string()),
            readmission_date: readmission_date.map(|d| d.to_string()),
        });
    }
    rows
}

pub fn patients() -> Vec<RawPatient> {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
    let mut rows = Vec::with_capacity(PATIENT_COUNT);
    for patient_id in 1..=PATIENT_COUNT as i64 {
        rows.push(RawPatient {
            patient_id: Some(patient_id.to_string()),
            age: Some(rng.gen_range(18..100i64).to_string()),
            gender: Some(pick(&mut rng, &["Male", "Female"]).to_string()),
            race: Some(pick(&mut rng, &RACES).to_string()),
            zip_code: Some(rng.gen_range(10000..99999i64).to_string()),
            insurance_type: Some(pick(&mut rng, &INSURANCE_TYPES).to_string()),
            chronic_conditions: Some(rng.gen_range(0..=5i64).to_string()),
            last_visit_date: Some(window_date(&mut rng).to_string()),
        });
    }
    rows
}

pub fn providers() -> Vec<RawProvider> {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
    let mut rows = Vec::with_capacity(PROVIDER_COUNT);
    for provider_id in 1..=PROVIDER_COUNT as i64 {
        rows.push(RawProvider {
            provider_id: Some(provider_id.to_string()),
            hospital_name: Some(pick(&mut rng, &HOSPITAL_NAMES).to_string()),
            provider_type: Some(pick(&mut rng, &PROVIDER_TYPES).to_string()),
            state: Some(pick(&mut rng, &STATES).to_string()),
            city: Some(format!("City_{provider_id}")),
            beds: Some(rng.gen_range(50..1000i64).to_string()),
            teaching_hospital: Some(rng.gen_bool(0.5).to_string()),
        });
    }
    rows
}

pub fn prescriptions() -> Vec<RawPrescription> {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
    let mut rows = Vec::with_capacity(PRESCRIPTION_COUNT);
    for prescription_id in 1..=PRESCRIPTION_COUNT as i64 {
        rows.push(RawPrescription {
            prescription_id: Some(prescription_id.to_string()),
            patient_id: Some(rng.gen_range(1..=PATIENT_COUNT as i64).to_string()),
            provider_id: Some(rng.gen_range(1..=PROVIDER_COUNT as i64).to_string()),
            medication_name: Some(
                MEDICATIONS[rng.gen_range(0..MEDICATIONS.len())].1.to_string(),
            ),
            prescription_date: Some(window_date(&mut rng).to_string()),
            days_supplied: Some(rng.gen_range(7..90i64).to_string()),
            days_prescribed: Some(rng.gen_range(7..90i64).to_string()),
            quantity: Some(rng.gen_range(30..500i64).to_string()),
            cost: Some(format!("{:.2}", exp_sample(&mut rng, 50.0))),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = claims();
        let b = claims();
        assert_eq!(a.len(), CLAIM_COUNT);
        assert_eq!(a[0].cost, b[0].cost);
        assert_eq!(a[4999].admission_date, b[4999].admission_date);
    }

    #[test]
    fn claim_dates_are_ordered() {
        for claim in claims().iter().take(500) {
            let admission: chrono::NaiveDate = claim.admission_date.as_ref().unwrap().parse().unwrap();
            let discharge: chrono::NaiveDate = claim.discharge_date.as_ref().unwrap().parse().unwrap();
            assert!(discharge >= admission);
            if let Some(readmission) = &claim.readmission_date {
                let readmission: chrono::NaiveDate = readmission.parse().unwrap();
                assert!(readmission > discharge);
            }
        }
    }

    #[test]
    fn some_claims_carry_readmissions() {
        let rows = claims();
        let with_readmission = rows.iter().filter(|c| c.readmission_date.is_some()).count();
        // Seeded at ~15%; leave generous slack either side.
        assert!(with_readmission > CLAIM_COUNT / 10);
        assert!(with_readmission < CLAIM_COUNT / 4);
    }

    #[test]
    fn fixture_ids_are_unique() {
        let rows = patients();
        let mut ids: Vec<_> = rows.iter().map(|p| p.patient_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), PATIENT_COUNT);
    }
}
