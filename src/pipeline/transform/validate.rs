use tracing::{info, warn};

use crate::domain::{Claim, Entity, Patient};
use crate::error::{EtlError, Result};

// Validation gate: required columns are a hard failure for the entity's
// transform; range plausibility checks only warn.

/// Soft ceiling for a single claim; anything above is flagged for review.
pub const COST_WARNING_CEILING: f64 = 1_000_000.0;

pub fn required_columns(entity: Entity) -> &'static [&'static str] {
    match entity {
        Entity::Claims => &["claim_id", "patient_id", "provider_id", "diagnosis_code", "cost"],
        Entity::Patients => &["patient_id", "age", "gender"],
        Entity::Providers => &["provider_id", "hospital_name", "state"],
        Entity::Prescriptions => &["prescription_id", "patient_id", "medication_name", "cost"],
    }
}

/// Hard gate: every required column must have been present in the bronze
/// column set. A structurally deficient source fails the entity's transform.
pub fn check_required_columns(entity: Entity, columns: &[String]) -> Result<()> {
    let missing: Vec<String> = required_columns(entity)
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EtlError::Validation { entity, missing });
    }
    Ok(())
}

pub fn soft_check_claims(rows: &[Claim]) {
    if rows.iter().any(|c| c.cost > COST_WARNING_CEILING) {
        warn!("Found extremely high costs in claims data");
    }
    info!("Claims data validation completed");
}

pub fn soft_check_patients(rows: &[Patient]) {
    if rows.iter().any(|p| !(0..=120).contains(&p.age)) {
        warn!("Found unreasonable ages in patients data");
    }
    info!("Patients data validation completed");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn full_column_set_passes() {
        let cols = columns(&[
            "claim_id",
            "patient_id",
            "provider_id",
            "diagnosis_code",
            "cost",
            "length_of_stay",
        ]);
        assert!(check_required_columns(Entity::Claims, &cols).is_ok());
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let cols = columns(&["claim_id", "patient_id", "provider_id", "cost"]);
        let err = check_required_columns(Entity::Claims, &cols).unwrap_err();
        match err {
            EtlError::Validation { entity, missing } => {
                assert_eq!(entity, Entity::Claims);
                assert_eq!(missing, vec!["diagnosis_code".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_entity_has_required_columns() {
        for entity in Entity::ALL {
            assert!(!required_columns(entity).is_empty());
        }
    }
}
