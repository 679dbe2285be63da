use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The known formulary, with the warehouse medication ids the schema seeds.
/// Id 0 is reserved as the sentinel for unresolved medication names and must
/// never be assigned to a real medication.
pub const MEDICATIONS: [(i64, &str); 10] = [
    (1, "Metformin"),
    (2, "Lisinopril"),
    (3, "Atorvastatin"),
    (4, "Metoprolol"),
    (5, "Omeprazole"),
    (6, "Amlodipine"),
    (7, "Hydrochlorothiazide"),
    (8, "Simvastatin"),
    (9, "Losartan"),
    (10, "Albuterol"),
];

/// Therapeutic class per medication name. Unmapped names fall back to
/// [`OTHER_CATEGORY`].
pub static MEDICATION_CATEGORIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Metformin", "Diabetes"),
        ("Lisinopril", "Cardiovascular"),
        ("Atorvastatin", "Cardiovascular"),
        ("Metoprolol", "Cardiovascular"),
        ("Omeprazole", "Gastrointestinal"),
        ("Amlodipine", "Cardiovascular"),
        ("Hydrochlorothiazide", "Cardiovascular"),
        ("Simvastatin", "Cardiovascular"),
        ("Losartan", "Cardiovascular"),
        ("Albuterol", "Respiratory"),
    ])
});

pub const OTHER_CATEGORY: &str = "Other";

pub fn medication_category(name: &str) -> &'static str {
    MEDICATION_CATEGORIES
        .get(name)
        .copied()
        .unwrap_or(OTHER_CATEGORY)
}

/// Diagnosis reference rows seeded into the warehouse `diagnosis_ref` table.
pub const DIAGNOSIS_REF: [(&str, &str); 14] = [
    ("E11.9", "Type 2 diabetes mellitus without complications"),
    ("I25.10", "Atherosclerotic heart disease"),
    ("F32.9", "Major depressive disorder, single episode"),
    ("M79.3", "Panniculitis, unspecified"),
    ("K21.9", "Gastro-esophageal reflux disease"),
    ("G43.909", "Migraine, unspecified"),
    ("M25.561", "Pain in right knee"),
    ("R06.02", "Shortness of breath"),
    ("Z87.891", "Personal history of nicotine dependence"),
    ("I10", "Essential hypertension"),
    ("E78.5", "Hyperlipidemia, unspecified"),
    ("M54.5", "Low back pain"),
    ("R50.9", "Fever, unspecified"),
    ("K59.00", "Constipation, unspecified"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_medications_map_to_categories() {
        assert_eq!(medication_category("Metformin"), "Diabetes");
        assert_eq!(medication_category("Albuterol"), "Respiratory");
        assert_eq!(medication_category("Omeprazole"), "Gastrointestinal");
    }

    #[test]
    fn unknown_medication_maps_to_other() {
        assert_eq!(medication_category("Experimentazol"), "Other");
    }

    #[test]
    fn sentinel_id_is_not_a_real_medication() {
        assert!(MEDICATIONS.iter().all(|(id, _)| *id != 0));
    }
}
