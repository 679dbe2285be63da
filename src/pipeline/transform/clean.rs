use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::domain::categories::Gender;
use crate::domain::{RawClaim, RawPatient, RawPrescription, RawProvider};

// Cleaning: tolerant per-cell parses, primary-key dedup, text normalization,
// and the hard domain constraints. Rows failing a hard constraint are dropped
// and counted, never retried.

/// Cleaned claim prior to derivation. Derived columns are added by the
/// derive step, which is the only place columns are introduced.
#[derive(Debug, Clone)]
pub struct CleanedClaim {
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
}

#[derive(Debug, Clone)]
pub struct CleanedPatient {
    pub patient_id: i64,
    pub age: i64,
    pub gender: Gender,
    pub race: String,
    pub zip_code: String,
    pub insurance_type: String,
    pub chronic_conditions: i64,
    pub last_visit_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CleanedProvider {
    pub provider_id: i64,
    pub hospital_name: String,
    pub provider_type: String,
    pub state: String,
    pub city: String,
    pub beds: i64,
    pub teaching_hospital: bool,
}

#[derive(Debug, Clone)]
pub struct CleanedPrescription {
    pub prescription_id: i64,
    pub patient_id: i64,
    pub provider_id: i64,
    pub medication_name: String,
    pub prescription_date: Option<NaiveDate>,
    pub days_supplied: i64,
    pub days_prescribed: i64,
    pub quantity: i64,
    pub cost: f64,
}

/// Row accounting for one entity's cleaning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanStats {
    pub rows_in: usize,
    pub duplicates_removed: usize,
    pub rows_rejected: usize,
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Tolerant integer parse: whitespace and float-formatted integers are
/// accepted, anything else becomes None.
pub fn parse_i64(value: &Option<String>) -> Option<i64> {
    let s = text(value)?;
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

pub fn parse_f64(value: &Option<String>) -> Option<f64> {
    text(value)?.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Tolerant date parse over the formats seen in source feeds.
pub fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    let s = text(value)?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%m-%d-%Y"))
        .ok()
}

pub fn parse_bool(value: &Option<String>) -> Option<bool> {
    match text(value)?.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

static ICD_INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9.]").unwrap());

/// Normalize an ICD-style diagnosis code: uppercase, strip anything that is
/// not alphanumeric or a dot, and insert the dot after the three-character
/// prefix of a letter-led code that arrived without one.
pub fn clean_icd_code(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    let cleaned = ICD_INVALID.replace_all(&upper, "");
    if cleaned.is_empty() {
        return None;
    }
    let code = cleaned.into_owned();
    let starts_alpha = code.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if starts_alpha && !code.contains('.') && code.len() > 3 {
        Some(format!("{}.{}", &code[..3], &code[3..]))
    } else {
        Some(code)
    }
}

/// Title-case free text the way source systems rarely do: first letter of
/// each word upper, rest lower.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn clean_claims(rows: &[RawClaim]) -> (Vec<CleanedClaim>, CleanStats) {
    let mut stats = CleanStats {
        rows_in: rows.len(),
        ..CleanStats::default()
    };
    let mut seen: HashSet<i64> = HashSet::new();
    let mut cleaned = Vec::with_capacity(rows.len());

    for raw in rows {
        let Some(claim_id) = parse_i64(&raw.claim_id) else {
            stats.rows_rejected += 1;
            continue;
        };
        if !seen.insert(claim_id) {
            stats.duplicates_removed += 1;
            continue;
        }
        let (Some(patient_id), Some(provider_id)) =
            (parse_i64(&raw.patient_id), parse_i64(&raw.provider_id))
        else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(cost) = parse_f64(&raw.cost).filter(|c| *c > 0.0) else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(length_of_stay) =
            parse_i64(&raw.length_of_stay).filter(|d| (0..=365).contains(d))
        else {
            stats.rows_rejected += 1;
            continue;
        };

        cleaned.push(CleanedClaim {
            claim_id,
            patient_id,
            provider_id,
            admission_date: parse_date(&raw.admission_date),
            discharge_date: parse_date(&raw.discharge_date),
            diagnosis_code: text(&raw.diagnosis_code).and_then(clean_icd_code),
            procedure_code: text(&raw.procedure_code).map(|p| p.to_uppercase()),
            cost,
            insurance_type: text(&raw.insurance_type).unwrap_or("Unknown").to_string(),
            length_of_stay,
            readmission_date: parse_date(&raw.readmission_date),
        });
    }
    (cleaned, stats)
}

pub fn clean_patients(rows: &[RawPatient]) -> (Vec<CleanedPatient>, CleanStats) {
    let mut stats = CleanStats {
        rows_in: rows.len(),
        ..CleanStats::default()
    };
    let mut seen: HashSet<i64> = HashSet::new();
    let mut cleaned = Vec::with_capacity(rows.len());

    for raw in rows {
        let Some(patient_id) = parse_i64(&raw.patient_id) else {
            stats.rows_rejected += 1;
            continue;
        };
        if !seen.insert(patient_id) {
            stats.duplicates_removed += 1;
            continue;
        }
        let Some(age) = parse_i64(&raw.age).filter(|a| (0..=120).contains(a)) else {
            stats.rows_rejected += 1;
            continue;
        };

        let zip_code = text(&raw.zip_code)
            .map(|z| z.chars().take(5).collect())
            .unwrap_or_default();

        cleaned.push(CleanedPatient {
            patient_id,
            age,
            gender: text(&raw.gender).map(Gender::standardize).unwrap_or(Gender::Unknown),
            race: text(&raw.race).unwrap_or("Unknown").to_string(),
            zip_code,
            insurance_type: text(&raw.insurance_type).unwrap_or("Unknown").to_string(),
            chronic_conditions: parse_i64(&raw.chronic_conditions).unwrap_or(0).max(0),
            last_visit_date: parse_date(&raw.last_visit_date),
        });
    }
    (cleaned, stats)
}

pub fn clean_providers(rows: &[RawProvider]) -> (Vec<CleanedProvider>, CleanStats) {
    let mut stats = CleanStats {
        rows_in: rows.len(),
        ..CleanStats::default()
    };
    let mut seen: HashSet<i64> = HashSet::new();
    let mut cleaned = Vec::with_capacity(rows.len());

    for raw in rows {
        let Some(provider_id) = parse_i64(&raw.provider_id) else {
            stats.rows_rejected += 1;
            continue;
        };
        if !seen.insert(provider_id) {
            stats.duplicates_removed += 1;
            continue;
        }
        // A dimension row without a name or state cannot be joined against
        // downstream; reject rather than fabricate.
        let (Some(hospital_name), Some(state)) = (text(&raw.hospital_name), text(&raw.state))
        else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(beds) = parse_i64(&raw.beds).filter(|b| *b > 0) else {
            stats.rows_rejected += 1;
            continue;
        };

        cleaned.push(CleanedProvider {
            provider_id,
            hospital_name: title_case(hospital_name),
            provider_type: text(&raw.provider_type)
                .map(title_case)
                .unwrap_or_else(|| "Hospital".to_string()),
            state: state.to_uppercase(),
            city: text(&raw.city)
                .map(title_case)
                .unwrap_or_else(|| "Unknown".to_string()),
            beds,
            teaching_hospital: parse_bool(&raw.teaching_hospital).unwrap_or(false),
        });
    }
    (cleaned, stats)
}

pub fn clean_prescriptions(rows: &[RawPrescription]) -> (Vec<CleanedPrescription>, CleanStats) {
    let mut stats = CleanStats {
        rows_in: rows.len(),
        ..CleanStats::default()
    };
    let mut seen: HashSet<i64> = HashSet::new();
    let mut cleaned = Vec::with_capacity(rows.len());

    for raw in rows {
        let Some(prescription_id) = parse_i64(&raw.prescription_id) else {
            stats.rows_rejected += 1;
            continue;
        };
        if !seen.insert(prescription_id) {
            stats.duplicates_removed += 1;
            continue;
        }
        let (Some(patient_id), Some(provider_id)) =
            (parse_i64(&raw.patient_id), parse_i64(&raw.provider_id))
        else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(medication_name) = text(&raw.medication_name) else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(days_supplied) = parse_i64(&raw.days_supplied).filter(|v| *v > 0) else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(days_prescribed) = parse_i64(&raw.days_prescribed).filter(|v| *v > 0) else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(quantity) = parse_i64(&raw.quantity).filter(|v| *v > 0) else {
            stats.rows_rejected += 1;
            continue;
        };
        let Some(cost) = parse_f64(&raw.cost).filter(|c| *c > 0.0) else {
            stats.rows_rejected += 1;
            continue;
        };

        cleaned.push(CleanedPrescription {
            prescription_id,
            patient_id,
            provider_id,
            medication_name: title_case(medication_name),
            prescription_date: parse_date(&raw.prescription_date),
            days_supplied,
            days_prescribed,
            quantity,
            cost,
        });
    }
    (cleaned, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_claim(id: &str, cost: &str, los: &str) -> RawClaim {
        RawClaim {
            claim_id: Some(id.to_string()),
            patient_id: Some("10".to_string()),
            provider_id: Some("5".to_string()),
            cost: Some(cost.to_string()),
            length_of_stay: Some(los.to_string()),
            ..RawClaim::default()
        }
    }

    #[test]
    fn tolerant_parses_route_bad_cells_to_none() {
        assert_eq!(parse_i64(&Some("42".to_string())), Some(42));
        assert_eq!(parse_i64(&Some("42.0".to_string())), Some(42));
        assert_eq!(parse_i64(&Some("forty-two".to_string())), None);
        assert_eq!(parse_i64(&Some("  ".to_string())), None);
        assert_eq!(parse_i64(&None), None);
        assert_eq!(parse_f64(&Some("19.99".to_string())), Some(19.99));
        assert_eq!(parse_f64(&Some("NaN".to_string())), None);
        assert_eq!(parse_date(&Some("2024-01-05".to_string())), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date(&Some("01/05/2024".to_string())), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date(&Some("not a date".to_string())), None);
        assert_eq!(parse_bool(&Some("True".to_string())), Some(true));
        assert_eq!(parse_bool(&Some("0".to_string())), Some(false));
        assert_eq!(parse_bool(&Some("maybe".to_string())), None);
    }

    #[test]
    fn icd_codes_are_normalized() {
        assert_eq!(clean_icd_code("e11.9"), Some("E11.9".to_string()));
        assert_eq!(clean_icd_code(" i2510 "), Some("I25.10".to_string()));
        assert_eq!(clean_icd_code("I10"), Some("I10".to_string()));
        assert_eq!(clean_icd_code("M54-5"), Some("M54.5".to_string()));
        assert_eq!(clean_icd_code("!!"), None);
    }

    #[test]
    fn negative_cost_rows_are_dropped() {
        let rows = vec![raw_claim("1", "-50.0", "2"), raw_claim("2", "120.0", "2")];
        let (cleaned, stats) = clean_claims(&rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].claim_id, 2);
        assert_eq!(stats.rows_in, 2);
        assert_eq!(stats.rows_rejected, 1);
        assert!(stats.rows_in - cleaned.len() >= 1);
    }

    #[test]
    fn out_of_range_length_of_stay_is_dropped() {
        let rows = vec![raw_claim("1", "100.0", "366"), raw_claim("2", "100.0", "365")];
        let (cleaned, stats) = clean_claims(&rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.rows_rejected, 1);
    }

    #[test]
    fn duplicate_primary_keys_are_removed() {
        let rows = vec![
            raw_claim("7", "100.0", "1"),
            raw_claim("7", "200.0", "2"),
            raw_claim("8", "300.0", "3"),
        ];
        let (cleaned, stats) = clean_claims(&rows);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(stats.duplicates_removed, 1);
        // First occurrence wins
        assert_eq!(cleaned[0].cost, 100.0);
    }

    #[test]
    fn patient_age_bounds_are_enforced() {
        let make = |id: &str, age: &str| RawPatient {
            patient_id: Some(id.to_string()),
            age: Some(age.to_string()),
            gender: Some("F".to_string()),
            ..RawPatient::default()
        };
        let rows = vec![make("1", "121"), make("2", "-1"), make("3", "0"), make("4", "120")];
        let (cleaned, stats) = clean_patients(&rows);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(stats.rows_rejected, 2);
        assert_eq!(cleaned[0].gender, Gender::Female);
    }

    #[test]
    fn provider_bed_count_must_be_positive() {
        let make = |id: &str, beds: &str| RawProvider {
            provider_id: Some(id.to_string()),
            hospital_name: Some("general hospital".to_string()),
            state: Some("wa".to_string()),
            beds: Some(beds.to_string()),
            ..RawProvider::default()
        };
        let rows = vec![make("1", "0"), make("2", "150")];
        let (cleaned, stats) = clean_providers(&rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.rows_rejected, 1);
        assert_eq!(cleaned[0].hospital_name, "General Hospital");
        assert_eq!(cleaned[0].state, "WA");
    }

    #[test]
    fn prescription_numeric_fields_must_be_positive() {
        let make = |id: &str, supplied: &str| RawPrescription {
            prescription_id: Some(id.to_string()),
            patient_id: Some("1".to_string()),
            provider_id: Some("1".to_string()),
            medication_name: Some("metformin".to_string()),
            days_supplied: Some(supplied.to_string()),
            days_prescribed: Some("30".to_string()),
            quantity: Some("60".to_string()),
            cost: Some("12.50".to_string()),
            ..RawPrescription::default()
        };
        let rows = vec![make("1", "0"), make("2", "30")];
        let (cleaned, stats) = clean_prescriptions(&rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.rows_rejected, 1);
        assert_eq!(cleaned[0].medication_name, "Metformin");
    }
}
