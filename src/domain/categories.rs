use serde::{Deserialize, Serialize};

/// Claim cost bucket. Boundaries are left-exclusive/right-inclusive:
/// [0,1000] Low, (1000,5000] Medium, (5000,15000] High, above Very High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostCategory {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl CostCategory {
    pub fn from_cost(cost: f64) -> Self {
        if cost <= 1000.0 {
            CostCategory::Low
        } else if cost <= 5000.0 {
            CostCategory::Medium
        } else if cost <= 15000.0 {
            CostCategory::High
        } else {
            CostCategory::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Low => "Low",
            CostCategory::Medium => "Medium",
            CostCategory::High => "High",
            CostCategory::VeryHigh => "Very High",
        }
    }
}

/// Length-of-stay bucket: [0,1] Same Day, (1,3] Short, (3,7] Medium, above Long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LosCategory {
    #[serde(rename = "Same Day")]
    SameDay,
    Short,
    Medium,
    Long,
}

impl LosCategory {
    pub fn from_days(days: i64) -> Self {
        if days <= 1 {
            LosCategory::SameDay
        } else if days <= 3 {
            LosCategory::Short
        } else if days <= 7 {
            LosCategory::Medium
        } else {
            LosCategory::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LosCategory::SameDay => "Same Day",
            LosCategory::Short => "Short",
            LosCategory::Medium => "Medium",
            LosCategory::Long => "Long",
        }
    }
}

/// Patient age bucket. Total over the valid age range [0,120]: ages past the
/// nominal 100 upper bound still map to Senior so the bucketing never gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeCategory {
    Pediatric,
    #[serde(rename = "Young Adult")]
    YoungAdult,
    Adult,
    #[serde(rename = "Middle Age")]
    MiddleAge,
    Senior,
}

impl AgeCategory {
    pub fn from_age(age: i64) -> Self {
        if age <= 18 {
            AgeCategory::Pediatric
        } else if age <= 35 {
            AgeCategory::YoungAdult
        } else if age <= 50 {
            AgeCategory::Adult
        } else if age <= 65 {
            AgeCategory::MiddleAge
        } else {
            AgeCategory::Senior
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeCategory::Pediatric => "Pediatric",
            AgeCategory::YoungAdult => "Young Adult",
            AgeCategory::Adult => "Adult",
            AgeCategory::MiddleAge => "Middle Age",
            AgeCategory::Senior => "Senior",
        }
    }
}

/// Risk stratification from chronic condition count: 0 Low, 1-2 Medium,
/// 3-4 High, 5+ Very High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub fn from_chronic_conditions(count: i64) -> Self {
        if count <= 0 {
            RiskLevel::Low
        } else if count <= 2 {
            RiskLevel::Medium
        } else if count <= 4 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

/// Medication adherence bucket over the clipped rate:
/// [0,0.5] Poor, (0.5,0.8] Fair, (0.8,1.0] Good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdherenceCategory {
    Poor,
    Fair,
    Good,
}

impl AdherenceCategory {
    pub fn from_rate(rate: f64) -> Self {
        if rate <= 0.5 {
            AdherenceCategory::Poor
        } else if rate <= 0.8 {
            AdherenceCategory::Fair
        } else {
            AdherenceCategory::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdherenceCategory::Poor => "Poor",
            AdherenceCategory::Fair => "Fair",
            AdherenceCategory::Good => "Good",
        }
    }
}

/// Engagement status from days since last visit: within 90 days Active,
/// within a year Inactive, beyond that (or never seen) Dormant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    Inactive,
    Dormant,
}

impl PatientStatus {
    pub fn from_days_since_visit(days: Option<i64>) -> Self {
        match days {
            Some(d) if d <= 90 => PatientStatus::Active,
            Some(d) if d <= 365 => PatientStatus::Inactive,
            _ => PatientStatus::Dormant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "Active",
            PatientStatus::Inactive => "Inactive",
            PatientStatus::Dormant => "Dormant",
        }
    }
}

/// Bed-count bucket: [0,100] Small, (100,300] Medium, (300,600] Large,
/// above Very Large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HospitalSize {
    Small,
    Medium,
    Large,
    #[serde(rename = "Very Large")]
    VeryLarge,
}

impl HospitalSize {
    pub fn from_beds(beds: i64) -> Self {
        if beds <= 100 {
            HospitalSize::Small
        } else if beds <= 300 {
            HospitalSize::Medium
        } else if beds <= 600 {
            HospitalSize::Large
        } else {
            HospitalSize::VeryLarge
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HospitalSize::Small => "Small",
            HospitalSize::Medium => "Medium",
            HospitalSize::Large => "Large",
            HospitalSize::VeryLarge => "Very Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Standardize the gender codings seen in source feeds. Anything
    /// unrecognized maps to Unknown rather than being rejected.
    pub fn standardize(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "M" | "MALE" | "1" => Gender::Male,
            "F" | "FEMALE" | "0" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_category_boundaries() {
        assert_eq!(CostCategory::from_cost(1.0), CostCategory::Low);
        assert_eq!(CostCategory::from_cost(1000.0), CostCategory::Low);
        assert_eq!(CostCategory::from_cost(1000.01), CostCategory::Medium);
        assert_eq!(CostCategory::from_cost(5000.0), CostCategory::Medium);
        assert_eq!(CostCategory::from_cost(15000.0), CostCategory::High);
        assert_eq!(CostCategory::from_cost(15000.01), CostCategory::VeryHigh);
    }

    #[test]
    fn los_category_boundaries() {
        assert_eq!(LosCategory::from_days(0), LosCategory::SameDay);
        assert_eq!(LosCategory::from_days(1), LosCategory::SameDay);
        assert_eq!(LosCategory::from_days(3), LosCategory::Short);
        assert_eq!(LosCategory::from_days(7), LosCategory::Medium);
        assert_eq!(LosCategory::from_days(8), LosCategory::Long);
    }

    #[test]
    fn age_bucketing_is_total_and_disjoint_over_valid_range() {
        // Every valid age maps to exactly one category; spot-check edges.
        for age in 0..=120 {
            let _ = AgeCategory::from_age(age);
        }
        assert_eq!(AgeCategory::from_age(0), AgeCategory::Pediatric);
        assert_eq!(AgeCategory::from_age(18), AgeCategory::Pediatric);
        assert_eq!(AgeCategory::from_age(19), AgeCategory::YoungAdult);
        assert_eq!(AgeCategory::from_age(35), AgeCategory::YoungAdult);
        assert_eq!(AgeCategory::from_age(50), AgeCategory::Adult);
        assert_eq!(AgeCategory::from_age(65), AgeCategory::MiddleAge);
        assert_eq!(AgeCategory::from_age(66), AgeCategory::Senior);
        assert_eq!(AgeCategory::from_age(120), AgeCategory::Senior);
    }

    #[test]
    fn risk_level_from_chronic_conditions() {
        assert_eq!(RiskLevel::from_chronic_conditions(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_chronic_conditions(1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_chronic_conditions(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_chronic_conditions(3), RiskLevel::High);
        assert_eq!(RiskLevel::from_chronic_conditions(4), RiskLevel::High);
        assert_eq!(RiskLevel::from_chronic_conditions(5), RiskLevel::VeryHigh);
    }

    #[test]
    fn adherence_category_boundaries() {
        assert_eq!(AdherenceCategory::from_rate(0.0), AdherenceCategory::Poor);
        assert_eq!(AdherenceCategory::from_rate(0.5), AdherenceCategory::Poor);
        assert_eq!(AdherenceCategory::from_rate(0.51), AdherenceCategory::Fair);
        assert_eq!(AdherenceCategory::from_rate(0.8), AdherenceCategory::Fair);
        assert_eq!(AdherenceCategory::from_rate(1.0), AdherenceCategory::Good);
    }

    #[test]
    fn patient_status_windows() {
        assert_eq!(
            PatientStatus::from_days_since_visit(Some(0)),
            PatientStatus::Active
        );
        assert_eq!(
            PatientStatus::from_days_since_visit(Some(90)),
            PatientStatus::Active
        );
        assert_eq!(
            PatientStatus::from_days_since_visit(Some(91)),
            PatientStatus::Inactive
        );
        assert_eq!(
            PatientStatus::from_days_since_visit(Some(365)),
            PatientStatus::Inactive
        );
        assert_eq!(
            PatientStatus::from_days_since_visit(Some(366)),
            PatientStatus::Dormant
        );
        assert_eq!(
            PatientStatus::from_days_since_visit(None),
            PatientStatus::Dormant
        );
    }

    #[test]
    fn hospital_size_boundaries() {
        assert_eq!(HospitalSize::from_beds(100), HospitalSize::Small);
        assert_eq!(HospitalSize::from_beds(101), HospitalSize::Medium);
        assert_eq!(HospitalSize::from_beds(300), HospitalSize::Medium);
        assert_eq!(HospitalSize::from_beds(600), HospitalSize::Large);
        assert_eq!(HospitalSize::from_beds(601), HospitalSize::VeryLarge);
    }

    #[test]
    fn gender_standardization() {
        assert_eq!(Gender::standardize("M"), Gender::Male);
        assert_eq!(Gender::standardize("male"), Gender::Male);
        assert_eq!(Gender::standardize("FEMALE"), Gender::Female);
        assert_eq!(Gender::standardize(" f "), Gender::Female);
        assert_eq!(Gender::standardize("1"), Gender::Male);
        assert_eq!(Gender::standardize("0"), Gender::Female);
        assert_eq!(Gender::standardize("nonbinary"), Gender::Unknown);
        assert_eq!(Gender::standardize(""), Gender::Unknown);
    }

    #[test]
    fn multiword_variants_serialize_with_spaces() {
        let json = serde_json::to_string(&CostCategory::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
        let back: CostCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CostCategory::VeryHigh);
        assert_eq!(
            serde_json::to_string(&LosCategory::SameDay).unwrap(),
            "\"Same Day\""
        );
    }
}
