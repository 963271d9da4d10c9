use serde::{Deserialize, Serialize};

/// Flood-risk category of an insured location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "No Risk")]
    NoRisk,     // No zone intersection, or an unrecognized grid code
    Low,        // Grid code 1
    Medium,     // Grid code 2
    High,       // Grid code 3
}

impl RiskCategory {
    /// Map a zone grid code to a risk category; anything outside 1..=3 is No Risk.
    pub fn from_grid_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => RiskCategory::Low,
            Some(2) => RiskCategory::Medium,
            Some(3) => RiskCategory::High,
            _ => RiskCategory::NoRisk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::NoRisk => "No Risk",
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

/// Occupancy category of the insured building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Occupancy {
    Residential,
    Commercial,
    Industrial,
}

impl Occupancy {
    /// Parse an occupancy value, case-insensitively; unknown values are `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "residential" => Some(Occupancy::Residential),
            "commercial" => Some(Occupancy::Commercial),
            "industrial" => Some(Occupancy::Industrial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Occupancy::Residential => "Residential",
            Occupancy::Commercial => "Commercial",
            Occupancy::Industrial => "Industrial",
        }
    }
}

/// Floor-count bucket of the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloorBucket {
    #[serde(rename = "1 floor")]
    One,
    #[serde(rename = "more than 1")]
    MoreThanOne,
}

impl FloorBucket {
    /// Bucket a normalized floor count (truncated before comparison).
    pub fn from_count(floors: f64) -> Self {
        if floors.trunc() as i64 == 1 { FloorBucket::One } else { FloorBucket::MoreThanOne }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_codes_map_to_categories() {
        assert_eq!(RiskCategory::from_grid_code(Some(1)), RiskCategory::Low);
        assert_eq!(RiskCategory::from_grid_code(Some(2)), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_grid_code(Some(3)), RiskCategory::High);
        assert_eq!(RiskCategory::from_grid_code(Some(7)), RiskCategory::NoRisk);
        assert_eq!(RiskCategory::from_grid_code(None), RiskCategory::NoRisk);
    }

    #[test]
    fn occupancy_parse_is_case_insensitive() {
        assert_eq!(Occupancy::parse(" residential "), Some(Occupancy::Residential));
        assert_eq!(Occupancy::parse("COMMERCIAL"), Some(Occupancy::Commercial));
        assert_eq!(Occupancy::parse("Industrial"), Some(Occupancy::Industrial));
        assert_eq!(Occupancy::parse("warehouse"), None);
        assert_eq!(Occupancy::parse(""), None);
    }

    #[test]
    fn floors_bucket_on_truncated_count() {
        assert_eq!(FloorBucket::from_count(1.0), FloorBucket::One);
        assert_eq!(FloorBucket::from_count(1.9), FloorBucket::One);
        assert_eq!(FloorBucket::from_count(2.0), FloorBucket::MoreThanOne);
        assert_eq!(FloorBucket::from_count(0.5), FloorBucket::MoreThanOne);
    }
}
