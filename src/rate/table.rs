use std::{collections::BTreeMap, fs::File, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rate::{FloorBucket, Occupancy, RiskCategory};

/// Loss rates for the two floor buckets of one (risk, occupancy) cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloorRates {
    #[serde(rename = "1 floor")]
    pub one_floor: f64,
    #[serde(rename = "more than 1")]
    pub more_than_one: f64,
}

/// Deterministic loss-rate table keyed by risk category, occupancy and floor
/// bucket. Keys absent from the table yield an undefined rate, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<RiskCategory, BTreeMap<Occupancy, FloorRates>>,
}

impl Default for RateTable {
    fn default() -> Self {
        let cells = [
            (RiskCategory::NoRisk, Occupancy::Residential, 0.00, 0.00),
            (RiskCategory::NoRisk, Occupancy::Commercial, 0.00, 0.00),
            (RiskCategory::NoRisk, Occupancy::Industrial, 0.00, 0.00),
            (RiskCategory::Low, Occupancy::Residential, 0.15, 0.10),
            (RiskCategory::Low, Occupancy::Commercial, 0.20, 0.15),
            (RiskCategory::Low, Occupancy::Industrial, 0.10, 0.08),
            (RiskCategory::Medium, Occupancy::Residential, 0.30, 0.20),
            (RiskCategory::Medium, Occupancy::Commercial, 0.35, 0.25),
            (RiskCategory::Medium, Occupancy::Industrial, 0.20, 0.15),
            (RiskCategory::High, Occupancy::Residential, 0.50, 0.35),
            (RiskCategory::High, Occupancy::Commercial, 0.55, 0.40),
            (RiskCategory::High, Occupancy::Industrial, 0.40, 0.30),
        ];

        let mut rates: BTreeMap<RiskCategory, BTreeMap<Occupancy, FloorRates>> = BTreeMap::new();
        for (risk, occupancy, one_floor, more_than_one) in cells {
            rates.entry(risk).or_default()
                .insert(occupancy, FloorRates { one_floor, more_than_one });
        }
        Self { rates }
    }
}

impl RateTable {
    /// Loads a rate-table override from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open rate table: {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse rate table: {}", path.display()))
    }

    /// Look up the loss rate for a key, `None` when the table has no entry.
    pub fn lookup(&self, risk: RiskCategory, occupancy: Occupancy, bucket: FloorBucket) -> Option<f64> {
        self.rates.get(&risk)
            .and_then(|by_occupancy| by_occupancy.get(&occupancy))
            .map(|cell| match bucket {
                FloorBucket::One => cell.one_floor,
                FloorBucket::MoreThanOne => cell.more_than_one,
            })
    }
}
