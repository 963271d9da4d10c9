//! Group-by and pivot summaries over the enriched portfolio.

use anyhow::Result;
use polars::lazy::frame::pivot::pivot_stable;
use polars::prelude::*;

use crate::portfolio::columns;

const POLICY_COUNT: &str = "Policy Count";
const TOTAL_TSI: &str = "Total TSI";
const TOTAL_PML: &str = "Total PML";
const SEGMENT: &str = "Segment";

/// The three UY x (occupancy, risk) pivots, one wide table per measure.
#[derive(Debug)]
pub struct SegmentPivots {
    pub policy_count: DataFrame,
    pub total_tsi: DataFrame,
    pub total_pml: DataFrame,
}

/// Policy count per risk category, most-populated first.
pub fn risk_distribution(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.clone().lazy()
        .group_by([col(columns::RISK_CATEGORY)])
        .agg([len().alias(POLICY_COUNT)])
        .sort([POLICY_COUNT], SortMultipleOptions::default().with_order_descending(true))
        .collect()?)
}

/// Policy count, total TSI and total PML grouped by one key column.
fn totals_by(df: &DataFrame, key: &str) -> Result<DataFrame> {
    Ok(df.clone().lazy()
        .group_by([col(key)])
        .agg([
            len().alias(POLICY_COUNT),
            col(columns::TSI).sum().alias(TOTAL_TSI),
            col(columns::PML).sum().alias(TOTAL_PML),
        ])
        .sort([key], SortMultipleOptions::default())
        .collect()?)
}

/// Totals per underwriting year.
pub fn by_underwriting_year(df: &DataFrame) -> Result<DataFrame> {
    totals_by(df, columns::UY)
}

/// Totals per occupancy category.
pub fn by_occupancy(df: &DataFrame) -> Result<DataFrame> {
    totals_by(df, columns::OCCUPANCY)
}

/// Totals per risk category.
pub fn by_risk_category(df: &DataFrame) -> Result<DataFrame> {
    totals_by(df, columns::RISK_CATEGORY)
}

/// UY rows x risk-category columns, carrying count, total TSI and total PML;
/// cells without policies are filled with zero.
pub fn uy_by_risk(df: &DataFrame) -> Result<DataFrame> {
    let summary = df.clone().lazy()
        .group_by([col(columns::UY), col(columns::RISK_CATEGORY)])
        .agg([
            len().alias(POLICY_COUNT),
            col(columns::TSI).sum().alias(TOTAL_TSI),
            col(columns::PML).sum().alias(TOTAL_PML),
        ])
        .collect()?;

    let wide = pivot_stable(
        &summary,
        [columns::RISK_CATEGORY],
        Some([columns::UY]),
        Some([POLICY_COUNT, TOTAL_TSI, TOTAL_PML]),
        true,
        None,
        None,
    )?;

    Ok(wide.lazy()
        .fill_null(lit(0u32))
        .sort([columns::UY], SortMultipleOptions::default())
        .collect()?)
}

/// UY rows x (occupancy / risk-category) segment columns, one wide table per
/// measure; cells without policies are filled with zero.
pub fn uy_by_occupancy_and_risk(df: &DataFrame) -> Result<SegmentPivots> {
    let summary = df.clone().lazy()
        .with_column(
            concat_str([col(columns::OCCUPANCY), col(columns::RISK_CATEGORY)], " / ", true)
                .alias(SEGMENT),
        )
        .group_by([col(columns::UY), col(SEGMENT)])
        .agg([
            len().alias(POLICY_COUNT),
            col(columns::TSI).sum().alias(TOTAL_TSI),
            col(columns::PML).sum().alias(TOTAL_PML),
        ])
        .collect()?;

    let pivot_measure = |measure: &str| -> Result<DataFrame> {
        let wide = pivot_stable(
            &summary,
            [SEGMENT],
            Some([columns::UY]),
            Some([measure]),
            true,
            None,
            None,
        )?;
        Ok(wide.lazy()
            .fill_null(lit(0u32))
            .sort([columns::UY], SortMultipleOptions::default())
            .collect()?)
    };

    Ok(SegmentPivots {
        policy_count: pivot_measure(POLICY_COUNT)?,
        total_tsi: pivot_measure(TOTAL_TSI)?,
        total_pml: pivot_measure(TOTAL_PML)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched_frame() -> DataFrame {
        df! {
            columns::UY => [2023i64, 2023, 2024, 2024, 2024],
            columns::OCCUPANCY => ["Residential", "Commercial", "Residential", "Residential", "Industrial"],
            columns::RISK_CATEGORY => ["High", "Low", "High", "No Risk", "Medium"],
            columns::TSI => [1000.0, 2000.0, 3000.0, 4000.0, 5000.0],
            columns::PML => [500.0, 300.0, 1500.0, 0.0, 1000.0],
        }.unwrap()
    }

    #[test]
    fn risk_distribution_counts_and_orders() {
        let dist = risk_distribution(&enriched_frame()).unwrap();
        assert_eq!(dist.height(), 4);

        let top_count = dist.column("Policy Count").unwrap().u32().unwrap().get(0).unwrap();
        assert_eq!(top_count, 2); // High appears twice

        let total: u32 = dist.column("Policy Count").unwrap().u32().unwrap().into_no_null_iter().sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn uy_totals_sum_tsi_and_pml() {
        let by_uy = by_underwriting_year(&enriched_frame()).unwrap();
        assert_eq!(by_uy.height(), 2);

        let uy: Vec<i64> = by_uy.column(columns::UY).unwrap().i64().unwrap().into_no_null_iter().collect();
        assert_eq!(uy, vec![2023, 2024]);

        let tsi: Vec<f64> = by_uy.column("Total TSI").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(tsi, vec![3000.0, 12000.0]);

        let pml: Vec<f64> = by_uy.column("Total PML").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(pml, vec![800.0, 2500.0]);
    }

    #[test]
    fn occupancy_totals_cover_every_category_present() {
        let by_occ = by_occupancy(&enriched_frame()).unwrap();
        assert_eq!(by_occ.height(), 3);

        let keys: Vec<&str> = by_occ.column(columns::OCCUPANCY).unwrap()
            .str().unwrap().into_no_null_iter().collect();
        assert_eq!(keys, vec!["Commercial", "Industrial", "Residential"]);
    }

    #[test]
    fn uy_by_risk_pivot_is_one_row_per_uy() {
        let wide = uy_by_risk(&enriched_frame()).unwrap();
        assert_eq!(wide.height(), 2);
        // UY index plus three measures for each of the four categories present.
        assert_eq!(wide.width(), 1 + 3 * 4);
        assert_eq!(wide.column(columns::UY).unwrap().null_count(), 0);
    }

    #[test]
    fn segment_pivots_fill_missing_cells_with_zero() {
        let pivots = uy_by_occupancy_and_risk(&enriched_frame()).unwrap();
        assert_eq!(pivots.policy_count.height(), 2);

        // 2023 has no "Industrial / Medium" policies; the cell exists and is zero.
        let col = pivots.policy_count.column("Industrial / Medium").unwrap();
        assert_eq!(col.null_count(), 0);
        let values: Vec<u32> = col.u32().unwrap().into_no_null_iter().collect();
        assert_eq!(values, vec![0, 1]);
    }
}
