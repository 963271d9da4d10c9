//! The enrichment pipeline: clean coordinates, join zones, look up rates,
//! compute PML.

use anyhow::{Result, ensure};
use polars::prelude::*;

use crate::join::{coord_key, join_zones};
use crate::portfolio::{self, columns};
use crate::rate::{FloorBucket, Occupancy, RateTable, RiskCategory};
use crate::zone::ZoneLayer;

/// Result of enriching a portfolio: the enriched frame plus the rows whose
/// coordinates failed to parse (retained in the frame, null coordinates).
#[derive(Debug)]
pub struct Analysis {
    pub frame: DataFrame,
    pub invalid_coordinates: DataFrame,
}

/// Enrich a portfolio frame with risk categories, loss rates and PML.
///
/// The input frame must carry `Longitude`/`Latitude`, `Occupancy Category`,
/// `Floor Count` and `TSI` columns; missing columns halt with an error. Rows
/// that degrade (bad coordinates, no zone intersection, unknown occupancy)
/// stay in the output with default or null values.
pub fn enrich(
    mut df: DataFrame,
    layers: &[ZoneLayer],
    rates: &RateTable,
    verbose: u8,
) -> Result<Analysis> {
    ensure!(!layers.is_empty(), "no zone layers to join against");
    ensure!(
        layers.iter().any(|layer| layer.grid_field().is_some()),
        "no grid-code attribute found in any zone layer; cannot categorize risk"
    );
    portfolio::require_columns(&df, &[columns::LONGITUDE, columns::LATITUDE])?;

    // Coordinate cleaning. Failed rows keep null coordinates and are reported
    // separately; they never reach the spatial join.
    if verbose > 0 { eprintln!("[enrich] cleaning coordinates"); }
    let lon = portfolio::clean_column(&df, columns::LONGITUDE, portfolio::clean_coordinate)?;
    let lat = portfolio::clean_column(&df, columns::LATITUDE, portfolio::clean_coordinate)?;
    let (lon_invalid, lat_invalid) = (lon.null_count(), lat.null_count());

    let invalid_mask = lon.is_null() | lat.is_null();
    df.replace_or_add(columns::LONGITUDE.into(), lon.clone().into_series())?;
    df.replace_or_add(columns::LATITUDE.into(), lat.clone().into_series())?;
    let invalid_coordinates = df.filter(&invalid_mask)?;

    if lon_invalid > 0 || lat_invalid > 0 {
        eprintln!(
            "warning: {} latitude and {} longitude values failed to parse; {} rows excluded from the join",
            lat_invalid, lon_invalid, invalid_coordinates.height()
        );
    }

    // Spatial join over the de-duplicated coordinate pairs.
    if verbose > 0 { eprintln!("[enrich] joining {} zone layers", layers.len()); }
    let coords: Vec<(f64, f64)> = lon.into_iter().zip(lat.into_iter())
        .map(|(lon, lat)| (lon.unwrap_or(f64::NAN), lat.unwrap_or(f64::NAN)))
        .collect();
    let matched = join_zones(&coords, layers, verbose)?;

    let grid_codes: Vec<Option<i64>> = coords.iter()
        .map(|&(lon, lat)| matched.get(&coord_key(lon, lat)).copied().flatten())
        .collect();
    let risk: Vec<RiskCategory> = coords.iter()
        .map(|&(lon, lat)| match matched.get(&coord_key(lon, lat)) {
            Some(&code) => RiskCategory::from_grid_code(code),
            None => RiskCategory::NoRisk,
        })
        .collect();

    df.with_column(Int64Chunked::from_iter_options(
        columns::GRID_CODE.into(), grid_codes.into_iter(),
    ).into_series())?;
    df.with_column(
        risk.iter().map(|category| Some(category.as_str()))
            .collect::<StringChunked>()
            .with_name(columns::RISK_CATEGORY.into())
            .into_series(),
    )?;

    // Rate lookup keyed by (risk, occupancy, floor bucket).
    if verbose > 0 { eprintln!("[enrich] looking up loss rates"); }
    portfolio::require_columns(&df, &[columns::OCCUPANCY, columns::FLOOR_COUNT])?;

    let floors = portfolio::clean_column(&df, columns::FLOOR_COUNT, portfolio::clean_floor_count)?;
    df.replace_or_add(columns::FLOOR_COUNT.into(), floors.clone().into_series())?;

    let occupancy = df.column(columns::OCCUPANCY)?.cast(&DataType::String)?;
    let rate: Float64Chunked = occupancy.str()?.into_iter()
        .zip(floors.into_iter())
        .zip(risk.iter())
        .map(|((occupancy, floors), &risk)| {
            let occupancy = occupancy.and_then(Occupancy::parse)?;
            let bucket = FloorBucket::from_count(floors?);
            rates.lookup(risk, occupancy, bucket)
        })
        .collect();
    let rate = rate.with_name(columns::RATE.into());

    // PML = TSI x Rate; nulls propagate.
    if verbose > 0 { eprintln!("[enrich] computing PML"); }
    portfolio::require_columns(&df, &[columns::TSI])?;
    let tsi = portfolio::clean_column(&df, columns::TSI, portfolio::clean_tsi)?;
    df.replace_or_add(columns::TSI.into(), tsi.clone().into_series())?;

    let pml = (&tsi * &rate).with_name(columns::PML.into());
    df.with_column(rate.into_series())?;
    df.with_column(pml.into_series())?;

    Ok(Analysis { frame: df, invalid_coordinates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ZoneCrs;
    use geo::{LineString, MultiPolygon, Polygon};

    fn square(min: f64, max: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(min, min), (max, min), (max, max), (min, max), (min, min)]),
            vec![],
        )])
    }

    fn test_layers() -> Vec<ZoneLayer> {
        vec![ZoneLayer::from_parts(
            "zones",
            vec![square(0.0, 1.0), square(2.0, 3.0)],
            vec![Some(3), Some(1)],
            ZoneCrs::Geographic { epsg: Some(4326) },
        ).unwrap()]
    }

    fn test_frame() -> DataFrame {
        df! {
            columns::LONGITUDE => ["0.5", "2.5", "9.0", "bad"],
            columns::LATITUDE => ["0.5", "2.5", "9.0", "0.5"],
            columns::OCCUPANCY => ["Residential", "Commercial", "Industrial", "Residential"],
            columns::FLOOR_COUNT => ["1", "2", "0", "1"],
            columns::TSI => ["1000", "2000", "3000", "4000"],
        }.unwrap()
    }

    #[test]
    fn enrich_assigns_categories_rates_and_pml() {
        let analysis = enrich(test_frame(), &test_layers(), &RateTable::default(), 0).unwrap();
        let frame = &analysis.frame;

        let risk: Vec<&str> = frame.column(columns::RISK_CATEGORY).unwrap()
            .str().unwrap().into_no_null_iter().collect();
        assert_eq!(risk, vec!["High", "Low", "No Risk", "No Risk"]);

        let rate: Vec<Option<f64>> = frame.column(columns::RATE).unwrap()
            .f64().unwrap().into_iter().collect();
        // High/Residential/1 floor, Low/Commercial/2 floors, No Risk rows.
        assert_eq!(rate, vec![Some(0.50), Some(0.15), Some(0.0), Some(0.0)]);

        let pml: Vec<Option<f64>> = frame.column(columns::PML).unwrap()
            .f64().unwrap().into_iter().collect();
        assert_eq!(pml, vec![Some(500.0), Some(300.0), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn invalid_coordinates_are_retained_and_reported() {
        let analysis = enrich(test_frame(), &test_layers(), &RateTable::default(), 0).unwrap();
        assert_eq!(analysis.frame.height(), 4);
        assert_eq!(analysis.invalid_coordinates.height(), 1);

        // The bad row keeps a null longitude and falls back to No Risk.
        let lon = analysis.frame.column(columns::LONGITUDE).unwrap().f64().unwrap().get(3);
        assert_eq!(lon, None);
    }

    #[test]
    fn unknown_occupancy_yields_null_rate_and_pml() {
        let df = df! {
            columns::LONGITUDE => ["0.5"],
            columns::LATITUDE => ["0.5"],
            columns::OCCUPANCY => ["warehouse"],
            columns::FLOOR_COUNT => ["1"],
            columns::TSI => ["1000"],
        }.unwrap();
        let analysis = enrich(df, &test_layers(), &RateTable::default(), 0).unwrap();
        assert_eq!(analysis.frame.column(columns::RATE).unwrap().f64().unwrap().get(0), None);
        assert_eq!(analysis.frame.column(columns::PML).unwrap().f64().unwrap().get(0), None);
    }

    #[test]
    fn missing_required_columns_halt() {
        let df = df! { columns::LONGITUDE => ["0.5"] }.unwrap();
        let err = enrich(df, &test_layers(), &RateTable::default(), 0).unwrap_err();
        assert!(format!("{err}").contains(columns::LATITUDE));
    }

    #[test]
    fn enrich_is_deterministic() {
        let first = enrich(test_frame(), &test_layers(), &RateTable::default(), 0).unwrap();
        let second = enrich(test_frame(), &test_layers(), &RateTable::default(), 0).unwrap();
        assert!(first.frame.equals_missing(&second.frame));
    }
}
