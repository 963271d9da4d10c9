//! Shapefile reading operations.

use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{Reader, Shape, dbase::{FieldValue, Record}};

/// Field-name fragments that identify the grid-code attribute of a zone layer.
const GRID_FIELD_KEYWORDS: [&str; 3] = ["gridcode", "hasil_gridcode", "kode_grid"];

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("Error reading shape+record")?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Convert a shapefile shape to geo::MultiPolygon, or `None` for non-polygon shapes.
pub(crate) fn shape_to_multipolygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    let rings: Vec<Vec<Coord<f64>>> = match shape {
        Shape::Polygon(p) => p.rings().iter()
            .map(|ring| ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
            .collect(),
        Shape::PolygonM(p) => p.rings().iter()
            .map(|ring| ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
            .collect(),
        Shape::PolygonZ(p) => p.rings().iter()
            .map(|ring| ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
            .collect(),
        _ => return None,
    };
    Some(rings_to_multipolygon(rings))
}

/// Group raw shapefile rings into a geo::MultiPolygon.
///
/// Shapefiles store rings as a flat list, each exterior followed by its
/// holes; exteriors wind clockwise (negative signed area).
pub(crate) fn rings_to_multipolygon(rings: Vec<Vec<Coord<f64>>>) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    /// Get the signed area of a geo::Coord list (negative for exterior)
    fn signed_area(pts: &[Coord<f64>]) -> f64 {
        let mut a = 0.0;
        for w in pts.windows(2) {
            a += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        a / 2.0
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for mut coords in rings {
        ensure_closed(&mut coords);
        let ls = LineString(coords);
        let is_exterior = signed_area(&ls.0) < 0.0;
        if is_exterior {
            // flush previous polygon
            if let Some(ext) = current_exterior.take() {
                polys.push(Polygon::new(ext, current_holes));
                current_holes = Vec::new();
            }
            current_exterior = Some(ls);
        } else {
            current_holes.push(ls);
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

/// Find the grid-code attribute field of a record, if any.
///
/// Keywords are tried in priority order; field names match by
/// case-insensitive substring. Ties within a keyword resolve to the
/// lexicographically first field name.
pub(crate) fn detect_grid_code_field(record: &Record) -> Option<String> {
    let names: Vec<String> = record.clone().into_iter()
        .map(|(field, _)| field)
        .collect();

    for keyword in GRID_FIELD_KEYWORDS {
        let mut matches: Vec<&String> = names.iter()
            .filter(|name| name.to_lowercase().contains(keyword))
            .collect();
        matches.sort();
        if let Some(&name) = matches.first() {
            return Some(name.clone());
        }
    }
    None
}

/// Get the grid-code value of a record as an integer, if present and numeric.
pub(crate) fn grid_code_value(record: &Record, field: &str) -> Option<i64> {
    match record.get(field) {
        Some(FieldValue::Numeric(Some(n))) => Some(*n as i64),
        Some(FieldValue::Integer(n)) => Some(*n as i64),
        Some(FieldValue::Double(n)) => Some(*n as i64),
        Some(FieldValue::Float(Some(n))) => Some(*n as i64),
        Some(FieldValue::Character(Some(s))) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Intersects, Point};

    fn square(min: f64, max: f64, clockwise: bool) -> Vec<Coord<f64>> {
        let mut ring = vec![
            Coord { x: min, y: min },
            Coord { x: min, y: max },
            Coord { x: max, y: max },
            Coord { x: max, y: min },
            Coord { x: min, y: min },
        ];
        if !clockwise {
            ring.reverse();
        }
        ring
    }

    #[test]
    fn rings_group_exterior_with_holes() {
        // Outer square with a hole in the middle, shapefile winding.
        let mp = rings_to_multipolygon(vec![square(0.0, 10.0, true), square(4.0, 6.0, false)]);
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.intersects(&Point::new(1.0, 1.0)));
        assert!(!mp.intersects(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn rings_handle_multiple_exteriors() {
        let mp = rings_to_multipolygon(vec![square(0.0, 1.0, true), square(5.0, 6.0, true)]);
        assert_eq!(mp.0.len(), 2);
    }

    #[test]
    fn unclosed_ring_is_closed() {
        let mut ring = square(0.0, 1.0, true);
        ring.pop();
        let mp = rings_to_multipolygon(vec![ring]);
        assert_eq!(mp.0.len(), 1);
        assert!(mp.intersects(&Point::new(0.5, 0.5)));
    }

    #[test]
    fn grid_field_detection_prefers_exact_keyword() {
        let mut record = Record::default();
        record.insert("Hasil_Gridcode".to_string(), FieldValue::Numeric(Some(2.0)));
        record.insert("name".to_string(), FieldValue::Character(Some("x".to_string())));
        // "gridcode" matches "Hasil_Gridcode" by substring already.
        assert_eq!(detect_grid_code_field(&record).as_deref(), Some("Hasil_Gridcode"));

        let mut record = Record::default();
        record.insert("KODE_GRID".to_string(), FieldValue::Integer(3));
        assert_eq!(detect_grid_code_field(&record).as_deref(), Some("KODE_GRID"));

        let mut record = Record::default();
        record.insert("name".to_string(), FieldValue::Character(Some("x".to_string())));
        assert_eq!(detect_grid_code_field(&record), None);
    }

    #[test]
    fn grid_code_value_accepts_numeric_kinds() {
        let mut record = Record::default();
        record.insert("gridcode".to_string(), FieldValue::Numeric(Some(3.0)));
        record.insert("kode_grid".to_string(), FieldValue::Character(Some(" 2 ".to_string())));
        record.insert("blank".to_string(), FieldValue::Numeric(None));

        assert_eq!(grid_code_value(&record, "gridcode"), Some(3));
        assert_eq!(grid_code_value(&record, "kode_grid"), Some(2));
        assert_eq!(grid_code_value(&record, "blank"), None);
        assert_eq!(grid_code_value(&record, "missing"), None);
    }
}
