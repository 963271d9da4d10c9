//! Point-in-zone spatial join.

use ahash::{AHashMap, AHashSet};
use anyhow::Result;

use crate::geom;
use crate::zone::{ZoneCrs, ZoneLayer};

/// Bit-exact key for a coordinate pair, the identity rows are de-duplicated
/// and re-merged on. NaN never equals a key, so invalid rows never match.
pub(crate) type CoordKey = (u64, u64);

#[inline]
pub(crate) fn coord_key(lon: f64, lat: f64) -> CoordKey {
    (lon.to_bits(), lat.to_bits())
}

/// Join coordinates against zone layers, first intersection wins.
///
/// Coordinates are de-duplicated up front; each unique pair is tested against
/// layers in upload order and, once claimed by a layer, never re-tested. The
/// mapped value is the matched polygon's grid code (which may itself be null
/// for layers without the attribute on that record).
pub(crate) fn join_zones(
    coords: &[(f64, f64)],
    layers: &[ZoneLayer],
    verbose: u8,
) -> Result<AHashMap<CoordKey, Option<i64>>> {
    let mut seen = AHashSet::new();
    let unique: Vec<(f64, f64)> = coords.iter().copied()
        .filter(|&(lon, lat)| lon.is_finite() && lat.is_finite())
        .filter(|&(lon, lat)| seen.insert(coord_key(lon, lat)))
        .collect();

    let mut matched: AHashMap<CoordKey, Option<i64>> = AHashMap::new();

    for layer in layers {
        let pending: Vec<(f64, f64)> = unique.iter().copied()
            .filter(|&(lon, lat)| !matched.contains_key(&coord_key(lon, lat)))
            .collect();
        if pending.is_empty() {
            break;
        }

        let projected: Vec<Option<(f64, f64)>> = match layer.crs() {
            ZoneCrs::Geographic { .. } => pending.iter().copied().map(Some).collect(),
            ZoneCrs::Projected { proj4, .. } => geom::project_lonlat(&pending, proj4)?,
        };

        let mut hits = 0usize;
        for (&(lon, lat), point) in pending.iter().zip(projected) {
            let Some((x, y)) = point else { continue };
            if let Some(idx) = layer.locate(x, y) {
                matched.insert(coord_key(lon, lat), layer.grid_code(idx));
                hits += 1;
            }
        }

        if verbose > 0 {
            eprintln!("[join] layer {}: matched {} of {} pending points", layer.name(), hits, pending.len());
        }
    }

    Ok(matched)
}
