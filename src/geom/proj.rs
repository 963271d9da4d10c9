use anyhow::{Context, Result, anyhow};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// PROJ.4 definition of the WGS84 geographic CRS portfolio coordinates arrive in.
const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Reproject WGS84 lon/lat degree coordinates into a projected CRS.
///
/// Input goes through proj4rs in radians; output is in the target's units
/// (meters for UTM). A coordinate that fails to transform comes back as
/// `None` instead of failing the batch.
pub(crate) fn project_lonlat(coords: &[(f64, f64)], target_proj4: &str) -> Result<Vec<Option<(f64, f64)>>> {
    let from = Proj4::from_proj_string(WGS84_PROJ4)
        .with_context(|| anyhow!("failed to build source PROJ.4: {WGS84_PROJ4}"))?;
    let to = Proj4::from_proj_string(target_proj4)
        .with_context(|| anyhow!("failed to build target PROJ.4: {target_proj4}"))?;

    Ok(coords.iter()
        .map(|&(lon, lat)| {
            let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
            transform(&from, &to, &mut point).ok().map(|_| (point.0, point.1))
        })
        .collect())
}
