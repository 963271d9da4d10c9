use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use geo::{MultiPolygon, Rect};

use crate::common;
use crate::geom::Geometries;
use crate::io::shp;
use crate::zone::ZoneCrs;

/// A flood-zone polygon layer: geometries, per-polygon grid codes, and the
/// layer's native CRS.
#[derive(Debug, Clone)]
pub struct ZoneLayer {
    name: String,
    geoms: Geometries,
    grid_codes: Vec<Option<i64>>,
    grid_field: Option<String>,
    crs: ZoneCrs,
}

impl ZoneLayer {
    /// Loads a zone layer from a zip bundle or a bare `.shp` path.
    pub fn from_path(path: &Path, verbose: u8) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("zip") => Self::from_zip(path, verbose),
            Some("shp") => Self::from_shapefile(path, layer_name(path), verbose),
            _ => Err(anyhow!("unsupported zone layer input: {}", path.display())),
        }
    }

    /// Extracts a zip bundle to a temp directory and loads the `.shp` inside.
    pub fn from_zip(path: &Path, verbose: u8) -> Result<Self> {
        let tmpdir = tempfile::tempdir().context("Failed to create temp directory")?;
        common::extract_zip(path, tmpdir.path())?;

        let shp_path = common::find_shapefile(tmpdir.path())
            .ok_or_else(|| anyhow!("no .shp file found in {}", path.display()))?;

        Self::from_shapefile(&shp_path, layer_name(path), verbose)
    }

    /// Loads layer geometries, grid codes and CRS from a given `.shp` file path.
    pub fn from_shapefile(path: &Path, name: String, verbose: u8) -> Result<Self> {
        let items = shp::read_shapefile(path)?;
        let crs = ZoneCrs::from_prj_file(&path.with_extension("prj"))?;

        let grid_field = items.first()
            .and_then(|(_, record)| shp::detect_grid_code_field(record));

        let mut polygons: Vec<MultiPolygon<f64>> = Vec::with_capacity(items.len());
        let mut grid_codes = Vec::with_capacity(items.len());
        let mut skipped = 0usize;

        for (shape, record) in &items {
            match shp::shape_to_multipolygon(shape) {
                Some(polygon) => {
                    polygons.push(polygon);
                    grid_codes.push(grid_field.as_deref()
                        .and_then(|field| shp::grid_code_value(record, field)));
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            eprintln!("warning: skipped {} non-polygon shapes in layer {}", skipped, name);
        }
        ensure!(!polygons.is_empty(), "no polygon shapes in {}", path.display());

        if verbose > 0 {
            eprintln!("[zone] layer {}: {} polygons, crs {}, grid field {}",
                name, polygons.len(), crs.describe(),
                grid_field.as_deref().unwrap_or("(none)"));
        }

        Ok(Self {
            name,
            geoms: Geometries::new(&polygons),
            grid_codes,
            grid_field,
            crs,
        })
    }

    /// Builds a layer directly from polygons and grid codes (one per polygon).
    pub fn from_parts(
        name: &str,
        polygons: Vec<MultiPolygon<f64>>,
        grid_codes: Vec<Option<i64>>,
        crs: ZoneCrs,
    ) -> Result<Self> {
        ensure!(
            polygons.len() == grid_codes.len(),
            "from_parts: {} polygons but {} grid codes", polygons.len(), grid_codes.len()
        );
        Ok(Self {
            name: name.to_string(),
            geoms: Geometries::new(&polygons),
            grid_codes,
            grid_field: Some("gridcode".to_string()),
            crs,
        })
    }

    /// Layer name, from the bundle file stem.
    #[inline] pub fn name(&self) -> &str { &self.name }

    /// Number of zone polygons.
    #[inline] pub fn len(&self) -> usize { self.geoms.len() }

    /// Check if the layer has no polygons.
    #[inline] pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    /// The layer's native CRS.
    #[inline] pub fn crs(&self) -> &ZoneCrs { &self.crs }

    /// Name of the grid-code attribute field, if one was detected.
    #[inline] pub fn grid_field(&self) -> Option<&str> { self.grid_field.as_deref() }

    /// Grid code of the polygon at `idx`.
    #[inline] pub fn grid_code(&self, idx: usize) -> Option<i64> {
        self.grid_codes.get(idx).copied().flatten()
    }

    /// Iterate all per-polygon grid codes.
    #[inline] pub fn grid_codes(&self) -> impl Iterator<Item = Option<i64>> + '_ {
        self.grid_codes.iter().copied()
    }

    /// Locate the polygon containing a point given in this layer's CRS.
    #[inline] pub fn locate(&self, x: f64, y: f64) -> Option<usize> {
        self.geoms.locate(x, y)
    }

    /// Bounding rectangle of the layer, in its native CRS.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.geoms.bounds() }
}

/// Layer name from the bundle file stem.
fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
