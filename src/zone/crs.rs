use std::{fs, path::Path, sync::LazyLock};

use anyhow::{Context, Result, bail};
use regex::Regex;

static EPSG_AUTHORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"AUTHORITY\["EPSG",\s*"?(\d+)"?\]"#).expect("valid regex"));

static UTM_ZONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)UTM[_ ]Zone[_ ](\d{1,2})\s*([NS])").expect("valid regex"));

/// Coordinate reference system of a zone layer, read from its `.prj` sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneCrs {
    /// Geographic lon/lat degrees; portfolio points join without reprojection.
    Geographic { epsg: Option<u32> },
    /// Projected; portfolio points reproject through the PROJ.4 definition.
    Projected { epsg: Option<u32>, proj4: String },
}

impl ZoneCrs {
    /// Read and parse the `.prj` sidecar of a shapefile.
    pub fn from_prj_file(path: &Path) -> Result<Self> {
        let wkt = fs::read_to_string(path)
            .with_context(|| format!("Failed to read projection sidecar: {}", path.display()))?;
        Self::parse_wkt(&wkt)
    }

    /// Parse a WKT CRS definition.
    ///
    /// An `AUTHORITY["EPSG", ...]` code is preferred (the outermost authority
    /// is the last one in well-known text). WKT without one is sniffed for a
    /// UTM zone name, then for a leading `GEOGCS`.
    pub fn parse_wkt(wkt: &str) -> Result<Self> {
        let wkt = wkt.trim();

        if let Some(caps) = EPSG_AUTHORITY.captures_iter(wkt).last() {
            let code = caps[1].parse::<u32>().context("invalid EPSG code")?;
            return Self::from_epsg(code);
        }

        if let Some(caps) = UTM_ZONE.captures(wkt) {
            let zone = caps[1].parse::<u32>().context("invalid UTM zone")?;
            let south = caps[2].eq_ignore_ascii_case("S");
            let epsg = if south { 32700 + zone } else { 32600 + zone };
            return Ok(Self::Projected {
                epsg: Some(epsg),
                proj4: utm_proj4(zone, south, "WGS84"),
            });
        }

        if wkt.get(..6).is_some_and(|head| head.eq_ignore_ascii_case("GEOGCS")) {
            return Ok(Self::Geographic { epsg: None });
        }

        bail!("unrecognized CRS definition: {:.60}...", wkt)
    }

    /// Build a CRS from a known EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self> {
        match code {
            4326 | 4269 => Ok(Self::Geographic { epsg: Some(code) }),
            32601..=32660 => Ok(Self::Projected {
                epsg: Some(code),
                proj4: utm_proj4(code - 32600, false, "WGS84"),
            }),
            32701..=32760 => Ok(Self::Projected {
                epsg: Some(code),
                proj4: utm_proj4(code - 32700, true, "WGS84"),
            }),
            26901..=26923 => Ok(Self::Projected {
                epsg: Some(code),
                proj4: utm_proj4(code - 26900, false, "NAD83"),
            }),
            3857 => Ok(Self::Projected {
                epsg: Some(code),
                proj4: "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 \
                        +k=1 +units=m +no_defs +type=crs".to_string(),
            }),
            _ => bail!("unsupported EPSG code: {code}"),
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Geographic { epsg: Some(code) } => format!("geographic (EPSG:{code})"),
            Self::Geographic { epsg: None } => "geographic".to_string(),
            Self::Projected { epsg: Some(code), .. } => format!("projected (EPSG:{code})"),
            Self::Projected { epsg: None, proj4 } => format!("projected ({proj4})"),
        }
    }
}

/// Build PROJ.4 string for a UTM CRS.
fn utm_proj4(zone: u32, south: bool, datum: &str) -> String {
    let south = if south { " +south" } else { "" };
    format!("+proj=utm +zone={zone}{south} +datum={datum} +units=m +no_defs +type=crs")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;

    const UTM_48S_WKT: &str = r#"PROJCS["WGS 84 / UTM zone 48S",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",105],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",10000000],UNIT["metre",1],AUTHORITY["EPSG","32748"]]"#;

    const ESRI_UTM_WKT: &str = r#"PROJCS["WGS_1984_UTM_Zone_48S",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",500000.0],PARAMETER["False_Northing",10000000.0],PARAMETER["Central_Meridian",105.0],PARAMETER["Scale_Factor",0.9996],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#;

    #[test]
    fn geographic_wkt_by_authority() {
        let crs = ZoneCrs::parse_wkt(WGS84_WKT).unwrap();
        assert_eq!(crs, ZoneCrs::Geographic { epsg: Some(4326) });
    }

    #[test]
    fn projected_wkt_takes_outermost_authority() {
        // The nested GEOGCS carries EPSG:4326; the outer PROJCS code must win.
        let crs = ZoneCrs::parse_wkt(UTM_48S_WKT).unwrap();
        match crs {
            ZoneCrs::Projected { epsg: Some(32748), proj4 } => {
                assert!(proj4.contains("+proj=utm"));
                assert!(proj4.contains("+zone=48"));
                assert!(proj4.contains("+south"));
            }
            other => panic!("unexpected CRS: {other:?}"),
        }
    }

    #[test]
    fn esri_wkt_without_authority_is_sniffed_by_name() {
        let crs = ZoneCrs::parse_wkt(ESRI_UTM_WKT).unwrap();
        assert_eq!(
            crs,
            ZoneCrs::Projected {
                epsg: Some(32748),
                proj4: "+proj=utm +zone=48 +south +datum=WGS84 +units=m +no_defs +type=crs".to_string(),
            }
        );
    }

    #[test]
    fn bare_geogcs_without_authority_is_geographic() {
        let crs = ZoneCrs::parse_wkt(r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984"]]"#).unwrap();
        assert_eq!(crs, ZoneCrs::Geographic { epsg: None });
    }

    #[test]
    fn unknown_definitions_are_rejected() {
        assert!(ZoneCrs::parse_wkt("LOCAL_CS[\"site grid\"]").is_err());
        assert!(ZoneCrs::from_epsg(27700).is_err());
    }
}
