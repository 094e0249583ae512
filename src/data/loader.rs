use crate::data::geojson::parse_geojson;
use crate::data::geometry::Geometry;
use crate::data::topojson::parse_topojson;
use crate::{MapError, Result};
use once_cell::sync::Lazy;
use std::path::Path;
use std::time::Duration;

/// World boundaries at 1:110m, the dataset the default map is drawn from
pub const WORLD_ATLAS_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Shared async HTTP client for boundary downloads
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("sovereign-map/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Source document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    GeoJson,
    TopoJson,
}

impl GeometryFormat {
    /// Sniffs the root `type` member; anything other than a topology is
    /// treated as GeoJSON.
    pub fn detect(text: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct Root {
            #[serde(rename = "type")]
            kind: Option<String>,
        }

        let root: Root = serde_json::from_str(text)
            .map_err(|e| MapError::ParseError(format!("Invalid boundary document: {}", e)))?;
        Ok(match root.kind.as_deref() {
            Some("Topology") => GeometryFormat::TopoJson,
            _ => GeometryFormat::GeoJson,
        })
    }
}

/// Parses GeoJSON or TopoJSON, detecting which from the document
pub fn parse_geometry(text: &str) -> Result<Geometry> {
    let geometry = match GeometryFormat::detect(text)? {
        GeometryFormat::TopoJson => parse_topojson(text, None)?,
        GeometryFormat::GeoJson => parse_geojson(text)?,
    };
    if geometry.is_empty() {
        return Err(MapError::InvalidGeometry(
            "document contains no areal features".to_string(),
        ));
    }
    Ok(geometry)
}

/// Reads and parses a boundary file from disk
pub fn load_geometry_file(path: impl AsRef<Path>) -> Result<Geometry> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_geometry(&text)
}

/// Downloads and parses a boundary document
pub async fn fetch_geometry(url: &str) -> Result<Geometry> {
    log::info!("fetching boundaries from {}", url);
    let response = HTTP_CLIENT.get(url).send().await?.error_for_status()?;
    let text = response.text().await?;
    let geometry = parse_geometry(&text)?;
    log::info!("loaded {} regions", geometry.len());
    Ok(geometry)
}
