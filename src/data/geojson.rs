use crate::data::geometry::{feature_identity, polygon_from_rings, Geometry, Region};
use geo_types::MultiPolygon;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    /// Areal part of the geometry. Points and lines contribute nothing.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        let mut polygons = Vec::new();
        self.collect_polygons(&mut polygons);
        MultiPolygon(polygons)
    }

    fn collect_polygons(&self, out: &mut Vec<geo_types::Polygon<f64>>) {
        match self {
            GeoJsonGeometry::Polygon { coordinates } => {
                out.extend(polygon_from_rings(coordinates));
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                out.extend(coordinates.iter().filter_map(|rings| polygon_from_rings(rings)));
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_polygons(out);
                }
            }
            _ => {}
        }
    }
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
    #[serde(untagged)]
    Geometry(GeoJsonGeometry),
}

impl GeoJson {
    pub fn from_str(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// Converts areal features into regions, in document order.
    /// Features without an areal geometry are skipped.
    pub fn into_geometry(self) -> Geometry {
        let features = match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features,
            GeoJson::Geometry(geometry) => vec![GeoJsonFeature {
                id: None,
                geometry: Some(geometry),
                properties: None,
            }],
        };

        let mut skipped = 0usize;
        let regions: Vec<Region> = features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let boundary = feature.geometry.as_ref()?.to_multi_polygon();
                if boundary.0.is_empty() {
                    skipped += 1;
                    return None;
                }
                let (id, name) =
                    feature_identity(feature.id.as_ref(), feature.properties.as_ref(), index);
                Some(Region::new(id, name, boundary))
            })
            .collect();

        if skipped > 0 {
            log::debug!("skipped {} non-areal GeoJSON features", skipped);
        }
        Geometry::new(regions)
    }
}

/// Parses a GeoJSON document into region geometry
pub fn parse_geojson(text: &str) -> crate::Result<Geometry> {
    Ok(GeoJson::from_str(text)?.into_geometry())
}
