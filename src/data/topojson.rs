//! TopoJSON decoding
//!
//! Arcs are shared between neighbouring regions and optionally quantized
//! (delta-encoded integers plus a scale/translate transform). Rings reference
//! arcs by index; a negative index `i` means arc `!i` traversed in reverse.

use crate::data::geometry::{feature_identity, Geometry, Region};
use crate::{MapError, Result};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Object decoded when the caller does not name one
pub const DEFAULT_OBJECT: &str = "countries";

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<TopoTransform>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub objects: BTreeMap<String, TopoGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TopoTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopoGeometry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub arcs: Option<ArcRefs>,
    #[serde(default)]
    pub geometries: Vec<TopoGeometry>,
}

/// Arc references, nested by geometry type
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArcRefs {
    MultiPolygon(Vec<Vec<Vec<i64>>>),
    Polygon(Vec<Vec<i64>>),
    Line(Vec<i64>),
}

impl Topology {
    pub fn from_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| MapError::ParseError(format!("Invalid TopoJSON: {}", e)))
    }

    /// Absolute coordinates of every arc
    fn decode_arcs(&self) -> Result<Vec<Vec<Coord<f64>>>> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(arc_index, arc)| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .map(|position| {
                        let (px, py) = match position.as_slice() {
                            [px, py, ..] => (*px, *py),
                            _ => {
                                return Err(MapError::ParseError(format!(
                                    "arc {} has a position with fewer than two values",
                                    arc_index
                                )))
                            }
                        };
                        Ok(match self.transform {
                            Some(t) => {
                                x += px;
                                y += py;
                                Coord {
                                    x: x * t.scale[0] + t.translate[0],
                                    y: y * t.scale[1] + t.translate[1],
                                }
                            }
                            None => Coord { x: px, y: py },
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Decodes the named object (or [`DEFAULT_OBJECT`], or the first object
    /// by name) into regions. A geometry collection yields one region per
    /// member; any other object yields a single region.
    pub fn to_geometry(&self, object_name: Option<&str>) -> Result<Geometry> {
        let (name, object) = match object_name {
            Some(name) => self
                .objects
                .get_key_value(name)
                .ok_or_else(|| MapError::ParseError(format!("no TopoJSON object named '{}'", name)))?,
            None => self
                .objects
                .get_key_value(DEFAULT_OBJECT)
                .or_else(|| self.objects.iter().next())
                .ok_or_else(|| MapError::ParseError("TopoJSON has no objects".to_string()))?,
        };

        let arcs = self.decode_arcs()?;
        let members: Vec<&TopoGeometry> = if object.kind.as_deref() == Some("GeometryCollection") {
            object.geometries.iter().collect()
        } else {
            vec![object]
        };

        let mut regions = Vec::with_capacity(members.len());
        for (index, member) in members.into_iter().enumerate() {
            let mut polygons = Vec::new();
            collect_polygons(member, &arcs, &mut polygons)?;
            if polygons.is_empty() {
                continue;
            }
            let (id, name) = feature_identity(member.id.as_ref(), member.properties.as_ref(), index);
            regions.push(Region::new(id, name, MultiPolygon(polygons)));
        }

        log::debug!("decoded {} regions from TopoJSON object '{}'", regions.len(), name);
        Ok(Geometry::new(regions))
    }
}

fn collect_polygons(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord<f64>>],
    out: &mut Vec<Polygon<f64>>,
) -> Result<()> {
    match (geometry.kind.as_deref(), &geometry.arcs) {
        (Some("Polygon"), Some(ArcRefs::Polygon(rings))) => {
            out.extend(polygon(rings, arcs)?);
        }
        (Some("MultiPolygon"), Some(ArcRefs::MultiPolygon(polygons))) => {
            for rings in polygons {
                out.extend(polygon(rings, arcs)?);
            }
        }
        (Some("GeometryCollection"), _) => {
            for member in &geometry.geometries {
                collect_polygons(member, arcs, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Result<Option<Polygon<f64>>> {
    let mut rings = rings.iter().map(|refs| ring(refs, arcs));
    let exterior = match rings.next() {
        Some(exterior) => exterior?,
        None => return Ok(None),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Some(Polygon::new(exterior, interiors)))
}

/// Stitches arcs into a ring. Consecutive arcs share an endpoint, so the
/// first point of every arc after the first is dropped.
fn ring(refs: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for &arc_ref in refs {
        let (index, reversed) = if arc_ref < 0 {
            ((!arc_ref) as usize, true)
        } else {
            (arc_ref as usize, false)
        };
        let arc = arcs
            .get(index)
            .ok_or_else(|| MapError::ParseError(format!("arc index {} out of range", arc_ref)))?;

        let mut points = arc.clone();
        if reversed {
            points.reverse();
        }
        let skip = usize::from(!coords.is_empty());
        coords.extend(points.into_iter().skip(skip));
    }
    Ok(LineString::from(coords))
}

/// Parses a TopoJSON document into region geometry
pub fn parse_topojson(text: &str, object_name: Option<&str>) -> Result<Geometry> {
    Topology::from_str(text)?.to_geometry(object_name)
}
