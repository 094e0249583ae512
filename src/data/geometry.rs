use crate::core::geo::{LatLng, LatLngBounds};
use geo::BoundingRect;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

/// A named region boundary in geographic coordinates (`x` = lng, `y` = lat)
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            boundary,
        }
    }

    /// Builds a region from GeoJSON-style rings of `[lng, lat]` positions.
    /// The first ring is the exterior, the rest are holes.
    pub fn from_rings(id: impl Into<String>, name: impl Into<String>, rings: &[Vec<[f64; 2]>]) -> Self {
        let boundary = match polygon_from_rings(rings) {
            Some(polygon) => MultiPolygon(vec![polygon]),
            None => MultiPolygon(Vec::new()),
        };
        Self::new(id, name, boundary)
    }

    /// Geographic bounding box, `None` for an empty boundary
    pub fn geo_bounds(&self) -> Option<LatLngBounds> {
        self.boundary.bounding_rect().map(|rect| {
            LatLngBounds::new(LatLng::from(rect.min()), LatLng::from(rect.max()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.boundary.0.is_empty()
    }
}

pub(crate) fn polygon_from_rings(rings: &[Vec<[f64; 2]>]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        LineString::from(
            ring.iter()
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect::<Vec<_>>(),
        )
    });
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}

/// Ordered, immutable set of regions. Input order is the hit-test priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    regions: Vec<Region>,
}

impl Geometry {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// First region carrying `id`
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    /// Input-order index of the first region carrying `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|region| region.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Union of all region bounding boxes
    pub fn geo_bounds(&self) -> Option<LatLngBounds> {
        self.regions
            .iter()
            .filter_map(Region::geo_bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}

impl FromIterator<Region> for Geometry {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A labelled point of interest drawn on top of the regions
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: String,
    pub label: String,
    pub position: LatLng,
}

impl Landmark {
    pub fn new(name: impl Into<String>, label: impl Into<String>, position: LatLng) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            position,
        }
    }

    /// The heritage sanctuaries shown on the default world map
    pub fn heritage_sanctuaries() -> Vec<Landmark> {
        vec![
            Landmark::new("MIT Great Dome", "SGP-001", LatLng::new(42.3601, -71.0942)),
            Landmark::new("Vatican City", "SGP-002", LatLng::new(41.9029, 12.4534)),
            Landmark::new("Great Wall", "SGP-003", LatLng::new(40.4319, 116.5704)),
        ]
    }
}

/// Resolves a feature's id and display name.
///
/// The id comes from the feature `id` (numbers are rendered without a
/// fractional part), then `properties.id`, then the feature's position. The
/// name comes from `properties.name`, falling back to the id.
pub(crate) fn feature_identity(
    id: Option<&Value>,
    properties: Option<&serde_json::Map<String, Value>>,
    index: usize,
) -> (String, String) {
    let id = id
        .and_then(value_to_id)
        .or_else(|| properties.and_then(|p| p.get("id")).and_then(value_to_id))
        .unwrap_or_else(|| index.to_string());
    let name = properties
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());
    (id, name)
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(id: &str, x: f64, y: f64, size: f64) -> Region {
        Region::from_rings(
            id,
            id.to_uppercase(),
            &[vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]],
        )
    }

    #[test]
    fn test_region_bounds() {
        let region = square("a", -10.0, 5.0, 10.0);
        let bounds = region.geo_bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(5.0, -10.0));
        assert_eq!(bounds.north_east, LatLng::new(15.0, 0.0));
    }

    #[test]
    fn test_geometry_lookup_and_bounds() {
        let geometry: Geometry = vec![square("a", 0.0, 0.0, 10.0), square("b", 20.0, -5.0, 5.0)]
            .into_iter()
            .collect();
        assert_eq!(geometry.len(), 2);
        assert_eq!(geometry.position("b"), Some(1));
        assert_eq!(geometry.get("a").map(|r| r.name.as_str()), Some("A"));
        assert!(geometry.get("zz").is_none());

        let bounds = geometry.geo_bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-5.0, 0.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 25.0));
    }

    #[test]
    fn test_empty_rings() {
        let region = Region::from_rings("x", "X", &[]);
        assert!(region.is_empty());
        assert!(region.geo_bounds().is_none());
    }

    #[test]
    fn test_feature_identity() {
        let props = json!({ "name": "Norway" });
        let props = props.as_object();
        assert_eq!(
            feature_identity(Some(&json!(578)), props, 3),
            ("578".to_string(), "Norway".to_string())
        );
        assert_eq!(
            feature_identity(Some(&json!(578.0)), props, 3),
            ("578".to_string(), "Norway".to_string())
        );
        assert_eq!(
            feature_identity(None, None, 3),
            ("3".to_string(), "3".to_string())
        );
        let with_prop_id = json!({ "id": "NOR" });
        assert_eq!(
            feature_identity(None, with_prop_id.as_object(), 0),
            ("NOR".to_string(), "NOR".to_string())
        );
    }
}
