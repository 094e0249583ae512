use sovereign_map::data::load_geometry_file;
use sovereign_map::prelude::*;

const COUNTRIES: &str = r#"
{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "id": 250,
            "properties": { "name": "France" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-4, 43], [7, 43], [7, 51], [-4, 51], [-4, 43]]]
            }
        },
        {
            "type": "Feature",
            "properties": { "name": "Paris" },
            "geometry": { "type": "Point", "coordinates": [2.35, 48.85] }
        },
        {
            "type": "Feature",
            "properties": { "id": "CHL", "name": "Chile" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[-75, -55], [-67, -55], [-67, -18], [-75, -18], [-75, -55]]],
                    [[[-110, -28], [-109, -28], [-109, -27], [-110, -27], [-110, -28]]]
                ]
            }
        },
        { "type": "Feature", "properties": {}, "geometry": null }
    ]
}
"#;

const TOPOLOGY: &str = r#"
{
    "type": "Topology",
    "transform": { "scale": [0.01, 0.01], "translate": [0, 0] },
    "objects": {
        "land": { "type": "Polygon", "arcs": [[0]] },
        "countries": {
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Polygon", "id": "040", "properties": { "name": "Austria" }, "arcs": [[0]] }
            ]
        }
    },
    "arcs": [[[1000, 4700], [700, 0], [0, 200], [-700, 0], [0, -200]]]
}
"#;

#[test]
fn test_geojson_keeps_only_areal_features() {
    let geometry = parse_geometry(COUNTRIES).unwrap();
    let ids: Vec<&str> = geometry.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["250", "CHL"]);
    assert_eq!(geometry.get("CHL").unwrap().boundary.0.len(), 2);
}

#[test]
fn test_topojson_defaults_to_countries() {
    let geometry = parse_geometry(TOPOLOGY).unwrap();
    assert_eq!(geometry.len(), 1);
    let austria = &geometry.regions()[0];
    assert_eq!((austria.id.as_str(), austria.name.as_str()), ("040", "Austria"));

    let bounds = austria.geo_bounds().unwrap();
    assert!((bounds.south_west.lng - 10.0).abs() < 1e-9);
    assert!((bounds.north_east.lat - 49.0).abs() < 1e-9);
}

#[test]
fn test_documents_without_regions_are_invalid() {
    let empty = r#"{ "type": "FeatureCollection", "features": [] }"#;
    assert!(matches!(parse_geometry(empty), Err(MapError::InvalidGeometry(_))));

    let points_only = r#"{ "type": "Point", "coordinates": [0, 0] }"#;
    assert!(matches!(parse_geometry(points_only), Err(MapError::InvalidGeometry(_))));

    assert!(matches!(parse_geometry("{ not json"), Err(MapError::ParseError(_))));
}

#[test]
fn test_load_geometry_file() {
    let path = std::env::temp_dir().join(format!("sovereign-map-{}.geojson", std::process::id()));
    std::fs::write(&path, COUNTRIES).unwrap();
    let geometry = load_geometry_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(geometry.len(), 2);

    assert!(matches!(
        load_geometry_file(std::env::temp_dir().join("sovereign-map-missing.geojson")),
        Err(MapError::Io(_))
    ));
}

#[test]
fn test_world_map_from_geojson() {
    let mut map = WorldMapBuilder::world_map(1000.0, 800.0).build();
    assert!(!map.is_ready());
    assert!(map.load_geojson(COUNTRIES));

    let t0 = Instant::now();
    let over_france = map.viewport().unwrap().geo_to_screen(&LatLng::new(47.0, 1.5));
    map.handle(InputEvent::PointerMove { position: over_france }, t0);
    map.tick(t0 + Duration::from_millis(250));

    let tooltip = map.tooltip().unwrap();
    assert_eq!(tooltip.region_name, "France");
    assert_eq!(tooltip.capital, "Paris");
    assert!(tooltip.visible);
    assert_eq!(tooltip.position, Point::new(over_france.x + 20.0, over_france.y + 20.0));

    let events = map.select_region("CHL", t0).unwrap();
    assert!(events.iter().any(|e| matches!(e, ViewportEvent::RegionSelected { name, .. } if name == "Chile")));
    assert_eq!(map.selected_id(), Some("CHL"));
}

#[test]
fn test_world_map_survives_bad_document() {
    let mut map = WorldMap::new(640.0, 480.0);
    assert!(!map.load_topojson("[]", None));
    assert!(map.load_error().is_some());
    assert!(map.render_state().is_empty());

    assert!(map.load_topojson(TOPOLOGY, Some("land")));
    assert_eq!(map.render_state().len(), 1);
    assert!(map.load_error().is_none());
}
