pub mod geojson;
pub mod geometry;
pub mod loader;
pub mod topojson;

pub use geometry::{Geometry, Landmark, Region};
pub use loader::{fetch_geometry, load_geometry_file, parse_geometry, GeometryFormat};
