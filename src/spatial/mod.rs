pub mod index;

pub use hit_test::{ProjectedRegion, RegionHitTester};
pub use index::{SpatialIndex, SpatialItem};
