use crate::core::{bounds::Bounds, geo::Point};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// An item indexed by its layer-space bounding box
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub bounds: Bounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(bounds: Bounds, data: T) -> Self {
        Self { bounds, data }
    }
}

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let center = self.bounds.center();
        let dx = center.x - point[0];
        let dy = center.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bounds.contains(&Point::new(point[0], point[1]))
    }
}

/// R-tree over bounding boxes. Used as the broad phase of hit-testing:
/// a point query returns every item whose box contains the point.
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    /// Builds the tree in one pass over `items`
    pub fn bulk_load(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    /// Items whose bounding box contains `point`
    pub fn query_point(&self, point: &Point) -> impl Iterator<Item = &SpatialItem<T>> {
        self.rtree.locate_all_at_point(&[point.x, point.y])
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }
}
