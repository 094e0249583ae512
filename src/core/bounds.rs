use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in layer or screen space. `min` is the top-left
/// corner since screen y grows downwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// The viewport rectangle `[0, width] x [0, height]`
    pub fn from_size(size: Point) -> Self {
        Self::new(Point::default(), size)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Inclusive on every edge
    pub fn contains(&self, point: &Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Nearest point inside the rectangle; used to pin the pointer read-out
    /// to the viewport edge
    pub fn clamp(&self, point: &Point) -> Point {
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

impl From<geo_types::Rect<f64>> for Bounds {
    fn from(rect: geo_types::Rect<f64>) -> Self {
        Self::new(rect.min().into(), rect.max().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let bounds = Bounds::from_coords(400.0, 300.0, 600.0, 500.0);
        assert_eq!(bounds.width(), 200.0);
        assert_eq!(bounds.height(), 200.0);
        assert_eq!(bounds.center(), Point::new(500.0, 400.0));
    }

    #[test]
    fn test_contains_edges() {
        let bounds = Bounds::from_coords(10.0, 20.0, 30.0, 40.0);
        assert!(bounds.contains(&Point::new(10.0, 40.0)));
        assert!(!bounds.contains(&Point::new(5.0, 25.0)));
    }

    #[test]
    fn test_clamp_to_viewport() {
        let viewport = Bounds::from_size(Point::new(800.0, 600.0));
        assert_eq!(
            viewport.clamp(&Point::new(-20.0, 900.0)),
            Point::new(0.0, 600.0)
        );
    }
}
