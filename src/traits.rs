//! Shared trait abstractions for common patterns
//!
//! The projection and the view transform are both invertible mappings; the
//! controller composes them through [`CoordinateTransform`] so that screen,
//! layer and geographic space stay consistent in one place.

use crate::core::geo::Point;

/// An invertible mapping between two coordinate spaces
pub trait CoordinateTransform {
    type Source;
    type Target;

    /// Map a coordinate into the target space
    fn forward(&self, source: &Self::Source) -> Self::Target;

    /// Map a coordinate back into the source space
    fn inverse(&self, target: &Self::Target) -> Self::Source;
}

/// Linear interpolation, `t` in `[0, 1]`
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lerp() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(10.0, 30.0);
        assert_eq!(a.lerp(&b, 0.5), Point::new(5.0, 20.0));
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }
}
