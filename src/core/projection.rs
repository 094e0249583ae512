//! Spherical Mercator projection from geographic to screen space.
//!
//! `x = scale * lambda + tx` and `y = ty - scale * ln(tan(pi/4 + phi/2))`, with
//! lambda/phi in radians. The scale is in pixels per radian, so a projection of
//! scale `k` draws the whole world `2 * pi * k` pixels wide.

use crate::core::{
    constants::{PROJECTION_SCALE_DIVISOR, PROJECTION_VERTICAL_DIVISOR, WORLD_SQUARE_LATITUDE},
    geo::{LatLng, LatLngBounds, Point},
};
use crate::traits::CoordinateTransform;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mercator projection parameterised by a scale and a translation offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Pixels per radian
    pub scale: f64,
    /// Screen position of (lng 0, lat 0)
    pub translate: Point,
}

impl Projection {
    pub fn new(scale: f64, translate: Point) -> Self {
        Self { scale, translate }
    }

    /// Fixed world framing for a viewport: `scale = width / 6.5`,
    /// `translate = [width / 2, height / 1.5]`.
    pub fn world_heuristic(width: f64, height: f64) -> Self {
        Self::new(
            width / PROJECTION_SCALE_DIVISOR,
            Point::new(width / 2.0, height / PROJECTION_VERTICAL_DIVISOR),
        )
    }

    /// Projection that fits `bounds` into the viewport, leaving `padding`
    /// pixels on every side. Falls back to [`Projection::world_heuristic`]
    /// when the bounds have no extent. Latitudes beyond the square world
    /// are clipped first, as outlines are.
    pub fn fit_bounds(bounds: &LatLngBounds, width: f64, height: f64, padding: f64) -> Self {
        let clip = |p: &LatLng| {
            LatLng::new(p.lat.clamp(-WORLD_SQUARE_LATITUDE, WORLD_SQUARE_LATITUDE), p.lng)
        };
        let sw = Self::raw(&clip(&bounds.south_west));
        let ne = Self::raw(&clip(&bounds.north_east));
        let raw_width = (ne.x - sw.x).abs();
        let raw_height = (ne.y - sw.y).abs();
        let avail_width = (width - 2.0 * padding).max(1.0);
        let avail_height = (height - 2.0 * padding).max(1.0);

        let scale = match (raw_width > f64::EPSILON, raw_height > f64::EPSILON) {
            (true, true) => (avail_width / raw_width).min(avail_height / raw_height),
            (true, false) => avail_width / raw_width,
            (false, true) => avail_height / raw_height,
            (false, false) => return Self::world_heuristic(width, height),
        };

        // Raw y grows northwards, screen y grows downwards.
        let raw_center = Point::new((sw.x + ne.x) / 2.0, (sw.y + ne.y) / 2.0);
        let translate = Point::new(
            width / 2.0 - scale * raw_center.x,
            height / 2.0 + scale * raw_center.y,
        );
        Self::new(scale, translate)
    }

    /// Unscaled Mercator coordinates in radians, y pointing north. Only the
    /// poles are clamped, so every latitude `unproject` can return maps back
    /// to the same screen point.
    fn raw(lat_lng: &LatLng) -> Point {
        let lambda = lat_lng.lng.to_radians();
        let phi = LatLng::clamp_lat(lat_lng.lat).to_radians();
        Point::new(lambda, (PI / 4.0 + phi / 2.0).tan().ln())
    }

    /// Projects a geographic coordinate to screen space
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let raw = Self::raw(lat_lng);
        Point::new(
            self.translate.x + self.scale * raw.x,
            self.translate.y - self.scale * raw.y,
        )
    }

    /// Inverse of [`Projection::project`]
    pub fn unproject(&self, point: &Point) -> LatLng {
        let lambda = (point.x - self.translate.x) / self.scale;
        let y = (self.translate.y - point.y) / self.scale;
        let phi = 2.0 * y.exp().atan() - PI / 2.0;
        LatLng::new(phi.to_degrees(), lambda.to_degrees())
    }
}

impl CoordinateTransform for Projection {
    type Source = LatLng;
    type Target = Point;

    fn forward(&self, source: &LatLng) -> Point {
        self.project(source)
    }

    fn inverse(&self, target: &Point) -> LatLng {
        self.unproject(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tolerance: f64) {
        assert!((a - b).abs() < tolerance, "{} != {} (±{})", a, b, tolerance);
    }

    #[test]
    fn test_world_heuristic() {
        let projection = Projection::world_heuristic(1300.0, 900.0);
        assert_eq!(projection.scale, 200.0);
        assert_eq!(projection.translate, Point::new(650.0, 600.0));

        let origin = projection.project(&LatLng::new(0.0, 0.0));
        assert_close(origin.x, 650.0, 1e-9);
        assert_close(origin.y, 600.0, 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let projection = Projection::world_heuristic(1000.0, 800.0);
        let oslo = projection.project(&LatLng::new(59.9, 10.7));
        let cairo = projection.project(&LatLng::new(30.0, 31.2));
        assert!(oslo.y < cairo.y);
        assert!(oslo.x < cairo.x);
    }

    #[test]
    fn test_round_trip() {
        let projection = Projection::new(173.2, Point::new(512.0, 401.5));
        for (lat, lng) in [(0.0, 0.0), (42.3601, -71.0942), (-33.86, 151.2), (84.9, -179.5)] {
            let back = projection.unproject(&projection.project(&LatLng::new(lat, lng)));
            assert_close(back.lat, lat, 1e-9);
            assert_close(back.lng, lng, 1e-9);
        }
    }

    #[test]
    fn test_round_trip_beyond_square_map_limit() {
        let projection = Projection::world_heuristic(1000.0, 800.0);
        for lat in [85.06, 86.54, 87.5, 88.0, 89.0, -85.5, -89.0] {
            let screen = projection.project(&LatLng::new(lat, 12.0));
            let back = projection.unproject(&screen);
            assert_close(back.lat, lat, 1e-9);
            let again = projection.project(&back);
            assert_close(again.y, screen.y, 1e-6);
        }

        // The top edge of the default 1000x800 framing sits above 85.0511°
        let top = Point::new(500.0, 10.0);
        let lat_lng = projection.unproject(&top);
        assert!(lat_lng.lat > 86.0);
        let back = projection.project(&lat_lng);
        assert_close(back.y, top.y, 1e-6);
    }

    #[test]
    fn test_poles_stay_finite() {
        let projection = Projection::world_heuristic(1000.0, 800.0);
        assert!(projection.project(&LatLng::new(90.0, 0.0)).is_finite());
        assert!(projection.project(&LatLng::new(-90.0, 0.0)).is_finite());
    }

    #[test]
    fn test_fit_bounds_centers_region() {
        let bounds = LatLngBounds::from_coords(-10.0, -20.0, 10.0, 20.0);
        let projection = Projection::fit_bounds(&bounds, 1000.0, 800.0, 0.0);
        let center = projection.project(&LatLng::new(0.0, 0.0));
        assert_close(center.x, 500.0, 1e-9);
        assert_close(center.y, 400.0, 1e-9);

        let west = projection.project(&LatLng::new(0.0, -20.0));
        let east = projection.project(&LatLng::new(0.0, 20.0));
        assert_close(east.x - west.x, 1000.0, 1e-6);
    }

    #[test]
    fn test_fit_bounds_clips_polar_extent() {
        let polar = LatLngBounds::from_coords(-90.0, -180.0, 83.6, 180.0);
        let clipped = LatLngBounds::from_coords(-WORLD_SQUARE_LATITUDE, -180.0, 83.6, 180.0);
        assert_eq!(
            Projection::fit_bounds(&polar, 1000.0, 800.0, 0.0),
            Projection::fit_bounds(&clipped, 1000.0, 800.0, 0.0)
        );
    }

    #[test]
    fn test_fit_bounds_degenerate_falls_back() {
        let bounds = LatLngBounds::from_coords(5.0, 5.0, 5.0, 5.0);
        assert_eq!(
            Projection::fit_bounds(&bounds, 1000.0, 800.0, 10.0),
            Projection::world_heuristic(1000.0, 800.0)
        );
    }
}
