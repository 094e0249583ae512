use crate::animation::interpolation::EasingFunction;
use crate::core::{bounds::Bounds, geo::Point};
use crate::traits::{CoordinateTransform, Lerp};
use serde::{Deserialize, Serialize};

/// Pan/zoom affine mapping applied on top of the base projection.
///
/// `screen = layer * scale + translate`, where layer space is the output of
/// the projection before any user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Scale factor (1.0 = whole world view)
    pub scale: f64,
    /// Translation in pixels
    pub translate: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Point::new(0.0, 0.0),
        }
    }
}

impl ViewTransform {
    pub fn new(scale: f64, translate: Point) -> Self {
        Self { scale, translate }
    }

    /// Create identity transform (no change)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Check if this is effectively an identity transform
    pub fn is_identity(&self) -> bool {
        (self.scale - 1.0).abs() < 1e-9
            && self.translate.x.abs() < 1e-9
            && self.translate.y.abs() < 1e-9
    }

    /// Layer point to screen point
    pub fn apply(&self, layer: &Point) -> Point {
        layer.multiply(self.scale).add(&self.translate)
    }

    /// Screen point to layer point
    pub fn invert(&self, screen: &Point) -> Point {
        Point::new(
            (screen.x - self.translate.x) / self.scale,
            (screen.y - self.translate.y) / self.scale,
        )
    }

    /// Maps layer-space bounds to screen space
    pub fn apply_bounds(&self, bounds: &Bounds) -> Bounds {
        Bounds::new(self.apply(&bounds.min), self.apply(&bounds.max))
    }

    /// Rescales by `factor` around a fixed screen `anchor`, keeping the
    /// resulting scale inside `[min_scale, max_scale]`
    pub fn zoomed_about(&self, factor: f64, anchor: &Point, min_scale: f64, max_scale: f64) -> Self {
        let scale = (self.scale * factor).clamp(min_scale, max_scale);
        if scale == self.scale {
            return *self;
        }
        let ratio = scale / self.scale;
        // The layer point under the anchor must stay under the anchor.
        let translate = anchor.subtract(&anchor.subtract(&self.translate).multiply(ratio));
        Self::new(scale, translate)
    }

    /// Shifts by a screen-space delta
    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.scale, self.translate.add(&Point::new(dx, dy)))
    }

    /// Transform that frames `region` (layer-space bounds) in a viewport of
    /// `size`: the larger of the width/height ratios is scaled to
    /// `fill_ratio`, the result clamped to `[min_scale, max_scale]`, and the
    /// region centre placed at the viewport centre.
    pub fn framing(region: &Bounds, size: Point, fill_ratio: f64, min_scale: f64, max_scale: f64) -> Self {
        let extent = (region.width() / size.x).max(region.height() / size.y);
        let raw_scale = fill_ratio / extent;
        // A zero-sized region yields an infinite scale, which the clamp absorbs.
        let scale = if raw_scale.is_nan() {
            max_scale
        } else {
            raw_scale.clamp(min_scale, max_scale)
        };
        let center = region.center();
        let translate = Point::new(size.x / 2.0 - scale * center.x, size.y / 2.0 - scale * center.y);
        Self::new(scale, translate)
    }

    /// Interpolate between two transforms with easing
    pub fn lerp_with_easing(&self, other: &ViewTransform, t: f64, easing: EasingFunction) -> ViewTransform {
        let eased_t = easing.apply(t);
        ViewTransform {
            scale: self.scale.lerp(&other.scale, eased_t),
            translate: self.translate.lerp(&other.translate, eased_t),
        }
    }
}

impl CoordinateTransform for ViewTransform {
    type Source = Point;
    type Target = Point;

    fn forward(&self, source: &Point) -> Point {
        self.apply(source)
    }

    fn inverse(&self, target: &Point) -> Point {
        self.invert(target)
    }
}

/// Screen dimensions plus the current view transform and its zoom extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed scale
    pub min_scale: f64,
    /// The maximum allowed scale
    pub max_scale: f64,
    transform: ViewTransform,
}

impl Viewport {
    pub fn new(size: Point, min_scale: f64, max_scale: f64) -> Self {
        Self {
            size,
            min_scale,
            max_scale,
            transform: ViewTransform::identity(),
        }
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Replaces the transform, clamping its scale to the zoom extent
    pub fn set_transform(&mut self, transform: ViewTransform) {
        let scale = transform.scale.clamp(self.min_scale, self.max_scale);
        self.transform = ViewTransform::new(scale, transform.translate);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Screen rectangle of the viewport
    pub fn screen_bounds(&self) -> Bounds {
        Bounds::from_size(self.size)
    }

    /// Zooms by `2^delta` keeping `anchor` fixed on screen
    pub fn zoom_by(&mut self, delta: f64, anchor: &Point) {
        let factor = 2_f64.powf(delta);
        self.transform = self
            .transform
            .zoomed_about(factor, anchor, self.min_scale, self.max_scale);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.panned(dx, dy);
    }

    pub fn screen_to_layer(&self, screen: &Point) -> Point {
        self.transform.invert(screen)
    }
}
