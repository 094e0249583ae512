use crate::{
    animation::transitions::{AnimationFrame, AnimationToken, TransitionManager},
    core::{
        bounds::Bounds,
        config::{ProjectionFit, ViewportConfig},
        geo::{LatLng, Point},
        projection::Projection,
        viewport::{ViewTransform, Viewport},
    },
    data::geometry::{Geometry, Landmark, Region},
    input::{
        events::{HoverTarget, InputEvent, ViewportEvent},
        hover::{HoverState, TimerToken, TooltipTimer},
    },
    spatial::hit_test::RegionHitTester,
    traits::CoordinateTransform,
    MapError, Result,
};
use instant::Instant;

/// The geo-viewport controller.
///
/// Owns the projection, the view transform, hover/tooltip state and the
/// single fit-animation slot. Every operation runs to completion and returns
/// the events the host should apply; nothing is drawn here and no clock is
/// read. Timers and animation frames are driven by the host through
/// [`GeoViewport::tick`] or the token-checked callbacks.
pub struct GeoViewport {
    geometry: Geometry,
    config: ViewportConfig,
    projection: Projection,
    viewport: Viewport,
    hit_tester: RegionHitTester,
    hover: HoverState,
    transitions: TransitionManager,
    landmarks: Vec<Landmark>,
    active: bool,
}

impl GeoViewport {
    /// Initializes with the balanced defaults
    pub fn initialize(geometry: Geometry, width: f64, height: f64) -> Result<Self> {
        Self::with_config(geometry, width, height, ViewportConfig::default())
    }

    pub fn with_config(geometry: Geometry, width: f64, height: f64, config: ViewportConfig) -> Result<Self> {
        if geometry.is_empty() {
            return Err(MapError::InvalidGeometry("geometry contains no regions".to_string()));
        }
        validate_size(width, height)?;
        config.validate()?;

        let projection = base_projection(&config.projection, &geometry, width, height);
        let hit_tester = RegionHitTester::build(&geometry, &projection);
        let viewport = Viewport::new(Point::new(width, height), config.zoom.min_scale, config.zoom.max_scale);

        log::info!(
            "viewport initialized: {} regions, {}x{}, projection scale {:.2}",
            geometry.len(),
            width,
            height,
            projection.scale
        );

        Ok(Self {
            geometry,
            config,
            projection,
            viewport,
            hit_tester,
            hover: HoverState::new(),
            transitions: TransitionManager::new(),
            landmarks: Vec::new(),
            active: true,
        })
    }

    /// Points of interest projected alongside the regions
    pub fn with_landmarks(mut self, landmarks: Vec<Landmark>) -> Self {
        self.landmarks = landmarks;
        self
    }

    /// Dispatches a raw input event
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Vec<ViewportEvent> {
        match event {
            InputEvent::PointerMove { position } => self.on_pointer_move(position.x, position.y, now),
            InputEvent::PointerLeave => self.on_pointer_leave(),
            InputEvent::Click { position } => self.on_click(position, now),
            InputEvent::Scroll { delta, position } => self.zoom_by(delta, position),
            InputEvent::Drag { delta } => self.pan_by(delta.x, delta.y),
            InputEvent::Resize { size } => self.resize(size.x, size.y),
        }
    }

    /// Cursor read-out plus hover resolution. Non-finite coordinates are
    /// dropped; positions outside the viewport are clamped onto its edge.
    pub fn on_pointer_move(&mut self, screen_x: f64, screen_y: f64, now: Instant) -> Vec<ViewportEvent> {
        if !self.active || !(screen_x.is_finite() && screen_y.is_finite()) {
            return Vec::new();
        }
        let screen = self.viewport.screen_bounds().clamp(&Point::new(screen_x, screen_y));
        let layer = self.viewport.screen_to_layer(&screen);
        let geo = self.projection.unproject(&layer);

        let mut events = vec![ViewportEvent::CursorMoved {
            screen_x: screen.x,
            screen_y: screen.y,
            lat: geo.lat,
            lng: geo.lng,
        }];
        let hit = self
            .hit_tester
            .hit(&layer)
            .map(|index| self.target_at(index));
        events.extend(self.hover.update(hit, now, self.config.tooltip_delay()));
        events
    }

    /// Cancels the tooltip timer and clears hover. Idempotent.
    pub fn on_pointer_leave(&mut self) -> Vec<ViewportEvent> {
        if !self.active {
            return Vec::new();
        }
        self.hover.clear()
    }

    /// Selects a region and animates the view to frame it
    pub fn on_region_click(&mut self, region_id: &str, now: Instant) -> Result<Vec<ViewportEvent>> {
        if !self.active {
            return Ok(Vec::new());
        }
        let index = self
            .geometry
            .position(region_id)
            .ok_or_else(|| MapError::UnknownRegion(region_id.to_string()))?;
        let target = self.target_at(index);
        log::debug!("region selected: {} ({})", target.name, target.id);

        let mut events = vec![ViewportEvent::RegionSelected {
            id: target.id,
            name: target.name,
        }];
        let zoom = &self.config.zoom;
        let fit = self.hit_tester.bounds(index).map(|bounds| {
            ViewTransform::framing(
                bounds,
                self.viewport.size,
                zoom.fit_fill_ratio,
                zoom.min_scale,
                zoom.fit_max_scale,
            )
        });
        if let Some(fit) = fit {
            events.extend(self.start_fit(fit, now));
        }
        Ok(events)
    }

    /// Animates back to the whole-world view
    pub fn on_background_click(&mut self, now: Instant) -> Vec<ViewportEvent> {
        if !self.active {
            return Vec::new();
        }
        self.start_fit(ViewTransform::identity(), now)
    }

    /// Zooms by `2^delta` around a fixed screen anchor, cancelling any fit
    pub fn zoom_by(&mut self, delta: f64, anchor: Point) -> Vec<ViewportEvent> {
        if !self.active || !delta.is_finite() || !anchor.is_finite() {
            return Vec::new();
        }
        self.cancel_animation();
        let before = *self.viewport.transform();
        self.viewport.zoom_by(delta, &anchor);
        self.view_changed_since(before)
    }

    /// Pans by a screen delta, cancelling any fit
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Vec<ViewportEvent> {
        if !self.active || !(dx.is_finite() && dy.is_finite()) {
            return Vec::new();
        }
        self.cancel_animation();
        let before = *self.viewport.transform();
        self.viewport.pan_by(dx, dy);
        self.view_changed_since(before)
    }

    /// Re-frames the base projection for a new viewport size. The view
    /// transform is kept; hover is cleared since the shapes moved.
    pub fn resize(&mut self, width: f64, height: f64) -> Vec<ViewportEvent> {
        if !self.active || validate_size(width, height).is_err() {
            return Vec::new();
        }
        let size = Point::new(width, height);
        if size == self.viewport.size {
            return Vec::new();
        }
        self.projection = base_projection(&self.config.projection, &self.geometry, width, height);
        self.hit_tester = RegionHitTester::build(&self.geometry, &self.projection);
        self.viewport.set_size(size);
        log::debug!("viewport resized to {}x{}", width, height);

        let mut events = self.hover.clear();
        events.push(ViewportEvent::ViewChanged(*self.viewport.transform()));
        events
    }

    /// Drives the tooltip timer and the running animation from the host clock
    pub fn tick(&mut self, now: Instant) -> Vec<ViewportEvent> {
        if !self.active {
            return Vec::new();
        }
        let mut events = self.hover.poll(now);
        if let Some(frame) = self.transitions.advance(now) {
            events.extend(self.apply_frame(frame));
        }
        events
    }

    /// Host-scheduled tooltip callback; stale tokens are ignored
    pub fn fire_tooltip_timer(&mut self, token: TimerToken) -> Vec<ViewportEvent> {
        if !self.active {
            return Vec::new();
        }
        self.hover.fire(token)
    }

    /// Host-scheduled animation frame; stale tokens are ignored
    pub fn on_animation_frame(&mut self, token: AnimationToken, now: Instant) -> Vec<ViewportEvent> {
        if !self.active {
            return Vec::new();
        }
        match self.transitions.advance_token(token, now) {
            Some(frame) => self.apply_frame(frame),
            None => Vec::new(),
        }
    }

    /// Drops the pending timer and animation. Every later call is a no-op.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.hover.clear();
        self.transitions.cancel();
        self.active = false;
        log::debug!("viewport torn down");
    }

    /// Region under a screen point
    pub fn hit_test(&self, screen: &Point) -> Option<&Region> {
        if !screen.is_finite() {
            return None;
        }
        let layer = self.viewport.screen_to_layer(screen);
        self.hit_tester
            .hit(&layer)
            .and_then(|index| self.geometry.regions().get(index))
    }

    /// Screen to geographic, through the view transform then the projection
    pub fn screen_to_geo(&self, screen: &Point) -> LatLng {
        let layer = self.viewport.transform().inverse(screen);
        self.projection.inverse(&layer)
    }

    pub fn geo_to_screen(&self, lat_lng: &LatLng) -> Point {
        let layer = self.projection.forward(lat_lng);
        self.viewport.transform().forward(&layer)
    }

    /// Screen-space bounding box of a region under the current view
    pub fn region_screen_bounds(&self, region_id: &str) -> Option<Bounds> {
        let index = self.geometry.position(region_id)?;
        self.hit_tester
            .bounds(index)
            .map(|bounds| self.viewport.transform().apply_bounds(bounds))
    }

    /// Landmarks with their current screen positions
    pub fn landmark_positions(&self) -> Vec<(&Landmark, Point)> {
        self.landmarks
            .iter()
            .map(|landmark| (landmark, self.geo_to_screen(&landmark.position)))
            .collect()
    }

    pub fn transform(&self) -> ViewTransform {
        *self.viewport.transform()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn size(&self) -> Point {
        self.viewport.size
    }

    pub fn hover_target(&self) -> Option<&HoverTarget> {
        self.hover.target()
    }

    pub fn tooltip_visible(&self) -> bool {
        self.hover.tooltip_visible()
    }

    pub fn pending_tooltip_timer(&self) -> Option<TooltipTimer> {
        self.hover.pending_timer()
    }

    pub fn current_animation(&self) -> Option<AnimationToken> {
        self.transitions.current_token()
    }

    pub fn is_animating(&self) -> bool {
        self.transitions.is_animating()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn on_click(&mut self, position: Point, now: Instant) -> Vec<ViewportEvent> {
        if !self.active || !position.is_finite() {
            return Vec::new();
        }
        // A click resolves to exactly one of region or background.
        match self.hit_test(&position).map(|region| region.id.clone()) {
            Some(id) => self.on_region_click(&id, now).unwrap_or_default(),
            None => self.on_background_click(now),
        }
    }

    fn target_at(&self, index: usize) -> HoverTarget {
        let region = &self.geometry.regions()[index];
        HoverTarget::new(region.id.clone(), region.name.clone())
    }

    fn start_fit(&mut self, target: ViewTransform, now: Instant) -> Vec<ViewportEvent> {
        let duration = self.config.fit_duration();
        self.transitions.start(
            *self.viewport.transform(),
            target,
            now,
            duration,
            self.config.animation.easing,
        );
        let mut events = vec![ViewportEvent::AnimationStarted { target }];
        if duration.is_zero() {
            if let Some(frame) = self.transitions.advance(now) {
                events.extend(self.apply_frame(frame));
            }
        }
        events
    }

    fn cancel_animation(&mut self) {
        if self.transitions.cancel() {
            log::debug!("fit animation cancelled by direct manipulation");
        }
    }

    fn apply_frame(&mut self, frame: AnimationFrame) -> Vec<ViewportEvent> {
        self.viewport.set_transform(frame.transform);
        let mut events = vec![ViewportEvent::ViewChanged(*self.viewport.transform())];
        if frame.finished {
            events.push(ViewportEvent::AnimationFinished {
                target: frame.transform,
            });
        }
        events
    }

    fn view_changed_since(&self, before: ViewTransform) -> Vec<ViewportEvent> {
        let after = *self.viewport.transform();
        if after == before {
            Vec::new()
        } else {
            vec![ViewportEvent::ViewChanged(after)]
        }
    }
}

fn validate_size(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidGeometry(format!(
            "viewport size must be positive and finite, got {}x{}",
            width, height
        )))
    }
}

fn base_projection(fit: &ProjectionFit, geometry: &Geometry, width: f64, height: f64) -> Projection {
    match fit {
        ProjectionFit::WorldHeuristic => Projection::world_heuristic(width, height),
        ProjectionFit::BoundingBox { padding } => match geometry.geo_bounds() {
            Some(bounds) => Projection::fit_bounds(&bounds, width, height, *padding),
            None => Projection::world_heuristic(width, height),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn square(id: &str, lng: f64, lat: f64, size: f64) -> Region {
        Region::from_rings(
            id,
            format!("Region {}", id),
            &[vec![
                [lng, lat],
                [lng + size, lat],
                [lng + size, lat + size],
                [lng, lat + size],
                [lng, lat],
            ]],
        )
    }

    fn controller() -> GeoViewport {
        let geometry = Geometry::new(vec![square("a", 0.0, 0.0, 10.0), square("b", 20.0, 0.0, 10.0)]);
        GeoViewport::initialize(geometry, 800.0, 600.0).unwrap()
    }

    #[test]
    fn test_initialize_rejects_empty_geometry() {
        let err = GeoViewport::initialize(Geometry::default(), 800.0, 600.0)
            .err()
            .unwrap();
        assert!(matches!(err, MapError::InvalidGeometry(_)));

        let geometry = Geometry::new(vec![square("a", 0.0, 0.0, 10.0)]);
        assert!(GeoViewport::initialize(geometry, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_initial_projection_uses_world_heuristic() {
        let viewport = controller();
        assert!((viewport.projection().scale - 800.0 / 6.5).abs() < 1e-9);
        assert_eq!(viewport.projection().translate, Point::new(400.0, 400.0));
        assert!(viewport.transform().is_identity());
    }

    #[test]
    fn test_pointer_move_emits_readout_even_without_hit() {
        let mut viewport = controller();
        let events = viewport.on_pointer_move(5.0, 5.0, Instant::now());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ViewportEvent::CursorMoved { .. }));
        assert!(viewport.hover_target().is_none());
    }

    #[test]
    fn test_non_finite_pointer_is_ignored() {
        let mut viewport = controller();
        assert!(viewport
            .on_pointer_move(f64::NAN, 10.0, Instant::now())
            .is_empty());
        assert!(viewport
            .on_pointer_move(10.0, f64::INFINITY, Instant::now())
            .is_empty());
    }

    #[test]
    fn test_out_of_viewport_pointer_is_clamped() {
        let mut viewport = controller();
        let events = viewport.on_pointer_move(-50.0, 900.0, Instant::now());
        match &events[0] {
            ViewportEvent::CursorMoved { screen_x, screen_y, .. } => {
                assert_eq!((*screen_x, *screen_y), (0.0, 600.0));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_unknown_region_click() {
        let mut viewport = controller();
        let err = viewport.on_region_click("zz", Instant::now()).unwrap_err();
        assert!(matches!(err, MapError::UnknownRegion(id) if id == "zz"));
        assert!(!viewport.is_animating());
    }

    #[test]
    fn test_click_dispatch_is_exclusive() {
        let mut viewport = controller();
        let inside_a = viewport.geo_to_screen(&LatLng::new(5.0, 5.0));
        let events = viewport.handle(InputEvent::Click { position: inside_a }, Instant::now());
        assert!(matches!(events[0], ViewportEvent::RegionSelected { ref id, .. } if id == "a"));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ViewportEvent::AnimationStarted { .. }))
                .count(),
            1
        );

        let events = viewport.handle(
            InputEvent::Click {
                position: Point::new(5.0, 5.0),
            },
            Instant::now(),
        );
        assert_eq!(
            events,
            vec![ViewportEvent::AnimationStarted {
                target: ViewTransform::identity()
            }]
        );
    }

    #[test]
    fn test_direct_manipulation_cancels_fit() {
        let mut viewport = controller();
        let t0 = Instant::now();
        viewport.on_region_click("a", t0).unwrap();
        assert!(viewport.is_animating());

        let events = viewport.pan_by(10.0, 0.0);
        assert_eq!(events.len(), 1);
        assert!(!viewport.is_animating());
        assert!(viewport.tick(t0 + Duration::from_millis(2000)).is_empty());
        assert_eq!(viewport.transform().translate, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = controller();
        let anchor = Point::new(400.0, 300.0);
        viewport.zoom_by(10.0, anchor);
        assert_eq!(viewport.transform().scale, 12.0);
        viewport.zoom_by(-20.0, anchor);
        assert_eq!(viewport.transform().scale, 1.0);
        // Already at the floor: nothing changes, nothing is emitted
        assert!(viewport.zoom_by(-1.0, anchor).is_empty());
    }

    #[test]
    fn test_teardown_makes_everything_inert() {
        let mut viewport = controller();
        let t0 = Instant::now();
        let inside_a = viewport.geo_to_screen(&LatLng::new(5.0, 5.0));
        viewport.on_pointer_move(inside_a.x, inside_a.y, t0);
        let timer = viewport.pending_tooltip_timer().unwrap();
        viewport.on_region_click("a", t0).unwrap();
        let animation = viewport.current_animation().unwrap();

        viewport.teardown();
        assert!(!viewport.is_active());
        assert!(viewport.pending_tooltip_timer().is_none());
        assert!(viewport.fire_tooltip_timer(timer.token).is_empty());
        assert!(viewport
            .on_animation_frame(animation, t0 + Duration::from_millis(600))
            .is_empty());
        assert!(viewport.tick(t0 + Duration::from_secs(5)).is_empty());
        assert!(viewport.on_pointer_move(1.0, 1.0, t0).is_empty());
        assert!(viewport.on_region_click("a", t0).unwrap().is_empty());
        assert!(viewport.transform().is_identity());
    }

    #[test]
    fn test_resize_reframes_projection() {
        let mut viewport = controller();
        let events = viewport.resize(1300.0, 900.0);
        assert!(matches!(events.last(), Some(ViewportEvent::ViewChanged(_))));
        assert!((viewport.projection().scale - 200.0).abs() < 1e-9);
        assert!(viewport.resize(1300.0, 900.0).is_empty());
        assert!(viewport.resize(-1.0, 900.0).is_empty());
    }

    #[test]
    fn test_landmarks_follow_the_view() {
        let mut viewport = controller().with_landmarks(Landmark::heritage_sanctuaries());
        let before: Vec<Point> = viewport.landmark_positions().iter().map(|(_, p)| *p).collect();
        viewport.pan_by(25.0, -10.0);
        let after = viewport.landmark_positions();
        assert_eq!(after.len(), 3);
        assert_eq!(after[0].0.label, "SGP-001");
        for (old, (_, new)) in before.iter().zip(after.iter()) {
            assert!((new.x - old.x - 25.0).abs() < 1e-9);
            assert!((new.y - old.y + 10.0).abs() < 1e-9);
        }
    }
}
