use crate::{
    core::{config::ViewportConfig, geo::Point},
    data::{
        geojson::parse_geojson,
        geometry::{Geometry, Landmark},
        loader::fetch_geometry,
        topojson::parse_topojson,
    },
    input::{
        events::{InputEvent, ViewportEvent},
        handler::GeoViewport,
    },
    ui::tooltip::TooltipContent,
    Result,
};
use instant::Instant;
use serde::{Deserialize, Serialize};

/// Visual state of a region for the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionStyle {
    Normal,
    Hovered,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRenderState {
    pub id: String,
    pub name: String,
    pub style: RegionStyle,
}

/// The parent composition around the viewport controller.
///
/// Owns the selection and the geometry lifecycle. Until geometry has loaded
/// (or after it failed to) there is no controller: input is ignored and the
/// render state is empty.
pub struct WorldMap {
    config: ViewportConfig,
    size: Point,
    landmarks: Vec<Landmark>,
    viewport: Option<GeoViewport>,
    selection: Option<String>,
    cursor: Option<Point>,
    load_error: Option<String>,
}

impl WorldMap {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(width, height, ViewportConfig::default())
    }

    pub fn with_config(width: f64, height: f64, config: ViewportConfig) -> Self {
        Self {
            config,
            size: Point::new(width, height),
            landmarks: Vec::new(),
            viewport: None,
            selection: None,
            cursor: None,
            load_error: None,
        }
    }

    pub fn set_landmarks(&mut self, landmarks: Vec<Landmark>) {
        self.landmarks = landmarks;
    }

    /// Installs geometry from any source. A failed load, or geometry the
    /// controller rejects, leaves the map empty rather than failing the host.
    /// Returns whether the map is ready for input.
    pub fn load(&mut self, geometry: Result<Geometry>) -> bool {
        if let Some(mut previous) = self.viewport.take() {
            previous.teardown();
        }
        self.selection = None;
        self.cursor = None;

        let viewport = geometry.and_then(|geometry| {
            GeoViewport::with_config(geometry, self.size.x, self.size.y, self.config.clone())
        });
        match viewport {
            Ok(viewport) => {
                self.viewport = Some(viewport.with_landmarks(self.landmarks.clone()));
                self.load_error = None;
                true
            }
            Err(e) => {
                log::warn!("geometry unavailable, rendering an empty map: {}", e);
                self.load_error = Some(e.to_string());
                false
            }
        }
    }

    pub fn load_geojson(&mut self, text: &str) -> bool {
        self.load(parse_geojson(text))
    }

    pub fn load_topojson(&mut self, text: &str, object_name: Option<&str>) -> bool {
        self.load(parse_topojson(text, object_name))
    }

    pub async fn load_url(&mut self, url: &str) -> bool {
        let geometry = fetch_geometry(url).await;
        self.load(geometry)
    }

    /// Forwards input to the controller and records selection changes
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Vec<ViewportEvent> {
        if let InputEvent::Resize { size } = &event {
            if size.x > 0.0 && size.y > 0.0 && size.is_finite() {
                self.size = *size;
            }
        }
        let events = match self.viewport.as_mut() {
            Some(viewport) => viewport.handle(event, now),
            None => return Vec::new(),
        };
        self.observe(&events);
        events
    }

    pub fn tick(&mut self, now: Instant) -> Vec<ViewportEvent> {
        let events = match self.viewport.as_mut() {
            Some(viewport) => viewport.tick(now),
            None => return Vec::new(),
        };
        self.observe(&events);
        events
    }

    /// Programmatic selection, as if the region had been clicked
    pub fn select_region(&mut self, region_id: &str, now: Instant) -> Result<Vec<ViewportEvent>> {
        let events = match self.viewport.as_mut() {
            Some(viewport) => viewport.on_region_click(region_id, now)?,
            None => return Ok(Vec::new()),
        };
        self.observe(&events);
        Ok(events)
    }

    fn observe(&mut self, events: &[ViewportEvent]) {
        for event in events {
            match event {
                ViewportEvent::RegionSelected { id, .. } => self.selection = Some(id.clone()),
                ViewportEvent::CursorMoved {
                    screen_x, screen_y, ..
                } => self.cursor = Some(Point::new(*screen_x, *screen_y)),
                ViewportEvent::HoverChanged(None) => self.cursor = None,
                _ => {}
            }
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Per-region style, in geometry order. Selection wins over hover.
    pub fn render_state(&self) -> Vec<RegionRenderState> {
        let viewport = match &self.viewport {
            Some(viewport) => viewport,
            None => return Vec::new(),
        };
        let hovered = viewport.hover_target().map(|t| t.id.as_str());
        viewport
            .geometry()
            .iter()
            .map(|region| {
                let style = if self.selection.as_deref() == Some(region.id.as_str()) {
                    RegionStyle::Selected
                } else if hovered == Some(region.id.as_str()) {
                    RegionStyle::Hovered
                } else {
                    RegionStyle::Normal
                };
                RegionRenderState {
                    id: region.id.clone(),
                    name: region.name.clone(),
                    style,
                }
            })
            .collect()
    }

    /// Tooltip for the hovered region, present as soon as hover starts so
    /// hosts can fade it in once `visible` flips
    pub fn tooltip(&self) -> Option<TooltipContent> {
        let viewport = self.viewport.as_ref()?;
        let target = viewport.hover_target()?;
        let cursor = self.cursor?;
        Some(TooltipContent::new(
            target,
            cursor,
            viewport.size().x,
            viewport.tooltip_visible(),
        ))
    }

    pub fn landmark_positions(&self) -> Vec<(&Landmark, Point)> {
        self.viewport
            .as_ref()
            .map(GeoViewport::landmark_positions)
            .unwrap_or_default()
    }

    pub fn teardown(&mut self) {
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.teardown();
        }
    }

    pub fn viewport(&self) -> Option<&GeoViewport> {
        self.viewport.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.viewport.as_ref().map_or(false, GeoViewport::is_active)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn size(&self) -> Point {
        self.size
    }
}
