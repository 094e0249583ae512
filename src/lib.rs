//! # sovereign-map
//!
//! An interactive world-map viewport engine.
//!
//! The crate projects region boundaries (countries, provinces, any polygons
//! keyed by id) onto a screen, resolves pointer positions back to geographic
//! coordinates and to the region underneath, debounces hover tooltips and
//! animates the view to frame a clicked region. Nothing here draws pixels:
//! every operation returns [`ViewportEvent`]s and render state that a host
//! (egui, a web canvas, a terminal) applies.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod insight;
pub mod prelude;
pub mod spatial;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{InteractionProfile, ViewportConfig},
    geo::{LatLng, Point},
    map::{RegionRenderState, WorldMap},
    projection::Projection,
    viewport::ViewTransform,
};

pub use data::geometry::{Geometry, Landmark, Region};

pub use input::{
    events::{HoverTarget, InputEvent, ViewportEvent},
    handler::GeoViewport,
};

pub use insight::{InsightDesk, InsightProvider, SovereignInsight};

pub use ui::tooltip::{RiskLevel, TooltipContent};

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG` and
/// defaulting to `info`. Later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Insight service error: {0}")]
    Insight(String),
}

/// Error type alias for convenience
pub type Error = MapError;
