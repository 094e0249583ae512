//! Prelude module for common sovereign-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use sovereign_map::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    builder::WorldMapBuilder,
    config::{InteractionProfile, ProjectionFit, ViewportConfig},
    geo::{LatLng, LatLngBounds, Point},
    map::{RegionRenderState, RegionStyle, WorldMap},
    projection::Projection,
    viewport::{ViewTransform, Viewport},
};

pub use crate::data::{
    geometry::{Geometry, Landmark, Region},
    loader::{fetch_geometry, parse_geometry},
};

pub use crate::input::{
    events::{HoverTarget, InputEvent, ViewportEvent},
    handler::GeoViewport,
    hover::TimerToken,
};

pub use crate::animation::{AnimationToken, EasingFunction};

pub use crate::spatial::{
    hit_test::RegionHitTester,
    index::{SpatialIndex, SpatialItem},
};

pub use crate::insight::{
    ChatMessage, ChatRole, GeminiClient, InsightDesk, InsightProvider, SovereignInsight,
};

pub use crate::ui::tooltip::{RiskLevel, TooltipContent};

pub use crate::traits::{CoordinateTransform, Lerp};

pub use crate::{Error as MapError, Result};

pub use instant::Instant;
pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
