//! World map builder for fluent configuration
//!
//! Collects viewport size, interaction profile, landmarks and (optionally)
//! geometry, then produces a [`WorldMap`].

use crate::{
    core::{
        config::{InteractionProfile, ViewportConfig},
        geo::Point,
        map::WorldMap,
    },
    data::geometry::{Geometry, Landmark},
    Result,
};

/// Builder for creating and configuring WorldMap instances
pub struct WorldMapBuilder {
    size: Point,
    profile: InteractionProfile,
    landmarks: Vec<Landmark>,
    geometry: Option<Result<Geometry>>,
}

impl WorldMapBuilder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Point::new(width, height),
            profile: InteractionProfile::default(),
            landmarks: Vec::new(),
            geometry: None,
        }
    }

    pub fn with_profile(mut self, profile: InteractionProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Shorthand for `with_profile(InteractionProfile::Custom(config))`
    pub fn with_config(self, config: ViewportConfig) -> Self {
        self.with_profile(InteractionProfile::Custom(config))
    }

    pub fn with_landmarks(mut self, landmarks: Vec<Landmark>) -> Self {
        self.landmarks = landmarks;
        self
    }

    pub fn with_heritage_sanctuaries(self) -> Self {
        self.with_landmarks(Landmark::heritage_sanctuaries())
    }

    /// Geometry to load on build; a failed parse is passed through so the
    /// map degrades instead of the builder failing
    pub fn with_geometry(mut self, geometry: Result<Geometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn build(self) -> WorldMap {
        let mut map = WorldMap::with_config(self.size.x, self.size.y, self.profile.resolve());
        map.set_landmarks(self.landmarks);
        if let Some(geometry) = self.geometry {
            map.load(geometry);
        }
        map
    }
}

impl WorldMapBuilder {
    /// The classic world map: balanced interaction and the sanctuary markers
    pub fn world_map(width: f64, height: f64) -> Self {
        Self::new(width, height)
            .with_profile(InteractionProfile::Balanced)
            .with_heritage_sanctuaries()
    }

    /// Slower tooltip and transitions with the geometry framed to fill the
    /// viewport; zoom limits are the same as [`WorldMapBuilder::world_map`]
    pub fn presentation_map(width: f64, height: f64) -> Self {
        Self::new(width, height)
            .with_profile(InteractionProfile::Cinematic)
            .with_heritage_sanctuaries()
    }
}
