//! Configuration system for viewport interaction tuning
//!
//! Hosts pick an [`InteractionProfile`] preset or supply a custom
//! [`ViewportConfig`]. `Balanced` reproduces the classic world-map feel:
//! 250 ms tooltip delay, zoom extent 1–12, regions framed at 80 % of the
//! viewport with a 1.2 s ease-in-out transition.

use crate::animation::interpolation::EasingFunction;
use crate::core::constants::{
    FIT_ANIMATION_MS, FIT_FILL_RATIO, FIT_MAX_SCALE, MAX_SCALE, MIN_SCALE, TOOLTIP_DELAY_MS,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionProfile {
    Balanced,
    Snappy,
    Cinematic,
    Custom(ViewportConfig),
}

impl InteractionProfile {
    pub fn resolve(&self) -> ViewportConfig {
        match self {
            Self::Balanced => ViewportConfig {
                hover: HoverConfig {
                    tooltip_delay_ms: TOOLTIP_DELAY_MS,
                },
                zoom: ZoomConfig {
                    min_scale: MIN_SCALE,
                    max_scale: MAX_SCALE,
                    fit_max_scale: FIT_MAX_SCALE,
                    fit_fill_ratio: FIT_FILL_RATIO,
                },
                animation: AnimationConfig {
                    enable_transitions: true,
                    fit_duration_ms: FIT_ANIMATION_MS,
                    easing: EasingFunction::EaseInOutCubic,
                },
                projection: ProjectionFit::WorldHeuristic,
            },
            Self::Snappy => ViewportConfig {
                hover: HoverConfig {
                    tooltip_delay_ms: 80,
                },
                zoom: ZoomConfig {
                    min_scale: MIN_SCALE,
                    max_scale: MAX_SCALE,
                    fit_max_scale: FIT_MAX_SCALE,
                    fit_fill_ratio: FIT_FILL_RATIO,
                },
                animation: AnimationConfig {
                    enable_transitions: true,
                    fit_duration_ms: 350,
                    easing: EasingFunction::EaseOutCubic,
                },
                projection: ProjectionFit::WorldHeuristic,
            },
            Self::Cinematic => ViewportConfig {
                hover: HoverConfig {
                    tooltip_delay_ms: 400,
                },
                zoom: ZoomConfig {
                    min_scale: MIN_SCALE,
                    max_scale: MAX_SCALE,
                    fit_max_scale: FIT_MAX_SCALE,
                    fit_fill_ratio: FIT_FILL_RATIO,
                },
                animation: AnimationConfig {
                    enable_transitions: true,
                    fit_duration_ms: 2000,
                    easing: EasingFunction::EaseInOutSine,
                },
                projection: ProjectionFit::BoundingBox { padding: 24.0 },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for InteractionProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Everything the viewport controller can be tuned with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub hover: HoverConfig,
    pub zoom: ZoomConfig,
    pub animation: AnimationConfig,
    pub projection: ProjectionFit,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        InteractionProfile::default().resolve()
    }
}

impl ViewportConfig {
    /// Parses a JSON document; missing sections take the balanced defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let zoom = &self.zoom;
        if !(zoom.min_scale.is_finite() && zoom.max_scale.is_finite()) || zoom.min_scale <= 0.0 {
            return Err(MapError::ParseError(format!(
                "zoom extent must be positive and finite, got [{}, {}]",
                zoom.min_scale, zoom.max_scale
            )));
        }
        if zoom.min_scale < MIN_SCALE || zoom.max_scale > MAX_SCALE {
            return Err(MapError::ParseError(format!(
                "zoom extent [{}, {}] must lie within [{}, {}]",
                zoom.min_scale, zoom.max_scale, MIN_SCALE, MAX_SCALE
            )));
        }
        if zoom.min_scale > zoom.max_scale {
            return Err(MapError::ParseError(format!(
                "min_scale {} exceeds max_scale {}",
                zoom.min_scale, zoom.max_scale
            )));
        }
        if !(zoom.fit_max_scale >= zoom.min_scale
            && zoom.fit_max_scale <= zoom.max_scale.min(FIT_MAX_SCALE))
        {
            return Err(MapError::ParseError(format!(
                "fit_max_scale {} outside zoom extent",
                zoom.fit_max_scale
            )));
        }
        if !(zoom.fit_fill_ratio > 0.0 && zoom.fit_fill_ratio <= 1.0) {
            return Err(MapError::ParseError(format!(
                "fit_fill_ratio {} must be in (0, 1]",
                zoom.fit_fill_ratio
            )));
        }
        Ok(())
    }

    pub fn tooltip_delay(&self) -> Duration {
        Duration::from_millis(self.hover.tooltip_delay_ms)
    }

    /// Zero when transitions are disabled, so fits snap immediately
    pub fn fit_duration(&self) -> Duration {
        if self.animation.enable_transitions {
            Duration::from_millis(self.animation.fit_duration_ms)
        } else {
            Duration::ZERO
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverConfig {
    pub tooltip_delay_ms: u64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            tooltip_delay_ms: TOOLTIP_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub fit_max_scale: f64,
    pub fit_fill_ratio: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            fit_max_scale: FIT_MAX_SCALE,
            fit_fill_ratio: FIT_FILL_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub enable_transitions: bool,
    pub fit_duration_ms: u64,
    pub easing: EasingFunction,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enable_transitions: true,
            fit_duration_ms: FIT_ANIMATION_MS,
            easing: EasingFunction::EaseInOutCubic,
        }
    }
}

/// How the base projection is framed when the controller initializes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProjectionFit {
    /// `scale = width / 6.5`, `translate = [width / 2, height / 1.5]`
    WorldHeuristic,
    /// Fit the geometry's geographic bounding box with the given padding
    BoundingBox { padding: f64 },
}

impl Default for ProjectionFit {
    fn default() -> Self {
        Self::WorldHeuristic
    }
}
