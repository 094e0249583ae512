//! Core constants for the world-map interaction model.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Delay between hovering a new region and showing its tooltip.
pub const TOOLTIP_DELAY_MS: u64 = 250;

/// Zoom extent for direct manipulation (wheel, pinch).
pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 12.0;

/// Upper bound for the scale picked when framing a clicked region.
pub const FIT_MAX_SCALE: f64 = 8.0;

/// Fraction of the viewport a framed region should fill along its limiting axis.
pub const FIT_FILL_RATIO: f64 = 0.8;

/// Duration of the fit-to-region and reset-to-world transitions.
pub const FIT_ANIMATION_MS: u64 = 1200;

/// Initial world framing: `scale = width / 6.5`, `translate = [width / 2, height / 1.5]`.
pub const PROJECTION_SCALE_DIVISOR: f64 = 6.5;
pub const PROJECTION_VERTICAL_DIVISOR: f64 = 1.5;

/// Latitude where the Mercator world becomes square (arctan(sinh(pi))).
/// Region outlines are clipped to it so polar rings stay on the map.
pub const WORLD_SQUARE_LATITUDE: f64 = 85.0511287798;

/// Latitudes are pulled this far short of the poles before projecting so
/// that Mercator y stays finite. Points between [`WORLD_SQUARE_LATITUDE`]
/// and this bound project and unproject exactly.
pub const MAX_LATITUDE: f64 = 89.999_999;

/// Tooltip is drawn this many pixels right of and below the cursor.
pub const TOOLTIP_OFFSET: f64 = 20.0;

/// Tooltip flips to the left side when the cursor is this close to the right edge.
pub const TOOLTIP_FLIP_MARGIN: f64 = 240.0;

/// Capital shown for regions missing from the lookup table.
pub const UNKNOWN_CAPITAL: &str = "ANALYZING...";

/// Number of region insights kept in memory.
pub const INSIGHT_CACHE_SIZE: usize = 32;

/// Grounding citations kept per insight.
pub const MAX_GROUNDING_SOURCES: usize = 5;
