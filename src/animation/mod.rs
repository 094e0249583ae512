pub mod interpolation;
pub mod transitions;

// Re-export commonly used types and functions for convenience
pub use interpolation::EasingFunction;
pub use transitions::{AnimationFrame, AnimationToken, FitAnimation, TransitionManager};
