pub mod events;
pub mod handler;
pub mod hover;

// Re-export the essential types
pub use events::{HoverTarget, InputEvent, ViewportEvent};
pub use handler::GeoViewport;
pub use hover::{HoverState, TimerToken, TooltipTimer};
