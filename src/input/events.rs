use crate::core::geo::Point;
use crate::core::viewport::ViewTransform;
use serde::{Deserialize, Serialize};

/// Raw host input, in screen pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer moved over the viewport
    PointerMove { position: Point },
    /// Pointer left the viewport
    PointerLeave,
    /// Single click/tap; resolves to a region or to the background
    Click { position: Point },
    /// Scroll wheel or pinch zoom, in zoom levels (`scale *= 2^delta`)
    Scroll { delta: f64, position: Point },
    /// Drag in progress
    Drag { delta: Point },
    /// Viewport/window resize
    Resize { size: Point },
}

/// The region under the pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverTarget {
    pub id: String,
    pub name: String,
}

impl HoverTarget {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Events emitted by the viewport controller for the host to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// A region was clicked
    RegionSelected { id: String, name: String },
    /// Cursor read-out, emitted on every accepted pointer move
    CursorMoved {
        screen_x: f64,
        screen_y: f64,
        lat: f64,
        lng: f64,
    },
    /// Hovered region changed; `None` once the pointer is over no region
    HoverChanged(Option<HoverTarget>),
    /// Tooltip shown or hidden
    TooltipVisibility(bool),
    /// The view transform changed
    ViewChanged(ViewTransform),
    /// A fit-animation began towards `target`
    AnimationStarted { target: ViewTransform },
    /// A fit-animation reached `target`
    AnimationFinished { target: ViewTransform },
}
