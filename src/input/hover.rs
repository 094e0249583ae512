use crate::input::events::{HoverTarget, ViewportEvent};
use instant::Instant;
use std::time::Duration;

/// Identifies one armed tooltip timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// The single pending tooltip-show timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipTimer {
    pub token: TimerToken,
    pub deadline: Instant,
}

/// Hovered region plus the debounced tooltip flag.
///
/// The tooltip becomes visible once per hover session, `delay` after the
/// pointer entered the region. Any hover change hides it immediately and
/// re-arms the timer; staying inside the same region leaves it alone.
#[derive(Debug, Default)]
pub struct HoverState {
    target: Option<HoverTarget>,
    tooltip_visible: bool,
    timer: Option<TooltipTimer>,
    last_token: u64,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&HoverTarget> {
        self.target.as_ref()
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip_visible
    }

    pub fn pending_timer(&self) -> Option<TooltipTimer> {
        self.timer
    }

    /// Applies the latest hit-test result
    pub fn update(&mut self, hit: Option<HoverTarget>, now: Instant, delay: Duration) -> Vec<ViewportEvent> {
        let hit = match hit {
            Some(hit) => hit,
            None => return self.clear(),
        };
        if self.target.as_ref().map(|t| &t.id) == Some(&hit.id) {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.timer = None;
        if self.tooltip_visible {
            self.tooltip_visible = false;
            events.push(ViewportEvent::TooltipVisibility(false));
        }
        self.target = Some(hit.clone());
        events.push(ViewportEvent::HoverChanged(Some(hit)));

        if delay.is_zero() {
            self.tooltip_visible = true;
            events.push(ViewportEvent::TooltipVisibility(true));
        } else {
            self.last_token += 1;
            self.timer = Some(TooltipTimer {
                token: TimerToken(self.last_token),
                deadline: now + delay,
            });
        }
        events
    }

    /// Cancels the timer, hides the tooltip and forgets the target.
    /// Calling it again emits nothing.
    pub fn clear(&mut self) -> Vec<ViewportEvent> {
        let mut events = Vec::new();
        self.timer = None;
        if self.tooltip_visible {
            self.tooltip_visible = false;
            events.push(ViewportEvent::TooltipVisibility(false));
        }
        if self.target.take().is_some() {
            events.push(ViewportEvent::HoverChanged(None));
        }
        events
    }

    /// Fires the timer if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Vec<ViewportEvent> {
        match self.timer {
            Some(timer) if timer.deadline <= now => self.fire(timer.token),
            _ => Vec::new(),
        }
    }

    /// Host-scheduled timer callback. Stale tokens are ignored.
    pub fn fire(&mut self, token: TimerToken) -> Vec<ViewportEvent> {
        if self.timer.map(|t| t.token) != Some(token) {
            return Vec::new();
        }
        self.timer = None;
        if self.target.is_none() || self.tooltip_visible {
            return Vec::new();
        }
        self.tooltip_visible = true;
        vec![ViewportEvent::TooltipVisibility(true)]
    }
}
