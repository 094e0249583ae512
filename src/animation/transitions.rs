use crate::animation::interpolation::EasingFunction;
use crate::core::viewport::ViewTransform;
use instant::Instant;
use std::time::Duration;

/// Identifies one scheduled fit-animation. Frames carrying a token other
/// than the current one belong to a superseded animation and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationToken(u64);

/// Interpolated transition of the view transform to a target
#[derive(Debug, Clone)]
pub struct FitAnimation {
    token: AnimationToken,
    from: ViewTransform,
    to: ViewTransform,
    start_time: Instant,
    duration: Duration,
    easing: EasingFunction,
}

/// One sampled animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub transform: ViewTransform,
    pub progress: f64,
    pub finished: bool,
}

impl FitAnimation {
    fn new(
        token: AnimationToken,
        from: ViewTransform,
        to: ViewTransform,
        start_time: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            token,
            from,
            to,
            start_time,
            duration,
            easing,
        }
    }

    pub fn token(&self) -> AnimationToken {
        self.token
    }

    pub fn target(&self) -> ViewTransform {
        self.to
    }

    /// Get the progress (0.0 to 1.0) at `now`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Samples the transform at `now`. Once the duration has elapsed the
    /// frame is exactly the target and marked finished.
    fn sample(&self, now: Instant) -> AnimationFrame {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return AnimationFrame {
                transform: self.to,
                progress: 1.0,
                finished: true,
            };
        }
        AnimationFrame {
            transform: self.from.lerp_with_easing(&self.to, progress, self.easing),
            progress,
            finished: false,
        }
    }
}

/// Holds at most one running fit-animation. Starting a new one supersedes
/// the previous; there is no queue.
#[derive(Debug, Default)]
pub struct TransitionManager {
    current: Option<FitAnimation>,
    last_token: u64,
}

impl TransitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new transition, cancelling any running one
    pub fn start(
        &mut self,
        from: ViewTransform,
        to: ViewTransform,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> AnimationToken {
        if self.cancel() {
            log::debug!("fit animation superseded");
        }
        self.last_token += 1;
        let token = AnimationToken(self.last_token);
        self.current = Some(FitAnimation::new(token, from, to, now, duration, easing));
        token
    }

    /// Drops the current transition; returns whether one was running.
    /// Its token is never advanced again.
    pub fn cancel(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Advance the running transition to `now`
    pub fn advance(&mut self, now: Instant) -> Option<AnimationFrame> {
        let frame = self.current.as_ref()?.sample(now);
        if frame.finished {
            self.current = None;
        }
        Some(frame)
    }

    /// Advance only if `token` still identifies the running transition
    pub fn advance_token(&mut self, token: AnimationToken, now: Instant) -> Option<AnimationFrame> {
        if self.current_token() != Some(token) {
            return None;
        }
        self.advance(now)
    }

    pub fn current_token(&self) -> Option<AnimationToken> {
        self.current.as_ref().map(FitAnimation::token)
    }

    pub fn current_target(&self) -> Option<ViewTransform> {
        self.current.as_ref().map(FitAnimation::target)
    }

    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    fn target() -> ViewTransform {
        ViewTransform::new(4.0, Point::new(-400.0, -300.0))
    }

    #[test]
    fn test_runs_to_exact_target() {
        let mut manager = TransitionManager::new();
        let t0 = Instant::now();
        manager.start(
            ViewTransform::identity(),
            target(),
            t0,
            Duration::from_millis(1200),
            EasingFunction::EaseInOutCubic,
        );
        assert!(manager.is_animating());

        let mid = manager.advance(t0 + Duration::from_millis(600)).unwrap();
        assert!(!mid.finished);
        assert!((mid.transform.scale - 2.5).abs() < 1e-9);

        let end = manager.advance(t0 + Duration::from_millis(1200)).unwrap();
        assert!(end.finished);
        assert_eq!(end.transform, target());
        assert!(!manager.is_animating());
        assert!(manager.advance(t0 + Duration::from_millis(1300)).is_none());
    }

    #[test]
    fn test_new_start_supersedes() {
        let mut manager = TransitionManager::new();
        let t0 = Instant::now();
        let first = manager.start(
            ViewTransform::identity(),
            target(),
            t0,
            Duration::from_millis(1200),
            EasingFunction::Linear,
        );
        let second = manager.start(
            ViewTransform::identity(),
            ViewTransform::identity(),
            t0,
            Duration::from_millis(1200),
            EasingFunction::Linear,
        );
        assert_ne!(first, second);
        assert!(manager
            .advance_token(first, t0 + Duration::from_millis(100))
            .is_none());
        assert_eq!(manager.current_target(), Some(ViewTransform::identity()));
        assert!(manager
            .advance_token(second, t0 + Duration::from_millis(100))
            .is_some());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut manager = TransitionManager::new();
        let t0 = Instant::now();
        manager.start(
            ViewTransform::identity(),
            target(),
            t0,
            Duration::ZERO,
            EasingFunction::Linear,
        );
        let frame = manager.advance(t0).unwrap();
        assert!(frame.finished);
        assert_eq!(frame.transform, target());
    }

    #[test]
    fn test_cancel() {
        let mut manager = TransitionManager::new();
        assert!(!manager.cancel());
        let t0 = Instant::now();
        let token = manager.start(
            ViewTransform::identity(),
            target(),
            t0,
            Duration::from_millis(10),
            EasingFunction::Linear,
        );
        assert!(manager.cancel());
        assert!(!manager.is_animating());
        assert_eq!(manager.current_token(), None);
        assert!(manager.advance_token(token, t0 + Duration::from_millis(20)).is_none());
        assert!(!manager.cancel());
    }
}
