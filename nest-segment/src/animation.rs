//! Eased tweens driven by the host's frame clock.
//!
//! Nothing here reads a clock. The host reports elapsed frame time through
//! `advance`, which keeps every animated move deterministic and lets tests
//! step animations explicitly.

use std::time::Duration;

/// Cubic ease-in-out mapping.
/// Input: linear progress in [0.0, 1.0].
/// Output: eased progress in [0.0, 1.0].
pub(crate) fn easing(progress: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A scalar moving from one value to another over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    /// Creates a tween that is already at rest on `value`.
    pub fn at(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Starts moving from the current value toward `target`.
    ///
    /// A zero `duration` jumps straight to the target. Retargeting a running
    /// tween starts from wherever it currently is.
    pub fn animate_to(&mut self, target: f64, duration: Duration) {
        let current = self.value();
        self.from = current;
        self.to = target;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
    }

    /// Jumps to `value` and stops any running animation.
    pub fn snap_to(&mut self, value: f64) {
        *self = Self::at(value);
    }

    /// Moves to `target`, animated or not.
    pub fn set(&mut self, target: f64, animated: bool, duration: Duration) {
        if animated {
            self.animate_to(target, duration);
        } else {
            self.snap_to(target);
        }
    }

    /// Advances the animation by `dt`. Returns `true` when this step finished
    /// the animation.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.is_animating() {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.snap_to(self.to);
            return true;
        }
        false
    }

    /// Current interpolated value.
    pub fn value(&self) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let progress = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * easing(progress)
    }

    /// Value the tween is heading to.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Whether the tween is still moving.
    pub fn is_animating(&self) -> bool {
        !self.duration.is_zero() && self.elapsed < self.duration
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::at(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(easing(0.0), 0.0);
        assert_eq!(easing(1.0), 1.0);
        assert!((easing(0.5) - 0.5).abs() < 1e-9);
        assert_eq!(easing(2.0), 1.0);
    }

    #[test]
    fn test_tween_runs_to_completion() {
        let mut tween = Tween::at(0.0);
        tween.animate_to(100.0, Duration::from_millis(200));
        assert!(tween.is_animating());
        assert_eq!(tween.target(), 100.0);

        assert!(!tween.advance(Duration::from_millis(100)));
        let midway = tween.value();
        assert!(midway > 0.0 && midway < 100.0);

        assert!(tween.advance(Duration::from_millis(100)));
        assert_eq!(tween.value(), 100.0);
        assert!(!tween.is_animating());
        assert!(!tween.advance(Duration::from_millis(16)));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut tween = Tween::at(10.0);
        tween.animate_to(40.0, Duration::ZERO);
        assert_eq!(tween.value(), 40.0);
        assert!(!tween.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut tween = Tween::at(0.0);
        tween.animate_to(100.0, Duration::from_millis(100));
        tween.advance(Duration::from_millis(50));
        let current = tween.value();
        tween.animate_to(0.0, Duration::from_millis(100));
        assert_eq!(tween.value(), current);
    }
}
