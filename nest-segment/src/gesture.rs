//! Gesture arbitration for the cooperating scroll surfaces.
//!
//! Recognition itself belongs to the host. This module only answers the two
//! questions the host asks a scroll surface: may this pan begin, and may it
//! run together with another surface's pan.

use crate::{geometry::Point, scroll_surface::SurfaceId};

/// Default width of the leading-edge strip reserved for the navigation pop
/// gesture.
pub const DEFAULT_POP_EDGE_WIDTH: f64 = 50.0;

/// A pan about to begin on a scroll surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    /// Surface whose pan recognizer fired.
    pub surface: SurfaceId,
    /// Touch location in the surface's own coordinate space.
    pub location: Point,
}

/// Per-surface pan policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePolicy {
    /// When `false` the surface never starts a pan.
    pub pan_enabled: bool,
    /// When `true`, pans that start in the leading edge strip are left to the
    /// host's navigation pop gesture.
    pub pop_gesture_enabled: bool,
    /// Width of the leading edge strip.
    pub pop_edge_width: f64,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self {
            pan_enabled: true,
            pop_gesture_enabled: true,
            pop_edge_width: DEFAULT_POP_EDGE_WIDTH,
        }
    }
}

impl GesturePolicy {
    /// Decides whether a pan recognized on `owner` may begin.
    ///
    /// Gestures that belong to another surface are never blocked here.
    pub fn should_begin(&self, owner: SurfaceId, gesture: &PanGesture) -> bool {
        if !self.pan_enabled {
            return false;
        }
        if !self.pop_gesture_enabled || gesture.surface != owner {
            return true;
        }
        gesture.location.x > self.pop_edge_width
    }
}

/// The outer surface runs simultaneously only with the active tab's own pan.
pub fn should_recognize_simultaneously(active: Option<SurfaceId>, other: SurfaceId) -> bool {
    active == Some(other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pan(surface: SurfaceId, x: f64) -> PanGesture {
        PanGesture {
            surface,
            location: Point::new(x, 200.0),
        }
    }

    #[test]
    fn test_disabled_pan_never_begins() {
        let owner = SurfaceId::next();
        let policy = GesturePolicy {
            pan_enabled: false,
            ..GesturePolicy::default()
        };
        assert!(!policy.should_begin(owner, &pan(owner, 200.0)));
    }

    #[test]
    fn test_leading_edge_is_left_to_pop() {
        let owner = SurfaceId::next();
        let policy = GesturePolicy::default();
        assert!(!policy.should_begin(owner, &pan(owner, 20.0)));
        assert!(!policy.should_begin(owner, &pan(owner, 50.0)));
        assert!(policy.should_begin(owner, &pan(owner, 51.0)));
    }

    #[test]
    fn test_pop_disabled_allows_edge() {
        let owner = SurfaceId::next();
        let policy = GesturePolicy {
            pop_gesture_enabled: false,
            ..GesturePolicy::default()
        };
        assert!(policy.should_begin(owner, &pan(owner, 10.0)));
    }

    #[test]
    fn test_foreign_gesture_not_blocked() {
        let owner = SurfaceId::next();
        let other = SurfaceId::next();
        assert!(GesturePolicy::default().should_begin(owner, &pan(other, 10.0)));
    }

    #[test]
    fn test_simultaneous_only_with_active() {
        let active = SurfaceId::next();
        let other = SurfaceId::next();
        assert!(should_recognize_simultaneously(Some(active), active));
        assert!(!should_recognize_simultaneously(Some(active), other));
        assert!(!should_recognize_simultaneously(None, other));
    }
}
