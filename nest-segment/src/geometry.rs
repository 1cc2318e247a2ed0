//! Point-based geometry shared by every scrolling region.
//!
//! All lengths are expressed in points (`f64`), the unit the host's layout
//! engine reports sizes and offsets in. The types here carry no scale factor;
//! converting to physical pixels is the renderer's job.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) at the top-left corner
//! - X-axis increases to the right
//! - Y-axis increases downward
//! - Scroll offsets are positive when content has moved up/left
//!
//! # Example
//!
//! ```
//! use nest_segment::geometry::{EdgeInsets, Point, Rect, Size};
//!
//! let frame = Rect::new(Point::new(10.0, 0.0), Size::new(80.0, 45.0));
//! assert_eq!(frame.mid_x(), 50.0);
//!
//! let insets = EdgeInsets::new(0.0, 16.0, 0.0, 16.0);
//! assert_eq!(insets.horizontal(), 32.0);
//! ```

use std::ops::{Add, Sub};

/// A 2D position, used for scroll offsets and frame origins.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns a copy with `y` replaced.
    pub fn with_y(self, y: f64) -> Self {
        Self { x: self.x, y }
    }

    /// Returns `true` when both coordinates are finite numbers.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D extent, used for content sizes and viewport bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero or negative.
    ///
    /// Content that has not been through a layout pass yet reports an empty
    /// size.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns `true` when both dimensions are finite numbers.
    pub fn is_finite(self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Creates a rectangle from an origin and a size.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Left edge.
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    /// Horizontal center.
    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.size.width * 0.5
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.size.height
    }
}

/// Insets applied to the edges of a scrollable region's content.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the leading edge.
    pub left: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the trailing edge.
    pub right: f64,
}

impl EdgeInsets {
    /// No insets on any edge.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Creates insets in top, left, bottom, right order.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Sum of the leading and trailing insets.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Returns `true` when every edge is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Clamps `value` into `[min, max]`, collapsing to `min` when the range is
/// inverted.
///
/// `f64::clamp` panics on an inverted range; scroll ranges invert routinely
/// when content is shorter than its viewport.
pub fn clamp_lenient(value: f64, min: f64, max: f64) -> f64 {
    if max < min {
        return min;
    }
    value.max(min).min(max)
}
