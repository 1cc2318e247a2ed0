//! Configuration for the tab bar and the nested container.
//!
//! Both argument structs are built through `derive_builder` builders whose
//! `build()` validates lengths and insets. Fields left unset take the values
//! from the struct's `Default` impl.
//!
//! ```
//! use nest_segment::config::{HeightMode, NestSegmentArgsBuilder};
//!
//! let args = NestSegmentArgsBuilder::default()
//!     .tab_bar_height(48.0)
//!     .default_height_mode(HeightMode::FixedToContainer)
//!     .build()
//!     .expect("valid configuration");
//! assert_eq!(args.tab_bar_height, 48.0);
//! assert!(!args.preload_all_pages);
//! ```

use std::time::Duration;

use derive_builder::{Builder, UninitializedFieldError};
use thiserror::Error;

use crate::{
    geometry::{EdgeInsets, Size},
    gesture::GesturePolicy,
};

/// Default tab bar height in points.
pub const DEFAULT_TAB_BAR_HEIGHT: f64 = 45.0;
/// Content heights below this are treated as "not laid out yet".
pub const DEFAULT_MIN_MEASURED_HEIGHT: f64 = 50.0;
/// Duration of the outer scroll snap when a shorter tab becomes active.
pub const DEFAULT_SNAP_DURATION: Duration = Duration::from_millis(200);
/// Duration of animated page and indicator moves.
pub const DEFAULT_PAGE_DURATION: Duration = Duration::from_millis(250);

/// Errors produced when validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A length was negative, NaN or infinite.
    #[error("`{field}` must be a finite, non-negative length, got {value}")]
    InvalidLength {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Edge insets contained a negative or non-finite edge.
    #[error("`{field}` insets must be finite and non-negative")]
    InvalidInsets {
        /// Offending field.
        field: &'static str,
    },
    /// A builder field had no value and no default.
    #[error("`{0}` must be initialized")]
    UninitializedField(&'static str),
}

impl From<UninitializedFieldError> for ConfigError {
    fn from(err: UninitializedFieldError) -> Self {
        Self::UninitializedField(err.field_name())
    }
}

fn check_length(field: &'static str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(ConfigError::InvalidLength { field, value })
        }
        _ => Ok(()),
    }
}

/// How much vertical room a tab claims when its content is shorter than the
/// viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightMode {
    /// Short content still fills the container; no extra scroll room.
    FixedToContainer,
    /// The container shrinks to the content height.
    #[default]
    FollowContent,
}

/// Sizing policy for the selection indicator under the tab bar items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorMode {
    /// The indicator always has this size.
    Fixed(Size),
    /// The indicator is as wide as the selected item minus `width_delta`, and
    /// `height` tall.
    Relative {
        /// Points removed from the selected item's width.
        width_delta: f64,
        /// Indicator height.
        height: f64,
    },
}

impl Default for IndicatorMode {
    fn default() -> Self {
        Self::Relative {
            width_delta: 0.0,
            height: 2.0,
        }
    }
}

/// Arguments for the [`TabBar`](crate::tab_bar::TabBar).
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    pattern = "owned",
    default,
    build_fn(validate = "Self::validate", error = "ConfigError")
)]
pub struct TabBarArgs {
    /// Indicator sizing policy.
    pub indicator_mode: IndicatorMode,
    /// Horizontal gap between adjacent items.
    pub item_spacing: f64,
    /// Insets around the row of items inside the strip.
    pub edge_insets: EdgeInsets,
    /// Height of the hairline along the bottom of the bar.
    pub bottom_line_height: f64,
    /// Whether tapping an item animates the strip and the indicator.
    pub click_animation: bool,
    /// Duration of animated strip and indicator moves.
    pub animation_duration: Duration,
    /// Gesture policy of the strip's own horizontal scroll.
    pub gesture: GesturePolicy,
}

impl Default for TabBarArgs {
    fn default() -> Self {
        Self {
            indicator_mode: IndicatorMode::default(),
            item_spacing: 0.0,
            edge_insets: EdgeInsets::ZERO,
            bottom_line_height: 1.0,
            click_animation: true,
            animation_duration: DEFAULT_PAGE_DURATION,
            gesture: GesturePolicy::default(),
        }
    }
}

impl TabBarArgsBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        check_length("item_spacing", self.item_spacing)?;
        check_length("bottom_line_height", self.bottom_line_height)?;
        if let Some(insets) = &self.edge_insets
            && !insets.is_valid()
        {
            return Err(ConfigError::InvalidInsets {
                field: "edge_insets",
            });
        }
        match self.indicator_mode {
            Some(IndicatorMode::Fixed(size)) => {
                check_length("indicator_mode.width", Some(size.width))?;
                check_length("indicator_mode.height", Some(size.height))
            }
            Some(IndicatorMode::Relative {
                width_delta,
                height,
            }) => {
                if !width_delta.is_finite() {
                    return Err(ConfigError::InvalidLength {
                        field: "indicator_mode.width_delta",
                        value: width_delta,
                    });
                }
                check_length("indicator_mode.height", Some(height))
            }
            None => Ok(()),
        }
    }
}

/// Arguments for the [`NestedScrollCoordinator`](crate::coordinator::NestedScrollCoordinator)
/// and the container it embeds.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    pattern = "owned",
    default,
    build_fn(validate = "Self::validate", error = "ConfigError")
)]
pub struct NestSegmentArgs {
    /// Height of the tab bar strip.
    pub tab_bar_height: f64,
    /// Height mode for tabs that do not declare their own.
    pub default_height_mode: HeightMode,
    /// Materialize every page on reload instead of on first visit.
    ///
    /// Avoids blank pages during fast swipes at the cost of building every
    /// page up front; keep it for small tab counts.
    pub preload_all_pages: bool,
    /// Scroll content heights below this are considered unmeasured.
    pub min_measured_height: f64,
    /// Duration of the snap that moves the outer scroll up before a shorter
    /// height is committed.
    pub snap_duration: Duration,
    /// Duration of animated page changes.
    pub page_duration: Duration,
    /// Gesture policy of the outer vertical scroll.
    pub gesture: GesturePolicy,
    /// Gesture policy of the horizontal paging scroll.
    pub paging_gesture: GesturePolicy,
    /// Tab bar configuration.
    pub tab_bar: TabBarArgs,
}

impl Default for NestSegmentArgs {
    fn default() -> Self {
        Self {
            tab_bar_height: DEFAULT_TAB_BAR_HEIGHT,
            default_height_mode: HeightMode::FollowContent,
            preload_all_pages: false,
            min_measured_height: DEFAULT_MIN_MEASURED_HEIGHT,
            snap_duration: DEFAULT_SNAP_DURATION,
            page_duration: DEFAULT_PAGE_DURATION,
            gesture: GesturePolicy::default(),
            paging_gesture: GesturePolicy::default(),
            tab_bar: TabBarArgs {
                bottom_line_height: 0.5,
                ..TabBarArgs::default()
            },
        }
    }
}

impl NestSegmentArgsBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        check_length("tab_bar_height", self.tab_bar_height)?;
        check_length("min_measured_height", self.min_measured_height)?;
        if let Some(gesture) = &self.gesture {
            check_length("gesture.pop_edge_width", Some(gesture.pop_edge_width))?;
        }
        if let Some(gesture) = &self.paging_gesture {
            check_length("paging_gesture.pop_edge_width", Some(gesture.pop_edge_width))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builder() {
        let built = NestSegmentArgsBuilder::default()
            .build()
            .expect("defaults are valid");
        assert_eq!(built, NestSegmentArgs::default());
        assert_eq!(built.tab_bar_height, DEFAULT_TAB_BAR_HEIGHT);
        assert_eq!(built.tab_bar.bottom_line_height, 0.5);
        assert_eq!(built.default_height_mode, HeightMode::FollowContent);
    }

    #[test]
    fn test_rejects_negative_bar_height() {
        let err = NestSegmentArgsBuilder::default()
            .tab_bar_height(-1.0)
            .build()
            .expect_err("rejected");
        assert_eq!(
            err,
            ConfigError::InvalidLength {
                field: "tab_bar_height",
                value: -1.0
            }
        );
    }

    #[test]
    fn test_rejects_bad_insets() {
        let err = TabBarArgsBuilder::default()
            .edge_insets(EdgeInsets::new(0.0, -4.0, 0.0, 0.0))
            .build()
            .expect_err("rejected");
        assert_eq!(
            err,
            ConfigError::InvalidInsets {
                field: "edge_insets"
            }
        );
    }

    #[test]
    fn test_rejects_non_finite_indicator() {
        let err = TabBarArgsBuilder::default()
            .indicator_mode(IndicatorMode::Fixed(Size::new(f64::INFINITY, 2.0)))
            .build()
            .expect_err("rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidLength {
                field: "indicator_mode.width",
                ..
            }
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidLength {
            field: "item_spacing",
            value: -2.0,
        };
        assert_eq!(
            err.to_string(),
            "`item_spacing` must be a finite, non-negative length, got -2"
        );
    }
}
