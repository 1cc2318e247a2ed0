//! Contracts between the container and the host application.
//!
//! The host supplies tabs through a [`SegmentDataSource`], hears about
//! selection changes through a [`SegmentDelegate`], and describes each tab's
//! content with a [`ContentView`]. What a content can do beyond occupying a
//! page is declared up front in [`ContentCapabilities`] rather than probed
//! for at runtime.

use std::sync::Arc;

use crate::{config::HeightMode, geometry::Size, scroll_surface::SharedScrollSurface};

/// What triggered a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchCause {
    /// The user tapped an item in the tab bar.
    Tap,
    /// A horizontal drag of the pages came to rest on another page.
    SwipeSettle,
    /// Anything else: `select` calls and reloads.
    Programmatic,
}

/// Optional abilities of a tab's content.
#[derive(Debug, Clone, Default)]
pub struct ContentCapabilities {
    /// The content's own vertical scroll region. Content without one is laid
    /// out at its bounds height and never receives a forwarded offset.
    pub scroll_region: Option<SharedScrollSurface>,
    /// Height of non-scrolling chrome stacked above or below the scroll
    /// region.
    pub fixed_extra_height: Option<f64>,
    /// Overrides the container's default height mode for this tab.
    pub height_mode: Option<HeightMode>,
    /// Height used when the scroll content has not been measured yet.
    pub fallback_height: Option<f64>,
    /// Whether the scroll region takes part in scroll-to-top handoff.
    pub scrolls_to_top: bool,
}

impl ContentCapabilities {
    /// Capabilities of a plain view.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Capabilities of content that scrolls on its own.
    pub fn scrolling(region: SharedScrollSurface) -> Self {
        Self {
            scroll_region: Some(region),
            scrolls_to_top: true,
            ..Self::default()
        }
    }

    /// Declares a fixed extra height.
    pub fn with_fixed_extra_height(mut self, height: f64) -> Self {
        self.fixed_extra_height = Some(height);
        self
    }

    /// Declares a per-tab height mode.
    pub fn with_height_mode(mut self, mode: HeightMode) -> Self {
        self.height_mode = Some(mode);
        self
    }

    /// Declares a fallback height.
    pub fn with_fallback_height(mut self, height: f64) -> Self {
        self.fallback_height = Some(height);
        self
    }
}

/// A tab's content as seen by the container.
pub trait ContentView: Send + Sync {
    /// Size of the content after layout. Zero until the host has laid it out.
    fn bounds_size(&self) -> Size;

    /// Declared abilities. Queried once each time the tab becomes active.
    fn capabilities(&self) -> ContentCapabilities {
        ContentCapabilities::plain()
    }

    /// Called when managed content joins (`true`) or leaves (`false`) the
    /// container's owner.
    fn did_move_to_owner(&self, _attached: bool) {}
}

/// Whether the container manages the content's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRole {
    /// A bare view; nothing to attach.
    View,
    /// A controller-like content attached to the owner while cached.
    Managed,
}

/// Content produced by the data source for one tab.
#[derive(Clone)]
pub struct TabContent {
    view: Arc<dyn ContentView>,
    role: ContentRole,
}

impl TabContent {
    /// Wraps a bare view.
    pub fn view(view: Arc<dyn ContentView>) -> Self {
        Self {
            view,
            role: ContentRole::View,
        }
    }

    /// Wraps content whose lifecycle follows the container's cache.
    pub fn managed(view: Arc<dyn ContentView>) -> Self {
        Self {
            view,
            role: ContentRole::Managed,
        }
    }

    /// The wrapped content.
    pub fn content(&self) -> &Arc<dyn ContentView> {
        &self.view
    }

    /// Lifecycle role.
    pub fn role(&self) -> ContentRole {
        self.role
    }

    /// Shorthand for `role() == ContentRole::Managed`.
    pub fn is_managed(&self) -> bool {
        self.role == ContentRole::Managed
    }

    /// Shorthand for the content's capabilities.
    pub fn capabilities(&self) -> ContentCapabilities {
        self.view.capabilities()
    }
}

impl std::fmt::Debug for TabContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabContent")
            .field("role", &self.role)
            .field("bounds_size", &self.view.bounds_size())
            .finish()
    }
}

/// A selectable control shown in the tab bar.
pub trait BarItem: Send + Sync {
    /// Width the item wants in the strip.
    fn intrinsic_width(&self) -> f64;

    /// Reflects selection on the control.
    fn set_selected(&self, selected: bool);
}

/// Supplies the tabs.
pub trait SegmentDataSource: Send + Sync {
    /// Number of tabs.
    fn item_count(&self) -> usize;

    /// Bar item for `index`.
    fn bar_item(&self, index: usize) -> Arc<dyn BarItem>;

    /// Content for `index`. Called at most once per index per reload.
    fn content(&self, index: usize) -> TabContent;
}

/// Receives selection notifications. Every method defaults to doing nothing.
pub trait SegmentDelegate: Send + Sync {
    /// The container finished reloading.
    fn on_reload(&self) {}

    /// `index` is about to lose the selection.
    fn on_will_deselect(&self, _index: usize, _cause: SwitchCause) {}

    /// `index` became the selection.
    fn on_did_select(&self, _index: usize, _cause: SwitchCause) {}
}
