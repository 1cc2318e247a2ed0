//! The header stacked above the tab bar.
//!
//! A header is either a plain view, measured by its bounds, or an embedded
//! scroll region whose own scrolling is switched off so that it scrolls with
//! the outer surface. An embedded header is as tall as its content and is
//! observed for content size changes.

use tracing::debug;

use crate::{
    content::TabContent,
    geometry::{Point, Rect, Size},
    scroll_surface::{MetricsChange, SharedScrollSurface, Subscription},
};

enum HeaderSource {
    None,
    View(TabContent),
    Embedded {
        content: TabContent,
        region: SharedScrollSurface,
        subscription: Subscription,
    },
}

impl HeaderSource {
    fn content(&self) -> Option<&TabContent> {
        match self {
            Self::None => None,
            Self::View(content) | Self::Embedded { content, .. } => Some(content),
        }
    }
}

/// Header state owned by the coordinator.
pub struct Header {
    source: HeaderSource,
    height: f64,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// Creates an empty header of zero height.
    pub fn new() -> Self {
        Self {
            source: HeaderSource::None,
            height: 0.0,
        }
    }

    /// Replaces the header. Content that declares a scroll region becomes an
    /// embedded header. The previous header is detached and its observer
    /// dropped.
    pub fn configure(&mut self, content: Option<TabContent>) {
        self.detach();
        self.source = match content {
            None => HeaderSource::None,
            Some(content) => {
                if content.is_managed() {
                    content.content().did_move_to_owner(true);
                }
                match content.capabilities().scroll_region {
                    Some(region) => {
                        region.write().set_scroll_enabled(false);
                        let subscription = Subscription::subscribe(&region);
                        HeaderSource::Embedded {
                            content,
                            region,
                            subscription,
                        }
                    }
                    None => HeaderSource::View(content),
                }
            }
        };
        self.height = self.measure();
        debug!(height = self.height, embedded = self.is_embedded(), "header configured");
    }

    /// Re-measures the header and returns `true` if its height changed. An
    /// embedded header is only re-measured after its content size changed.
    pub fn sync(&mut self) -> bool {
        let resized = match &self.source {
            HeaderSource::Embedded { subscription, .. } => subscription
                .drain()
                .iter()
                .any(|change| matches!(change, MetricsChange::ContentSize { .. })),
            _ => true,
        };
        if !resized {
            return false;
        }
        let height = self.measure();
        if height == self.height {
            return false;
        }
        debug!(from = self.height, to = height, "header resized");
        self.height = height;
        true
    }

    /// Current header height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Frame of the header at the top of the outer column.
    pub fn frame(&self, width: f64) -> Rect {
        Rect::new(Point::ZERO, Size::new(width, self.height))
    }

    /// Whether the header is an embedded scroll region.
    pub fn is_embedded(&self) -> bool {
        matches!(self.source, HeaderSource::Embedded { .. })
    }

    /// The configured header content.
    pub fn content(&self) -> Option<&TabContent> {
        self.source.content()
    }

    fn measure(&self) -> f64 {
        let height = match &self.source {
            HeaderSource::None => 0.0,
            HeaderSource::View(content) => content.content().bounds_size().height,
            HeaderSource::Embedded { region, .. } => region.read().content_size().height,
        };
        if height.is_finite() { height.max(0.0) } else { 0.0 }
    }

    fn detach(&mut self) {
        let previous = std::mem::replace(&mut self.source, HeaderSource::None);
        if let Some(content) = previous.content()
            && content.is_managed()
        {
            content.content().did_move_to_owner(false);
        }
    }
}

impl Drop for Header {
    fn drop(&mut self) {
        self.detach();
    }
}
