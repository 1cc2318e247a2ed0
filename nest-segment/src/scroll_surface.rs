//! Observable scroll metrics.
//!
//! A [`ScrollSurface`] is the model behind one scrollable region: its offset,
//! content size and content inset, plus the viewport it is displayed in. The
//! host mutates it as the user scrolls and as layout resolves; the
//! coordinator reads it and writes offsets back.
//!
//! Observation is queue based. Every [`Subscription`] owns a FIFO of
//! [`MetricsChange`]s which the subscriber drains on its own schedule, so a
//! change is never delivered while the surface is locked and changes arrive
//! in the order they happened. Dropping the subscription removes its queue;
//! nothing recorded after that point can reach the old subscriber.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

use crate::geometry::{EdgeInsets, Point, Size};

new_key_type! {
    /// Key of one observer queue inside a [`ScrollSurface`].
    pub struct ObserverKey;
}

/// Process-unique identity of a scroll surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocates a fresh identifier.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Scroll state of one region.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// How far the content has been scrolled.
    pub offset: Point,
    /// Total size of the scrollable content.
    pub content_size: Size,
    /// Extra room around the content.
    pub content_inset: EdgeInsets,
}

/// One recorded change to a surface's metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricsChange {
    /// The scroll offset moved.
    Offset {
        /// Offset before the change.
        old: Point,
        /// Offset after the change.
        new: Point,
    },
    /// The content size changed.
    ContentSize {
        /// Size before the change.
        old: Size,
        /// Size after the change.
        new: Size,
    },
    /// The content inset changed.
    ContentInset {
        /// Inset before the change.
        old: EdgeInsets,
        /// Inset after the change.
        new: EdgeInsets,
    },
}

/// A scroll surface shared between the host and the coordinator.
pub type SharedScrollSurface = Arc<RwLock<ScrollSurface>>;

/// Model of one scrollable region.
#[derive(Debug)]
pub struct ScrollSurface {
    id: SurfaceId,
    metrics: ScrollMetrics,
    viewport: Size,
    scroll_enabled: bool,
    scrolls_to_top: bool,
    shows_vertical_indicator: bool,
    observers: SlotMap<ObserverKey, VecDeque<MetricsChange>>,
}

impl ScrollSurface {
    /// Creates a surface with the given viewport and empty content.
    pub fn new(viewport: Size) -> Self {
        Self {
            id: SurfaceId::next(),
            metrics: ScrollMetrics::default(),
            viewport,
            scroll_enabled: true,
            scrolls_to_top: true,
            shows_vertical_indicator: true,
            observers: SlotMap::with_key(),
        }
    }

    /// Creates a surface with the given viewport and content size.
    pub fn with_content(viewport: Size, content_size: Size) -> Self {
        let mut surface = Self::new(viewport);
        surface.metrics.content_size = content_size;
        surface
    }

    /// Wraps the surface for sharing.
    pub fn into_shared(self) -> SharedScrollSurface {
        Arc::new(RwLock::new(self))
    }

    /// Identity of this surface.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Snapshot of the current metrics.
    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    /// Current scroll offset.
    pub fn offset(&self) -> Point {
        self.metrics.offset
    }

    /// Current content size.
    pub fn content_size(&self) -> Size {
        self.metrics.content_size
    }

    /// Current content inset.
    pub fn content_inset(&self) -> EdgeInsets {
        self.metrics.content_inset
    }

    /// Visible bounds of the surface.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Largest vertical offset that still shows content at the bottom edge.
    pub fn max_offset_y(&self) -> f64 {
        let extent = self.metrics.content_size.height + self.metrics.content_inset.bottom;
        (extent - self.viewport.height).max(0.0)
    }

    /// Moves the content. Records a change only if the offset differs.
    pub fn set_offset(&mut self, offset: Point) {
        let old = self.metrics.offset;
        if old == offset {
            return;
        }
        self.metrics.offset = offset;
        self.record(MetricsChange::Offset { old, new: offset });
    }

    /// Moves the content vertically, keeping the horizontal offset.
    pub fn set_offset_y(&mut self, y: f64) {
        self.set_offset(self.metrics.offset.with_y(y));
    }

    /// Updates the content size. Records a change only if it differs.
    pub fn set_content_size(&mut self, size: Size) {
        let old = self.metrics.content_size;
        if old == size {
            return;
        }
        self.metrics.content_size = size;
        self.record(MetricsChange::ContentSize { old, new: size });
    }

    /// Updates the content inset. Records a change only if it differs.
    pub fn set_content_inset(&mut self, inset: EdgeInsets) {
        let old = self.metrics.content_inset;
        if old == inset {
            return;
        }
        self.metrics.content_inset = inset;
        self.record(MetricsChange::ContentInset { old, new: inset });
    }

    /// Updates the visible bounds. Not observable.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Whether user scrolling is enabled.
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    /// Enables or disables user scrolling.
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    /// Whether a status-bar tap scrolls this surface to the top.
    pub fn scrolls_to_top(&self) -> bool {
        self.scrolls_to_top
    }

    /// Sets the scroll-to-top affordance.
    pub fn set_scrolls_to_top(&mut self, enabled: bool) {
        self.scrolls_to_top = enabled;
    }

    /// Whether the vertical scroll indicator is shown.
    pub fn shows_vertical_indicator(&self) -> bool {
        self.shows_vertical_indicator
    }

    /// Shows or hides the vertical scroll indicator.
    pub fn set_shows_vertical_indicator(&mut self, shows: bool) {
        self.shows_vertical_indicator = shows;
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn record(&mut self, change: MetricsChange) {
        for queue in self.observers.values_mut() {
            queue.push_back(change);
        }
    }
}

/// A live observation of one surface.
///
/// Dropping the handle unsubscribes. The surface must not be locked by the
/// dropping thread at that moment.
#[derive(Debug)]
pub struct Subscription {
    key: ObserverKey,
    surface_id: SurfaceId,
    surface: Weak<RwLock<ScrollSurface>>,
}

impl Subscription {
    /// Starts observing `surface`. Only changes made after this call are
    /// delivered.
    pub fn subscribe(surface: &SharedScrollSurface) -> Self {
        let mut guard = surface.write();
        let key = guard.observers.insert(VecDeque::new());
        Self {
            key,
            surface_id: guard.id,
            surface: Arc::downgrade(surface),
        }
    }

    /// Identity of the observed surface.
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    /// The observed surface, if it is still alive.
    pub fn surface(&self) -> Option<SharedScrollSurface> {
        self.surface.upgrade()
    }

    /// Takes every change recorded since the last drain, oldest first.
    pub fn drain(&self) -> Vec<MetricsChange> {
        let Some(surface) = self.surface.upgrade() else {
            return Vec::new();
        };
        let mut guard = surface.write();
        guard
            .observers
            .get_mut(self.key)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.upgrade() {
            surface.write().observers.remove(self.key);
        }
    }
}
