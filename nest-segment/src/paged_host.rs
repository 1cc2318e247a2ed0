//! Horizontally paged host for tab content.
//!
//! The host lays out `item_count` pages side by side, each one page wide, and
//! materializes a page's content the first time it is visited. Materialized
//! content stays cached until the next reload, which detaches it.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::{
    animation::Tween,
    content::{SegmentDataSource, TabContent},
    geometry::{Point, Rect, Size, clamp_lenient},
    gesture::{GesturePolicy, PanGesture},
    scroll_surface::SurfaceId,
};

/// Slack applied before flooring an offset into a page index, so that an
/// offset a hair short of a page boundary still lands on that page.
const SETTLE_EPSILON: f64 = 1e-6;

/// Paging surface plus the per-reload content cache.
pub struct PagedContentHost {
    id: SurfaceId,
    page_size: Size,
    item_count: usize,
    cache: FxHashMap<usize, TabContent>,
    offset: Tween,
    dragging: bool,
    scroll_enabled: bool,
    preload_all: bool,
    gesture: GesturePolicy,
}

impl PagedContentHost {
    /// Creates an empty host.
    pub fn new(preload_all: bool, gesture: GesturePolicy) -> Self {
        Self {
            id: SurfaceId::next(),
            page_size: Size::ZERO,
            item_count: 0,
            cache: FxHashMap::default(),
            offset: Tween::default(),
            dragging: false,
            scroll_enabled: true,
            preload_all,
            gesture,
        }
    }

    /// Drops every cached page, detaching managed content, and resizes the
    /// paging surface for `item_count` pages. With preloading enabled every
    /// page is materialized right away.
    pub fn reload(&mut self, item_count: usize, source: Option<&dyn SegmentDataSource>) {
        self.clear_cache();
        self.item_count = item_count;
        self.dragging = false;
        let max = self.max_offset();
        self.offset.snap_to(clamp_lenient(self.offset.value(), 0.0, max));
        debug!(item_count, preload = self.preload_all, "paged host reloaded");

        if self.preload_all
            && let Some(source) = source
        {
            for index in 0..item_count {
                self.config_content(index, source);
            }
        }
    }

    /// Returns the content of page `index`, asking `source` for it on the
    /// first visit of this reload cycle.
    pub fn config_content(
        &mut self,
        index: usize,
        source: &dyn SegmentDataSource,
    ) -> Option<&TabContent> {
        if index >= self.item_count {
            return None;
        }
        let content = self.cache.entry(index).or_insert_with(|| {
            trace!(index, "materializing page content");
            let content = source.content(index);
            if content.is_managed() {
                content.content().did_move_to_owner(true);
            }
            content
        });
        Some(content)
    }

    /// Cached content of page `index`.
    pub fn content_at(&self, index: usize) -> Option<&TabContent> {
        self.cache.get(&index)
    }

    /// Every cached page, in no particular order.
    pub fn cached(&self) -> impl Iterator<Item = (usize, &TabContent)> {
        self.cache.iter().map(|(index, content)| (*index, content))
    }

    /// Number of cached pages.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Frame of page `index` inside the paging surface.
    pub fn page_frame(&self, index: usize) -> Rect {
        Rect::new(
            Point::new(index as f64 * self.page_size.width, 0.0),
            self.page_size,
        )
    }

    /// Resolves the page size. The offset keeps pointing at the same page.
    pub fn set_page_size(&mut self, size: Size) {
        if size == self.page_size {
            return;
        }
        let page = self.page_at(self.offset.target());
        self.page_size = size;
        if let Some(page) = page {
            self.offset.snap_to(self.offset_for_page(page));
        }
    }

    /// Size of one page.
    pub fn page_size(&self) -> Size {
        self.page_size
    }

    /// Width of one page.
    pub fn page_width(&self) -> f64 {
        self.page_size.width
    }

    /// Number of pages.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Width of the whole paging surface.
    pub fn content_width(&self) -> f64 {
        self.item_count as f64 * self.page_size.width
    }

    /// Current horizontal offset.
    pub fn offset_x(&self) -> f64 {
        self.offset.value()
    }

    /// Moves the pages so that `index` is visible.
    pub fn scroll_to_page(&mut self, index: usize, animated: bool, duration: Duration) {
        let target = self.offset_for_page(index);
        self.offset.set(target, animated, duration);
    }

    /// A drag of the pages began. Stops any running page animation.
    pub fn begin_drag(&mut self) -> bool {
        if !self.scroll_enabled {
            return false;
        }
        self.dragging = true;
        self.offset.snap_to(self.offset.value());
        true
    }

    /// Moves the pages to `offset_x` (clamped) and returns the applied
    /// offset. Ignored unless a drag is in progress.
    pub fn drag_to(&mut self, offset_x: f64) -> Option<f64> {
        if !self.accepts_drag() {
            trace!(offset_x, "page drag ignored");
            return None;
        }
        if !offset_x.is_finite() {
            warn!(offset_x, "ignoring non-finite page offset");
            return None;
        }
        let clamped = clamp_lenient(offset_x, 0.0, self.max_offset());
        self.offset.snap_to(clamped);
        Some(clamped)
    }

    /// The finger lifted. Without deceleration the pages have settled and
    /// the settled page is returned.
    pub fn end_drag(&mut self, will_decelerate: bool) -> Option<usize> {
        if !self.accepts_drag() {
            return None;
        }
        self.dragging = will_decelerate;
        if will_decelerate {
            return None;
        }
        self.settled_index()
    }

    /// Deceleration finished; returns the settled page.
    pub fn end_deceleration(&mut self) -> Option<usize> {
        if !self.accepts_drag() {
            return None;
        }
        self.dragging = false;
        self.settled_index()
    }

    /// Page under the current offset, `floor(offset / page_width)`.
    pub fn settled_index(&self) -> Option<usize> {
        let page = self.page_at(self.offset.value());
        if page.is_none() && self.item_count > 0 {
            warn!("cannot settle pages without a page width");
        }
        page
    }

    /// Whether a drag is in progress (including deceleration).
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Advances page animations.
    pub fn advance(&mut self, dt: Duration) {
        self.offset.advance(dt);
    }

    /// Whether a page animation is running.
    pub fn is_animating(&self) -> bool {
        self.offset.is_animating()
    }

    /// Enables or disables dragging.
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
        if !enabled {
            self.dragging = false;
        }
    }

    /// Whether dragging is enabled.
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    /// Mutable access to the paging pan policy.
    pub fn gesture_mut(&mut self) -> &mut GesturePolicy {
        &mut self.gesture
    }

    /// Gesture arbitration for the paging pan.
    pub fn should_begin_pan(&self, gesture: &PanGesture) -> bool {
        self.gesture.should_begin(self.id, gesture)
    }

    /// Identity of the paging surface.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    fn accepts_drag(&self) -> bool {
        self.dragging && self.scroll_enabled
    }

    fn offset_for_page(&self, index: usize) -> f64 {
        index as f64 * self.page_size.width
    }

    fn max_offset(&self) -> f64 {
        (self.content_width() - self.page_size.width).max(0.0)
    }

    fn page_at(&self, offset_x: f64) -> Option<usize> {
        let width = self.page_size.width;
        if self.item_count == 0 || width <= 0.0 || !offset_x.is_finite() {
            return None;
        }
        let page = (offset_x / width + SETTLE_EPSILON).floor().max(0.0) as usize;
        Some(page.min(self.item_count - 1))
    }

    fn clear_cache(&mut self) {
        for (_, content) in self.cache.drain() {
            if content.is_managed() {
                content.content().did_move_to_owner(false);
            }
        }
    }
}

impl Drop for PagedContentHost {
    fn drop(&mut self) {
        self.clear_cache();
    }
}
