//! A horizontally scrollable strip of selectable tab items.
//!
//! ## Usage
//!
//! The bar is normally owned by a [`TabbedContainer`](crate::container::TabbedContainer),
//! which feeds it items and forwards page-drag progress. It can also be used
//! on its own through any [`TabBarSource`].
//!
//! Selection moves three things: the highlighted item, the strip offset
//! (the selected item is centered, clamped to the strip's scroll range) and
//! the indicator under the item. Until the first layout pass completes the
//! bar has no geometry, so `select` only records the requested index.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tracing::{debug, trace};

use crate::{
    animation::Tween,
    config::{IndicatorMode, TabBarArgs},
    content::BarItem,
    geometry::{Point, Rect, Size, clamp_lenient},
    gesture::PanGesture,
    scroll_surface::SurfaceId,
};

/// Supplies the bar's items.
pub trait TabBarSource {
    /// Number of items.
    fn item_count(&self) -> usize;

    /// Item at `index`.
    fn item(&self, index: usize) -> Arc<dyn BarItem>;
}

/// A plain text item with a fixed width.
#[derive(Debug)]
pub struct TextBarItem {
    title: String,
    width: f64,
    selected: AtomicBool,
}

impl TextBarItem {
    /// Creates an item.
    pub fn new(title: impl Into<String>, width: f64) -> Self {
        Self {
            title: title.into(),
            width,
            selected: AtomicBool::new(false),
        }
    }

    /// Title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the item is currently highlighted.
    pub fn is_selected(&self) -> bool {
        self.selected.load(Ordering::Relaxed)
    }
}

impl BarItem for TextBarItem {
    fn intrinsic_width(&self) -> f64 {
        self.width
    }

    fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::Relaxed);
    }
}

struct ItemSlot {
    item: Arc<dyn BarItem>,
    frame: Rect,
}

/// Tab bar state.
pub struct TabBar {
    args: TabBarArgs,
    strip_id: SurfaceId,
    initialized: bool,
    interaction_enabled: bool,
    size: Size,
    current_index: usize,
    items: Vec<ItemSlot>,
    content_width: f64,
    strip_offset: Tween,
    indicator_center: Tween,
    indicator_width: Tween,
    indicator_height: f64,
    drag_shift: f64,
}

impl TabBar {
    /// Creates an empty bar.
    pub fn new(args: TabBarArgs) -> Self {
        Self {
            args,
            strip_id: SurfaceId::next(),
            initialized: false,
            interaction_enabled: true,
            size: Size::ZERO,
            current_index: 0,
            items: Vec::new(),
            content_width: 0.0,
            strip_offset: Tween::default(),
            indicator_center: Tween::default(),
            indicator_width: Tween::default(),
            indicator_height: 0.0,
            drag_shift: 0.0,
        }
    }

    /// Resolves the bar's size. The first call completes initialization and
    /// loads the items from `source`.
    pub fn layout(&mut self, size: Size, source: &dyn TabBarSource) {
        let resized = size != self.size;
        self.size = size;
        if !self.initialized {
            self.initialized = true;
            self.reload(source);
        } else if resized {
            self.layout_items();
            self.switch_to(self.current_index, None, false);
        }
    }

    /// Re-fetches the items and re-selects the current index, clamped into
    /// the new range. Does nothing before the first layout pass.
    pub fn reload(&mut self, source: &dyn TabBarSource) {
        if !self.initialized {
            return;
        }
        let count = source.item_count();
        self.items = (0..count)
            .map(|index| ItemSlot {
                item: source.item(index),
                frame: Rect::ZERO,
            })
            .collect();
        self.layout_items();
        debug!(count, "tab bar reloaded");
        if count == 0 {
            self.strip_offset.snap_to(0.0);
            self.indicator_width.snap_to(0.0);
            return;
        }
        self.current_index = self.current_index.min(count - 1);
        self.switch_to(self.current_index, None, false);
    }

    /// Selects `index`. A no-op for the current index and for indices out of
    /// range; before the first layout pass only the index is recorded.
    pub fn select(&mut self, index: usize, animated: bool) {
        if index == self.current_index {
            return;
        }
        if self.initialized {
            self.switch_to(index, Some(self.current_index), animated);
        } else {
            self.current_index = index;
        }
    }

    /// Handles a tap on item `index`. Returns `true` if the selection changed.
    pub fn tap(&mut self, index: usize) -> bool {
        if !self.should_tap(index) {
            trace!(index, "tab bar tap ignored");
            return false;
        }
        self.switch_to(index, Some(self.current_index), self.args.click_animation);
        true
    }

    fn should_tap(&self, index: usize) -> bool {
        self.interaction_enabled && index != self.current_index && index < self.items.len()
    }

    /// Slides the indicator with a page drag.
    ///
    /// `distance` is how far the pages have moved from the selected page and
    /// `page_width` the width of one page. The indicator moves toward the
    /// neighbouring item in proportion.
    pub fn update_indicator_position(&mut self, distance: f64, page_width: f64) {
        if page_width <= 0.0 || !distance.is_finite() {
            return;
        }
        let progress = (distance / page_width).clamp(-1.0, 1.0);
        let Some(current) = self.items.get(self.current_index) else {
            return;
        };
        let neighbour = if progress >= 0.0 {
            self.items.get(self.current_index + 1)
        } else {
            self.current_index
                .checked_sub(1)
                .and_then(|index| self.items.get(index))
        };
        self.drag_shift = neighbour
            .map(|slot| (slot.frame.mid_x() - current.frame.mid_x()) * progress.abs())
            .unwrap_or(0.0);
    }

    /// Advances the strip and indicator animations.
    pub fn advance(&mut self, dt: Duration) {
        self.strip_offset.advance(dt);
        self.indicator_center.advance(dt);
        self.indicator_width.advance(dt);
    }

    /// Whether any move is still animating.
    pub fn is_animating(&self) -> bool {
        self.strip_offset.is_animating()
            || self.indicator_center.is_animating()
            || self.indicator_width.is_animating()
    }

    /// Index of the highlighted item.
    pub fn selected_index(&self) -> usize {
        self.current_index
    }

    /// Number of loaded items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item at `index`, if loaded.
    pub fn item_at(&self, index: usize) -> Option<Arc<dyn BarItem>> {
        self.items.get(index).map(|slot| slot.item.clone())
    }

    /// Frame of item `index` in strip coordinates.
    pub fn item_frame(&self, index: usize) -> Option<Rect> {
        self.items.get(index).map(|slot| slot.frame)
    }

    /// Whether the first layout pass has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current horizontal scroll of the strip.
    pub fn strip_offset(&self) -> f64 {
        self.strip_offset.value()
    }

    /// Width of the laid out item row, insets included.
    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    /// Indicator frame in strip coordinates, drag shift included.
    pub fn indicator_frame(&self) -> Rect {
        let width = self.indicator_width.value().max(0.0);
        let center = self.indicator_center.value() + self.drag_shift;
        Rect::new(
            Point::new(center - width * 0.5, self.size.height - self.indicator_height),
            Size::new(width, self.indicator_height),
        )
    }

    /// Frame of the hairline along the bottom of the bar.
    pub fn bottom_line_frame(&self) -> Rect {
        let height = self.args.bottom_line_height;
        Rect::new(
            Point::new(0.0, self.size.height - height),
            Size::new(self.size.width, height),
        )
    }

    /// Enables or disables taps.
    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    /// Whether taps are accepted.
    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Lets leading-edge pans on the strip fall through to the navigation pop.
    pub fn set_recognize_pop_gesture(&mut self, enabled: bool) {
        self.args.gesture.pop_gesture_enabled = enabled;
    }

    /// Whether the click animation is enabled.
    pub fn click_animation(&self) -> bool {
        self.args.click_animation
    }

    /// Gesture arbitration for the strip's own pan.
    pub fn should_begin_pan(&self, gesture: &PanGesture) -> bool {
        self.args.gesture.should_begin(self.strip_id, gesture)
    }

    /// Identity of the strip's scroll surface.
    pub fn strip_id(&self) -> SurfaceId {
        self.strip_id
    }

    fn layout_items(&mut self) {
        let insets = self.args.edge_insets;
        let height = (self.size.height - insets.vertical()).max(0.0);
        let mut x = insets.left;
        for (index, slot) in self.items.iter_mut().enumerate() {
            if index > 0 {
                x += self.args.item_spacing;
            }
            let width = slot.item.intrinsic_width().max(0.0);
            slot.frame = Rect::new(Point::new(x, insets.top), Size::new(width, height));
            x += width;
        }
        self.content_width = x + insets.right;
    }

    fn switch_to(&mut self, index: usize, from: Option<usize>, animated: bool) {
        let Some(target) = self.items.get(index) else {
            trace!(index, count = self.items.len(), "tab bar select out of range");
            return;
        };
        let frame = target.frame;
        target.item.set_selected(true);
        if let Some(previous) = from
            && previous != index
            && let Some(slot) = self.items.get(previous)
        {
            slot.item.set_selected(false);
        }
        self.current_index = index;
        self.drag_shift = 0.0;

        let duration = self.args.animation_duration;
        let max_offset = self.content_width - self.size.width;
        let centered = frame.min_x() - 0.5 * (self.size.width - frame.width());
        self.strip_offset
            .set(clamp_lenient(centered, 0.0, max_offset), animated, duration);

        let (width, height) = match self.args.indicator_mode {
            IndicatorMode::Fixed(size) => (size.width, size.height),
            IndicatorMode::Relative {
                width_delta,
                height,
            } => ((frame.width() - width_delta).max(0.0), height),
        };
        self.indicator_height = height;
        self.indicator_center.set(frame.mid_x(), animated, duration);
        self.indicator_width.set(width, animated, duration);
    }
}
