//! Tab bar and paged content composed into one tabbed container.
//!
//! The container is the only writer of the selection. Every way of changing
//! it (a tap in the bar, pages settling after a drag, a programmatic
//! `select`) runs through the same transition:
//!
//! 1. hand the scroll-to-top affordance from the previous tab to the next,
//! 2. materialize the target page if it is not cached,
//! 3. move the pages (animated unless they were dragged there),
//! 4. move the bar's highlight, unless the bar was tapped and already moved,
//! 5. tell the delegate: deselect first, then select.
//!
//! Selecting the current index is a no-op whatever the cause.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tracing::{debug, trace};

use crate::{
    config::NestSegmentArgs,
    content::{BarItem, SegmentDataSource, SegmentDelegate, SwitchCause, TabContent},
    geometry::{Point, Rect, Size},
    gesture::GesturePolicy,
    paged_host::PagedContentHost,
    tab_bar::{TabBar, TabBarSource},
};

/// The current selection and how it came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    /// Selected tab.
    pub current_index: usize,
    /// Tab selected before the last switch, if any.
    pub previous_index: Option<usize>,
    /// What caused the last switch.
    pub switch_cause: SwitchCause,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            current_index: 0,
            previous_index: None,
            switch_cause: SwitchCause::Programmatic,
        }
    }
}

/// Input that may change the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerEvent {
    /// Programmatic selection.
    Select {
        /// Requested tab.
        index: usize,
        /// Whether the pages animate.
        animated: bool,
    },
    /// A tap on a bar item.
    Tap(usize),
    /// The user started dragging the pages.
    BeginDrag,
    /// The pages were dragged to a horizontal offset.
    DragTo(f64),
    /// The finger lifted.
    EndDrag {
        /// Whether the pages keep moving after the lift.
        will_decelerate: bool,
    },
    /// The pages stopped decelerating.
    EndDeceleration,
}

struct BarItems<'a>(Option<&'a dyn SegmentDataSource>);

impl TabBarSource for BarItems<'_> {
    fn item_count(&self) -> usize {
        self.0.map_or(0, |source| source.item_count())
    }

    fn item(&self, index: usize) -> Arc<dyn BarItem> {
        match self.0 {
            Some(source) => source.bar_item(index),
            None => Arc::new(crate::tab_bar::TextBarItem::new("", 0.0)),
        }
    }
}

/// Tab bar above horizontally paged content.
pub struct TabbedContainer {
    data_source: Option<Weak<dyn SegmentDataSource>>,
    delegate: Option<Weak<dyn SegmentDelegate>>,
    bar: TabBar,
    host: PagedContentHost,
    tab_bar_height: f64,
    page_duration: Duration,
    initialized: bool,
    switch_disabled: bool,
    size: Size,
    total_count: usize,
    selection: SelectionState,
}

impl TabbedContainer {
    /// Creates a container with the tab bar and paging settings from `args`.
    pub fn new(args: &NestSegmentArgs) -> Self {
        Self {
            data_source: None,
            delegate: None,
            bar: TabBar::new(args.tab_bar.clone()),
            host: PagedContentHost::new(args.preload_all_pages, args.paging_gesture),
            tab_bar_height: args.tab_bar_height,
            page_duration: args.page_duration,
            initialized: false,
            switch_disabled: false,
            size: Size::ZERO,
            total_count: 0,
            selection: SelectionState::default(),
        }
    }

    /// Sets the data source. The container keeps a weak reference.
    pub fn set_data_source<D: SegmentDataSource + 'static>(&mut self, source: &Arc<D>) {
        let source: Arc<dyn SegmentDataSource> = source.clone();
        self.data_source = Some(Arc::downgrade(&source));
    }

    /// Sets the delegate. The container keeps a weak reference.
    pub fn set_delegate<D: SegmentDelegate + 'static>(&mut self, delegate: &Arc<D>) {
        let delegate: Arc<dyn SegmentDelegate> = delegate.clone();
        self.delegate = Some(Arc::downgrade(&delegate));
    }

    /// The delegate, for callers that need more than the container exposes.
    pub fn delegate(&self) -> Option<Arc<dyn SegmentDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    /// The data source, if it is still alive.
    pub fn data_source(&self) -> Option<Arc<dyn SegmentDataSource>> {
        self.data_source.as_ref().and_then(Weak::upgrade)
    }

    /// Resolves the container's size. The first call reloads from the data
    /// source.
    pub fn layout(&mut self, size: Size) -> Option<SelectionState> {
        let state = self.layout_deferred(size);
        self.finish_reload(state.as_ref());
        state
    }

    /// Queries the data source again and rebuilds bar and pages. Does nothing
    /// before the first layout pass.
    pub fn reload(&mut self) -> Option<SelectionState> {
        if !self.initialized {
            return None;
        }
        let state = self.reload_deferred();
        self.finish_reload(state.as_ref());
        state
    }

    /// Applies `event`, notifying the delegate of any resulting switch.
    pub fn handle(&mut self, event: ContainerEvent) -> Option<SelectionState> {
        let state = self.dispatch(event);
        if let Some(state) = &state {
            self.notify_selected(state);
        }
        state
    }

    /// Selects `index` programmatically.
    pub fn select(&mut self, index: usize, animated: bool) -> Option<SelectionState> {
        self.handle(ContainerEvent::Select { index, animated })
    }

    /// Taps bar item `index`.
    pub fn tap(&mut self, index: usize) -> Option<SelectionState> {
        self.handle(ContainerEvent::Tap(index))
    }

    pub(crate) fn layout_deferred(&mut self, size: Size) -> Option<SelectionState> {
        let resized = size != self.size;
        self.size = size;
        self.host.set_page_size(self.page_size());
        let source = self.data_source();
        self.bar.layout(
            Size::new(size.width, self.tab_bar_height),
            &BarItems(source.as_deref()),
        );
        if !self.initialized {
            self.initialized = true;
            return self.reload_deferred();
        }
        if resized && self.total_count > 0 {
            self.host
                .scroll_to_page(self.selection.current_index, false, Duration::ZERO);
        }
        None
    }

    pub(crate) fn reload_deferred(&mut self) -> Option<SelectionState> {
        let source = self.data_source();
        if source.is_none() {
            debug!("reloading without a data source");
        }
        self.total_count = source.as_ref().map_or(0, |s| s.item_count());
        self.bar.reload(&BarItems(source.as_deref()));
        self.host.reload(self.total_count, source.as_deref());
        if self.total_count > 0 {
            self.selection.current_index = self.selection.current_index.min(self.total_count - 1);
        }
        self.switch_to(
            self.selection.current_index,
            None,
            SwitchCause::Programmatic,
            false,
        )
    }

    pub(crate) fn finish_reload(&self, state: Option<&SelectionState>) {
        if let Some(state) = state {
            self.notify_selected(state);
        }
        if self.initialized
            && let Some(delegate) = self.delegate()
        {
            delegate.on_reload();
        }
    }

    pub(crate) fn dispatch(&mut self, event: ContainerEvent) -> Option<SelectionState> {
        let current = self.selection.current_index;
        match event {
            ContainerEvent::Select { index, animated } => {
                if index == current {
                    return None;
                }
                if !self.initialized {
                    self.selection.current_index = index;
                    return None;
                }
                self.switch_to(index, Some(current), SwitchCause::Programmatic, animated)
            }
            ContainerEvent::Tap(index) => {
                if index == current || !self.bar.tap(index) {
                    return None;
                }
                let animated = self.bar.click_animation();
                self.switch_to(index, Some(current), SwitchCause::Tap, animated)
            }
            ContainerEvent::BeginDrag => {
                if !self.host.begin_drag() {
                    trace!(disabled = self.switch_disabled, "page drag refused");
                }
                None
            }
            ContainerEvent::DragTo(offset_x) => {
                if let Some(applied) = self.host.drag_to(offset_x) {
                    let width = self.host.page_width();
                    self.bar
                        .update_indicator_position(applied - current as f64 * width, width);
                }
                None
            }
            ContainerEvent::EndDrag { will_decelerate } => {
                let settled = self.host.end_drag(will_decelerate);
                self.settle(settled)
            }
            ContainerEvent::EndDeceleration => {
                let settled = self.host.end_deceleration();
                self.settle(settled)
            }
        }
    }

    fn settle(&mut self, settled: Option<usize>) -> Option<SelectionState> {
        let index = settled?;
        let current = self.selection.current_index;
        if index == current {
            self.bar
                .update_indicator_position(0.0, self.host.page_width());
            return None;
        }
        self.switch_to(index, Some(current), SwitchCause::SwipeSettle, true)
    }

    fn switch_to(
        &mut self,
        index: usize,
        from: Option<usize>,
        cause: SwitchCause,
        animated: bool,
    ) -> Option<SelectionState> {
        if index >= self.total_count {
            trace!(index, count = self.total_count, "switch out of range");
            return None;
        }
        if let Some(source) = self.data_source() {
            self.host.config_content(index, source.as_ref());
        }
        self.set_scrolls_to_top(index, true);
        if let Some(previous) = from
            && previous != index
        {
            self.set_scrolls_to_top(previous, false);
        }

        self.selection = SelectionState {
            current_index: index,
            previous_index: from,
            switch_cause: cause,
        };
        self.host
            .scroll_to_page(index, animated, self.page_duration);
        if cause != SwitchCause::Tap {
            self.bar.select(index, animated);
        }
        debug!(index, ?from, ?cause, "tab switched");

        if let Some(previous) = from
            && let Some(delegate) = self.delegate()
        {
            delegate.on_will_deselect(previous, cause);
        }
        Some(self.selection)
    }

    pub(crate) fn notify_selected(&self, state: &SelectionState) {
        if let Some(delegate) = self.delegate() {
            delegate.on_did_select(state.current_index, state.switch_cause);
        }
    }

    fn set_scrolls_to_top(&self, index: usize, enabled: bool) {
        let Some(content) = self.host.content_at(index) else {
            return;
        };
        let capabilities = content.capabilities();
        if capabilities.scrolls_to_top
            && let Some(region) = capabilities.scroll_region
        {
            region.write().set_scrolls_to_top(enabled);
        }
    }

    /// Advances page and bar animations.
    pub fn advance(&mut self, dt: Duration) {
        self.host.advance(dt);
        self.bar.advance(dt);
    }

    /// Current selection.
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Selected tab index.
    pub fn selected_index(&self) -> usize {
        self.selection.current_index
    }

    /// Number of tabs loaded by the last reload.
    pub fn item_count(&self) -> usize {
        self.total_count
    }

    /// Cached content of tab `index`.
    pub fn content_item_at(&self, index: usize) -> Option<&TabContent> {
        self.host.content_at(index)
    }

    /// The tab bar.
    pub fn bar(&self) -> &TabBar {
        &self.bar
    }

    /// The paged content host.
    pub fn host(&self) -> &PagedContentHost {
        &self.host
    }

    /// Whether the first layout pass has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Size resolved by the last layout pass.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Height of the tab bar.
    pub fn tab_bar_height(&self) -> f64 {
        self.tab_bar_height
    }

    /// Changes the tab bar height and lays the container out again.
    pub fn set_tab_bar_height(&mut self, height: f64) {
        if !height.is_finite() || height < 0.0 {
            return;
        }
        self.tab_bar_height = height;
        if self.initialized {
            self.layout_deferred(self.size);
        }
    }

    /// Size of one page.
    pub fn page_size(&self) -> Size {
        Size::new(
            self.size.width,
            (self.size.height - self.tab_bar_height).max(0.0),
        )
    }

    /// Frame of the paged content inside the container.
    pub fn content_frame(&self) -> Rect {
        Rect::new(Point::new(0.0, self.tab_bar_height), self.page_size())
    }

    /// Blocks taps and page drags.
    /// A drag in progress is abandoned and the pages return to the selected
    /// tab.
    pub fn set_disable_switch(&mut self, disabled: bool) {
        let interrupted = disabled && self.host.is_dragging();
        self.switch_disabled = disabled;
        self.bar.set_interaction_enabled(!disabled);
        self.host.set_scroll_enabled(!disabled);
        if interrupted && self.total_count > 0 {
            let width = self.host.page_width();
            self.host
                .scroll_to_page(self.selection.current_index, true, self.page_duration);
            self.bar.update_indicator_position(0.0, width);
        }
    }

    /// Whether switching is blocked.
    pub fn switch_disabled(&self) -> bool {
        self.switch_disabled
    }

    /// Lets leading-edge pans on the bar and the pages reach the navigation
    /// pop gesture.
    pub fn set_recognize_pop_gesture(&mut self, enabled: bool) {
        self.bar.set_recognize_pop_gesture(enabled);
        self.host.gesture_mut().pop_gesture_enabled = enabled;
    }

    /// Enables or disables the paging pan.
    pub fn set_pan_enabled(&mut self, enabled: bool) {
        self.host.gesture_mut().pan_enabled = enabled;
    }

    /// Paging pan policy.
    pub fn paging_gesture(&mut self) -> &mut GesturePolicy {
        self.host.gesture_mut()
    }
}
