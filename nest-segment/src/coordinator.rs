//! Nested scrolling for a header above a tabbed container.
//!
//! The coordinator owns one outer vertical scroll surface and makes the
//! header plus the active tab's content behave like a single scrolling
//! column. With `h` the header height and `y` the outer offset:
//!
//! - while `y >= h` the header is scrolled away, the tab bar sticks to the top
//!   of the viewport and `y - h` is forwarded into the active tab's own
//!   scroll region;
//! - while `y < h` the bar sits below the header and every cached tab is held
//!   at its top.
//!
//! The outer content height is always `h + bar + effective content height`,
//! where the effective height depends on the tab's height mode. Switching
//! from a tall tab to a short one while scrolled far down first animates the
//! outer offset up to the new maximum and only then commits the smaller
//! height.
//!
//! The host drives the coordinator from its main loop: [`layout`] when the
//! viewport resolves, [`sync_metrics`] after mutating scroll surfaces, and
//! [`advance`] once per frame.
//!
//! [`layout`]: NestedScrollCoordinator::layout
//! [`sync_metrics`]: NestedScrollCoordinator::sync_metrics
//! [`advance`]: NestedScrollCoordinator::advance

use std::{
    collections::VecDeque,
    sync::Arc,
    time::Duration,
};

use tracing::{debug, trace, warn};

use crate::{
    animation::Tween,
    config::{HeightMode, NestSegmentArgs},
    container::{ContainerEvent, SelectionState, TabbedContainer},
    content::{ContentCapabilities, SegmentDataSource, SegmentDelegate, TabContent},
    geometry::{Point, Rect, Size},
    gesture::{self, PanGesture},
    header::Header,
    scroll_surface::{
        MetricsChange, ScrollMetrics, ScrollSurface, SharedScrollSurface, Subscription, SurfaceId,
    },
};

struct ActiveTab {
    index: usize,
    region: SharedScrollSurface,
    capabilities: ContentCapabilities,
    content: TabContent,
    subscription: Subscription,
    own_writes: VecDeque<Point>,
}

impl ActiveTab {
    fn offset(&self) -> Point {
        self.region.read().offset()
    }

    /// Writes the region's vertical offset, remembering the write so that
    /// its change notification is not mistaken for the host's.
    fn write_offset_y(&mut self, y: f64) {
        let mut region = self.region.write();
        let target = region.offset().with_y(y);
        if region.offset() == target {
            return;
        }
        region.set_offset(target);
        drop(region);
        self.own_writes.push_back(target);
    }
}

struct Snap {
    offset: Tween,
    commit_height: f64,
}

/// Header, sticky tab bar and nested tab content in one outer scroll.
pub struct NestedScrollCoordinator {
    args: NestSegmentArgs,
    outer: SharedScrollSurface,
    outer_subscription: Subscription,
    header: Header,
    container: TabbedContainer,
    active: Option<ActiveTab>,
    bar_top: f64,
    applied_offset: f64,
    content_height: f64,
    pending_snap: Option<f64>,
    snap: Option<Snap>,
    suppress_next_pin: bool,
    initialized: bool,
}

impl NestedScrollCoordinator {
    /// Creates a coordinator with an empty header.
    pub fn new(args: NestSegmentArgs) -> Self {
        let outer = ScrollSurface::new(Size::ZERO).into_shared();
        outer.write().set_shows_vertical_indicator(false);
        let outer_subscription = Subscription::subscribe(&outer);
        Self {
            container: TabbedContainer::new(&args),
            args,
            outer,
            outer_subscription,
            header: Header::new(),
            active: None,
            bar_top: 0.0,
            applied_offset: 0.0,
            content_height: 0.0,
            pending_snap: None,
            snap: None,
            suppress_next_pin: false,
            initialized: false,
        }
    }

    /// Sets the data source. Takes effect on the next layout or reload.
    pub fn set_data_source<D: SegmentDataSource + 'static>(&mut self, source: &Arc<D>) {
        self.container.set_data_source(source);
    }

    /// Sets the delegate.
    pub fn set_delegate<D: SegmentDelegate + 'static>(&mut self, delegate: &Arc<D>) {
        self.container.set_delegate(delegate);
    }

    /// The delegate, for callers that need more than the coordinator exposes.
    pub fn delegate(&self) -> Option<Arc<dyn SegmentDelegate>> {
        self.container.delegate()
    }

    /// Replaces the header and recomputes the outer height.
    pub fn configure_header(&mut self, content: Option<TabContent>) {
        self.header.configure(content);
        if self.initialized {
            self.refresh_current_content_size();
            self.reapply_outer_offset();
        }
    }

    /// Resolves the outer viewport. The first call loads the tabs.
    pub fn layout(&mut self, viewport: Size) {
        self.outer.write().set_viewport(viewport);
        let header_resized = self.header.sync();
        let resized = self.container.size() != viewport;

        let first = !self.container.is_initialized();
        let state = self.container.layout_deferred(viewport);
        if first {
            self.activate();
            self.container.finish_reload(state.as_ref());
        } else if self.active.is_none() {
            self.refresh_fixed_height();
        } else if resized || header_resized {
            self.refresh_content_size();
        }
        self.reapply_outer_offset();
        self.initialized = true;
    }

    /// Queries the data source again. Cancels any pending snap.
    pub fn reload(&mut self) {
        if !self.container.is_initialized() {
            return;
        }
        self.cancel_snap();
        let state = self.container.reload_deferred();
        self.activate();
        self.container.finish_reload(state.as_ref());
        self.reapply_outer_offset();
    }

    /// Applies a selection event, activating the new tab before the delegate
    /// hears about it.
    pub fn handle(&mut self, event: ContainerEvent) -> Option<SelectionState> {
        let state = self.container.dispatch(event)?;
        self.activate();
        self.container.notify_selected(&state);
        Some(state)
    }

    /// Selects tab `index` programmatically.
    pub fn select(&mut self, index: usize, animated: bool) -> Option<SelectionState> {
        self.handle(ContainerEvent::Select { index, animated })
    }

    /// Taps bar item `index`.
    pub fn tap(&mut self, index: usize) -> Option<SelectionState> {
        self.handle(ContainerEvent::Tap(index))
    }

    /// Moves the outer surface and splits the offset between the header and
    /// the active tab.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn set_outer_offset(&mut self, y: f64) {
        if !y.is_finite() {
            warn!(y, "ignoring non-finite outer offset");
            return;
        }
        self.outer.write().set_offset_y(y);
        self.apply_outer_offset(y);
    }

    /// Processes every change recorded on the outer surface, the active tab's
    /// region and the embedded header since the last call.
    pub fn sync_metrics(&mut self) {
        let applied = self.applied_offset;
        if self
            .outer_subscription
            .drain()
            .iter()
            .any(|change| matches!(change, MetricsChange::Offset { new, .. } if new.y != applied))
        {
            self.reapply_outer_offset();
        }

        let changes = self
            .active
            .as_ref()
            .map(|active| active.subscription.drain())
            .unwrap_or_default();
        for change in changes {
            match change {
                MetricsChange::Offset { new, .. } => self.handle_inner_offset(new),
                MetricsChange::ContentSize { .. } => {
                    self.refresh_content_size();
                    self.suppress_next_pin = true;
                }
                MetricsChange::ContentInset { new, .. } => {
                    self.set_outer_bottom_inset(new.bottom);
                    if let Some(own) = self.active.as_ref().map(ActiveTab::offset) {
                        self.refresh_content_offset(own);
                    }
                }
            }
        }

        if self.header.sync() {
            self.refresh_current_content_size();
            self.reapply_outer_offset();
        }
    }

    /// Steps the snap and container animations by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.sync_metrics();
        self.container.advance(dt);

        if let Some(commit_height) = self.pending_snap.take() {
            self.start_snap(commit_height);
        }
        let Some(snap) = self.snap.as_mut() else {
            return;
        };
        let finished = snap.offset.advance(dt);
        let y = snap.offset.value();
        let commit_height = snap.commit_height;
        if finished {
            self.snap = None;
        }
        self.set_outer_offset(y);
        if finished {
            debug!(commit_height, "snap finished");
            self.commit_total(commit_height);
        }
    }

    /// Recomputes the outer height for the current tab.
    pub fn refresh_current_content_size(&mut self) {
        if self.active.is_some() {
            self.refresh_content_size();
        } else {
            self.refresh_fixed_height();
        }
    }

    /// Changes the tab bar height, re-pins the bar and recomputes the outer
    /// height.
    pub fn set_tab_bar_height(&mut self, height: f64) {
        if !height.is_finite() || height < 0.0 {
            warn!(height, "ignoring invalid tab bar height");
            return;
        }
        self.args.tab_bar_height = height;
        self.container.set_tab_bar_height(height);
        if self.initialized {
            self.refresh_current_content_size();
            self.reapply_outer_offset();
        }
    }

    /// Blocks taps and page drags.
    pub fn set_disable_switch(&mut self, disabled: bool) {
        self.container.set_disable_switch(disabled);
    }

    /// Lets leading-edge pans reach the host's navigation pop gesture.
    pub fn set_recognize_pop_gesture(&mut self, enabled: bool) {
        self.args.gesture.pop_gesture_enabled = enabled;
        self.container.set_recognize_pop_gesture(enabled);
    }

    /// Enables or disables the outer pan.
    pub fn set_pan_enabled(&mut self, enabled: bool) {
        self.args.gesture.pan_enabled = enabled;
    }

    /// Whether a pan recognized on the outer surface may begin.
    pub fn should_begin_outer_pan(&self, gesture: &PanGesture) -> bool {
        self.args.gesture.should_begin(self.outer_id(), gesture)
    }

    /// Whether the outer pan may run together with the pan of `other`.
    pub fn should_recognize_simultaneously(&self, other: SurfaceId) -> bool {
        let active = self
            .active
            .as_ref()
            .map(|active| active.subscription.surface_id());
        gesture::should_recognize_simultaneously(active, other)
    }

    /// The outer scroll surface.
    pub fn outer(&self) -> &SharedScrollSurface {
        &self.outer
    }

    /// Identity of the outer scroll surface.
    pub fn outer_id(&self) -> SurfaceId {
        self.outer.read().id()
    }

    /// Snapshot of the outer metrics.
    pub fn outer_metrics(&self) -> ScrollMetrics {
        self.outer.read().metrics()
    }

    /// Total scrollable height of the outer surface.
    pub fn total_height(&self) -> f64 {
        self.outer.read().content_size().height
    }

    /// Effective height of the active tab.
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// How far the tab bar has moved down from its resting place below the
    /// header.
    pub fn bar_top(&self) -> f64 {
        self.bar_top
    }

    /// Current header height.
    pub fn header_height(&self) -> f64 {
        self.header.height()
    }

    /// The header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Frame of the tab bar in outer content coordinates.
    pub fn tab_bar_frame(&self) -> Rect {
        Rect::new(
            Point::new(0.0, self.header.height() + self.bar_top),
            Size::new(self.container.size().width, self.args.tab_bar_height),
        )
    }

    /// Frame of the container in outer content coordinates.
    pub fn container_frame(&self) -> Rect {
        Rect::new(
            Point::new(0.0, self.header.height() + self.bar_top),
            self.container.size(),
        )
    }

    /// Index of the active scroll-aware tab, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|active| active.index)
    }

    /// Selected tab index.
    pub fn selected_index(&self) -> usize {
        self.container.selected_index()
    }

    /// The tabbed container.
    pub fn container(&self) -> &TabbedContainer {
        &self.container
    }

    /// Whether a snap to a shorter content height is pending or running.
    pub fn is_snapping(&self) -> bool {
        self.pending_snap.is_some() || self.snap.is_some()
    }

    /// Whether the first layout pass has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn outer_offset(&self) -> Point {
        self.outer.read().offset()
    }

    fn reapply_outer_offset(&mut self) {
        let y = self.outer_offset().y;
        self.apply_outer_offset(y);
    }

    fn apply_outer_offset(&mut self, y: f64) {
        self.applied_offset = y;
        let header = self.header.height();
        let forwarded = y - header;
        if forwarded >= 0.0 {
            self.bar_top = forwarded;
            if let Some(active) = self.active.as_mut() {
                active.write_offset_y(forwarded);
            }
            return;
        }

        self.bar_top = 0.0;
        let active_region = self.active.as_ref().map(|active| active.region.clone());
        let cached: Vec<SharedScrollSurface> = self
            .container
            .host()
            .cached()
            .filter_map(|(_, content)| content.capabilities().scroll_region)
            .filter(|region| {
                active_region
                    .as_ref()
                    .is_none_or(|active| !Arc::ptr_eq(active, region))
            })
            .collect();
        for region in cached {
            region.write().set_offset_y(0.0);
        }
        if let Some(active) = self.active.as_mut() {
            active.write_offset_y(0.0);
        }
    }

    fn handle_inner_offset(&mut self, new: Point) {
        let pinned = (self.outer_offset().y - self.header.height()).max(0.0);
        let pass_through = std::mem::take(&mut self.suppress_next_pin);
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.own_writes.front() == Some(&new) {
            active.own_writes.pop_front();
            return;
        }
        if pass_through {
            trace!(y = new.y, "letting inner offset through after resize");
            return;
        }
        trace!(y = new.y, pinned, "pinning inner offset");
        active.write_offset_y(pinned);
    }

    /// Makes the selected tab the active one. The previous tab's observer is
    /// dropped before the new tab is subscribed.
    fn activate(&mut self) {
        self.active = None;
        self.suppress_next_pin = false;
        self.cancel_snap();
        let index = self.container.selected_index();
        let Some(content) = self.container.content_item_at(index).cloned() else {
            trace!(index, "no content to activate");
            self.set_outer_bottom_inset(0.0);
            self.refresh_fixed_height();
            return;
        };

        let capabilities = content.capabilities();
        let Some(region) = capabilities.scroll_region.clone() else {
            self.set_outer_bottom_inset(0.0);
            self.refresh_fixed_height();
            self.refresh_content_offset(Point::ZERO);
            return;
        };

        let (inset, own) = {
            let mut guard = region.write();
            guard.set_shows_vertical_indicator(false);
            (guard.content_inset(), guard.offset())
        };
        let subscription = Subscription::subscribe(&region);
        debug!(index, own_offset = own.y, "activating tab");
        self.active = Some(ActiveTab {
            index,
            region,
            capabilities,
            content,
            subscription,
            own_writes: VecDeque::new(),
        });
        self.set_outer_bottom_inset(inset.bottom);
        self.refresh_content_size();
        self.refresh_content_offset(own);
    }

    /// Recomputes the outer height from the active tab's scroll content.
    #[tracing::instrument(level = "trace", skip(self))]
    fn refresh_content_size(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let capabilities = &active.capabilities;
        let mode = capabilities
            .height_mode
            .unwrap_or(self.args.default_height_mode);
        let page = self.container.page_size().height;
        let viewport = if page > 0.0 {
            page
        } else {
            active.content.content().bounds_size().height
        };

        let scroll_height = active.region.read().content_size().height;
        let mut content_height = scroll_height + capabilities.fixed_extra_height.unwrap_or(0.0);
        if scroll_height < self.args.min_measured_height
            && let Some(fallback) = capabilities.fallback_height
        {
            content_height = fallback;
        }
        if !content_height.is_finite() {
            warn!(content_height, "non-finite content height");
            content_height = 0.0;
        }

        let mut snap = false;
        let height = if content_height > viewport {
            content_height
        } else {
            match mode {
                HeightMode::FixedToContainer => viewport,
                HeightMode::FollowContent => {
                    let max_offset = (content_height + self.chrome_height()
                        - self.outer.read().viewport().height)
                        .max(0.0);
                    snap = self.outer_offset().y > max_offset;
                    if snap { viewport } else { content_height }
                }
            }
        };
        if snap {
            self.schedule_snap(content_height);
        } else {
            self.cancel_snap();
        }
        self.commit_total(height);
    }

    /// Height for content without its own scroll region: its bounds, or the
    /// page height when it has not been laid out.
    fn refresh_fixed_height(&mut self) {
        let page = self.container.page_size().height;
        let bounds = self
            .container
            .content_item_at(self.container.selected_index())
            .map(|content| content.content().bounds_size())
            .unwrap_or(Size::ZERO);
        let height = if bounds.is_empty() {
            page
        } else {
            bounds.height
        };
        self.commit_total(height);
    }

    /// Restores the outer offset from a tab's own offset.
    fn refresh_content_offset(&mut self, own: Point) {
        let header = self.header.height();
        if own == Point::ZERO {
            if self.outer_offset().y > header {
                self.set_outer_offset(header);
            }
            return;
        }
        self.set_outer_offset(header + own.y);
    }

    fn commit_total(&mut self, height: f64) {
        self.content_height = height.max(0.0);
        let total = self.chrome_height() + self.content_height;
        let mut outer = self.outer.write();
        let width = outer.viewport().width;
        outer.set_content_size(Size::new(width, total));
        trace!(total, "outer height committed");
    }

    fn chrome_height(&self) -> f64 {
        self.header.height() + self.args.tab_bar_height
    }

    fn set_outer_bottom_inset(&mut self, bottom: f64) {
        let mut outer = self.outer.write();
        let mut inset = outer.content_inset();
        inset.bottom = bottom;
        outer.set_content_inset(inset);
    }

    fn schedule_snap(&mut self, commit_height: f64) {
        if self.is_snapping() {
            debug!("superseding pending snap");
        }
        self.snap = None;
        self.pending_snap = Some(commit_height);
    }

    fn cancel_snap(&mut self) {
        if self.is_snapping() {
            debug!("cancelling snap");
        }
        self.snap = None;
        self.pending_snap = None;
    }

    fn start_snap(&mut self, commit_height: f64) {
        let from = self.outer_offset().y;
        let target = (commit_height + self.chrome_height() - self.outer.read().viewport().height)
            .max(0.0);
        let duration = self.args.snap_duration;
        if from <= target || duration.is_zero() {
            self.set_outer_offset(target.min(from));
            self.commit_total(commit_height);
            return;
        }
        debug!(from, target, "snapping outer offset");
        let mut offset = Tween::at(from);
        offset.animate_to(target, duration);
        self.snap = Some(Snap {
            offset,
            commit_height,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::SwitchCause,
        geometry::EdgeInsets,
        testing::{Event, FakeContent, FakeSource, RecordingDelegate},
    };

    const VIEWPORT: Size = Size::new(320.0, 500.0);

    fn coordinator(
        contents: Vec<FakeContent>,
        header: f64,
    ) -> (NestedScrollCoordinator, Arc<FakeSource>) {
        let source = FakeSource::new(contents);
        let mut coordinator = NestedScrollCoordinator::new(NestSegmentArgs::default());
        coordinator.set_data_source(&source);
        coordinator.configure_header(Some(TabContent::view(Arc::new(FakeContent::plain(header)))));
        coordinator.layout(VIEWPORT);
        (coordinator, source)
    }

    #[test]
    fn test_total_height_includes_header_and_bar() {
        let (coordinator, _source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        assert_eq!(coordinator.total_height(), 1145.0);
        assert_eq!(coordinator.active_index(), Some(0));
        assert_eq!(coordinator.tab_bar_frame().origin.y, 100.0);
    }

    #[test]
    fn test_offset_split_below_and_above_header() {
        let (mut coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        coordinator.set_outer_offset(150.0);
        assert_eq!(coordinator.bar_top(), 50.0);
        assert_eq!(source.contents[0].region().read().offset().y, 50.0);
        assert_eq!(coordinator.tab_bar_frame().origin.y, 150.0);

        coordinator.set_outer_offset(40.0);
        assert_eq!(coordinator.bar_top(), 0.0);
        assert_eq!(source.contents[0].region().read().offset().y, 0.0);
    }

    #[test]
    fn test_scrolling_above_header_resets_cached_tabs() {
        let (mut coordinator, source) = coordinator(
            vec![FakeContent::scrolling(1000.0), FakeContent::scrolling(1000.0)],
            100.0,
        );
        coordinator.select(1, false);
        coordinator.set_outer_offset(400.0);
        source.contents[0].region().write().set_offset_y(120.0);
        coordinator.set_outer_offset(10.0);
        assert_eq!(source.contents[0].region().read().offset().y, 0.0);
        assert_eq!(source.contents[1].region().read().offset().y, 0.0);
    }

    #[test]
    fn test_host_scroll_of_outer_is_forwarded_on_sync() {
        let (mut coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        coordinator.outer().write().set_offset_y(300.0);
        coordinator.sync_metrics();
        assert_eq!(source.contents[0].region().read().offset().y, 200.0);
        assert_eq!(coordinator.bar_top(), 200.0);
    }

    #[test]
    fn test_inner_scroll_is_pinned() {
        let (mut coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        coordinator.set_outer_offset(150.0);
        let region = source.contents[0].region().clone();
        region.write().set_offset_y(300.0);
        coordinator.sync_metrics();
        assert_eq!(region.read().offset().y, 50.0);
    }

    #[test]
    fn test_first_offset_after_resize_is_let_through() {
        let (mut coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        coordinator.set_outer_offset(150.0);
        let region = source.contents[0].region().clone();
        region
            .write()
            .set_content_size(Size::new(320.0, 1200.0));
        region.write().set_offset_y(80.0);
        coordinator.sync_metrics();
        assert_eq!(coordinator.total_height(), 1345.0);
        assert_eq!(region.read().offset().y, 80.0);

        region.write().set_offset_y(90.0);
        coordinator.sync_metrics();
        assert_eq!(region.read().offset().y, 50.0);
    }

    #[test]
    fn test_resize_pass_through_is_spent_by_own_write() {
        let (mut coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        coordinator.set_outer_offset(150.0);
        let region = source.contents[0].region().clone();
        region
            .write()
            .set_content_size(Size::new(320.0, 1200.0));
        coordinator.sync_metrics();

        coordinator.set_outer_offset(200.0);
        coordinator.sync_metrics();
        assert_eq!(region.read().offset().y, 100.0);

        region.write().set_offset_y(300.0);
        coordinator.sync_metrics();
        assert_eq!(region.read().offset().y, 100.0);
    }

    #[test]
    fn test_fixed_mode_fills_viewport() {
        let (coordinator, _source) = coordinator(
            vec![FakeContent::scrolling(200.0).with_mode(HeightMode::FixedToContainer)],
            100.0,
        );
        assert_eq!(coordinator.content_height(), 455.0);
        assert_eq!(coordinator.total_height(), 600.0);
    }

    #[test]
    fn test_follow_mode_uses_content_height() {
        let (coordinator, _source) = coordinator(vec![FakeContent::scrolling(200.0)], 100.0);
        assert_eq!(coordinator.total_height(), 345.0);
        assert!(!coordinator.is_snapping());
    }

    #[test]
    fn test_unmeasured_content_uses_fallback() {
        let (coordinator, _source) = coordinator(
            vec![FakeContent::scrolling(10.0).with_fallback(300.0)],
            0.0,
        );
        assert_eq!(coordinator.content_height(), 300.0);
    }

    #[test]
    fn test_fixed_extra_height_is_added() {
        let (coordinator, _source) = coordinator(
            vec![FakeContent::scrolling(600.0).with_extra(44.0)],
            0.0,
        );
        assert_eq!(coordinator.content_height(), 644.0);
    }

    #[test]
    fn test_plain_content_uses_bounds() {
        let (coordinator, _source) = coordinator(vec![FakeContent::plain(300.0)], 100.0);
        assert_eq!(coordinator.active_index(), None);
        assert_eq!(coordinator.total_height(), 445.0);
    }

    #[test]
    fn test_bottom_inset_follows_active_tab() {
        let (mut coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        let region = source.contents[0].region().clone();
        region
            .write()
            .set_content_inset(EdgeInsets::new(0.0, 0.0, 34.0, 0.0));
        coordinator.sync_metrics();
        assert_eq!(coordinator.outer_metrics().content_inset.bottom, 34.0);
    }

    #[test]
    fn test_snap_runs_before_height_commit() {
        let (mut coordinator, _source) = coordinator(
            vec![FakeContent::scrolling(1000.0), FakeContent::scrolling(200.0)],
            100.0,
        );
        coordinator.set_outer_offset(700.0);
        coordinator.select(1, false);
        assert!(coordinator.is_snapping());
        assert_eq!(coordinator.total_height(), 600.0);
        assert_eq!(coordinator.outer_metrics().offset.y, 100.0);

        coordinator.advance(Duration::from_millis(100));
        let midway = coordinator.outer_metrics().offset.y;
        assert!(midway > 0.0 && midway < 100.0);
        assert_eq!(coordinator.total_height(), 600.0);

        coordinator.advance(Duration::from_millis(100));
        assert!(!coordinator.is_snapping());
        assert_eq!(coordinator.outer_metrics().offset.y, 0.0);
        assert_eq!(coordinator.total_height(), 345.0);
    }

    #[test]
    fn test_second_snap_replaces_running_one() {
        let (mut coordinator, source) = coordinator(
            vec![FakeContent::scrolling(1000.0), FakeContent::scrolling(200.0)],
            100.0,
        );
        coordinator.set_outer_offset(700.0);
        coordinator.select(1, false);
        coordinator.advance(Duration::from_millis(100));
        assert_eq!(coordinator.outer_metrics().offset.y, 50.0);

        source.contents[1]
            .region()
            .write()
            .set_content_size(Size::new(320.0, 150.0));
        coordinator.sync_metrics();
        assert!(coordinator.is_snapping());
        assert_eq!(coordinator.outer_metrics().offset.y, 50.0);
        assert_eq!(coordinator.total_height(), 600.0);

        // The first snap would have committed 345 here.
        coordinator.advance(Duration::from_millis(100));
        assert_eq!(coordinator.outer_metrics().offset.y, 25.0);
        assert_eq!(coordinator.total_height(), 600.0);

        coordinator.advance(Duration::from_millis(100));
        assert!(!coordinator.is_snapping());
        assert_eq!(coordinator.outer_metrics().offset.y, 0.0);
        assert_eq!(coordinator.total_height(), 295.0);
    }

    #[test]
    fn test_reload_cancels_snap() {
        let (mut coordinator, _source) = coordinator(
            vec![FakeContent::scrolling(1000.0), FakeContent::scrolling(200.0)],
            100.0,
        );
        coordinator.set_outer_offset(700.0);
        coordinator.select(1, false);
        assert!(coordinator.is_snapping());
        coordinator.outer().write().set_offset_y(0.0);
        coordinator.reload();
        assert!(!coordinator.is_snapping());
        assert_eq!(coordinator.total_height(), 345.0);
    }

    #[test]
    fn test_delegate_hears_select_after_activation() {
        let (mut coordinator, source) = coordinator(
            vec![FakeContent::scrolling(1000.0), FakeContent::scrolling(1000.0)],
            0.0,
        );
        let delegate = Arc::new(RecordingDelegate::default());
        coordinator.set_delegate(&delegate);
        coordinator.tap(1);
        assert_eq!(coordinator.active_index(), Some(1));
        assert_eq!(
            delegate.take(),
            vec![
                Event::WillDeselect(0, SwitchCause::Tap),
                Event::DidSelect(1, SwitchCause::Tap)
            ]
        );
        assert_eq!(source.contents[0].region().read().observer_count(), 0);
        assert_eq!(source.contents[1].region().read().observer_count(), 1);
    }

    #[test]
    fn test_simultaneous_only_with_active_region() {
        let (coordinator, source) = coordinator(vec![FakeContent::scrolling(1000.0)], 0.0);
        let active = source.contents[0].region().read().id();
        assert!(coordinator.should_recognize_simultaneously(active));
        assert!(!coordinator.should_recognize_simultaneously(SurfaceId::next()));
    }

    #[test]
    fn test_outer_pan_respects_pop_edge() {
        let (mut coordinator, _source) = coordinator(vec![FakeContent::scrolling(1000.0)], 0.0);
        let edge = PanGesture {
            surface: coordinator.outer_id(),
            location: Point::new(20.0, 100.0),
        };
        assert!(!coordinator.should_begin_outer_pan(&edge));
        coordinator.set_recognize_pop_gesture(false);
        assert!(coordinator.should_begin_outer_pan(&edge));
        coordinator.set_pan_enabled(false);
        assert!(!coordinator.should_begin_outer_pan(&edge));
    }

    #[test]
    fn test_tab_bar_height_change_recomputes_total() {
        let (mut coordinator, _source) = coordinator(vec![FakeContent::scrolling(1000.0)], 100.0);
        coordinator.set_tab_bar_height(60.0);
        assert_eq!(coordinator.total_height(), 1160.0);
        assert_eq!(coordinator.tab_bar_frame().height(), 60.0);
    }

    #[test]
    fn test_embedded_header_resize_refreshes_total() {
        let header = Arc::new(FakeContent::scrolling(100.0));
        let source = FakeSource::new(vec![FakeContent::scrolling(1000.0)]);
        let mut coordinator = NestedScrollCoordinator::new(NestSegmentArgs::default());
        coordinator.set_data_source(&source);
        coordinator.configure_header(Some(TabContent::view(header.clone())));
        coordinator.layout(VIEWPORT);
        assert_eq!(coordinator.total_height(), 1145.0);

        header
            .region()
            .write()
            .set_content_size(Size::new(320.0, 150.0));
        coordinator.sync_metrics();
        assert_eq!(coordinator.header_height(), 150.0);
        assert_eq!(coordinator.total_height(), 1195.0);
    }
}
