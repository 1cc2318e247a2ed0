//! Fakes shared by the unit tests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use crate::{
    config::HeightMode,
    content::{
        BarItem, ContentCapabilities, ContentView, SegmentDataSource, SegmentDelegate,
        SwitchCause, TabContent,
    },
    geometry::Size,
    scroll_surface::{ScrollSurface, SharedScrollSurface},
};

pub(crate) const PAGE: Size = Size::new(320.0, 455.0);

#[derive(Default)]
pub(crate) struct FakeItem {
    selected: AtomicBool,
}

impl FakeItem {
    pub(crate) fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }
}

impl BarItem for FakeItem {
    fn intrinsic_width(&self) -> f64 {
        80.0
    }

    fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::SeqCst);
    }
}

pub(crate) struct FakeContent {
    pub(crate) region: Option<SharedScrollSurface>,
    pub(crate) bounds: Mutex<Size>,
    pub(crate) mode: Option<HeightMode>,
    pub(crate) fallback: Option<f64>,
    pub(crate) extra: Option<f64>,
    pub(crate) attached: Mutex<Vec<bool>>,
}

impl FakeContent {
    pub(crate) fn scrolling(content_height: f64) -> Self {
        let region =
            ScrollSurface::with_content(PAGE, Size::new(PAGE.width, content_height)).into_shared();
        Self {
            region: Some(region),
            ..Self::plain(PAGE.height)
        }
    }

    pub(crate) fn plain(height: f64) -> Self {
        Self {
            region: None,
            bounds: Mutex::new(Size::new(PAGE.width, height)),
            mode: None,
            fallback: None,
            extra: None,
            attached: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_mode(mut self, mode: HeightMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub(crate) fn with_fallback(mut self, height: f64) -> Self {
        self.fallback = Some(height);
        self
    }

    pub(crate) fn with_extra(mut self, height: f64) -> Self {
        self.extra = Some(height);
        self
    }

    pub(crate) fn region(&self) -> &SharedScrollSurface {
        self.region.as_ref().expect("scrolling content")
    }
}

impl ContentView for FakeContent {
    fn bounds_size(&self) -> Size {
        *self.bounds.lock()
    }

    fn capabilities(&self) -> ContentCapabilities {
        let Some(region) = &self.region else {
            return ContentCapabilities::plain();
        };
        ContentCapabilities {
            scroll_region: Some(region.clone()),
            fixed_extra_height: self.extra,
            height_mode: self.mode,
            fallback_height: self.fallback,
            scrolls_to_top: true,
        }
    }

    fn did_move_to_owner(&self, attached: bool) {
        self.attached.lock().push(attached);
    }
}

pub(crate) struct FakeSource {
    pub(crate) items: Vec<Arc<FakeItem>>,
    pub(crate) contents: Vec<Arc<FakeContent>>,
    pub(crate) calls: Mutex<Vec<usize>>,
}

impl FakeSource {
    pub(crate) fn new(contents: Vec<FakeContent>) -> Arc<Self> {
        Arc::new(Self {
            items: contents.iter().map(|_| Arc::default()).collect(),
            contents: contents.into_iter().map(Arc::new).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls_for(&self, index: usize) -> usize {
        self.calls.lock().iter().filter(|i| **i == index).count()
    }
}

impl SegmentDataSource for FakeSource {
    fn item_count(&self) -> usize {
        self.contents.len()
    }

    fn bar_item(&self, index: usize) -> Arc<dyn BarItem> {
        self.items[index].clone()
    }

    fn content(&self, index: usize) -> TabContent {
        self.calls.lock().push(index);
        TabContent::managed(self.contents[index].clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Reload,
    WillDeselect(usize, SwitchCause),
    DidSelect(usize, SwitchCause),
}

#[derive(Default)]
pub(crate) struct RecordingDelegate {
    events: Mutex<Vec<Event>>,
}

impl RecordingDelegate {
    pub(crate) fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl SegmentDelegate for RecordingDelegate {
    fn on_reload(&self) {
        self.events.lock().push(Event::Reload);
    }

    fn on_will_deselect(&self, index: usize, cause: SwitchCause) {
        self.events.lock().push(Event::WillDeselect(index, cause));
    }

    fn on_did_select(&self, index: usize, cause: SwitchCause) {
        self.events.lock().push(Event::DidSelect(index, cause));
    }
}
