#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use nest_segment::{
    BarItem, ContentCapabilities, ContentView, HeightMode, NestSegmentArgs,
    NestedScrollCoordinator, ScrollSurface, SegmentDataSource, SegmentDelegate,
    SharedScrollSurface, Size, SwitchCause, TabContent, TextBarItem,
};
use parking_lot::Mutex;

pub const VIEWPORT: Size = Size::new(320.0, 500.0);
pub const PAGE: Size = Size::new(320.0, 455.0);

/// Tab content with its own vertical scroll region.
pub struct ListTab {
    pub region: SharedScrollSurface,
    pub mode: Option<HeightMode>,
}

impl ListTab {
    pub fn new(content_height: f64) -> Arc<Self> {
        Arc::new(Self {
            region: ScrollSurface::with_content(PAGE, Size::new(PAGE.width, content_height))
                .into_shared(),
            mode: Some(HeightMode::FollowContent),
        })
    }

    pub fn offset_y(&self) -> f64 {
        self.region.read().offset().y
    }
}

impl ContentView for ListTab {
    fn bounds_size(&self) -> Size {
        PAGE
    }

    fn capabilities(&self) -> ContentCapabilities {
        let capabilities = ContentCapabilities::scrolling(self.region.clone());
        match self.mode {
            Some(mode) => capabilities.with_height_mode(mode),
            None => capabilities,
        }
    }
}

/// A plain view of a fixed height.
pub struct Banner(pub f64);

impl ContentView for Banner {
    fn bounds_size(&self) -> Size {
        Size::new(PAGE.width, self.0)
    }
}

pub struct Tabs {
    pub tabs: Vec<Arc<ListTab>>,
    pub factory_calls: Vec<AtomicUsize>,
}

impl Tabs {
    pub fn new(heights: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            tabs: heights.iter().map(|height| ListTab::new(*height)).collect(),
            factory_calls: heights.iter().map(|_| AtomicUsize::new(0)).collect(),
        })
    }

    pub fn calls(&self, index: usize) -> usize {
        self.factory_calls[index].load(Ordering::SeqCst)
    }
}

impl SegmentDataSource for Tabs {
    fn item_count(&self) -> usize {
        self.tabs.len()
    }

    fn bar_item(&self, index: usize) -> Arc<dyn BarItem> {
        Arc::new(TextBarItem::new(format!("Tab {index}"), 80.0))
    }

    fn content(&self, index: usize) -> TabContent {
        self.factory_calls[index].fetch_add(1, Ordering::SeqCst);
        TabContent::view(self.tabs[index].clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Reload,
    WillDeselect(usize, SwitchCause),
    DidSelect(usize, SwitchCause),
}

#[derive(Default)]
pub struct Recorder {
    notes: Mutex<Vec<Note>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Note> {
        std::mem::take(&mut *self.notes.lock())
    }
}

impl SegmentDelegate for Recorder {
    fn on_reload(&self) {
        self.notes.lock().push(Note::Reload);
    }

    fn on_will_deselect(&self, index: usize, cause: SwitchCause) {
        self.notes.lock().push(Note::WillDeselect(index, cause));
    }

    fn on_did_select(&self, index: usize, cause: SwitchCause) {
        self.notes.lock().push(Note::DidSelect(index, cause));
    }
}

/// A laid out coordinator with a plain header of `header` points.
pub fn setup(
    heights: &[f64],
    header: f64,
) -> (NestedScrollCoordinator, Arc<Tabs>, Arc<Recorder>) {
    let tabs = Tabs::new(heights);
    let recorder = Arc::new(Recorder::default());
    let mut coordinator = NestedScrollCoordinator::new(NestSegmentArgs::default());
    coordinator.set_data_source(&tabs);
    coordinator.set_delegate(&recorder);
    coordinator.configure_header(Some(TabContent::view(Arc::new(Banner(header)))));
    coordinator.layout(VIEWPORT);
    (coordinator, tabs, recorder)
}
