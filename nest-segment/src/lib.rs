//! A header, a sticky tab bar and horizontally paged tab content sharing one
//! vertical scroll.
//!
//! # Overview
//!
//! - [`TabBar`] is a scrollable strip of selectable items with an indicator.
//! - [`PagedContentHost`] pages the tab contents horizontally and
//!   materializes each page once per reload.
//! - [`TabbedContainer`] stacks the two and keeps their selection in step.
//! - [`NestedScrollCoordinator`] puts a header above the container inside
//!   one outer [`ScrollSurface`] and forwards scrolling into the active tab,
//!   so that header and tab content scroll as one column.
//!
//! Nothing here draws or reads input. The host application owns rendering and
//! gesture recognition; it feeds the components sizes, offsets and frame
//! times, and reads back frames and offsets.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use nest_segment::{
//!     BarItem, ContentCapabilities, ContentView, NestSegmentArgs, NestedScrollCoordinator,
//!     ScrollSurface, SegmentDataSource, SharedScrollSurface, Size, TabContent, TextBarItem,
//! };
//!
//! struct List(SharedScrollSurface);
//!
//! impl ContentView for List {
//!     fn bounds_size(&self) -> Size {
//!         self.0.read().viewport()
//!     }
//!
//!     fn capabilities(&self) -> ContentCapabilities {
//!         ContentCapabilities::scrolling(self.0.clone())
//!     }
//! }
//!
//! struct Tabs(Vec<Arc<List>>);
//!
//! impl SegmentDataSource for Tabs {
//!     fn item_count(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn bar_item(&self, index: usize) -> Arc<dyn BarItem> {
//!         Arc::new(TextBarItem::new(format!("Tab {index}"), 80.0))
//!     }
//!
//!     fn content(&self, index: usize) -> TabContent {
//!         TabContent::view(self.0[index].clone())
//!     }
//! }
//!
//! let page = Size::new(320.0, 455.0);
//! let tabs = Arc::new(Tabs(vec![Arc::new(List(
//!     ScrollSurface::with_content(page, Size::new(320.0, 1000.0)).into_shared(),
//! ))]));
//!
//! let mut coordinator = NestedScrollCoordinator::new(NestSegmentArgs::default());
//! coordinator.set_data_source(&tabs);
//! coordinator.layout(Size::new(320.0, 500.0));
//! assert_eq!(coordinator.total_height(), 1045.0);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

mod animation;
pub mod config;
pub mod container;
pub mod content;
pub mod coordinator;
pub mod geometry;
pub mod gesture;
pub mod header;
pub mod paged_host;
pub mod scroll_surface;
pub mod tab_bar;

#[cfg(test)]
mod testing;

pub use crate::{
    animation::Tween,
    config::{
        ConfigError, HeightMode, IndicatorMode, NestSegmentArgs, NestSegmentArgsBuilder,
        TabBarArgs, TabBarArgsBuilder,
    },
    container::{ContainerEvent, SelectionState, TabbedContainer},
    content::{
        BarItem, ContentCapabilities, ContentRole, ContentView, SegmentDataSource,
        SegmentDelegate, SwitchCause, TabContent,
    },
    coordinator::NestedScrollCoordinator,
    geometry::{EdgeInsets, Point, Rect, Size},
    gesture::{GesturePolicy, PanGesture},
    header::Header,
    paged_host::PagedContentHost,
    scroll_surface::{
        MetricsChange, ScrollMetrics, ScrollSurface, SharedScrollSurface, Subscription, SurfaceId,
    },
    tab_bar::{TabBar, TabBarSource, TextBarItem},
};
