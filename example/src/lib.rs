//! Command line driver for a nested tab container.
//!
//! Builds a header plus one scrolling list per `--tabs` entry, then replays a
//! scripted interaction frame by frame and prints the outer scroll state
//! after each stage.

use std::{sync::Arc, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use nest_segment::{
    BarItem, ContainerEvent, ContentCapabilities, ContentView, HeightMode, NestSegmentArgsBuilder,
    NestedScrollCoordinator, ScrollSurface, SegmentDataSource, SegmentDelegate,
    SharedScrollSurface, Size, SwitchCause, TabContent, TextBarItem,
};
use tracing::{debug, info, warn};

/// Frames after which a still-running animation is reported and abandoned.
const MAX_FRAMES: usize = 600;

#[derive(Parser)]
#[command(name = "example")]
#[command(version, about = "Replays scripted scrolls on a nested tab container", long_about = None)]
pub struct Cli {
    /// Header height in points
    #[arg(long, default_value_t = 100.0)]
    pub header: f64,
    /// Content height of each tab, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [1000.0, 200.0])]
    pub tabs: Vec<f64>,
    /// Viewport width in points
    #[arg(long, default_value_t = 320.0)]
    pub width: f64,
    /// Viewport height in points
    #[arg(long, default_value_t = 500.0)]
    pub height: f64,
    /// How tabs shorter than the page are sized
    #[arg(long, value_enum, default_value_t = Mode::Follow)]
    pub mode: Mode,
    /// Frame interval in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scroll the outer surface, then select another tab
    Switch {
        /// Outer offset to scroll to before switching
        #[arg(long, default_value_t = 700.0)]
        scroll: f64,
        /// Tab to switch to
        #[arg(long, default_value_t = 1)]
        to: usize,
    },
    /// Drag the pages sideways and release
    Swipe {
        /// Horizontal drag distance in points
        #[arg(long, default_value_t = 200.0)]
        distance: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Short tabs are as tall as their content
    Follow,
    /// Short tabs fill the page
    Fixed,
}

impl From<Mode> for HeightMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Follow => HeightMode::FollowContent,
            Mode::Fixed => HeightMode::FixedToContainer,
        }
    }
}

struct ListTab {
    region: SharedScrollSurface,
}

impl ContentView for ListTab {
    fn bounds_size(&self) -> Size {
        self.region.read().viewport()
    }

    fn capabilities(&self) -> ContentCapabilities {
        ContentCapabilities::scrolling(self.region.clone())
    }
}

struct Banner(Size);

impl ContentView for Banner {
    fn bounds_size(&self) -> Size {
        self.0
    }
}

struct DemoSource {
    tabs: Vec<Arc<ListTab>>,
}

impl DemoSource {
    fn new(heights: &[f64], page: Size) -> Self {
        let tabs = heights
            .iter()
            .map(|height| {
                Arc::new(ListTab {
                    region: ScrollSurface::with_content(page, Size::new(page.width, *height))
                        .into_shared(),
                })
            })
            .collect();
        Self { tabs }
    }
}

impl SegmentDataSource for DemoSource {
    fn item_count(&self) -> usize {
        self.tabs.len()
    }

    fn bar_item(&self, index: usize) -> Arc<dyn BarItem> {
        Arc::new(TextBarItem::new(format!("Tab {}", index + 1), 80.0))
    }

    fn content(&self, index: usize) -> TabContent {
        debug!(index, "building tab content");
        TabContent::view(self.tabs[index].clone())
    }
}

struct LogDelegate;

impl SegmentDelegate for LogDelegate {
    fn on_reload(&self) {
        info!("tabs reloaded");
    }

    fn on_will_deselect(&self, index: usize, cause: SwitchCause) {
        info!(index, ?cause, "tab will deselect");
    }

    fn on_did_select(&self, index: usize, cause: SwitchCause) {
        info!(index, ?cause, "tab selected");
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,nest_segment=info,example=info")
        {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

/// Runs the scripted interaction described by `cli`.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();

    let viewport = Size::new(cli.width, cli.height);
    let args = NestSegmentArgsBuilder::default()
        .default_height_mode(cli.mode.into())
        .build()?;
    let page = Size::new(viewport.width, (viewport.height - args.tab_bar_height).max(0.0));
    let source = Arc::new(DemoSource::new(&cli.tabs, page));
    let delegate = Arc::new(LogDelegate);

    let mut coordinator = NestedScrollCoordinator::new(args);
    coordinator.set_data_source(&source);
    coordinator.set_delegate(&delegate);
    coordinator.configure_header(Some(TabContent::view(Arc::new(Banner(Size::new(
        viewport.width,
        cli.header,
    ))))));
    coordinator.layout(viewport);
    report("loaded", &coordinator);

    let frame = Duration::from_millis(cli.frame_ms.max(1));
    match cli.command {
        Command::Switch { scroll, to } => {
            coordinator.set_outer_offset(scroll);
            report("scrolled", &coordinator);
            if coordinator.select(to, true).is_none() {
                warn!(to, "selection unchanged");
            }
            report("switched", &coordinator);
        }
        Command::Swipe { distance } => {
            coordinator.handle(ContainerEvent::BeginDrag);
            let start = coordinator.container().host().offset_x();
            for step in 1..=8 {
                let x = start + distance * f64::from(step) / 8.0;
                coordinator.handle(ContainerEvent::DragTo(x));
            }
            if coordinator
                .handle(ContainerEvent::EndDrag {
                    will_decelerate: false,
                })
                .is_none()
            {
                info!("pages settled on the same tab");
            }
            report("swiped", &coordinator);
        }
    }

    settle(&mut coordinator, frame);
    report("settled", &coordinator);
    Ok(())
}

fn is_moving(coordinator: &NestedScrollCoordinator) -> bool {
    let container = coordinator.container();
    coordinator.is_snapping() || container.host().is_animating() || container.bar().is_animating()
}

fn settle(coordinator: &mut NestedScrollCoordinator, frame: Duration) {
    let mut frames = 0;
    while is_moving(coordinator) {
        if frames == MAX_FRAMES {
            warn!(frames, "animations still running");
            return;
        }
        coordinator.advance(frame);
        frames += 1;
        debug!(
            frames,
            offset = coordinator.outer_metrics().offset.y,
            "frame"
        );
    }
    info!(frames, "animations settled");
}

fn report(stage: &str, coordinator: &NestedScrollCoordinator) {
    let metrics = coordinator.outer_metrics();
    println!(
        "{stage:>9}: tab {} | outer offset {:>7.1} | total height {:>7.1} | bar top {:>6.1}",
        coordinator.selected_index(),
        metrics.offset.y,
        coordinator.total_height(),
        coordinator.bar_top(),
    );
}
