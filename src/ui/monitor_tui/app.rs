use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::core::charts::SurfaceHandle;
use crate::core::client::{new_client_id, websocket_url, MonitorApi, StreamEvent, TelemetryRuntime};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::VisibilitySettings;
use crate::core::panel::MonitorPanel;

use super::event_handler::MonitorEvent;
use super::render::{chart_grid, render_ui};
use super::widgets::{ChartCell, TerminalContainer};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Request the app wants sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerRequest {
    Switch(bool),
}

/// Watch application state
pub struct WatchApp {
    pub panel: MonitorPanel,
    cells: HashMap<String, ChartCell>,
    pixel_ratio: f64,
    pub should_quit: bool,
    pub show_help: bool,
    pub connected: bool,
    pub status: String,
}

impl WatchApp {
    pub fn new(clock: Arc<dyn Clock>, config: &WatchConfig) -> Self {
        let mut panel = MonitorPanel::new(clock, config.visibility.clone());
        panel.set_enabled(config.enabled);

        Self {
            panel,
            cells: HashMap::new(),
            pixel_ratio: config.pixel_ratio,
            should_quit: false,
            show_help: false,
            connected: false,
            status: "Connecting...".to_string(),
        }
    }

    /// Build one terminal cell per chart. Sizes are picked up by the next layout pass.
    pub fn initialize(&mut self, gpu_count: usize) -> crate::Result<()> {
        let pixel_ratio = self.pixel_ratio;
        let mut cells = HashMap::new();

        self.panel.initialize(gpu_count, |definition| {
            let cell = ChartCell::default();
            cells.insert(definition.id.clone(), cell.clone());
            Box::new(TerminalContainer::new(cell, pixel_ratio))
        })?;

        self.cells = cells;
        Ok(())
    }

    /// Assign screen areas to visible charts and resize the ones that moved.
    pub fn layout(&mut self, area: Rect) {
        let visible: Vec<String> = self
            .panel
            .visible_definitions()
            .iter()
            .map(|d| d.id.clone())
            .collect();
        let slots = chart_grid(area, visible.len());

        let mut changed = Vec::new();
        for (id, cell) in &self.cells {
            let inner = visible
                .iter()
                .position(|v| v == id)
                .and_then(|i| slots.get(i))
                .map(|slot| inner_area(*slot))
                .unwrap_or_default();
            if cell.set_area(inner) {
                changed.push(id.clone());
            }
        }

        for id in changed {
            self.panel.resize(&id);
        }
    }

    pub fn surface(&self, id: &str) -> Option<SurfaceHandle> {
        self.cells.get(id)?.surface()
    }

    pub fn cell_area(&self, id: &str) -> Rect {
        self.cells.get(id).map(ChartCell::area).unwrap_or_default()
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) -> Option<ServerRequest> {
        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = !self.show_help,
            MonitorEvent::ToggleCategory(key) => {
                let visible = self.panel.toggle_visibility(key);
                log::debug!("{} charts {}", key.label(), if visible { "shown" } else { "hidden" });
            }
            MonitorEvent::TogglePanel => {
                let enabled = !self.panel.is_enabled();
                self.panel.set_enabled(enabled);
                return Some(ServerRequest::Switch(enabled));
            }
            MonitorEvent::ClearBuffers => self.panel.clear(),
            MonitorEvent::None => {}
        }
        None
    }

    pub fn handle_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Connected => {
                self.connected = true;
                self.status = "Connected".to_string();
            }
            StreamEvent::Snapshot(snapshot) => self.panel.handle_snapshot(&snapshot),
            StreamEvent::Disconnected(reason) => {
                self.connected = false;
                self.status = format!("Disconnected: {}", reason);
            }
        }
    }
}

/// Inside of a bordered chart block.
fn inner_area(slot: Rect) -> Rect {
    Rect::new(
        slot.x.saturating_add(1),
        slot.y.saturating_add(1),
        slot.width.saturating_sub(2),
        slot.height.saturating_sub(2),
    )
}

/// Configuration for the watch app
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub server_url: String,
    pub pixel_ratio: f64,
    /// Skip GPU enumeration and use this count
    pub gpu_count: Option<usize>,
    pub enabled: bool,
    pub visibility: VisibilitySettings,
}

/// Run the watch TUI; returns the visibility settings in effect on exit.
pub fn run_watch_app(config: WatchConfig) -> Result<VisibilitySettings> {
    let mut runtime = TelemetryRuntime::new().context("Failed to start async runtime")?;
    let api = MonitorApi::new(&config.server_url).context("Invalid server URL")?;

    let gpu_count = match config.gpu_count {
        Some(count) => count,
        None => runtime.block_on(api.gpu_count()),
    };

    let ws_url = websocket_url(&config.server_url, &new_client_id())
        .context("Invalid server URL")?;
    runtime.connect(ws_url);

    let mut app = WatchApp::new(Arc::new(SystemClock), &config);
    app.initialize(gpu_count)
        .context("Failed to attach charts")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &mut app, &mut runtime, &api);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    runtime.shutdown();
    result?;

    Ok(app.panel.visibility().clone())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut WatchApp,
    runtime: &mut TelemetryRuntime,
    api: &MonitorApi,
) -> Result<()> {
    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        app.layout(Rect::new(0, 0, size.width, size.height));

        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(POLL_INTERVAL).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    if let Some(ServerRequest::Switch(on)) =
                        app.handle_event(MonitorEvent::from_key(key.code))
                    {
                        let api = api.clone();
                        runtime.spawn_request("Monitor switch", async move {
                            api.switch_monitor(on).await
                        });
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        while let Some(event) = runtime.try_next_event() {
            app.handle_stream_event(event);
        }
    }
}
