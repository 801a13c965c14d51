use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Clear, Paragraph,
    },
};

use super::app::WatchApp;
use super::widgets::{
    fill_spans, frame_background, terminal_color, value_color, DOTS_PER_COLUMN, DOTS_PER_ROW,
    TERMINAL_BACKGROUND,
};
use crate::core::charts::{ChartDefinition, DrawCommand, Rgba};
use crate::core::telemetry::VisibilityKey;

/// Narrowest chart cell before the grid drops to one column.
const MIN_CELL_WIDTH: u16 = 36;
const MAX_COLUMNS: usize = 3;

/// Header and footer rows around the chart grid.
fn split_screen(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Charts
            Constraint::Length(1), // Footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Slots for `count` charts inside the full screen `area`, row-major.
pub fn chart_grid(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let grid = split_screen(area)[1];

    let fit = (grid.width / MIN_CELL_WIDTH).max(1) as usize;
    let columns = fit.min(MAX_COLUMNS).min(count);
    let rows = count.div_ceil(columns);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(grid);

    let mut slots = Vec::with_capacity(count);
    for row in row_areas.iter() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row);
        slots.extend(cells.iter().copied());
    }
    slots.truncate(count);
    slots
}

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &WatchApp) {
    let area = frame.area();
    let [header, _, footer] = split_screen(area);

    render_header(frame, header, app);

    let visible = app.panel.visible_definitions();
    let slots = chart_grid(area, visible.len());
    for (definition, slot) in visible.iter().zip(slots) {
        render_chart(frame, slot, app, definition);
    }

    render_footer(frame, footer, app);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &WatchApp) {
    let (state, color) = if !app.panel.is_enabled() {
        ("paused", Color::Yellow)
    } else if app.connected {
        ("live", Color::Green)
    } else {
        ("offline", Color::Red)
    };

    let line = Line::from(vec![
        Span::styled(" hwmon-charts ", Style::default().bold()),
        Span::styled(format!("[{}] ", state), Style::default().fg(color)),
        Span::styled(app.status.clone(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_chart(frame: &mut Frame, area: Rect, app: &WatchApp, definition: &ChartDefinition) {
    let value = app.panel.display_value(&definition.id).unwrap_or("--");
    let title = Line::from(vec![
        Span::raw(format!(" {} ", definition.title)),
        Span::styled(
            format!("{} ", value),
            Style::default().fg(value_color(&definition.color)).bold(),
        ),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(block, area);

    let inner = app.cell_area(&definition.id);
    let Some(surface) = app.surface(&definition.id) else {
        return;
    };
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let commands = surface.commands();
    let width = inner.width as f64 * DOTS_PER_COLUMN;
    let height = inner.height as f64 * DOTS_PER_ROW;
    let background = frame_background(&commands)
        .map(|c| {
            let (r, g, b) = c.blend_over(TERMINAL_BACKGROUND);
            Rgba::opaque(r, g, b)
        })
        .unwrap_or(TERMINAL_BACKGROUND);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(terminal_color(background, TERMINAL_BACKGROUND))
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            // Surface y grows downwards, canvas y upwards
            let flip = |y: f64| height - y;

            // Area fills go underneath everything else
            for command in &commands {
                if let DrawCommand::FillPolygon { points, color } = command {
                    let color = terminal_color(*color, background);
                    for (top, bottom) in fill_spans(points, height) {
                        ctx.draw(&CanvasLine {
                            x1: top.x,
                            y1: flip(top.y),
                            x2: bottom.x,
                            y2: flip(bottom.y),
                            color,
                        });
                    }
                }
            }
            ctx.layer();

            for command in &commands {
                match command {
                    DrawCommand::StrokePolyline { points, style } => {
                        let color = terminal_color(style.color, background);
                        for pair in points.windows(2) {
                            ctx.draw(&CanvasLine {
                                x1: pair[0].x,
                                y1: flip(pair[0].y),
                                x2: pair[1].x,
                                y2: flip(pair[1].y),
                                color,
                            });
                        }
                    }
                    DrawCommand::FillCircle {
                        center,
                        radius,
                        color,
                    } => {
                        ctx.draw(&Circle {
                            x: center.x,
                            y: flip(center.y),
                            radius: *radius,
                            color: terminal_color(*color, background),
                        });
                    }
                    DrawCommand::FillText { text, at, color, .. } => {
                        ctx.print(
                            at.x,
                            flip(at.y),
                            Span::styled(
                                text.clone(),
                                Style::default().fg(terminal_color(*color, background)),
                            ),
                        );
                    }
                    DrawCommand::Clear { .. }
                    | DrawCommand::FillRect { .. }
                    | DrawCommand::FillPolygon { .. } => {}
                }
            }
        });
    frame.render_widget(canvas, inner);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &WatchApp) {
    let mut spans = vec![Span::styled(
        " q: Quit │ ?: Help │ p: Pause │ c: Clear │ ",
        Style::default().fg(Color::DarkGray),
    )];
    for (index, key) in VisibilityKey::ALL.iter().enumerate() {
        let style = if app.panel.is_visible(*key) {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray).crossed_out()
        };
        spans.push(Span::styled(format!("{}:{} ", index + 1, key.label()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    hwmon-charts - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ? / h       Toggle this help screen
    p           Pause / resume the monitor
    c           Clear chart history
    1-8         Show / hide a chart category
                (CPU, RAM, GPU usage, GPU temperature,
                 VRAM, VRAM speed, Shared GPU speed,
                 Shared GPU memory)

    Press ? to close this help
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    // Center the help popup
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
