//! UI rendering for the TUI.

mod plants;
mod scan;
mod tools;

use chrono::{Local, Timelike};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use verdant_core::home::{self, TimeOfDay};
use verdant_core::onboarding::STEPS;
use verdant_core::presentation::{self, Badge, IconKind, Rgb};
use verdant_core::profile::{self, MenuItemKind};

use crate::app::{App, Tab, ViewMode};

// ========== Palette ==========

/// App name and active tab
const ACCENT: Color = Color::Rgb(76, 175, 80);
/// Borders of primary panels
const BORDER_MAIN: Color = Color::Rgb(46, 125, 50);
/// Borders of secondary panels
const BORDER_INFO: Color = Color::Rgb(100, 160, 100);
/// Field labels
const LABEL_COLOR: Color = Color::Rgb(130, 180, 130);
/// Separators and disabled text
const SEPARATOR_COLOR: Color = Color::Rgb(90, 90, 90);
/// Key names in the footer
const KEY_COLOR: Color = Color::Yellow;

pub fn render(frame: &mut Frame, app: &mut App) {
    match app.view_mode {
        ViewMode::Onboarding => render_onboarding_view(frame, app),
        ViewMode::Home => render_home_view(frame, app),
        ViewMode::Plants => plants::render_plants_view(frame, app),
        ViewMode::PlantDetail(id) => plants::render_plant_detail_view(frame, app, id),
        ViewMode::Tasks => render_tasks_view(frame, app),
        ViewMode::Scan => scan::render_scan_view(frame, app),
        ViewMode::Results => scan::render_results_view(frame, app),
        ViewMode::Tools(view) => tools::render_tools_view(frame, app, view),
        ViewMode::Services(kind) => tools::render_services_view(frame, app, kind),
        ViewMode::Profile => render_profile_view(frame, app),
    }
}

// ========== Shared Helpers ==========

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Single-width glyph for an icon.
fn glyph(icon: IconKind) -> &'static str {
    match icon {
        IconKind::Camera => "◉",
        IconKind::Stethoscope => "✚",
        IconKind::Plus => "+",
        IconKind::Droplets => "≈",
        IconKind::RotateCcw => "↺",
        IconKind::Sprout => "❦",
        IconKind::Scissors => "✂",
        IconKind::Sun => "☼",
        IconKind::CloudSun => "◐",
        IconKind::Cloud => "○",
        IconKind::AlertTriangle => "▲",
        IconKind::Info => "ℹ",
        IconKind::CheckCircle => "✓",
        IconKind::Wrench => "⚒",
        IconKind::Users => "☺",
        IconKind::UserCheck => "✔",
        IconKind::Lightbulb => "✦",
        IconKind::Gauge => "◔",
        IconKind::Video => "▶",
        IconKind::MessageCircle => "✉",
        IconKind::Phone => "☎",
        IconKind::Leaf => "❧",
        IconKind::Heart => "♥",
        IconKind::Star => "★",
    }
}

fn badge_span(badge: &Badge) -> Span<'static> {
    Span::styled(
        format!("{} {}", glyph(badge.icon), badge.label),
        Style::default().fg(color(badge.color)),
    )
}

fn panel(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title))
}

/// Split the screen into tab header, body and footer.
fn screen_chunks(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Min(5),    // Body
        Constraint::Length(1), // Footer
    ])
    .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// A `width` x `height` rectangle centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render the tab bar header. `None` shows the bar with no active tab.
fn render_tab_header(frame: &mut Frame, active: Option<Tab>, area: Rect) {
    let mut spans = vec![
        Span::styled(" ❧ verdant ", Style::default().fg(ACCENT).bold()),
        Span::styled("│", Style::default().fg(SEPARATOR_COLOR)),
    ];
    for tab in Tab::ALL {
        let style = if Some(tab) == active {
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

/// Render key hints, or the status message when one is set.
fn render_footer(frame: &mut Frame, app: &App, hints: &[(&str, &str)], area: Rect) {
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {}", key), Style::default().fg(KEY_COLOR)));
        spans.push(Span::raw(format!(" {} ", label)));
    }
    if let Some(status) = &app.status {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(status.clone(), Style::default().fg(ACCENT).bold()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ========== Onboarding ==========

fn render_onboarding_view(frame: &mut Frame, app: &App) {
    let (_, body, footer) = screen_chunks(frame.area());
    let step = app.onboarding.current();
    let accent = color(step.color);

    let dots: Vec<Span> = (0..STEPS.len())
        .map(|i| {
            if i == app.onboarding.index() {
                Span::styled("● ", Style::default().fg(accent))
            } else {
                Span::styled("○ ", Style::default().fg(SEPARATOR_COLOR))
            }
        })
        .collect();

    let lines = vec![
        Line::from(Span::styled(
            glyph(step.icon),
            Style::default().fg(accent).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(step.title, Style::default().fg(accent).bold())),
        Line::from(""),
        Line::from(step.description),
        Line::from(""),
        Line::from(dots),
        Line::from(""),
        Line::from(Span::styled(
            format!("[ {} ]", app.onboarding.next_label()),
            Style::default().fg(Color::Black).bg(accent),
        )),
    ];

    let area = centered_rect(60, 15, body);
    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel("Welcome", accent));
    frame.render_widget(card, area);

    render_footer(
        frame,
        app,
        &[("Enter", "next"), ("←/→", "swipe"), ("Esc", "skip"), ("q", "quit")],
        footer,
    );
}

// ========== Home ==========

fn render_home_view(frame: &mut Frame, app: &App) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Home), header);

    let hour = Local::now().hour();
    let (top, _) = TimeOfDay::from_hour(hour).palette();

    let chunks = Layout::vertical([
        Constraint::Length(4), // Greeting and stats
        Constraint::Length(6), // Feature tiles
        Constraint::Min(4),    // Today's tasks
    ])
    .split(body);

    // === Greeting ===
    let stats = app.garden.collection.stats();
    let task_stats = app.garden.tasks.stats();
    let greeting = vec![
        Line::from(Span::styled(
            home::greeting(hour, &app.profile),
            Style::default().fg(color(top)).bold(),
        )),
        Line::from(vec![
            Span::styled("Plants: ", Style::default().fg(LABEL_COLOR)),
            Span::raw(stats.total.to_string()),
            Span::styled("  Need water today: ", Style::default().fg(LABEL_COLOR)),
            Span::raw(stats.need_water_today.to_string()),
            Span::styled("  Avg health: ", Style::default().fg(LABEL_COLOR)),
            Span::raw(format!("{}%", stats.average_health)),
            Span::styled("  Tasks left: ", Style::default().fg(LABEL_COLOR)),
            Span::raw(task_stats.pending.to_string()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(greeting).block(panel("verdant", color(top))),
        chunks[0],
    );

    // === Feature Tiles ===
    let tiles = home::feature_tiles();
    let tile_areas = Layout::horizontal(vec![Constraint::Ratio(1, tiles.len() as u32); tiles.len()])
        .split(chunks[1]);
    for (i, (tile, area)) in tiles.iter().zip(tile_areas.iter()).enumerate() {
        let selected = i == app.home_selected;
        let tile_color = color(tile.color);
        let block = panel(tile.title, tile_color).border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        });
        let text = vec![
            Line::from(Span::styled(glyph(tile.icon), Style::default().fg(tile_color).bold())),
            Line::from(tile.description),
        ];
        let mut para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        if selected {
            para = para.style(Style::default().add_modifier(Modifier::BOLD));
        }
        frame.render_widget(para, *area);
    }

    // === Today's Tasks ===
    let rows: Vec<Row> = home::todays_tasks(&app.garden)
        .into_iter()
        .map(|row| {
            let status = if row.task.completed {
                badge_span(&presentation::done_badge())
            } else {
                badge_span(&presentation::priority_badge(row.task.priority))
            };
            Row::new(vec![
                Cell::from(row.task.time_label()),
                Cell::from(badge_span(&presentation::task_kind_badge(row.task.kind))),
                Cell::from(row.plant_name()),
                Cell::from(status),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(10),
        ],
    )
    .block(panel("Today's Tasks", BORDER_INFO));
    frame.render_widget(table, chunks[2]);

    render_footer(
        frame,
        app,
        &[
            ("←/→", "select"),
            ("Enter", "open"),
            ("s", "scan"),
            ("d", "diagnose"),
            ("Tab", "next tab"),
            ("q", "quit"),
        ],
        footer,
    );
}

// ========== Tasks ==========

fn render_tasks_view(frame: &mut Frame, app: &mut App) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Tasks), header);

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(body);

    let stats = app.garden.tasks.stats();
    let summary = Line::from(vec![
        Span::styled("Pending: ", Style::default().fg(LABEL_COLOR)),
        Span::styled(stats.pending.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled("  Completed: ", Style::default().fg(LABEL_COLOR)),
        Span::styled(stats.completed.to_string(), Style::default().fg(ACCENT)),
        Span::styled("  Total: ", Style::default().fg(LABEL_COLOR)),
        Span::raw(stats.total.to_string()),
    ]);
    frame.render_widget(
        Paragraph::new(summary).block(panel("Today", BORDER_MAIN)),
        chunks[0],
    );

    let header_cells = ["", "Time", "Task", "Plant", "Priority"]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).bold()));
    let header_row = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .garden
        .tasks
        .with_plants(&app.garden.collection)
        .into_iter()
        .map(|row| {
            let (check, style) = if row.task.completed {
                ("[x]", Style::default().fg(SEPARATOR_COLOR))
            } else {
                ("[ ]", Style::default())
            };
            let priority = if row.task.completed {
                presentation::done_badge()
            } else {
                presentation::priority_badge(row.task.priority)
            };
            Row::new(vec![
                Cell::from(check),
                Cell::from(row.task.time_label()),
                Cell::from(badge_span(&presentation::task_kind_badge(row.task.kind))),
                Cell::from(row.plant_name()),
                Cell::from(badge_span(&priority)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(10),
        ],
    )
    .header(header_row)
    .block(panel("Care Tasks", BORDER_INFO))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED).fg(ACCENT))
    .highlight_symbol("▶ ");
    frame.render_stateful_widget(table, chunks[1], &mut app.task_state);

    render_footer(
        frame,
        app,
        &[("j/k", "navigate"), ("Space", "done/undo"), ("Tab", "next tab"), ("q", "quit")],
        footer,
    );
}

// ========== Profile ==========

fn render_profile_view(frame: &mut Frame, app: &App) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Profile), header);

    let chunks = Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).split(body);

    // === Account Header ===
    let account = if app.profile.guest {
        vec![
            Line::from(Span::styled("Guest", Style::default().bold())),
            Line::from(Span::styled(
                "Create an account to sync your garden",
                Style::default().fg(SEPARATOR_COLOR),
            )),
        ]
    } else {
        let stats = profile::user_stats();
        let name = app.profile.display_name.as_deref().unwrap_or("Gardener");
        vec![
            Line::from(Span::styled(name.to_string(), Style::default().bold())),
            Line::from(vec![
                Span::styled("Plants: ", Style::default().fg(LABEL_COLOR)),
                Span::raw(stats.plants_owned.to_string()),
                Span::styled("  Streak: ", Style::default().fg(LABEL_COLOR)),
                Span::raw(format!("{} days", stats.care_streak)),
                Span::styled("  Identified: ", Style::default().fg(LABEL_COLOR)),
                Span::raw(stats.plants_identified.to_string()),
                Span::styled("  Health: ", Style::default().fg(LABEL_COLOR)),
                Span::raw(format!("{}%", stats.health_score)),
            ]),
        ]
    };
    frame.render_widget(
        Paragraph::new(account).block(panel("Profile", BORDER_MAIN)),
        chunks[0],
    );

    // === Menu ===
    let mut lines = Vec::new();
    let mut index = 0;
    for section in app.profile.menu() {
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default().fg(Color::Yellow).bold(),
        )));
        for item in section.items {
            let selected = index == app.profile_selected;
            let marker = if selected { "▶ " } else { "  " };
            let mut spans = vec![
                Span::raw(marker),
                Span::styled("● ", Style::default().fg(color(item.color))),
                Span::styled(item.title, Style::default().bold()),
                Span::styled(format!("  {}", item.subtitle), Style::default().fg(SEPARATOR_COLOR)),
            ];
            if item.kind == MenuItemKind::Toggle {
                let on = app.profile.toggle_value(item.id).unwrap_or(false);
                spans.push(Span::styled(
                    if on { "  [on]" } else { "  [off]" },
                    Style::default().fg(if on { ACCENT } else { SEPARATOR_COLOR }),
                ));
            }
            let mut line = Line::from(spans);
            if selected {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            lines.push(line);
            index += 1;
        }
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines).block(panel("Settings", BORDER_INFO)),
        chunks[1],
    );

    render_footer(
        frame,
        app,
        &[("j/k", "navigate"), ("Enter", "toggle/open"), ("Tab", "next tab"), ("q", "quit")],
        footer,
    );
}

/// Draw a centered popup over whatever is on screen.
fn render_popup(frame: &mut Frame, title: &str, lines: Vec<Line<'_>>, border: Color) {
    let height = lines.len() as u16 + 2;
    let area = centered_rect(56, height, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(title, border));
    frame.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use verdant_core::Config;

    fn draw(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_every_view_renders() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(Config::default(), runtime.handle().clone());

        assert!(draw(&mut app).contains("Identify Any Plant"));

        app.view_mode = ViewMode::Home;
        assert!(draw(&mut app).contains("Today's Tasks"));

        app.view_mode = ViewMode::Tasks;
        assert!(draw(&mut app).contains("Care Tasks"));

        app.view_mode = ViewMode::Profile;
        assert!(draw(&mut app).contains("Dark Mode"));

        app.view_mode = ViewMode::Plants;
        assert!(draw(&mut app).contains("Fiddle Leaf Fig"));

        app.view_mode = ViewMode::Tools(crate::app::ToolView::SoilMeter);
        assert!(draw(&mut app).contains("Moisture"));

        app.view_mode = ViewMode::Services(Some(verdant_core::services::DirectoryKind::Gardener));
        assert!(draw(&mut app).contains("/hour"));
    }

    #[test]
    fn test_scan_view_follows_session() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut config = Config::default();
        config.scan.auto_analyze = false;
        let mut app = App::new(config, runtime.handle().clone());
        app.view_mode = ViewMode::Home;

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert!(draw(&mut app).contains("Photo Tips"));

        app.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        assert!(draw(&mut app).contains("Ready to analyze"));
    }
}
