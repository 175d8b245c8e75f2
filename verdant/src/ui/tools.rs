use super::*;
use ratatui::widgets::Gauge;
use verdant_core::services::{self, DirectoryKind};

use crate::app::{ToolView, SERVICE_MENU, TOOL_MENU};

pub(super) fn render_tools_view(frame: &mut Frame, app: &App, view: ToolView) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Home), header);

    match view {
        ToolView::Menu => {
            let lines: Vec<Line> = TOOL_MENU
                .iter()
                .enumerate()
                .flat_map(|(i, (tool, title, description))| {
                    let icon = match tool {
                        ToolView::SoilMeter => IconKind::Gauge,
                        _ => IconKind::Sun,
                    };
                    let marker = if i == app.tool_selected { "▶ " } else { "  " };
                    let mut title_line = Line::from(vec![
                        Span::raw(marker),
                        Span::styled(format!("{} ", glyph(icon)), Style::default().fg(ACCENT)),
                        Span::styled(*title, Style::default().bold()),
                    ]);
                    if i == app.tool_selected {
                        title_line = title_line.style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    [
                        title_line,
                        Line::from(Span::styled(
                            format!("    {}", description),
                            Style::default().fg(SEPARATOR_COLOR),
                        )),
                        Line::from(""),
                    ]
                })
                .collect();
            frame.render_widget(
                Paragraph::new(lines).block(panel("Plant Care Tools", BORDER_MAIN)),
                body,
            );
            render_footer(
                frame,
                app,
                &[("j/k", "select"), ("Enter", "open"), ("Esc", "back"), ("q", "quit")],
                footer,
            );
        }
        ToolView::LightMeter => {
            render_light_meter(frame, app, body);
            render_meter_footer(frame, app, app.light.is_running(), footer);
        }
        ToolView::SoilMeter => {
            render_soil_meter(frame, app, body);
            render_meter_footer(frame, app, app.soil.is_running(), footer);
        }
    }
}

fn render_meter_footer(frame: &mut Frame, app: &App, running: bool, area: Rect) {
    let toggle = if running { "stop" } else { "start measuring" };
    render_footer(frame, app, &[("Space", toggle), ("Esc", "back"), ("q", "quit")], area);
}

fn meter_status(running: bool) -> Line<'static> {
    if running {
        Line::from(Span::styled("● Measuring...", Style::default().fg(ACCENT).bold()))
    } else {
        Line::from(Span::styled("○ Stopped", Style::default().fg(SEPARATOR_COLOR)))
    }
}

fn render_light_meter(frame: &mut Frame, app: &App, area: Rect) {
    let reading = app.light.reading();
    let category = reading.category();
    let category_color = color(category.color());

    let chunks = Layout::vertical([
        Constraint::Length(1), // Status
        Constraint::Length(3), // Gauge
        Constraint::Min(4),    // Recommendation
    ])
    .split(panel_inner(frame, "Light Meter", area));

    frame.render_widget(Paragraph::new(meter_status(app.light.is_running())), chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Light Level "))
        .gauge_style(Style::default().fg(category_color))
        .percent(u16::from(reading.level))
        .label(format!("{}%", reading.level));
    frame.render_widget(gauge, chunks[1]);

    let lines = vec![
        Line::from(Span::styled(
            format!("{} {}", glyph(category.icon()), category.label()),
            Style::default().fg(category_color).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled("Recommendations", Style::default().fg(Color::Yellow).bold())),
        Line::from(reading.recommendation()),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[2]);
}

fn render_soil_meter(frame: &mut Frame, app: &App, area: Rect) {
    let reading = app.soil.reading();
    let moisture = reading.moisture_category();
    let ph = reading.ph_category();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Status
        Constraint::Length(3), // Moisture gauge
        Constraint::Length(3), // pH gauge
        Constraint::Min(4),    // Advice
    ])
    .split(panel_inner(frame, "Soil Meter", area));

    frame.render_widget(Paragraph::new(meter_status(app.soil.is_running())), chunks[0]);

    let moisture_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Moisture "))
        .gauge_style(Style::default().fg(color(moisture.color())))
        .percent(u16::from(reading.moisture))
        .label(format!("{}% · {}", reading.moisture, moisture.label()));
    frame.render_widget(moisture_gauge, chunks[1]);

    // pH spans 0-14
    let ph_ratio = (f64::from(reading.ph()) / 14.0).clamp(0.0, 1.0);
    let ph_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" pH "))
        .gauge_style(Style::default().fg(color(ph.color())))
        .ratio(ph_ratio)
        .label(format!("{:.1} · {}", reading.ph(), ph.label()));
    frame.render_widget(ph_gauge, chunks[2]);

    let lines = vec![
        Line::from(Span::styled("Recommendations", Style::default().fg(Color::Yellow).bold())),
        Line::from(vec![
            Span::styled(format!("{} ", glyph(moisture.icon())), Style::default().fg(color(moisture.color()))),
            Span::raw(reading.moisture_advice()),
        ]),
        Line::from(vec![
            Span::styled("pH ", Style::default().fg(color(ph.color()))),
            Span::raw(reading.ph_advice()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[3]);
}

/// Draw a titled panel and return the area inside it.
fn panel_inner(frame: &mut Frame, title: &str, area: Rect) -> Rect {
    let block = panel(title, BORDER_MAIN);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

// ========== Services ==========

pub(super) fn render_services_view(frame: &mut Frame, app: &App, kind: Option<DirectoryKind>) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Home), header);

    match kind {
        None => render_services_menu(frame, app, body),
        Some(DirectoryKind::Consultation) => render_experts(frame, app, body),
        Some(DirectoryKind::Gardener) => render_gardeners(frame, app, body),
    }

    let hints: &[(&str, &str)] = match kind {
        None => &[("j/k", "select"), ("Enter", "open"), ("Esc", "back"), ("q", "quit")],
        Some(_) => &[("j/k", "select"), ("Enter", "book"), ("Esc", "back"), ("q", "quit")],
    };
    render_footer(frame, app, hints, footer);
}

fn render_services_menu(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for (i, kind) in SERVICE_MENU.iter().enumerate() {
        let (icon, description) = match kind {
            DirectoryKind::Consultation => (IconKind::Video, "Video calls with certified plant experts"),
            DirectoryKind::Gardener => (IconKind::Users, "Professional gardeners for home visits"),
        };
        let marker = if i == app.service_selected { "▶ " } else { "  " };
        let mut line = Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{} ", glyph(icon)), Style::default().fg(color(Rgb::PURPLE))),
            Span::styled(kind.title(), Style::default().bold()),
        ]);
        if i == app.service_selected {
            line = line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(line);
        lines.push(Line::from(Span::styled(
            format!("    {}", description),
            Style::default().fg(SEPARATOR_COLOR),
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines).block(panel("Expert Services", color(Rgb::PURPLE))),
        area,
    );
}

fn rating_span(rating: f32, reviews: u32) -> Span<'static> {
    Span::styled(
        format!("{} {:.1} ({})", glyph(IconKind::Star), rating, reviews),
        Style::default().fg(color(Rgb::AMBER)),
    )
}

fn render_experts(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Min(5), Constraint::Length(6)]).split(area);

    let mut lines = Vec::new();
    for (i, expert) in app.experts.list().iter().enumerate() {
        let booked = app.experts.selected().map(|e| e.id) == Some(expert.id);
        let marker = if i == app.service_selected { "▶ " } else { "  " };
        let mut name_line = Line::from(vec![
            Span::raw(marker),
            Span::styled(expert.name.clone(), Style::default().bold()),
            Span::raw("  "),
            rating_span(expert.rating, expert.reviews),
            Span::styled(format!("  ₹{}", expert.price), Style::default().fg(ACCENT)),
            Span::styled(if booked { "  ✓ requested" } else { "" }, Style::default().fg(ACCENT)),
        ]);
        if i == app.service_selected {
            name_line = name_line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(name_line);
        lines.push(Line::from(Span::styled(
            format!("    {} · {}", expert.specialty, expert.availability),
            Style::default().fg(LABEL_COLOR),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", expert.languages_label()),
            Style::default().fg(SEPARATOR_COLOR),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).block(panel(DirectoryKind::Consultation.title(), color(Rgb::PURPLE))),
        chunks[0],
    );

    let features: Vec<Line> = services::CONSULTATION_FEATURES
        .iter()
        .map(|f| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(ACCENT)),
                Span::raw(*f),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(features).block(panel("What's Included", BORDER_INFO)),
        chunks[1],
    );
}

fn render_gardeners(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for (i, gardener) in app.gardeners.list().iter().enumerate() {
        let booked = app.gardeners.selected().map(|g| g.id) == Some(gardener.id);
        let marker = if i == app.service_selected { "▶ " } else { "  " };
        let mut name_line = Line::from(vec![
            Span::raw(marker),
            Span::styled(gardener.name.clone(), Style::default().bold()),
            Span::raw("  "),
            rating_span(gardener.rating, gardener.reviews),
            Span::styled(format!("  ₹{}/hour", gardener.hourly_rate), Style::default().fg(ACCENT)),
            Span::styled(if booked { "  ✓ requested" } else { "" }, Style::default().fg(ACCENT)),
        ]);
        if i == app.service_selected {
            name_line = name_line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(name_line);
        lines.push(Line::from(Span::styled(
            format!(
                "    {} · {} · {}",
                gardener.experience, gardener.location, gardener.availability
            ),
            Style::default().fg(LABEL_COLOR),
        )));

        let mut services_line = vec![Span::raw("    ")];
        for service in gardener.service_preview() {
            services_line.push(Span::styled(
                format!("{} {}  ", glyph(services::service_icon(service)), service),
                Style::default().fg(SEPARATOR_COLOR),
            ));
        }
        let hidden = gardener.services.len() - gardener.service_preview().len();
        if hidden > 0 {
            services_line.push(Span::styled(
                format!("+{} more", hidden),
                Style::default().fg(SEPARATOR_COLOR),
            ));
        }
        lines.push(Line::from(services_line));
    }
    frame.render_widget(
        Paragraph::new(lines).block(panel(DirectoryKind::Gardener.title(), color(Rgb::PURPLE))),
        area,
    );
}
