use super::*;
use verdant_core::results::{self, SectionBody};
use verdant_core::scan::{self, ScanState};
use verdant_core::{FlashMode, ScanMode};

const MODES: [ScanMode; 3] = [ScanMode::Identify, ScanMode::Diagnose, ScanMode::AddPlant];

pub(super) fn render_scan_view(frame: &mut Frame, app: &App) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, None, header);

    let Some(session) = app.scan.as_ref() else {
        return;
    };

    if app.permission_blocked {
        render_permission_screen(frame, body);
        render_footer(frame, app, &[("Enter", scan::PERMISSION_ACTION), ("Esc", "back")], footer);
        return;
    }

    let mode = session.mode();
    let mode_color = color(presentation::mode_badge(mode).color);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Mode and camera controls
        Constraint::Min(7),    // Viewfinder
        Constraint::Length(5), // Photo tips
    ])
    .split(body);

    // === Controls ===
    let mut controls = Vec::new();
    if session.is_mode_locked() {
        controls.push(badge_span(&presentation::mode_badge(mode)));
    } else {
        for candidate in MODES {
            let badge = presentation::mode_badge(candidate);
            let style = if candidate == mode {
                Style::default().fg(Color::Black).bg(color(badge.color)).bold()
            } else {
                Style::default().fg(color(badge.color))
            };
            controls.push(Span::styled(format!(" {} ", badge.label), style));
            controls.push(Span::raw(" "));
        }
    }
    controls.push(Span::styled("  │ ", Style::default().fg(SEPARATOR_COLOR)));
    let flash = match session.flash() {
        FlashMode::On => Span::styled("⚡ on", Style::default().fg(color(Rgb::AMBER))),
        FlashMode::Off => Span::styled("⚡ off", Style::default().fg(SEPARATOR_COLOR)),
    };
    controls.push(flash);
    controls.push(Span::raw(format!("  ⟲ {:?}", session.facing()).to_lowercase()));
    frame.render_widget(
        Paragraph::new(Line::from(controls)).block(panel(mode.title(), mode_color)),
        chunks[0],
    );

    // === Viewfinder ===
    let lines: Vec<Line> = match session.state() {
        ScanState::Idle => vec![
            Line::from(""),
            Line::from(Span::styled("┌──────────────┐", Style::default().fg(mode_color))),
            Line::from(Span::styled("│              │", Style::default().fg(mode_color))),
            Line::from(Span::styled("└──────────────┘", Style::default().fg(mode_color))),
            Line::from(mode.guide_text()),
        ],
        ScanState::Previewing { image } => vec![
            Line::from(""),
            Line::from(Span::styled(glyph(IconKind::Camera), Style::default().fg(mode_color))),
            Line::from(image.to_string()),
            Line::from(""),
            Line::from(Span::styled("Ready to analyze", Style::default().bold())),
        ],
        ScanState::Analyzing { image, mode } => vec![
            Line::from(""),
            Line::from(Span::styled(
                results::LOADING_TITLE,
                Style::default().fg(mode_color).bold(),
            )),
            Line::from(mode.analysis_text()),
            Line::from(""),
            Line::from(Span::styled(results::LOADING_TEXT, Style::default().fg(SEPARATOR_COLOR))),
            Line::from(Span::styled(image.to_string(), Style::default().fg(SEPARATOR_COLOR))),
        ],
        ScanState::Resulted { .. } => vec![Line::from("Analysis complete")],
        ScanState::Failed { error, .. } => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Analysis failed", glyph(IconKind::AlertTriangle)),
                Style::default().fg(color(Rgb::DEEP_ORANGE)).bold(),
            )),
            Line::from(error.to_string()),
        ],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel("Camera", BORDER_MAIN)),
        chunks[1],
    );

    // === Tips ===
    let tips: Vec<Line> = scan::PHOTO_TIPS
        .iter()
        .map(|tip| Line::from(format!("{} {}", glyph(IconKind::Lightbulb), tip)))
        .collect();
    frame.render_widget(
        Paragraph::new(tips).block(panel("Photo Tips", BORDER_INFO)),
        chunks[2],
    );

    render_footer(frame, app, scan_hints(session.state()), footer);

    if let Some(alert) = &app.scan_alert {
        render_popup(
            frame,
            "Error",
            vec![
                Line::from(alert.clone()),
                Line::from(""),
                Line::from(Span::styled("Press any key", Style::default().fg(SEPARATOR_COLOR))),
            ],
            color(Rgb::DEEP_ORANGE),
        );
    }
}

fn scan_hints(state: &ScanState) -> &'static [(&'static str, &'static str)] {
    match state {
        ScanState::Idle => &[
            ("Space", "capture"),
            ("l", "library"),
            ("m", "mode"),
            ("f", "flash"),
            ("x", "flip"),
            ("Esc", "back"),
        ],
        ScanState::Previewing { .. } => &[("Enter", "analyze"), ("r", "retake"), ("Esc", "back")],
        ScanState::Analyzing { .. } => &[("r", "retake"), ("Esc", "cancel")],
        ScanState::Failed { error, .. } if error.is_retryable() => {
            &[("Enter", "retry"), ("r", "retake"), ("Esc", "back")]
        }
        ScanState::Resulted { .. } | ScanState::Failed { .. } => &[("r", "retake"), ("Esc", "back")],
    }
}

fn render_permission_screen(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(glyph(IconKind::Camera), Style::default().fg(ACCENT).bold())),
        Line::from(""),
        Line::from(Span::styled(scan::PERMISSION_TITLE, Style::default().bold())),
        Line::from(""),
        Line::from(scan::PERMISSION_TEXT),
        Line::from(""),
        Line::from(Span::styled(
            format!("[ {} ]", scan::PERMISSION_ACTION),
            Style::default().fg(Color::Black).bg(ACCENT),
        )),
    ];
    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel("Camera", BORDER_MAIN));
    frame.render_widget(card, centered_rect(60, 11, area));
}

// ========== Results ==========

pub(super) fn render_results_view(frame: &mut Frame, app: &App) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, None, header);

    let Some(screen) = app.result.as_ref() else {
        return;
    };
    let view = &screen.view;

    let chunks = Layout::vertical([
        Constraint::Length(4), // Title and confidence
        Constraint::Min(5),    // Sections
        Constraint::Length(3), // Actions
    ])
    .split(body);

    let mode_badge = presentation::mode_badge(view.mode);
    let title = vec![
        Line::from(vec![
            Span::styled(view.title, Style::default().fg(ACCENT).bold()),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", view.confidence),
                Style::default().fg(Color::Black).bg(ACCENT),
            ),
        ]),
        Line::from(vec![
            badge_span(&mode_badge),
            Span::styled(format!("  {}", view.image), Style::default().fg(SEPARATOR_COLOR)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(title).block(panel("Result", BORDER_MAIN)),
        chunks[0],
    );

    let mut lines = Vec::new();
    for section in &view.sections {
        if let Some(title) = section.title {
            lines.push(Line::from(Span::styled(title, Style::default().fg(Color::Yellow).bold())));
        }
        section_lines(&section.body, &mut lines);
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((screen.scroll, 0))
            .block(panel("Details", BORDER_INFO)),
        chunks[1],
    );

    let mut actions = Vec::new();
    for (i, action) in view.actions.iter().enumerate() {
        let done = matches!(action, results::ResultAction::AddToGarden) && screen.added.is_some();
        let label = if done { "✓ In My Garden" } else { action.label() };
        let style = if i == screen.selected_action {
            Style::default().fg(Color::Black).bg(ACCENT).bold()
        } else {
            Style::default().fg(ACCENT)
        };
        actions.push(Span::styled(format!(" {} ", label), style));
        actions.push(Span::raw("  "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(actions))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );

    render_footer(
        frame,
        app,
        &[("←/→", "select"), ("Enter", "choose"), ("j/k", "scroll"), ("Esc", "home")],
        footer,
    );
}

fn section_lines(body: &SectionBody, lines: &mut Vec<Line<'static>>) {
    match body {
        SectionBody::Text(text) => lines.push(Line::from(text.clone())),
        SectionBody::Names {
            name,
            localized_name,
            scientific_name,
        } => {
            lines.push(Line::from(Span::styled(name.clone(), Style::default().bold())));
            lines.push(Line::from(localized_name.clone()));
            lines.push(Line::from(Span::styled(
                scientific_name.clone(),
                Style::default().italic().fg(LABEL_COLOR),
            )));
        }
        SectionBody::Condition { name, severity } => {
            lines.push(Line::from(vec![
                Span::styled(name.clone(), Style::default().bold()),
                Span::raw("  "),
                badge_span(severity),
            ]));
        }
        SectionBody::Labeled(pairs) => {
            for (label, value) in pairs {
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", label), Style::default().fg(LABEL_COLOR)),
                    Span::raw(value.clone()),
                ]));
            }
        }
        SectionBody::Bullets(items) => {
            for item in items {
                lines.push(Line::from(format!("  • {}", item)));
            }
        }
        SectionBody::Numbered(items) => {
            for (i, item) in items.iter().enumerate() {
                lines.push(Line::from(format!("  {}. {}", i + 1, item)));
            }
        }
        SectionBody::Checklist(items) => {
            for item in items {
                lines.push(Line::from(vec![
                    Span::styled("  ✓ ", Style::default().fg(ACCENT)),
                    Span::raw(item.clone()),
                ]));
            }
        }
    }
}
