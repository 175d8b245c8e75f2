use super::*;
use verdant_core::collection::ViewLayout;
use verdant_core::{Plant, PlantId};

/// Cards per row in the grid layout.
const GRID_COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 6;

pub(super) fn render_plants_view(frame: &mut Frame, app: &mut App) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Plants), header);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Search
        Constraint::Min(3),    // Collection
    ])
    .split(body);

    render_search_bar(frame, app, chunks[0]);

    match app.plant_layout {
        ViewLayout::Grid => render_plant_grid(frame, app, chunks[1]),
        ViewLayout::List => render_plant_table(frame, app, chunks[1]),
    }

    let hints: &[(&str, &str)] = if app.plant_search_active {
        &[("Enter", "done"), ("Esc", "clear")]
    } else {
        &[
            ("/", "search"),
            ("Enter", "details"),
            ("f", "favorite"),
            ("v", "grid/list"),
            ("a", "add plant"),
            ("Tab", "next tab"),
            ("q", "quit"),
        ]
    };
    render_footer(frame, app, hints, footer);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.garden.collection.stats();
    let (text, style) = if app.plant_query.is_empty() && !app.plant_search_active {
        ("Search plants...".to_string(), Style::default().fg(SEPARATOR_COLOR))
    } else {
        (app.plant_query.clone(), Style::default())
    };
    let mut spans = vec![Span::raw("⌕ "), Span::styled(text, style)];
    if app.plant_search_active {
        spans.push(Span::styled("▏", Style::default().fg(ACCENT)));
    }
    let title = format!(
        "My Plants ({}) · {} need water today",
        stats.total, stats.need_water_today
    );
    let border = if app.plant_search_active {
        ACCENT
    } else {
        BORDER_MAIN
    };
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(&title, border)),
        area,
    );
}

fn favorite_span(plant: &Plant) -> Span<'static> {
    if plant.is_favorite {
        Span::styled("♥", Style::default().fg(color(Rgb::PINK)))
    } else {
        Span::styled("♡", Style::default().fg(SEPARATOR_COLOR))
    }
}

fn render_plant_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let header_cells = ["", "Name", "Species", "Health", "Water", "Light"]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).bold()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .garden
        .collection
        .list(&app.plant_query)
        .into_iter()
        .map(|plant| {
            let water_style = if plant.needs_water_today() {
                Style::default().fg(color(Rgb::BLUE)).bold()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(favorite_span(plant)),
                Cell::from(plant.name.clone()),
                Cell::from(plant.species.clone()).style(Style::default().italic()),
                Cell::from(badge_span(&presentation::health_badge(plant.health))),
                Cell::from(plant.next_watering.clone()).style(water_style),
                Cell::from(badge_span(&presentation::light_badge(plant.light_level))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(panel("Collection", BORDER_INFO))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED).fg(ACCENT))
    .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut app.plant_state);
}

fn render_plant_grid(frame: &mut Frame, app: &App, area: Rect) {
    let plants = app.garden.collection.list(&app.plant_query);
    let block = panel("Collection", BORDER_INFO);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if plants.is_empty() {
        let empty = Paragraph::new("No plants match your search")
            .alignment(Alignment::Center)
            .style(Style::default().fg(SEPARATOR_COLOR));
        frame.render_widget(empty, inner);
        return;
    }

    let selected = app.plant_state.selected().unwrap_or(0);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    // Scroll so the selected card's row stays on screen
    let first_row = (selected / GRID_COLUMNS).saturating_sub(visible_rows - 1);

    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(inner);
    for (r, row_area) in row_areas.iter().enumerate() {
        let col_areas =
            Layout::horizontal(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row_area);
        for (c, card_area) in col_areas.iter().enumerate() {
            let index = (first_row + r) * GRID_COLUMNS + c;
            let Some(plant) = plants.get(index) else {
                continue;
            };
            render_plant_card(frame, plant, index == selected, *card_area);
        }
    }
}

fn render_plant_card(frame: &mut Frame, plant: &Plant, selected: bool, area: Rect) {
    let border = if selected { ACCENT } else { SEPARATOR_COLOR };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(Style::default().fg(border));

    let lines = vec![
        Line::from(vec![
            favorite_span(plant),
            Span::raw(" "),
            Span::styled(plant.name.clone(), Style::default().bold()),
        ]),
        Line::from(Span::styled(plant.localized_name.clone(), Style::default().fg(LABEL_COLOR))),
        Line::from(vec![
            badge_span(&presentation::health_badge(plant.health)),
            Span::raw("  "),
            badge_span(&presentation::light_badge(plant.light_level)),
        ]),
        Line::from(Span::styled(
            format!("{} {}", glyph(IconKind::Droplets), plant.next_watering),
            if plant.needs_water_today() {
                Style::default().fg(color(Rgb::BLUE)).bold()
            } else {
                Style::default().fg(SEPARATOR_COLOR)
            },
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(super) fn render_plant_detail_view(frame: &mut Frame, app: &App, id: PlantId) {
    let (header, body, footer) = screen_chunks(frame.area());
    render_tab_header(frame, Some(Tab::Plants), header);

    let plant = match app.garden.collection.get(id) {
        Ok(plant) => plant,
        Err(e) => {
            let missing = Paragraph::new(e.to_string()).block(panel("Plant", BORDER_MAIN));
            frame.render_widget(missing, body);
            render_footer(frame, app, &[("Esc", "back")], footer);
            return;
        }
    };

    let chunks = Layout::vertical([Constraint::Length(11), Constraint::Min(3)]).split(body);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(LABEL_COLOR));
    let lines = vec![
        Line::from(vec![
            favorite_span(plant),
            Span::raw(" "),
            Span::styled(plant.name.clone(), Style::default().bold()),
        ]),
        Line::from(plant.localized_name.clone()),
        Line::from(Span::styled(plant.species.clone(), Style::default().italic())),
        Line::from(""),
        Line::from(vec![label("Health:        "), badge_span(&presentation::health_badge(plant.health))]),
        Line::from(vec![label("Light:         "), badge_span(&presentation::light_badge(plant.light_level))]),
        Line::from(vec![label("Next watering: "), Span::raw(plant.next_watering.clone())]),
        Line::from(vec![label("Last watered:  "), Span::raw(plant.last_watered.clone())]),
        Line::from(vec![
            label("Care streak:   "),
            Span::raw(format!("{} days", plant.care_streak_days)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(panel(&plant.name, BORDER_MAIN)),
        chunks[0],
    );

    let rows: Vec<Row> = app
        .garden
        .tasks
        .for_plant(id)
        .into_iter()
        .map(|task| {
            let status = if task.completed {
                presentation::done_badge()
            } else {
                presentation::priority_badge(task.priority)
            };
            Row::new(vec![
                Cell::from(task.time_label()),
                Cell::from(badge_span(&presentation::task_kind_badge(task.kind))),
                Cell::from(badge_span(&status)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Length(9), Constraint::Length(12), Constraint::Fill(1)],
    )
    .block(panel("Care Tasks", BORDER_INFO));
    frame.render_widget(table, chunks[1]);

    render_footer(
        frame,
        app,
        &[("Esc", "back"), ("f", "favorite"), ("d", "diagnose"), ("q", "quit")],
        footer,
    );
}
