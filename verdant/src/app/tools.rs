use super::*;

/// Entries of the care tools chooser.
pub const TOOL_MENU: [(ToolView, &str, &str); 2] = [
    (ToolView::LightMeter, "Light Meter", "Measure light intensity for your plants"),
    (ToolView::SoilMeter, "Soil Meter", "Check soil moisture and pH levels"),
];

/// Entries of the expert services chooser.
pub const SERVICE_MENU: [DirectoryKind; 2] = [DirectoryKind::Consultation, DirectoryKind::Gardener];

impl App {
    // ========== Tools View Methods ==========

    /// Handle keyboard input in the care tools section.
    pub(super) fn handle_tools_key(&mut self, key: KeyEvent, view: ToolView) {
        match (view, key.code) {
            (_, KeyCode::Char('q')) => {
                self.should_quit = true;
            }
            (ToolView::Menu, KeyCode::Esc) => {
                self.view_mode = ViewMode::Home;
            }
            (ToolView::Menu, KeyCode::Down | KeyCode::Char('j')) => {
                self.tool_selected = (self.tool_selected + 1).min(TOOL_MENU.len() - 1);
            }
            (ToolView::Menu, KeyCode::Up | KeyCode::Char('k')) => {
                self.tool_selected = self.tool_selected.saturating_sub(1);
            }
            (ToolView::Menu, KeyCode::Enter) => {
                let (tool, _, _) = TOOL_MENU[self.tool_selected.min(TOOL_MENU.len() - 1)];
                self.view_mode = ViewMode::Tools(tool);
            }
            (ToolView::LightMeter, KeyCode::Char(' ') | KeyCode::Enter) => {
                let running = self.light.toggle();
                tracing::info!(running, "Light meter toggled");
            }
            (ToolView::SoilMeter, KeyCode::Char(' ') | KeyCode::Enter) => {
                let running = self.soil.toggle();
                tracing::info!(running, "Soil meter toggled");
            }
            (ToolView::LightMeter | ToolView::SoilMeter, KeyCode::Esc) => {
                self.stop_meters();
                self.view_mode = ViewMode::Tools(ToolView::Menu);
            }
            _ => {}
        }
    }

    /// Meters only run while their screen is open.
    fn stop_meters(&mut self) {
        if self.light.is_running() {
            self.light.toggle();
        }
        if self.soil.is_running() {
            self.soil.toggle();
        }
    }

    // ========== Services View Methods ==========

    fn directory_len(&self, kind: DirectoryKind) -> usize {
        match kind {
            DirectoryKind::Consultation => self.experts.list().len(),
            DirectoryKind::Gardener => self.gardeners.list().len(),
        }
    }

    /// Handle keyboard input in the expert services section.
    pub(super) fn handle_services_key(&mut self, key: KeyEvent, kind: Option<DirectoryKind>) {
        let len = match kind {
            Some(kind) => self.directory_len(kind),
            None => SERVICE_MENU.len(),
        };
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.service_selected = 0;
                self.view_mode = match kind {
                    Some(_) => ViewMode::Services(None),
                    None => ViewMode::Home,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.service_selected = (self.service_selected + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.service_selected = self.service_selected.saturating_sub(1);
            }
            KeyCode::Enter => match kind {
                None => {
                    let chosen = SERVICE_MENU[self.service_selected.min(SERVICE_MENU.len() - 1)];
                    self.service_selected = 0;
                    self.view_mode = ViewMode::Services(Some(chosen));
                }
                Some(kind) => self.book(kind),
            },
            _ => {}
        }
    }

    /// Record booking intent for the highlighted provider.
    fn book(&mut self, kind: DirectoryKind) {
        let index = self.service_selected;
        let message = match kind {
            DirectoryKind::Consultation => self
                .experts
                .select(index)
                .map(|e| format!("Consultation requested with {} (₹{})", e.name, e.price)),
            DirectoryKind::Gardener => self
                .gardeners
                .select(index)
                .map(|g| format!("Visit requested from {} (₹{}/hour)", g.name, g.hourly_rate)),
        };
        if let Some(message) = message {
            self.status = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{key, test_app};
    use super::*;

    #[test]
    fn test_light_meter_samples_while_running() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Tools(ToolView::Menu);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view_mode, ViewMode::Tools(ToolView::LightMeter));

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.light.is_running());
        app.tick(Instant::now());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.light.is_running());
        assert_eq!(app.view_mode, ViewMode::Tools(ToolView::Menu));
    }

    #[test]
    fn test_soil_meter_from_menu() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Tools(ToolView::Menu);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view_mode, ViewMode::Tools(ToolView::SoilMeter));

        app.handle_key(key(KeyCode::Enter));
        assert!(app.soil.is_running());
        assert!(!app.light.is_running());
    }

    #[test]
    fn test_book_gardener() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Services(None);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view_mode, ViewMode::Services(Some(DirectoryKind::Gardener)));

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        let booked = app.gardeners.selected().unwrap();
        assert_eq!(booked.id, app.gardeners.list()[1].id);
        assert!(app.status.as_deref().unwrap().starts_with("Visit requested from"));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view_mode, ViewMode::Services(None));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view_mode, ViewMode::Home);
    }

    #[test]
    fn test_book_expert() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Services(Some(DirectoryKind::Consultation));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.experts.selected(), app.experts.list().first());
        assert!(app.status.as_deref().unwrap().starts_with("Consultation requested with"));
    }
}
