use super::*;

impl App {
    // ========== Plants View Methods ==========

    /// Ids of the plants matching the current search, in display order.
    pub fn visible_plants(&self) -> Vec<PlantId> {
        self.garden
            .collection
            .list(&self.plant_query)
            .iter()
            .map(|p| p.id)
            .collect()
    }

    fn selected_plant(&self) -> Option<PlantId> {
        let index = self.plant_state.selected()?;
        self.visible_plants().get(index).copied()
    }

    /// Handle keyboard input in the plants view.
    pub(super) fn handle_plants_key(&mut self, key: KeyEvent) {
        if self.plant_search_active {
            self.handle_search_key(key);
            return;
        }
        if self.handle_tab_key(key) {
            return;
        }

        let count = self.visible_plants().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.plant_state, count),
            KeyCode::Up | KeyCode::Char('k') => select_previous(&mut self.plant_state),
            KeyCode::Char('/') => {
                self.plant_search_active = true;
            }
            KeyCode::Esc => {
                if !self.plant_query.is_empty() {
                    self.plant_query.clear();
                    self.plant_state.select(Some(0));
                }
            }
            KeyCode::Char('v') => {
                self.plant_layout = self.plant_layout.toggled();
            }
            KeyCode::Char('f') => {
                if let Some(id) = self.selected_plant() {
                    self.toggle_favorite(id);
                }
            }
            KeyCode::Char('a') => {
                self.open_scan(ScanRoute::locked(ScanMode::AddPlant));
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_plant() {
                    self.view_mode = ViewMode::PlantDetail(id);
                }
            }
            _ => {}
        }
    }

    /// Typing into the search box. Enter keeps the query, Esc clears it.
    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.plant_search_active = false;
            }
            KeyCode::Esc => {
                self.plant_search_active = false;
                self.plant_query.clear();
            }
            KeyCode::Backspace => {
                self.plant_query.pop();
            }
            KeyCode::Char(c) => {
                self.plant_query.push(c);
            }
            _ => return,
        }
        let has_rows = !self.visible_plants().is_empty();
        self.plant_state.select(has_rows.then_some(0));
    }

    /// Handle keyboard input on a plant's detail screen.
    pub(super) fn handle_plant_detail_key(&mut self, key: KeyEvent, id: PlantId) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.view_mode = ViewMode::Plants;
            }
            KeyCode::Char('f') => self.toggle_favorite(id),
            KeyCode::Char('d') => {
                self.open_scan(ScanRoute::locked(ScanMode::Diagnose));
            }
            _ => {}
        }
    }

    fn toggle_favorite(&mut self, id: PlantId) {
        match self.garden.collection.toggle_favorite(id) {
            Ok(favorite) => {
                tracing::debug!(plant = %id, favorite, "Favorite toggled");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to toggle favorite");
                self.status = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{key, test_app};
    use super::*;

    fn type_query(app: &mut App, query: &str) {
        app.handle_key(key(KeyCode::Char('/')));
        for c in query.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn test_search_filters_and_clears() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Plants;

        type_query(&mut app, "snake");
        assert!(!app.plant_search_active);
        assert_eq!(app.visible_plants().len(), 1);

        // 'q' typed into the search box is text, not quit
        type_query(&mut app, "q");
        assert!(!app.should_quit);
        assert!(app.visible_plants().is_empty());
        assert_eq!(app.plant_state.selected(), None);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.visible_plants().len(), 5);
    }

    #[test]
    fn test_favorite_and_detail() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Plants;

        let first = app.visible_plants()[0];
        let before = app.garden.collection.get(first).unwrap().is_favorite;
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(app.garden.collection.get(first).unwrap().is_favorite, !before);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view_mode, ViewMode::PlantDetail(first));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view_mode, ViewMode::Plants);
    }

    #[test]
    fn test_layout_toggle_and_add_plant() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.view_mode = ViewMode::Plants;

        app.handle_key(key(KeyCode::Char('v')));
        assert_eq!(app.plant_layout, ViewLayout::List);

        app.handle_key(key(KeyCode::Char('a')));
        let session = app.scan.as_ref().unwrap();
        assert_eq!(session.mode(), ScanMode::AddPlant);
        assert!(session.is_mode_locked());
    }
}
