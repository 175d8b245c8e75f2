use super::*;
use verdant_core::analysis;
use verdant_core::media::{self, MediaError, MediaKind, MediaSource, PermissionStatus};
use verdant_core::results::{self, ResultAction};
use verdant_core::scan::{Completion, ScanError, SessionSettings};

impl App {
    // ========== Scan View Methods ==========

    /// Open the scanner with a fresh session, replacing any previous one.
    pub(super) fn open_scan(&mut self, route: ScanRoute) {
        self.close_scan();

        let preselected = route.image.clone();
        let mut session = ScanSession::with_settings(route, SessionSettings::from(&self.config));
        tracing::info!(
            session = %session.id(),
            mode = %session.mode(),
            locked = session.is_mode_locked(),
            "Scan opened"
        );
        let preselected = match preselected.map(|image| session.accept_image(image)) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Ignoring pre-selected image");
                false
            }
            None => false,
        };

        self.permission_blocked =
            self.media.permission(MediaKind::Camera) == PermissionStatus::Denied;
        self.scan_alert = None;
        self.scan = Some(session);
        self.view_mode = ViewMode::Scan;

        if preselected {
            self.after_image();
        }
    }

    /// Discard the session. A pending analysis is cancelled and its result
    /// would be stale anyway.
    pub(super) fn close_scan(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        if let Some(mut session) = self.scan.take() {
            session.abandon();
            tracing::debug!(session = %session.id(), "Scan closed");
        }
    }

    fn leave_scan(&mut self) {
        self.close_scan();
        self.view_mode = ViewMode::Home;
    }

    /// Handle keyboard input in the scan view.
    pub(super) fn handle_scan_key(&mut self, key: KeyEvent) {
        // Any key dismisses the alert
        if self.scan_alert.take().is_some() {
            return;
        }

        if self.permission_blocked {
            match key.code {
                KeyCode::Enter => self.request_camera_permission(),
                KeyCode::Esc | KeyCode::Char('q') => self.leave_scan(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.leave_scan(),
            KeyCode::Char(' ') | KeyCode::Char('c') => self.capture(),
            KeyCode::Char('l') => self.pick_from_library(),
            KeyCode::Enter | KeyCode::Char('a') => self.start_analysis(),
            KeyCode::Char('r') => self.retake(),
            KeyCode::Char('m') => self.cycle_mode(),
            KeyCode::Char('f') => {
                if let Some(Err(e)) = self.scan.as_mut().map(ScanSession::toggle_flash) {
                    self.status = Some(e.to_string());
                }
            }
            KeyCode::Char('x') => {
                if let Some(Err(e)) = self.scan.as_mut().map(ScanSession::toggle_facing) {
                    self.status = Some(e.to_string());
                }
            }
            _ => {}
        }
    }

    fn capture(&mut self) {
        let Some(session) = self.scan.as_mut() else {
            return;
        };
        match self.runtime.block_on(session.capture(self.media.as_ref())) {
            Ok(image) => {
                tracing::info!(image = %image, "Photo captured");
                self.after_image();
            }
            Err(ScanError::Media(MediaError::PermissionDenied(_))) => {
                self.permission_blocked = true;
            }
            Err(ScanError::Media(e @ MediaError::Capture(_))) => {
                self.scan_alert = Some(e.to_string());
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn pick_from_library(&mut self) {
        let dir = self.config.media.library_dir();
        match media::library_images(&dir) {
            Ok(images) => self.media.set_library(images),
            Err(e) => {
                tracing::warn!(error = %e, dir = %dir.display(), "Failed to list photo library");
                self.media.set_library(Vec::new());
            }
        }

        let Some(session) = self.scan.as_mut() else {
            return;
        };
        match self.runtime.block_on(session.pick_from_library(self.media.as_ref())) {
            Ok(Some(image)) => {
                tracing::info!(image = %image, "Photo picked from library");
                self.after_image();
            }
            Ok(None) => {
                self.status = Some(format!("No photos in {}", dir.display()));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// An image is held; analyze right away when configured to.
    fn after_image(&mut self) {
        if self.config.scan.auto_analyze {
            self.start_analysis();
        }
    }

    fn start_analysis(&mut self) {
        let Some(session) = self.scan.as_mut() else {
            return;
        };
        // The trigger is disabled while a call is in flight
        if session.is_analyzing() {
            return;
        }
        match session.begin_analysis() {
            Ok(ticket) => {
                self.pending = Some(analysis::spawn_analysis(
                    &self.runtime,
                    Arc::clone(&self.service),
                    ticket,
                    self.config.analysis.watchdog(),
                    self.outcome_tx.clone(),
                ));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn retake(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        if let Some(session) = self.scan.as_mut() {
            session.retake();
        }
    }

    fn cycle_mode(&mut self) {
        let Some(session) = self.scan.as_mut() else {
            return;
        };
        let next = match session.mode() {
            ScanMode::Identify => ScanMode::Diagnose,
            ScanMode::Diagnose => ScanMode::AddPlant,
            ScanMode::AddPlant => ScanMode::Identify,
        };
        if let Err(e) = session.set_mode(next) {
            self.status = Some(e.to_string());
        }
    }

    fn request_camera_permission(&mut self) {
        let status = self
            .runtime
            .block_on(self.media.request_permission(MediaKind::Camera));
        if status == PermissionStatus::Granted {
            self.permission_blocked = false;
            self.status = Some("Camera access granted".to_string());
        } else {
            self.status = Some("Camera access is still denied".to_string());
        }
    }

    /// Deliver a finished analysis to the session that asked for it.
    pub(super) fn apply_outcome(&mut self, outcome: AnalysisOutcome) {
        let Some(session) = self.scan.as_mut() else {
            tracing::debug!(
                generation = outcome.ticket.generation(),
                "Analysis finished after scan closed"
            );
            return;
        };
        if session.complete(&outcome.ticket, outcome.result) == Completion::Stale {
            return;
        }
        self.pending = None;

        // A failure stays on the scan view with retry and retake available
        let finished = session
            .result()
            .map(|(image, mode, result)| (results::present(image, mode, result), result.clone()));
        if let Some((view, result)) = finished {
            self.show_results(view, result);
        }
    }

    fn show_results(&mut self, view: ResultView, result: AnalysisResult) {
        self.close_scan();
        self.result = Some(ResultScreen {
            view,
            result,
            added: None,
            selected_action: 0,
            scroll: 0,
        });
        self.view_mode = ViewMode::Results;
    }

    // ========== Results View Methods ==========

    /// Handle keyboard input in the results view.
    pub(super) fn handle_results_key(&mut self, key: KeyEvent) {
        let Some(screen) = self.result.as_mut() else {
            self.view_mode = ViewMode::Home;
            return;
        };
        let action_count = screen.view.actions.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.result = None;
                self.view_mode = ViewMode::Home;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                screen.scroll = screen.scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                screen.scroll = screen.scroll.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                screen.selected_action = (screen.selected_action + 1) % action_count.max(1);
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                screen.selected_action =
                    (screen.selected_action + action_count.max(1) - 1) % action_count.max(1);
            }
            KeyCode::Enter => {
                if let Some(action) = screen.view.actions.get(screen.selected_action).copied() {
                    self.run_result_action(action);
                }
            }
            KeyCode::Char('a') => self.run_result_action(ResultAction::AddToGarden),
            KeyCode::Char('s') | KeyCode::Char('n') => {
                self.run_result_action(ResultAction::ScanAnother)
            }
            _ => {}
        }
    }

    fn run_result_action(&mut self, action: ResultAction) {
        let Some(screen) = self.result.as_mut() else {
            return;
        };
        if !screen.view.has_action(action) {
            return;
        }
        match action {
            ResultAction::AddToGarden => {
                if screen.added.is_some() {
                    self.status = Some("Already in My Garden".to_string());
                    return;
                }
                if let Some(id) = self.garden.add_from_result(&screen.view.image, &screen.result) {
                    screen.added = Some(id);
                    let name = self
                        .garden
                        .collection
                        .get(id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    tracing::info!(plant = %id, name = %name, "Added scanned plant to garden");
                    self.status = Some(format!("Added {} to My Garden", name));
                }
            }
            ResultAction::ScanAnother => {
                let mode = screen.view.mode;
                self.result = None;
                self.open_scan(ScanRoute {
                    mode,
                    ..Default::default()
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{key, test_app, tick_until};
    use super::*;
    use verdant_core::scan::ScanState;

    #[test]
    fn test_identify_flow_adds_plant() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);

        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.view_mode, ViewMode::Scan);
        app.handle_key(key(KeyCode::Char(' ')));

        tick_until(&mut app, |app| app.view_mode == ViewMode::Results);
        assert!(app.scan.is_none());
        let screen = app.result.as_ref().unwrap();
        assert_eq!(screen.view.title, "Plant Identified");

        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.garden.collection.len(), 6);
        assert_eq!(app.status.as_deref(), Some("Added Fiddle Leaf Fig to My Garden"));

        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.garden.collection.len(), 6);
    }

    #[test]
    fn test_diagnosis_has_no_add_action() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('c')));
        tick_until(&mut app, |app| app.view_mode == ViewMode::Results);

        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.garden.collection.len(), 5);

        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.view_mode, ViewMode::Scan);
        assert_eq!(app.scan.as_ref().unwrap().mode(), ScanMode::Diagnose);
    }

    #[test]
    fn test_retake_discards_pending_result() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut config = Config::default();
        config.analysis.latency_ms = 50;
        let mut app = App::new(config, runtime.handle().clone());
        app.view_mode = ViewMode::Home;

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.scan.as_ref().unwrap().is_analyzing());

        app.handle_key(key(KeyCode::Char('r')));
        std::thread::sleep(std::time::Duration::from_millis(150));
        app.tick(Instant::now());

        assert_eq!(app.view_mode, ViewMode::Scan);
        assert_eq!(app.scan.as_ref().unwrap().state(), &ScanState::Idle);
    }

    #[test]
    fn test_leaving_scan_cancels_analysis() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut config = Config::default();
        config.analysis.latency_ms = 50;
        let mut app = App::new(config, runtime.handle().clone());
        app.view_mode = ViewMode::Home;

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view_mode, ViewMode::Home);

        std::thread::sleep(std::time::Duration::from_millis(150));
        app.tick(Instant::now());
        assert_eq!(app.view_mode, ViewMode::Home);
        assert!(app.result.is_none());
    }

    #[test]
    fn test_manual_analyze_when_auto_off() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut config = Config::default();
        config.analysis.latency_ms = 0;
        config.scan.auto_analyze = false;
        let mut app = App::new(config, runtime.handle().clone());
        app.view_mode = ViewMode::Home;

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(matches!(
            app.scan.as_ref().unwrap().state(),
            ScanState::Previewing { .. }
        ));

        app.handle_key(key(KeyCode::Enter));
        tick_until(&mut app, |app| app.view_mode == ViewMode::Results);
    }

    #[test]
    fn test_denied_camera_blocks_until_granted() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut config = Config::default();
        config.media.camera_permission = PermissionStatus::Denied;
        let mut app = App::new(config, runtime.handle().clone());
        app.view_mode = ViewMode::Home;

        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.permission_blocked);

        // Capture is unreachable behind the blocking screen
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.scan.as_ref().unwrap().state(), &ScanState::Idle);

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.permission_blocked);
    }

    #[test]
    fn test_denied_camera_stays_blocked() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut config = Config::default();
        config.media.camera_permission = PermissionStatus::Denied;
        config.media.grant_on_request = false;
        let mut app = App::new(config, runtime.handle().clone());
        app.view_mode = ViewMode::Home;

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.permission_blocked);
        assert_eq!(app.status.as_deref(), Some("Camera access is still denied"));
    }

    #[test]
    fn test_capture_failure_shows_dismissible_alert() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);
        app.media.fail_next_capture("camera busy");

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.scan_alert.as_deref(), Some("capture failed: camera busy"));
        assert_eq!(app.scan.as_ref().unwrap().state(), &ScanState::Idle);

        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.scan_alert.is_none());
        assert_eq!(app.view_mode, ViewMode::Scan);
    }

    #[test]
    fn test_route_image_goes_straight_to_analysis() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);

        let mut params = std::collections::HashMap::new();
        params.insert("imageUri".to_string(), "content://media/7.jpg".to_string());
        app.open_scan(ScanRoute::from_params(&params));
        assert!(app.scan.as_ref().unwrap().is_analyzing());

        tick_until(&mut app, |app| app.view_mode == ViewMode::Results);
        let screen = app.result.as_ref().unwrap();
        assert_eq!(screen.view.image.to_string(), "content://media/7.jpg");
    }

    #[test]
    fn test_locked_mode_rejects_cycling() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&runtime);

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.scan.as_ref().unwrap().mode(), ScanMode::Diagnose);
        assert_eq!(app.status.as_deref(), Some("scan mode is fixed for this session"));
    }
}
