//! Application state for the TUI.

mod plants;
mod scan;
mod tools;

pub use tools::{SERVICE_MENU, TOOL_MENU};

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use verdant_core::analysis::{AnalysisOutcome, AnalysisService, MockAnalysisService, PendingAnalysis};
use verdant_core::collection::ViewLayout;
use verdant_core::home::{self, HomeAction};
use verdant_core::media::SimulatedMedia;
use verdant_core::meters::{LightReading, MeterSession, SimulatedMeter, SoilReading};
use verdant_core::onboarding::{self, Onboarding, Progress};
use verdant_core::profile::{MenuItem, MenuItemKind, Profile};
use verdant_core::results::ResultView;
use verdant_core::scan::{ScanRoute, ScanSession};
use verdant_core::services::{self, Directory, DirectoryKind, Expert, Gardener};
use verdant_core::{AnalysisResult, Config, Garden, PlantId, ScanMode};

/// Top-level tabs shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Plants,
    Tasks,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Plants, Tab::Tasks, Tab::Profile];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Plants => "My Plants",
            Tab::Tasks => "Tasks",
            Tab::Profile => "Profile",
        }
    }

    fn view(self) -> ViewMode {
        match self {
            Tab::Home => ViewMode::Home,
            Tab::Plants => ViewMode::Plants,
            Tab::Tasks => ViewMode::Tasks,
            Tab::Profile => ViewMode::Profile,
        }
    }

    fn next(self) -> Tab {
        let i = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(i + 1) % Tab::ALL.len()]
    }

    fn previous(self) -> Tab {
        let i = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(i + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Screen inside the care tools section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolView {
    #[default]
    Menu,
    LightMeter,
    SoilMeter,
}

/// Current view mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// First-run walkthrough (default)
    #[default]
    Onboarding,
    /// Dashboard with greeting, feature tiles and today's tasks
    Home,
    /// Plant collection
    Plants,
    /// One plant's details
    PlantDetail(PlantId),
    /// Today's care tasks
    Tasks,
    /// Live camera and scan session
    Scan,
    /// Finished identification or diagnosis
    Results,
    /// Light and soil meters
    Tools(ToolView),
    /// Expert consultation and gardener booking; `None` is the chooser
    Services(Option<DirectoryKind>),
    /// Settings and account menu
    Profile,
}

/// A finished scan handed over from the session.
#[derive(Debug, Clone)]
pub struct ResultScreen {
    pub view: ResultView,
    pub result: AnalysisResult,
    /// Set once "Add to My Garden" succeeded
    pub added: Option<PlantId>,
    /// Highlighted action button
    pub selected_action: usize,
    pub scroll: u16,
}

/// Application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Current view mode
    pub view_mode: ViewMode,
    /// One-line message shown in the footer until the next key
    pub status: Option<String>,
    config: Config,
    runtime: Handle,

    /// Plant collection and task list
    pub garden: Garden,
    pub profile: Profile,
    pub onboarding: Onboarding,
    /// Highlighted feature tile on the home screen
    pub home_selected: usize,

    // ========== Plants ==========
    pub plant_query: String,
    /// True while typing into the search box
    pub plant_search_active: bool,
    pub plant_layout: ViewLayout,
    pub plant_state: TableState,

    // ========== Tasks ==========
    pub task_state: TableState,

    // ========== Scan ==========
    /// Present only while the scan view is open
    pub scan: Option<ScanSession>,
    /// Dismissible capture failure
    pub scan_alert: Option<String>,
    /// Camera permission was refused; the scan view shows the blocking screen
    pub permission_blocked: bool,
    pending: Option<PendingAnalysis>,
    media: Arc<SimulatedMedia>,
    service: Arc<dyn AnalysisService>,
    outcome_tx: UnboundedSender<AnalysisOutcome>,
    outcome_rx: UnboundedReceiver<AnalysisOutcome>,
    pub result: Option<ResultScreen>,

    // ========== Tools ==========
    pub tool_selected: usize,
    pub light: MeterSession<LightReading>,
    pub soil: MeterSession<SoilReading>,
    meter: SimulatedMeter,

    // ========== Services ==========
    /// Highlighted row in the chooser or the open directory
    pub service_selected: usize,
    pub experts: Directory<Expert>,
    pub gardeners: Directory<Gardener>,

    // ========== Profile ==========
    pub profile_selected: usize,
}

impl App {
    /// Create a new app instance.
    ///
    /// Analysis calls are spawned on `runtime`.
    pub fn new(config: Config, runtime: Handle) -> Self {
        let service: Arc<dyn AnalysisService> =
            Arc::new(MockAnalysisService::new(config.analysis.latency()));
        Self::with_service(config, runtime, service)
    }

    /// Create an app backed by a specific analysis service.
    pub fn with_service(config: Config, runtime: Handle, service: Arc<dyn AnalysisService>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let interval = config.meters.sample_interval();

        let mut plant_state = TableState::default();
        plant_state.select(Some(0));
        let mut task_state = TableState::default();
        task_state.select(Some(0));

        Self {
            should_quit: false,
            view_mode: ViewMode::Onboarding,
            status: None,
            runtime,
            garden: Garden::seeded(),
            profile: Profile::from_config(&config.profile),
            onboarding: Onboarding::new(),
            home_selected: 0,
            plant_query: String::new(),
            plant_search_active: false,
            plant_layout: ViewLayout::default(),
            plant_state,
            task_state,
            scan: None,
            scan_alert: None,
            permission_blocked: false,
            pending: None,
            media: Arc::new(SimulatedMedia::from_config(&config.media)),
            service,
            outcome_tx,
            outcome_rx,
            result: None,
            tool_selected: 0,
            light: MeterSession::new(interval),
            soil: MeterSession::new(interval),
            meter: SimulatedMeter::new(),
            service_selected: 0,
            experts: Directory::new(services::experts()),
            gardeners: Directory::new(services::gardeners()),
            profile_selected: 0,
            config,
        }
    }

    /// Advance background work: deliver finished analyses and sample meters.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
        self.light.poll(now, &mut self.meter);
        self.soil.poll(now, &mut self.meter);
    }

    /// The header tab that owns the current view, if any.
    pub fn active_tab(&self) -> Option<Tab> {
        match self.view_mode {
            ViewMode::Home | ViewMode::Tools(_) | ViewMode::Services(_) => Some(Tab::Home),
            ViewMode::Plants | ViewMode::PlantDetail(_) => Some(Tab::Plants),
            ViewMode::Tasks => Some(Tab::Tasks),
            ViewMode::Profile => Some(Tab::Profile),
            ViewMode::Onboarding | ViewMode::Scan | ViewMode::Results => None,
        }
    }

    /// Profile menu flattened into selectable rows.
    pub fn profile_items(&self) -> Vec<MenuItem> {
        self.profile
            .menu()
            .into_iter()
            .flat_map(|section| section.items)
            .collect()
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        match self.view_mode {
            ViewMode::Onboarding => self.handle_onboarding_key(key),
            ViewMode::Home => self.handle_home_key(key),
            ViewMode::Plants => self.handle_plants_key(key),
            ViewMode::PlantDetail(id) => self.handle_plant_detail_key(key, id),
            ViewMode::Tasks => self.handle_tasks_key(key),
            ViewMode::Scan => self.handle_scan_key(key),
            ViewMode::Results => self.handle_results_key(key),
            ViewMode::Tools(view) => self.handle_tools_key(key, view),
            ViewMode::Services(kind) => self.handle_services_key(key, kind),
            ViewMode::Profile => self.handle_profile_key(key),
        }
    }

    /// Keys shared by every tab view. Returns true when handled.
    fn handle_tab_key(&mut self, key: KeyEvent) -> bool {
        let current = self.active_tab().unwrap_or(Tab::Home);
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.view_mode = current.next().view();
            }
            KeyCode::BackTab => {
                self.view_mode = current.previous().view();
            }
            KeyCode::Char('1') => self.view_mode = ViewMode::Home,
            KeyCode::Char('2') => self.view_mode = ViewMode::Plants,
            KeyCode::Char('3') => self.view_mode = ViewMode::Tasks,
            KeyCode::Char('4') => self.view_mode = ViewMode::Profile,
            KeyCode::Char('s') => {
                self.open_scan(ScanRoute {
                    mode: self.config.scan.default_mode,
                    ..Default::default()
                });
            }
            _ => return false,
        }
        true
    }

    // ========== Onboarding ==========

    fn handle_onboarding_key(&mut self, key: KeyEvent) {
        let progress = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => {
                self.onboarding.next()
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let index = self.onboarding.index().saturating_sub(1);
                self.onboarding.jump_to(index)
            }
            KeyCode::Esc | KeyCode::Char('s') => self.onboarding.skip(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.onboarding.jump_to(index)
            }
            _ => return,
        };
        if progress == Progress::Finished {
            tracing::info!(steps = onboarding::STEPS.len(), "Onboarding complete");
            self.view_mode = ViewMode::Home;
        }
    }

    // ========== Home ==========

    fn handle_home_key(&mut self, key: KeyEvent) {
        if self.handle_tab_key(key) {
            return;
        }
        let tiles = home::feature_tiles();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('l') => {
                self.home_selected = (self.home_selected + 1).min(tiles.len() - 1);
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Left | KeyCode::Char('h') => {
                self.home_selected = self.home_selected.saturating_sub(1);
            }
            KeyCode::Char('d') => {
                self.open_scan(ScanRoute::locked(ScanMode::Diagnose));
            }
            KeyCode::Enter => {
                if let Some(tile) = tiles.into_iter().nth(self.home_selected) {
                    tracing::debug!(tile = tile.title, "Home tile opened");
                    match tile.action {
                        HomeAction::Scan(route) => self.open_scan(route),
                        HomeAction::Tools => self.view_mode = ViewMode::Tools(ToolView::Menu),
                        HomeAction::Services => {
                            self.service_selected = 0;
                            self.view_mode = ViewMode::Services(None);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // ========== Tasks ==========

    fn handle_tasks_key(&mut self, key: KeyEvent) {
        if self.handle_tab_key(key) {
            return;
        }
        let count = self.garden.tasks.list().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.task_state, count),
            KeyCode::Up | KeyCode::Char('k') => select_previous(&mut self.task_state),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_task(),
            _ => {}
        }
    }

    fn toggle_selected_task(&mut self) {
        let Some(index) = self.task_state.selected() else {
            return;
        };
        let Some(id) = self.garden.tasks.list().get(index).map(|t| t.id) else {
            return;
        };
        match self.garden.tasks.toggle_completion(id) {
            Ok(done) => {
                tracing::debug!(task = %id, done, "Task toggled");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to toggle task");
                self.status = Some(e.to_string());
            }
        }
    }

    // ========== Profile ==========

    fn handle_profile_key(&mut self, key: KeyEvent) {
        if self.handle_tab_key(key) {
            return;
        }
        let items = self.profile_items();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.profile_selected = (self.profile_selected + 1).min(items.len().saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.profile_selected = self.profile_selected.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(item) = items.get(self.profile_selected) else {
                    return;
                };
                match item.kind {
                    MenuItemKind::Toggle => {
                        if let Some(value) = self.profile.toggle(item.id) {
                            let state = if value { "on" } else { "off" };
                            self.status = Some(format!("{} turned {}", item.title, state));
                        }
                    }
                    MenuItemKind::Navigation(route) => {
                        tracing::debug!(route, "Profile menu item opened");
                        self.status = Some(format!("{} is not available yet", item.title));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Move a table selection down, stopping at the last row.
fn select_next(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let next = state.selected().map_or(0, |i| (i + 1).min(len - 1));
    state.select(Some(next));
}

/// Move a table selection up, stopping at the first row.
fn select_previous(state: &mut TableState) {
    let previous = state.selected().map_or(0, |i| i.saturating_sub(1));
    state.select(Some(previous));
}
