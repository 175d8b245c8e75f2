//! Scan session state machine
//!
//! One [`ScanSession`] backs the scan screen. It moves through:
//!
//! ```text
//! Idle ──capture/pick──▶ Previewing ──analyze──▶ Analyzing ──ok──▶ Resulted
//!  ▲                         │                      │
//!  └────────retake───────────┴──────────────────────┤──err──▶ Failed ──retry──▶ Analyzing
//! ```
//!
//! Retake and abandon bump a generation counter. An analysis carries the
//! generation it started under in its [`AnalysisTicket`]; a completion whose
//! ticket no longer matches is dropped as stale, so a slow result can never
//! land on a session the user already left.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::analysis::{self, AnalysisError, AnalysisService};
use crate::config::Config;
use crate::media::{CaptureOptions, MediaError, MediaSource, PickOutcome, PickerOptions};
use crate::types::{AnalysisResult, CameraFacing, FlashMode, ImageRef, ScanMode};

/// Copy for the camera permission screen.
pub const PERMISSION_TITLE: &str = "Camera Access Required";
pub const PERMISSION_TEXT: &str = "We need camera access to identify plants and diagnose diseases";
pub const PERMISSION_ACTION: &str = "Grant Permission";

/// Tips shown over the live camera.
pub const PHOTO_TIPS: [&str; 3] = [
    "Use natural lighting",
    "Keep the plant in focus",
    "Avoid shadows and reflections",
];

/// Errors from driving a scan session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("cannot {op} while {state}")]
    InvalidTransition {
        op: &'static str,
        state: &'static str,
    },

    /// The analyze trigger is disabled while a call is in flight
    #[error("analysis already in progress")]
    AnalysisAlreadyInProgress,

    #[error("flash is not supported on this device")]
    FlashUnsupported,

    /// The mode was fixed by the screen that opened the scanner
    #[error("scan mode is fixed for this session")]
    ModeLocked,

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Where a session currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    Previewing {
        image: ImageRef,
    },
    Analyzing {
        image: ImageRef,
        mode: ScanMode,
    },
    Resulted {
        image: ImageRef,
        mode: ScanMode,
        result: AnalysisResult,
    },
    Failed {
        image: ImageRef,
        mode: ScanMode,
        error: AnalysisError,
    },
}

impl ScanState {
    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Previewing { .. } => "previewing",
            ScanState::Analyzing { .. } => "analyzing",
            ScanState::Resulted { .. } => "resulted",
            ScanState::Failed { .. } => "failed",
        }
    }

    /// The held image, if any.
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            ScanState::Idle => None,
            ScanState::Previewing { image }
            | ScanState::Analyzing { image, .. }
            | ScanState::Resulted { image, .. }
            | ScanState::Failed { image, .. } => Some(image),
        }
    }
}

/// Navigation parameters for opening the scanner, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanRoute {
    pub mode: ScanMode,
    /// True when the caller chose the mode; the selector is hidden then
    pub mode_locked: bool,
    /// Pre-selected image (`imageUri`), passed through untouched
    pub image: Option<ImageRef>,
}

impl ScanRoute {
    /// Read `mode` and `imageUri` from a string-keyed parameter map.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let raw_mode = params
            .get("mode")
            .map(|m| m.trim())
            .filter(|m| !m.is_empty());
        Self {
            mode: ScanMode::from_param(raw_mode),
            mode_locked: raw_mode.is_some(),
            image: params
                .get("imageUri")
                .filter(|uri| !uri.is_empty())
                .map(ImageRef::new),
        }
    }

    /// Open with a fixed mode, as the home tiles do.
    pub fn locked(mode: ScanMode) -> Self {
        Self {
            mode,
            mode_locked: true,
            image: None,
        }
    }
}

/// Host capabilities that shape a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub flash_supported: bool,
    pub capture_quality: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            flash_supported: true,
            capture_quality: 0.8,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            flash_supported: config.media.flash_supported,
            capture_quality: config.media.capture_quality,
        }
    }
}

/// Proof that an analysis was started, tied to one session generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    session_id: Uuid,
    generation: u64,
    image: ImageRef,
    mode: ScanMode,
}

impl AnalysisTicket {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }
}

/// What happened to a delivered analysis outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The session was retaken or abandoned since the ticket was issued
    Stale,
}

/// The single active scan.
#[derive(Debug, Clone)]
pub struct ScanSession {
    id: Uuid,
    mode: ScanMode,
    mode_locked: bool,
    facing: CameraFacing,
    flash: FlashMode,
    state: ScanState,
    generation: u64,
    settings: SessionSettings,
}

impl ScanSession {
    /// An unlocked session in `mode` with default settings.
    pub fn new(mode: ScanMode) -> Self {
        Self::with_settings(
            ScanRoute {
                mode,
                ..Default::default()
            },
            SessionSettings::default(),
        )
    }

    /// Open a session from navigation parameters. Sessions always start
    /// `Idle`; a route image is handed over with [`ScanSession::accept_image`].
    pub fn with_settings(route: ScanRoute, settings: SessionSettings) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, mode = %route.mode, locked = route.mode_locked, "Scan session opened");
        Self {
            id,
            mode: route.mode,
            mode_locked: route.mode_locked,
            facing: CameraFacing::default(),
            flash: FlashMode::default(),
            state: ScanState::Idle,
            generation: 0,
            settings,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn is_mode_locked(&self) -> bool {
        self.mode_locked
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.state.image()
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, ScanState::Analyzing { .. })
    }

    /// The finished result, when in `Resulted`.
    pub fn result(&self) -> Option<(&ImageRef, ScanMode, &AnalysisResult)> {
        match &self.state {
            ScanState::Resulted {
                image,
                mode,
                result,
            } => Some((image, *mode, result)),
            _ => None,
        }
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            quality: self.settings.capture_quality,
            base64: false,
            facing: self.facing,
            flash: self.flash,
        }
    }

    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            quality: self.settings.capture_quality,
            ..Default::default()
        }
    }

    fn invalid(&self, op: &'static str) -> ScanError {
        ScanError::InvalidTransition {
            op,
            state: self.state.name(),
        }
    }

    fn transition(&mut self, next: ScanState) {
        tracing::debug!(
            session = %self.id,
            from = self.state.name(),
            to = next.name(),
            generation = self.generation,
            "Scan state transition"
        );
        self.state = next;
    }

    /// Switch mode from the on-screen selector.
    pub fn set_mode(&mut self, mode: ScanMode) -> Result<(), ScanError> {
        if self.mode_locked {
            return Err(ScanError::ModeLocked);
        }
        if self.state != ScanState::Idle {
            return Err(self.invalid("change mode"));
        }
        self.mode = mode;
        Ok(())
    }

    pub fn toggle_flash(&mut self) -> Result<FlashMode, ScanError> {
        if !matches!(self.state, ScanState::Idle | ScanState::Previewing { .. }) {
            return Err(self.invalid("toggle flash"));
        }
        if !self.settings.flash_supported {
            return Err(ScanError::FlashUnsupported);
        }
        self.flash = self.flash.toggled();
        Ok(self.flash)
    }

    pub fn toggle_facing(&mut self) -> Result<CameraFacing, ScanError> {
        if !matches!(self.state, ScanState::Idle | ScanState::Previewing { .. }) {
            return Err(self.invalid("switch camera"));
        }
        self.facing = self.facing.toggled();
        Ok(self.facing)
    }

    /// Take a photo and hold it for preview.
    ///
    /// On failure the session stays `Idle`.
    pub async fn capture(&mut self, media: &dyn MediaSource) -> Result<ImageRef, ScanError> {
        if self.state != ScanState::Idle {
            return Err(self.invalid("capture"));
        }
        let image = media.capture(&self.capture_options()).await.map_err(|e| {
            tracing::warn!(session = %self.id, error = %e, "Capture failed");
            e
        })?;
        self.transition(ScanState::Previewing {
            image: image.clone(),
        });
        Ok(image)
    }

    /// Choose a photo from the library. `Ok(None)` when the user cancels.
    pub async fn pick_from_library(
        &mut self,
        media: &dyn MediaSource,
    ) -> Result<Option<ImageRef>, ScanError> {
        if self.state != ScanState::Idle {
            return Err(self.invalid("pick from library"));
        }
        match media.pick_from_library(&self.picker_options()).await {
            Ok(PickOutcome::Selected(image)) => {
                self.transition(ScanState::Previewing {
                    image: image.clone(),
                });
                Ok(Some(image))
            }
            Ok(PickOutcome::Cancelled) => {
                tracing::debug!(session = %self.id, "Library selection cancelled");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "Library selection failed");
                Err(e.into())
            }
        }
    }

    /// Hold an image obtained some other way (e.g. a navigation parameter).
    pub fn accept_image(&mut self, image: ImageRef) -> Result<(), ScanError> {
        if self.state != ScanState::Idle {
            return Err(self.invalid("accept an image"));
        }
        self.transition(ScanState::Previewing { image });
        Ok(())
    }

    /// Enter `Analyzing` from `Previewing` or retry from `Failed`.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, ScanError> {
        let image = match &self.state {
            ScanState::Previewing { image } | ScanState::Failed { image, .. } => image.clone(),
            ScanState::Analyzing { .. } => return Err(ScanError::AnalysisAlreadyInProgress),
            _ => return Err(self.invalid("analyze")),
        };
        let ticket = AnalysisTicket {
            session_id: self.id,
            generation: self.generation,
            image: image.clone(),
            mode: self.mode,
        };
        self.transition(ScanState::Analyzing {
            image,
            mode: self.mode,
        });
        tracing::info!(session = %self.id, mode = %self.mode, generation = self.generation, "Analysis started");
        Ok(ticket)
    }

    /// Apply an analysis outcome if its ticket is still current.
    pub fn complete(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Completion {
        let current = ticket.session_id == self.id
            && ticket.generation == self.generation
            && self.is_analyzing();
        if !current {
            tracing::debug!(
                session = %self.id,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "Dropping stale analysis result"
            );
            return Completion::Stale;
        }

        let image = ticket.image.clone();
        let mode = ticket.mode;
        match outcome {
            Ok(result) => {
                tracing::info!(session = %self.id, mode = %mode, confidence = result.confidence().get(), "Analysis finished");
                self.transition(ScanState::Resulted {
                    image,
                    mode,
                    result,
                });
            }
            Err(error) => {
                tracing::warn!(session = %self.id, mode = %mode, error = %error, "Analysis failed");
                self.transition(ScanState::Failed { image, mode, error });
            }
        }
        Completion::Applied
    }

    /// Drop the held image and invalidate any pending analysis.
    ///
    /// Returns false when already `Idle`.
    pub fn retake(&mut self) -> bool {
        if self.state == ScanState::Idle {
            return false;
        }
        self.generation += 1;
        self.transition(ScanState::Idle);
        true
    }

    /// Leave the scan screen.
    pub fn abandon(&mut self) {
        self.generation += 1;
        if self.state != ScanState::Idle {
            self.transition(ScanState::Idle);
        }
    }

    /// Run one analysis to completion on the current task.
    pub async fn analyze(
        &mut self,
        service: &dyn AnalysisService,
        watchdog: Option<Duration>,
    ) -> Result<AnalysisResult, ScanError> {
        let ticket = self.begin_analysis()?;
        let cancel = CancellationToken::new();
        let outcome = analysis::run_analysis(service, &ticket, watchdog, &cancel).await;
        self.complete(&ticket, outcome.clone());
        Ok(outcome?)
    }
}

impl ScanMode {
    /// Header shown on the live camera.
    pub fn title(&self) -> &'static str {
        match self {
            ScanMode::Identify => "Plant Scanner",
            ScanMode::Diagnose => "Disease Diagnosis",
            ScanMode::AddPlant => "Add Plant",
        }
    }

    /// Framing hint inside the viewfinder.
    pub fn guide_text(&self) -> &'static str {
        match self {
            ScanMode::Identify => "Center the plant in the frame",
            ScanMode::Diagnose => "Focus on affected leaves or problem areas",
            ScanMode::AddPlant => "Center the entire plant in the frame",
        }
    }

    /// Progress line while analyzing.
    pub fn analysis_text(&self) -> &'static str {
        match self {
            ScanMode::Identify => "Identifying plant species...",
            ScanMode::Diagnose => "Diagnosing plant health...",
            ScanMode::AddPlant => "Identifying plant for your collection...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockAnalysisService;
    use crate::media::{MediaKind, PermissionStatus, SimulatedMedia};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_route_defaults_to_unlocked_identify() {
        let route = ScanRoute::from_params(&HashMap::new());
        assert_eq!(route.mode, ScanMode::Identify);
        assert!(!route.mode_locked);

        let route = ScanRoute::from_params(&params(&[("mode", "diagnose")]));
        assert_eq!(route.mode, ScanMode::Diagnose);
        assert!(route.mode_locked);

        let route = ScanRoute::from_params(&params(&[("mode", "sideways")]));
        assert_eq!(route.mode, ScanMode::Identify);
    }

    #[test]
    fn test_route_image_is_accepted_from_idle() {
        let route = ScanRoute::from_params(&params(&[("imageUri", "file:///leaf.jpg")]));
        let image = route.image.clone().unwrap();
        let mut session = ScanSession::with_settings(route, SessionSettings::default());
        assert_eq!(session.state(), &ScanState::Idle);

        session.accept_image(image.clone()).unwrap();
        assert_eq!(session.image(), Some(&image));
        assert_eq!(session.state().name(), "previewing");
    }

    #[tokio::test]
    async fn test_capture_only_from_idle() {
        let media = SimulatedMedia::default();
        let mut session = ScanSession::new(ScanMode::Identify);
        session.capture(&media).await.unwrap();
        let err = session.capture(&media).await.unwrap_err();
        assert_eq!(
            err,
            ScanError::InvalidTransition {
                op: "capture",
                state: "previewing"
            }
        );
    }

    #[tokio::test]
    async fn test_capture_failure_stays_idle() {
        let media = SimulatedMedia::new(PermissionStatus::Denied, false);
        let mut session = ScanSession::new(ScanMode::Identify);
        let err = session.capture(&media).await.unwrap_err();
        assert_eq!(
            err,
            ScanError::Media(MediaError::PermissionDenied(MediaKind::Camera))
        );
        assert_eq!(session.state(), &ScanState::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_pick_stays_idle() {
        let media = SimulatedMedia::default();
        let mut session = ScanSession::new(ScanMode::Identify);
        assert_eq!(session.pick_from_library(&media).await.unwrap(), None);
        assert_eq!(session.state(), &ScanState::Idle);
    }

    #[test]
    fn test_second_analyze_is_rejected() {
        let mut session = ScanSession::new(ScanMode::Identify);
        session.accept_image(ImageRef::new("x")).unwrap();
        session.begin_analysis().unwrap();
        assert_eq!(
            session.begin_analysis(),
            Err(ScanError::AnalysisAlreadyInProgress)
        );
    }

    #[test]
    fn test_analyze_requires_an_image() {
        let mut session = ScanSession::new(ScanMode::Identify);
        assert!(matches!(
            session.begin_analysis(),
            Err(ScanError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_retake_invalidates_pending_result() {
        let mut session = ScanSession::new(ScanMode::Diagnose);
        session.accept_image(ImageRef::new("x")).unwrap();
        let ticket = session.begin_analysis().unwrap();

        assert!(session.retake());
        assert_eq!(session.state(), &ScanState::Idle);

        let outcome = Ok(MockAnalysisService::canned(ScanMode::Diagnose));
        assert_eq!(session.complete(&ticket, outcome), Completion::Stale);
        assert_eq!(session.state(), &ScanState::Idle);
    }

    #[test]
    fn test_retake_from_idle_is_noop() {
        let mut session = ScanSession::new(ScanMode::Identify);
        assert!(!session.retake());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_ticket_from_other_session_is_stale() {
        let mut first = ScanSession::new(ScanMode::Identify);
        first.accept_image(ImageRef::new("a")).unwrap();
        let ticket = first.begin_analysis().unwrap();

        let mut second = ScanSession::new(ScanMode::Identify);
        second.accept_image(ImageRef::new("b")).unwrap();
        second.begin_analysis().unwrap();

        let outcome = Ok(MockAnalysisService::canned(ScanMode::Identify));
        assert_eq!(second.complete(&ticket, outcome), Completion::Stale);
        assert!(second.is_analyzing());
    }

    #[test]
    fn test_failure_then_retry() {
        let mut session = ScanSession::new(ScanMode::Identify);
        session.accept_image(ImageRef::new("x")).unwrap();
        let ticket = session.begin_analysis().unwrap();
        let timeout = AnalysisError::Timeout(Duration::from_secs(30));
        assert_eq!(
            session.complete(&ticket, Err(timeout)),
            Completion::Applied
        );
        assert_eq!(session.state().name(), "failed");

        let retry = session.begin_analysis().unwrap();
        assert_eq!(retry.image(), &ImageRef::new("x"));
        assert!(session.is_analyzing());
    }

    #[test]
    fn test_mode_changes_only_when_idle_and_unlocked() {
        let mut session = ScanSession::new(ScanMode::Identify);
        session.set_mode(ScanMode::Diagnose).unwrap();
        assert_eq!(session.mode(), ScanMode::Diagnose);

        session.accept_image(ImageRef::new("x")).unwrap();
        assert!(session.set_mode(ScanMode::Identify).is_err());

        let mut locked = ScanSession::with_settings(
            ScanRoute::locked(ScanMode::AddPlant),
            SessionSettings::default(),
        );
        assert_eq!(
            locked.set_mode(ScanMode::Identify),
            Err(ScanError::ModeLocked)
        );
    }

    #[test]
    fn test_flash_unsupported() {
        let settings = SessionSettings {
            flash_supported: false,
            ..Default::default()
        };
        let mut session = ScanSession::with_settings(ScanRoute::default(), settings);
        assert_eq!(session.toggle_flash(), Err(ScanError::FlashUnsupported));
        assert_eq!(session.flash(), FlashMode::Off);
    }

    #[test]
    fn test_toggles_blocked_while_analyzing() {
        let mut session = ScanSession::new(ScanMode::Identify);
        assert_eq!(session.toggle_flash(), Ok(FlashMode::On));
        assert_eq!(session.toggle_facing(), Ok(CameraFacing::Front));

        session.accept_image(ImageRef::new("x")).unwrap();
        session.begin_analysis().unwrap();
        assert!(session.toggle_flash().is_err());
        assert!(session.toggle_facing().is_err());
    }

    #[tokio::test]
    async fn test_front_camera_reaches_capture() {
        let media = SimulatedMedia::default();
        let mut session = ScanSession::new(ScanMode::Identify);
        session.toggle_facing().unwrap();
        let image = session.capture(&media).await.unwrap();
        assert!(image.as_str().starts_with("camera://front/"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_runs_to_result() {
        let service = MockAnalysisService::new(Duration::from_millis(3000));
        let mut session = ScanSession::new(ScanMode::AddPlant);
        session.accept_image(ImageRef::new("x")).unwrap();

        let result = session.analyze(&service, None).await.unwrap();
        assert!(result.as_identification().is_some());
        let (image, mode, _) = session.result().unwrap();
        assert_eq!(image.as_str(), "x");
        assert_eq!(mode, ScanMode::AddPlant);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_timeout_moves_to_failed() {
        let service = MockAnalysisService::new(Duration::from_secs(120));
        let mut session = ScanSession::new(ScanMode::Identify);
        session.accept_image(ImageRef::new("x")).unwrap();

        let err = session
            .analyze(&service, Some(Duration::from_secs(30)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ScanError::Analysis(AnalysisError::Timeout(Duration::from_secs(30)))
        );
        assert_eq!(session.state().name(), "failed");
    }

    #[test]
    fn test_mode_copy() {
        assert_eq!(ScanMode::Identify.title(), "Plant Scanner");
        assert_eq!(ScanMode::Diagnose.analysis_text(), "Diagnosing plant health...");
        assert_eq!(
            ScanMode::AddPlant.guide_text(),
            "Center the entire plant in the frame"
        );
    }
}
