//! Analysis backends
//!
//! [`AnalysisService`] is the contract a real inference backend would
//! implement. [`MockAnalysisService`] waits a fixed latency and returns a
//! canned payload chosen purely by [`ScanMode`]; the image is never read.
//!
//! [`run_analysis`] wraps a service call with cancellation and an optional
//! watchdog, and [`spawn_analysis`] runs it on the tokio runtime so a UI
//! event loop can keep drawing while it waits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::fixtures;
use crate::scan::AnalysisTicket;
use crate::types::{AnalysisResult, ImageRef, ScanMode};

/// Failures an analysis backend can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The watchdog fired before the backend answered
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),

    /// The backend could not be reached
    #[error("analysis service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The session moved on before the backend answered
    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Whether the user can sensibly press "retry".
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Timeout(_) | AnalysisError::ServiceUnavailable(_)
        )
    }
}

/// Something that turns a photo into an identification or diagnosis.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Analyze `image` for `mode`.
    async fn analyze(&self, image: &ImageRef, mode: ScanMode)
        -> Result<AnalysisResult, AnalysisError>;
}

/// Canned backend with a fixed simulated latency.
#[derive(Debug, Clone)]
pub struct MockAnalysisService {
    latency: Duration,
}

impl MockAnalysisService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// The payload returned for `mode`, without waiting.
    pub fn canned(mode: ScanMode) -> AnalysisResult {
        if mode.is_diagnosis() {
            AnalysisResult::Diagnosis(fixtures::sample_diagnosis())
        } else {
            AnalysisResult::Identification(fixtures::sample_identification())
        }
    }
}

impl Default for MockAnalysisService {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(
        &self,
        image: &ImageRef,
        mode: ScanMode,
    ) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!(image = %image, mode = %mode, latency_ms = self.latency.as_millis() as u64, "Mock analysis started");
        tokio::time::sleep(self.latency).await;
        Ok(Self::canned(mode))
    }
}

/// Call `service` for `ticket`, giving up on cancellation or when the
/// watchdog fires.
pub async fn run_analysis(
    service: &dyn AnalysisService,
    ticket: &AnalysisTicket,
    watchdog: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<AnalysisResult, AnalysisError> {
    let call = service.analyze(ticket.image(), ticket.mode());

    let guarded = async {
        match watchdog {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(AnalysisError::Timeout(limit)),
            },
            None => call.await,
        }
    };

    tokio::select! {
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
        result = guarded => result,
    }
}

/// A finished analysis, addressed to the ticket that started it.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub ticket: AnalysisTicket,
    pub result: Result<AnalysisResult, AnalysisError>,
}

/// Handle to an analysis running on the runtime.
///
/// Dropping the handle cancels the call; the outcome of a cancelled call is
/// never sent.
#[derive(Debug)]
pub struct PendingAnalysis {
    ticket: AnalysisTicket,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PendingAnalysis {
    pub fn ticket(&self) -> &AnalysisTicket {
        &self.ticket
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the call now.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PendingAnalysis {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Run the analysis for `ticket` on `runtime`, delivering the outcome on `tx`.
pub fn spawn_analysis(
    runtime: &tokio::runtime::Handle,
    service: Arc<dyn AnalysisService>,
    ticket: AnalysisTicket,
    watchdog: Option<Duration>,
    tx: mpsc::UnboundedSender<AnalysisOutcome>,
) -> PendingAnalysis {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let task_ticket = ticket.clone();

    let handle = runtime.spawn(async move {
        let result = run_analysis(service.as_ref(), &task_ticket, watchdog, &task_cancel).await;
        if matches!(result, Err(AnalysisError::Cancelled)) {
            tracing::debug!(generation = task_ticket.generation(), "Analysis cancelled");
            return;
        }
        if tx
            .send(AnalysisOutcome {
                ticket: task_ticket,
                result,
            })
            .is_err()
        {
            tracing::debug!("Analysis receiver dropped");
        }
    });

    PendingAnalysis {
        ticket,
        cancel,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanSession;

    fn ticket(mode: ScanMode) -> AnalysisTicket {
        let mut session = ScanSession::new(mode);
        session
            .accept_image(ImageRef::new("camera://back/capture-0001.jpg"))
            .unwrap();
        session.begin_analysis().unwrap()
    }

    struct Unreachable;

    #[async_trait]
    impl AnalysisService for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn analyze(
            &self,
            _image: &ImageRef,
            _mode: ScanMode,
        ) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::ServiceUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_result_is_keyed_by_mode() {
        let service = MockAnalysisService::new(Duration::from_secs(2));
        let image = ImageRef::new("x");

        let result = service.analyze(&image, ScanMode::Diagnose).await.unwrap();
        assert!(result.as_diagnosis().is_some());

        for mode in [ScanMode::Identify, ScanMode::AddPlant] {
            let result = service.analyze(&image, mode).await.unwrap();
            assert!(result.as_identification().is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_waits_for_latency() {
        let service = MockAnalysisService::new(Duration::from_secs(3));
        let started = tokio::time::Instant::now();
        service
            .analyze(&ImageRef::new("x"), ScanMode::Identify)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_times_out() {
        let service = MockAnalysisService::new(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let result = run_analysis(
            &service,
            &ticket(ScanMode::Identify),
            Some(Duration::from_secs(5)),
            &cancel,
        )
        .await;
        assert_eq!(result, Err(AnalysisError::Timeout(Duration::from_secs(5))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_wins_over_pending_call() {
        let service = MockAnalysisService::new(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = run_analysis(&service, &ticket(ScanMode::Identify), None, &cancel).await;
        assert_eq!(result, Err(AnalysisError::Cancelled));
    }

    #[tokio::test]
    async fn test_service_errors_pass_through() {
        let cancel = CancellationToken::new();
        let result =
            run_analysis(&Unreachable, &ticket(ScanMode::Diagnose), None, &cancel).await;
        let err = result.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_analysis_delivers_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service: Arc<dyn AnalysisService> =
            Arc::new(MockAnalysisService::new(Duration::from_secs(2)));
        let pending = spawn_analysis(
            &tokio::runtime::Handle::current(),
            service,
            ticket(ScanMode::Diagnose),
            None,
            tx,
        );

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.ticket, *pending.ticket());
        assert!(outcome.result.unwrap().as_diagnosis().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_pending_analysis_suppresses_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service: Arc<dyn AnalysisService> =
            Arc::new(MockAnalysisService::new(Duration::from_secs(2)));
        let pending = spawn_analysis(
            &tokio::runtime::Handle::current(),
            service,
            ticket(ScanMode::Identify),
            None,
            tx,
        );
        drop(pending);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none());
    }
}
