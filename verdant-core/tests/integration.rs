//! Integration tests for the capture → analyze → present pipeline
//!
//! These run the scan session against the simulated camera and the mock
//! analysis service on a paused tokio clock, so the 3 second latency costs
//! nothing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use verdant_core::analysis::{self, AnalysisError, AnalysisService, MockAnalysisService};
use verdant_core::media::{self, SimulatedMedia};
use verdant_core::results::{self, ResultAction};
use verdant_core::scan::{
    Completion, ScanError, ScanRoute, ScanSession, ScanState, SessionSettings,
};
use verdant_core::{Garden, ScanMode};

const LATENCY: Duration = Duration::from_millis(3000);

fn service() -> Arc<dyn AnalysisService> {
    Arc::new(MockAnalysisService::new(LATENCY))
}

// ============================================
// End-to-end Scenarios
// ============================================

#[tokio::test(start_paused = true)]
async fn test_identify_end_to_end() {
    let media = SimulatedMedia::default();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut garden = Garden::seeded();

    let mut session = ScanSession::new(ScanMode::Identify);
    let image = session.capture(&media).await.unwrap();
    let ticket = session.begin_analysis().unwrap();
    assert!(session.is_analyzing());

    let started = tokio::time::Instant::now();
    let _pending = analysis::spawn_analysis(
        &tokio::runtime::Handle::current(),
        service(),
        ticket,
        Some(Duration::from_secs(30)),
        tx,
    );

    let outcome = rx.recv().await.unwrap();
    assert!(started.elapsed() >= LATENCY);
    assert_eq!(session.complete(&outcome.ticket, outcome.result), Completion::Applied);

    let (held, mode, result) = session.result().unwrap();
    assert_eq!(held, &image);
    let view = results::present(held, mode, result);
    assert_eq!(view.title, "Plant Identified");
    assert_eq!(view.confidence, "94% Confidence");
    assert!(view.has_action(ResultAction::AddToGarden));

    let id = garden.add_from_result(held, result).unwrap();
    assert_eq!(garden.collection.get(id).unwrap().species, "Ficus lyrata");
    assert_eq!(garden.collection.list("fiddle").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_diagnose_end_to_end() {
    let media = SimulatedMedia::default();
    let mut session = ScanSession::with_settings(
        ScanRoute::locked(ScanMode::Diagnose),
        SessionSettings::default(),
    );

    let image = session.capture(&media).await.unwrap();
    let result = session
        .analyze(&MockAnalysisService::new(LATENCY), None)
        .await
        .unwrap();

    let view = results::present(&image, ScanMode::Diagnose, &result);
    assert_eq!(view.title, "Diagnosis Results");
    assert_eq!(view.confidence, "87% Confidence");
    assert_eq!(view.actions, vec![ResultAction::ScanAnother]);

    let report = result.as_diagnosis().unwrap();
    assert_eq!(report.condition, "Leaf Spot Disease");

    session.abandon();
    assert_eq!(session.state(), &ScanState::Idle);
}

// ============================================
// Cancellation
// ============================================

#[tokio::test(start_paused = true)]
async fn test_late_result_after_retake_is_dropped() {
    let media = SimulatedMedia::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut session = ScanSession::new(ScanMode::Identify);
    session.capture(&media).await.unwrap();
    let ticket = session.begin_analysis().unwrap();
    let _pending =
        analysis::spawn_analysis(&tokio::runtime::Handle::current(), service(), ticket, None, tx);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(session.retake());

    let outcome = rx.recv().await.unwrap();
    assert_eq!(session.complete(&outcome.ticket, outcome.result), Completion::Stale);
    assert_eq!(session.state(), &ScanState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_abandon_cancels_in_flight_analysis() {
    let media = SimulatedMedia::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut session = ScanSession::new(ScanMode::Diagnose);
    session.capture(&media).await.unwrap();
    let ticket = session.begin_analysis().unwrap();
    let pending =
        analysis::spawn_analysis(&tokio::runtime::Handle::current(), service(), ticket, None, tx);

    session.abandon();
    drop(pending);

    tokio::time::sleep(LATENCY * 2).await;
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_watchdog_failure_then_retry() {
    let media = SimulatedMedia::default();
    let slow = MockAnalysisService::new(Duration::from_secs(60));
    let mut session = ScanSession::new(ScanMode::Identify);
    session.capture(&media).await.unwrap();

    let err = session
        .analyze(&slow, Some(Duration::from_secs(30)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Analysis(AnalysisError::Timeout(_))
    ));

    let result = session
        .analyze(&MockAnalysisService::new(LATENCY), Some(Duration::from_secs(30)))
        .await
        .unwrap();
    assert!(result.as_identification().is_some());
}

// ============================================
// Library Pick
// ============================================

#[tokio::test]
async fn test_library_pick_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("monstera.jpg"), b"").unwrap();

    let images = media::library_images(dir.path()).unwrap();
    let library = SimulatedMedia::default().with_library(images);

    let mut session = ScanSession::new(ScanMode::AddPlant);
    let picked = session.pick_from_library(&library).await.unwrap().unwrap();
    assert!(picked.as_str().starts_with("file://"));
    assert!(picked.as_str().ends_with("monstera.jpg"));
    assert_eq!(session.image(), Some(&picked));
}

// ============================================
// Stores
// ============================================

#[test]
fn test_seeded_garden() {
    let mut garden = Garden::seeded();
    assert_eq!(garden.tasks.list().len(), 5);
    assert_eq!(garden.tasks.pending().len(), 4);
    assert_eq!(garden.tasks.completed().len(), 1);

    let rows = garden.tasks.with_plants(&garden.collection);
    assert!(rows.iter().all(|row| row.plant.is_some()));

    let first = garden.tasks.list()[0].id;
    garden.tasks.toggle_completion(first).unwrap();
    assert_eq!(garden.tasks.pending().len(), 3);
}
