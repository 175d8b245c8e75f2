//! # verdant-core
//!
//! Core library for verdant - a plant-care companion.
//!
//! This library provides:
//! - Domain types for plants, care tasks, and scan results
//! - The scan session state machine and the analysis service contract
//! - In-memory collection and task stores
//! - Plant care tools, expert listings, onboarding, and profile content
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! A scan flows through four stages:
//! - **Acquire:** a [`media::MediaSource`] yields an [`ImageRef`] from the camera or library
//! - **Session:** a [`scan::ScanSession`] holds the image and guards every transition
//! - **Analyze:** an [`analysis::AnalysisService`] produces an [`AnalysisResult`] for the session's mode
//! - **Present:** [`results::present`] turns the outcome into a [`results::ResultView`]
//!
//! The collection and task stores live in a [`Garden`] owned by the host.
//!
//! ## Example
//!
//! ```rust,no_run
//! use verdant_core::analysis::MockAnalysisService;
//! use verdant_core::media::SimulatedMedia;
//! use verdant_core::scan::ScanSession;
//! use verdant_core::{results, ScanMode};
//!
//! # async fn run() -> verdant_core::Result<()> {
//! let media = SimulatedMedia::default();
//! let service = MockAnalysisService::default();
//!
//! let mut session = ScanSession::new(ScanMode::Identify);
//! let image = session.capture(&media).await?;
//! let result = session.analyze(&service, None).await?;
//! println!("{}", results::present(&image, session.mode(), &result));
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use garden::Garden;
pub use types::*;

// Public modules
pub mod analysis;
pub mod collection;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod garden;
pub mod home;
pub mod logging;
pub mod media;
pub mod meters;
pub mod onboarding;
pub mod presentation;
pub mod profile;
pub mod results;
pub mod scan;
pub mod services;
pub mod tasks;
pub mod types;
