//! Error types for verdant-core

use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::media::MediaError;
use crate::scan::ScanError;
use crate::types::{PlantId, TaskId};

/// Main error type for the verdant-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Camera or photo library failure
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Analysis backend failure
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Scan session rejected an operation
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Plant not found in the collection
    #[error("plant not found: {0}")]
    PlantNotFound(PlantId),

    /// Task not found in the task list
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Result type alias for verdant-core
pub type Result<T> = std::result::Result<T, Error>;
