//! Media acquisition: camera capture and photo library selection
//!
//! The host platform owns the actual camera and picker. [`MediaSource`] is the
//! seam: the scan session only ever asks for an [`ImageRef`] and reacts to the
//! outcome. [`SimulatedMedia`] stands in for the hardware in the terminal UI,
//! the `verdant-scan` CLI, and tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MediaConfig;
use crate::types::{CameraFacing, FlashMode, ImageRef};

/// Which host capability a permission or failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Camera,
    Library,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Camera => f.write_str("camera"),
            MediaKind::Library => f.write_str("photo library"),
        }
    }
}

/// Platform permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Not asked yet; the first capture prompts
    #[default]
    Undetermined,
    Granted,
    Denied,
}

/// Failures from the host camera or picker.
///
/// A user backing out of the picker is not an error; see [`PickOutcome::Cancelled`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Access refused; the host shows a blocking screen with a retry action
    #[error("{0} access denied")]
    PermissionDenied(MediaKind),

    /// Hardware or transient failure; the host shows a dismissible alert
    #[error("capture failed: {0}")]
    Capture(String),
}

/// Options passed to the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// JPEG quality (0.0 - 1.0)
    pub quality: f32,
    pub base64: bool,
    pub facing: CameraFacing,
    pub flash: FlashMode,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: 0.8,
            base64: false,
            facing: CameraFacing::Back,
            flash: FlashMode::Off,
        }
    }
}

/// Options passed to the photo library picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub allows_editing: bool,
    /// Crop aspect (width, height)
    pub aspect: (u8, u8),
    pub quality: f32,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            allows_editing: true,
            aspect: (1, 1),
            quality: 0.8,
        }
    }
}

/// Result of opening the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(ImageRef),
    /// The user closed the picker without choosing
    Cancelled,
}

/// Host camera and photo library.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Current permission for a capability
    fn permission(&self, kind: MediaKind) -> PermissionStatus;

    /// Ask the platform again (the retry action on the denial screen)
    async fn request_permission(&self, kind: MediaKind) -> PermissionStatus;

    /// Take a photo with the live camera
    async fn capture(&self, options: &CaptureOptions) -> Result<ImageRef, MediaError>;

    /// Let the user choose an existing photo
    async fn pick_from_library(&self, options: &PickerOptions) -> Result<PickOutcome, MediaError>;
}

/// In-process stand-in for the camera and picker.
///
/// Captures produce synthetic `camera://` references. Library picks pop from
/// a queue; an empty queue behaves like the user cancelling.
pub struct SimulatedMedia {
    camera: Mutex<PermissionStatus>,
    library: Mutex<PermissionStatus>,
    grant_on_request: bool,
    capture_failures: Mutex<VecDeque<String>>,
    library_queue: Mutex<VecDeque<ImageRef>>,
    captures: AtomicU64,
}

impl SimulatedMedia {
    pub fn new(camera: PermissionStatus, grant_on_request: bool) -> Self {
        Self {
            camera: Mutex::new(camera),
            library: Mutex::new(PermissionStatus::Granted),
            grant_on_request,
            capture_failures: Mutex::new(VecDeque::new()),
            library_queue: Mutex::new(VecDeque::new()),
            captures: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.camera_permission, config.grant_on_request)
    }

    /// Queue images the picker will hand out, in order.
    pub fn with_library(self, images: impl IntoIterator<Item = ImageRef>) -> Self {
        lock(&self.library_queue).extend(images);
        self
    }

    /// Make the next capture fail with `reason`.
    pub fn fail_next_capture(&self, reason: impl Into<String>) {
        lock(&self.capture_failures).push_back(reason.into());
    }

    /// Replace the queued library images.
    pub fn set_library(&self, images: impl IntoIterator<Item = ImageRef>) {
        let mut queue = lock(&self.library_queue);
        queue.clear();
        queue.extend(images);
    }

    /// Number of successful captures so far.
    pub fn capture_count(&self) -> u64 {
        self.captures.load(Ordering::Relaxed)
    }

    fn slot(&self, kind: MediaKind) -> &Mutex<PermissionStatus> {
        match kind {
            MediaKind::Camera => &self.camera,
            MediaKind::Library => &self.library,
        }
    }

    /// Resolve an undetermined permission by prompting once.
    fn ensure_permission(&self, kind: MediaKind) -> Result<(), MediaError> {
        let mut status = lock(self.slot(kind));
        if *status == PermissionStatus::Undetermined {
            *status = self.prompt();
        }
        match *status {
            PermissionStatus::Granted => Ok(()),
            _ => Err(MediaError::PermissionDenied(kind)),
        }
    }

    fn prompt(&self) -> PermissionStatus {
        if self.grant_on_request {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new(PermissionStatus::Granted, true)
    }
}

#[async_trait]
impl MediaSource for SimulatedMedia {
    fn permission(&self, kind: MediaKind) -> PermissionStatus {
        *lock(self.slot(kind))
    }

    async fn request_permission(&self, kind: MediaKind) -> PermissionStatus {
        let mut status = lock(self.slot(kind));
        if *status != PermissionStatus::Granted {
            *status = self.prompt();
        }
        tracing::debug!(kind = %kind, status = ?*status, "Permission requested");
        *status
    }

    async fn capture(&self, options: &CaptureOptions) -> Result<ImageRef, MediaError> {
        self.ensure_permission(MediaKind::Camera)?;

        if let Some(reason) = lock(&self.capture_failures).pop_front() {
            tracing::warn!(reason = %reason, "Simulated capture failure");
            return Err(MediaError::Capture(reason));
        }

        let n = self.captures.fetch_add(1, Ordering::Relaxed) + 1;
        let facing = match options.facing {
            CameraFacing::Front => "front",
            CameraFacing::Back => "back",
        };
        Ok(ImageRef::new(format!("camera://{}/capture-{:04}.jpg", facing, n)))
    }

    async fn pick_from_library(&self, _options: &PickerOptions) -> Result<PickOutcome, MediaError> {
        self.ensure_permission(MediaKind::Library)?;

        Ok(match lock(&self.library_queue).pop_front() {
            Some(image) => PickOutcome::Selected(image),
            None => PickOutcome::Cancelled,
        })
    }
}

/// List photos in a directory for the picker (`*.jpg`, `*.jpeg`, `*.png`),
/// sorted by path.
pub fn library_images(dir: &Path) -> crate::error::Result<Vec<ImageRef>> {
    let mut paths = Vec::new();
    for ext in ["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"] {
        let pattern = dir.join(format!("*.{}", ext));
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern).map_err(|e| {
            crate::error::Error::Config(format!("invalid library pattern {}: {}", pattern, e))
        })?;
        paths.extend(entries.filter_map(|entry| entry.ok()));
    }
    paths.sort();
    paths.dedup();
    Ok(paths.iter().map(|p| ImageRef::from_path(p)).collect())
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
