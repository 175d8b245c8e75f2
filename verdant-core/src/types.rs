//! Core domain types for verdant
//!
//! These types describe the plant collection, the care-task list, and the
//! payloads that flow through a scan: what was captured, which mode it was
//! captured in, and what the analysis produced.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Plant** | A plant the user owns, stored in the Collection Store |
//! | **Task** | A scheduled care action (water, mist, ...) for one owned plant |
//! | **ScanMode** | Why the camera was opened: identify, diagnose, or add to the collection |
//! | **ImageRef** | An opaque URI to a captured or picked photo; never decoded |
//! | **AnalysisResult** | Either a plant identification or a disease diagnosis |
//!
//! Scores that are percentages ([`Confidence`], [`HealthScore`]) are newtypes
//! so a value outside `0..=100` can never be constructed.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================
// Identifiers
// ============================================

/// Stable identifier of a plant in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(pub u32);

impl std::fmt::Display for PlantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plant#{}", self.0)
    }
}

/// Stable identifier of a care task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Reference to an image produced by the camera or the photo library.
///
/// The contents are never inspected; the URI is only carried along and shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` reference from a local path.
    pub fn from_path(path: &Path) -> Self {
        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Self(format!("file://{}", absolute.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================
// Percentages
// ============================================

/// Error returned when a percentage falls outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value {0} is outside 0..=100")]
pub struct OutOfRange(pub u32);

macro_rules! percentage {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            pub const MAX: $name = $name(100);

            /// Returns `None` when `value > 100`.
            pub fn new(value: u8) -> Option<Self> {
                (value <= 100).then_some(Self(value))
            }

            /// Saturate any value into `0..=100`.
            pub fn saturating(value: u32) -> Self {
                Self(value.min(100) as u8)
            }

            pub fn get(self) -> u8 {
                self.0
            }
        }

        impl TryFrom<u8> for $name {
            type Error = OutOfRange;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(OutOfRange(value as u32))
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}%", self.0)
            }
        }
    };
}

percentage!(
    /// Model confidence for an analysis result.
    Confidence
);

percentage!(
    /// Overall health of an owned plant.
    HealthScore
);

// ============================================
// Plants
// ============================================

/// How much light a plant wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightLevel {
    Low,
    Medium,
    High,
}

impl LightLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightLevel::Low => "Low",
            LightLevel::Medium => "Medium",
            LightLevel::High => "High",
        }
    }
}

impl std::str::FromStr for LightLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(LightLevel::Low),
            "medium" => Ok(LightLevel::Medium),
            "high" => Ok(LightLevel::High),
            _ => Err(format!("unknown light level: {}", s)),
        }
    }
}

/// A plant in the user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    /// Display name ("Fiddle Leaf Fig")
    pub name: String,
    /// Name in the user's local language
    pub localized_name: String,
    /// Scientific name ("Ficus lyrata")
    pub species: String,
    pub image: ImageRef,
    pub health: HealthScore,
    /// Human-readable schedule hint ("Water in 2 days", "Water today")
    pub next_watering: String,
    /// Human-readable history hint ("3 days ago")
    pub last_watered: String,
    pub light_level: LightLevel,
    /// Consecutive days the plant was cared for
    pub care_streak_days: u32,
    pub is_favorite: bool,
}

impl Plant {
    /// Whether the watering hint says the plant needs water today.
    pub fn needs_water_today(&self) -> bool {
        self.next_watering.to_lowercase().contains("today")
    }
}

/// Fields for a plant that is not yet in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlant {
    pub name: String,
    pub localized_name: String,
    pub species: String,
    pub image: ImageRef,
    pub health: HealthScore,
    pub next_watering: String,
    pub last_watered: String,
    pub light_level: LightLevel,
}

// ============================================
// Tasks
// ============================================

/// Kind of care action a task asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Water,
    Mist,
    Rotate,
    Fertilize,
    Prune,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Water => "Water",
            TaskKind::Mist => "Mist",
            TaskKind::Rotate => "Rotate",
            TaskKind::Fertilize => "Fertilize",
            TaskKind::Prune => "Prune",
        }
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A scheduled care action for one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owning plant; resolved against the collection for display
    pub plant_id: PlantId,
    pub kind: TaskKind,
    /// Time of day the task is due
    pub scheduled_at: NaiveTime,
    pub completed: bool,
    pub priority: Priority,
}

impl Task {
    /// Scheduled time in the 12-hour format the screens use ("9:00 AM").
    pub fn time_label(&self) -> String {
        self.scheduled_at.format("%-I:%M %p").to_string()
    }
}

// ============================================
// Scanning
// ============================================

/// Why the camera was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    #[default]
    Identify,
    Diagnose,
    AddPlant,
}

impl ScanMode {
    /// Wire name used in navigation parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Identify => "identify",
            ScanMode::Diagnose => "diagnose",
            ScanMode::AddPlant => "add-plant",
        }
    }

    /// Interpret an untyped navigation parameter.
    ///
    /// Anything unset or unrecognized falls back to [`ScanMode::Identify`].
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("diagnose") => ScanMode::Diagnose,
            Some("add-plant") => ScanMode::AddPlant,
            _ => ScanMode::Identify,
        }
    }

    /// Whether analysis in this mode produces a diagnosis.
    pub fn is_diagnosis(&self) -> bool {
        matches!(self, ScanMode::Diagnose)
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identify" => Ok(ScanMode::Identify),
            "diagnose" => Ok(ScanMode::Diagnose),
            "add-plant" => Ok(ScanMode::AddPlant),
            _ => Err(format!("unknown scan mode: {}", s)),
        }
    }
}

/// Which camera is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }
}

/// Camera flash state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    On,
    #[default]
    Off,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::On => FlashMode::Off,
            FlashMode::Off => FlashMode::On,
        }
    }
}

// ============================================
// Analysis Results
// ============================================

/// Care guidance attached to an identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareInstructions {
    pub watering: String,
    pub light: String,
    pub temperature: String,
    pub humidity: String,
}

/// What plant the photo shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantIdentification {
    pub name: String,
    pub localized_name: String,
    pub scientific_name: String,
    pub confidence: Confidence,
    pub description: String,
    pub care: CareInstructions,
    pub common_issues: Vec<String>,
    pub fun_facts: Vec<String>,
}

/// How serious a diagnosed condition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// What is wrong with the plant in the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub condition: String,
    pub severity: Severity,
    pub confidence: Confidence,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
}

/// Output of one analysis call. Exactly one variant is populated, chosen by
/// the scan mode at the time analysis started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Identification(PlantIdentification),
    Diagnosis(DiagnosisReport),
}

impl AnalysisResult {
    pub fn confidence(&self) -> Confidence {
        match self {
            AnalysisResult::Identification(id) => id.confidence,
            AnalysisResult::Diagnosis(report) => report.confidence,
        }
    }

    pub fn as_identification(&self) -> Option<&PlantIdentification> {
        match self {
            AnalysisResult::Identification(id) => Some(id),
            AnalysisResult::Diagnosis(_) => None,
        }
    }

    pub fn as_diagnosis(&self) -> Option<&DiagnosisReport> {
        match self {
            AnalysisResult::Diagnosis(report) => Some(report),
            AnalysisResult::Identification(_) => None,
        }
    }

    /// Whether this result is the variant `mode` asks for.
    pub fn matches_mode(&self, mode: ScanMode) -> bool {
        mode.is_diagnosis() == matches!(self, AnalysisResult::Diagnosis(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_reject_out_of_range() {
        assert!(Confidence::new(100).is_some());
        assert!(Confidence::new(101).is_none());
        assert_eq!(HealthScore::saturating(250).get(), 100);
        assert!(serde_json::from_str::<Confidence>("140").is_err());
        assert_eq!(serde_json::from_str::<Confidence>("94").unwrap().get(), 94);
    }

    #[test]
    fn test_scan_mode_from_param_defaults_to_identify() {
        assert_eq!(ScanMode::from_param(None), ScanMode::Identify);
        assert_eq!(ScanMode::from_param(Some("")), ScanMode::Identify);
        assert_eq!(ScanMode::from_param(Some("bogus")), ScanMode::Identify);
        assert_eq!(ScanMode::from_param(Some("diagnose")), ScanMode::Diagnose);
        assert_eq!(ScanMode::from_param(Some("add-plant")), ScanMode::AddPlant);
    }

    #[test]
    fn test_scan_mode_serde_uses_wire_names() {
        let json = serde_json::to_string(&ScanMode::AddPlant).unwrap();
        assert_eq!(json, "\"add-plant\"");
    }

    #[test]
    fn test_task_time_label() {
        let task = Task {
            id: TaskId(1),
            plant_id: PlantId(1),
            kind: TaskKind::Water,
            scheduled_at: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            completed: false,
            priority: Priority::High,
        };
        assert_eq!(task.time_label(), "2:00 PM");
    }

    #[test]
    fn test_camera_toggles() {
        assert_eq!(CameraFacing::Back.toggled(), CameraFacing::Front);
        assert_eq!(FlashMode::Off.toggled().toggled(), FlashMode::Off);
    }

    #[test]
    fn test_result_matches_mode() {
        let report = AnalysisResult::Diagnosis(DiagnosisReport {
            condition: "Root Rot".to_string(),
            severity: Severity::High,
            confidence: Confidence::new(70).unwrap(),
            description: String::new(),
            symptoms: vec![],
            treatment: vec![],
            prevention: vec![],
        });
        assert!(report.matches_mode(ScanMode::Diagnose));
        assert!(!report.matches_mode(ScanMode::AddPlant));
    }
}
