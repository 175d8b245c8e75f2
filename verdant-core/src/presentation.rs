//! Display metadata for enums
//!
//! Every enum that a screen colors or decorates maps to a [`Badge`] through
//! an exhaustive `match`, so adding a variant fails to compile until it has
//! a label, a color and an icon.

use crate::types::{HealthScore, LightLevel, Priority, ScanMode, Severity, TaskKind};

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0x4C, 0xAF, 0x50);
    pub const FOREST: Rgb = Rgb(0x2E, 0x7D, 0x32);
    pub const AMBER: Rgb = Rgb(0xFF, 0xC1, 0x07);
    pub const ORANGE: Rgb = Rgb(0xFF, 0x98, 0x00);
    pub const DEEP_ORANGE: Rgb = Rgb(0xFF, 0x57, 0x22);
    pub const BLUE: Rgb = Rgb(0x21, 0x96, 0xF3);
    pub const PURPLE: Rgb = Rgb(0x9C, 0x27, 0xB0);
    pub const LIGHT_GREEN: Rgb = Rgb(0x8B, 0xC3, 0x4A);
    pub const PINK: Rgb = Rgb(0xE9, 0x1E, 0x63);
    pub const BROWN: Rgb = Rgb(0x8D, 0x6E, 0x63);
    pub const GREY: Rgb = Rgb(0x66, 0x66, 0x66);
    pub const MUTED: Rgb = Rgb(0x99, 0x99, 0x99);

    /// `#RRGGBB`
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Abstract icon; hosts pick the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Camera,
    Stethoscope,
    Plus,
    Droplets,
    RotateCcw,
    Sprout,
    Scissors,
    Sun,
    CloudSun,
    Cloud,
    AlertTriangle,
    Info,
    CheckCircle,
    Wrench,
    Users,
    UserCheck,
    Lightbulb,
    Gauge,
    Video,
    MessageCircle,
    Phone,
    Leaf,
    Heart,
    Star,
}

/// Label, color and icon for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: Rgb,
    pub icon: IconKind,
}

impl Badge {
    fn new(label: impl Into<String>, color: Rgb, icon: IconKind) -> Self {
        Self {
            label: label.into(),
            color,
            icon,
        }
    }
}

pub fn severity_badge(severity: Severity) -> Badge {
    let label = format!("{} Severity", severity.as_str());
    match severity {
        Severity::High => Badge::new(label, Rgb::DEEP_ORANGE, IconKind::AlertTriangle),
        Severity::Medium => Badge::new(label, Rgb::ORANGE, IconKind::Info),
        Severity::Low => Badge::new(label, Rgb::GREEN, IconKind::CheckCircle),
    }
}

pub fn light_badge(level: LightLevel) -> Badge {
    match level {
        LightLevel::High => Badge::new("High", Rgb::AMBER, IconKind::Sun),
        LightLevel::Medium => Badge::new("Medium", Rgb::ORANGE, IconKind::Sun),
        LightLevel::Low => Badge::new("Low", Rgb::GREY, IconKind::Sun),
    }
}

pub fn priority_badge(priority: Priority) -> Badge {
    match priority {
        Priority::High => Badge::new("high", Rgb::DEEP_ORANGE, IconKind::Star),
        Priority::Medium => Badge::new("medium", Rgb::ORANGE, IconKind::Star),
        Priority::Low => Badge::new("low", Rgb::GREEN, IconKind::Star),
    }
}

/// Badge shown in place of the priority once a task is done.
pub fn done_badge() -> Badge {
    Badge::new("done", Rgb::MUTED, IconKind::CheckCircle)
}

pub fn task_kind_badge(kind: TaskKind) -> Badge {
    let label = kind.as_str();
    match kind {
        TaskKind::Water => Badge::new(label, Rgb::BLUE, IconKind::Droplets),
        TaskKind::Mist => Badge::new(label, Rgb::GREEN, IconKind::Droplets),
        TaskKind::Rotate => Badge::new(label, Rgb::ORANGE, IconKind::RotateCcw),
        TaskKind::Fertilize => Badge::new(label, Rgb::LIGHT_GREEN, IconKind::Sprout),
        TaskKind::Prune => Badge::new(label, Rgb::PINK, IconKind::Scissors),
    }
}

/// Health bands: 90+ thriving, 70+ fair, below that struggling.
pub fn health_badge(health: HealthScore) -> Badge {
    let label = health.to_string();
    match health.get() {
        90..=100 => Badge::new(label, Rgb::GREEN, IconKind::Heart),
        70..=89 => Badge::new(label, Rgb::AMBER, IconKind::Heart),
        _ => Badge::new(label, Rgb::DEEP_ORANGE, IconKind::Heart),
    }
}

pub fn mode_badge(mode: ScanMode) -> Badge {
    match mode {
        ScanMode::Identify => Badge::new("Identify", Rgb::GREEN, IconKind::Camera),
        ScanMode::Diagnose => Badge::new("Diagnose", Rgb::ORANGE, IconKind::Stethoscope),
        ScanMode::AddPlant => Badge::new("Add Plant", Rgb::BLUE, IconKind::Plus),
    }
}
