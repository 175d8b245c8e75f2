//! Home dashboard content

use crate::garden::Garden;
use crate::presentation::{IconKind, Rgb};
use crate::profile::Profile;
use crate::scan::ScanRoute;
use crate::tasks::TaskRow;
use crate::types::ScanMode;

pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        _ => "Good Evening",
    }
}

/// Greeting line; signed-in users with a name are addressed by it.
pub fn greeting(hour: u32, profile: &Profile) -> String {
    let base = greeting_for_hour(hour);
    match (&profile.display_name, profile.guest) {
        (Some(name), false) => format!("{}, {}!", base, name),
        _ => format!("{}!", base),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    /// Background gradient (top, bottom).
    pub fn palette(&self) -> (Rgb, Rgb) {
        match self {
            TimeOfDay::Night => (Rgb(0x1B, 0x5E, 0x20), Rgb(0x2E, 0x7D, 0x32)),
            TimeOfDay::Morning => (Rgb(0xFF, 0xE0, 0x82), Rgb(0xFF, 0xF3, 0xE0)),
            TimeOfDay::Afternoon => (Rgb(0x81, 0xC7, 0x84), Rgb(0xE8, 0xF5, 0xE8)),
            TimeOfDay::Evening => (Rgb(0xFF, 0x8A, 0x65), Rgb(0xFF, 0xF3, 0xE0)),
        }
    }
}

/// Where a tile leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    Scan(ScanRoute),
    /// Opens the light/soil meter chooser
    Tools,
    /// Opens the consultation/gardener chooser
    Services,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTile {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: IconKind,
    pub color: Rgb,
    pub action: HomeAction,
}

pub fn feature_tiles() -> Vec<FeatureTile> {
    vec![
        FeatureTile {
            title: "Identify Plant",
            description: "AI-powered recognition",
            icon: IconKind::Camera,
            color: Rgb::GREEN,
            action: HomeAction::Scan(ScanRoute::default()),
        },
        FeatureTile {
            title: "Disease Diagnosis",
            description: "Health assessment",
            icon: IconKind::Stethoscope,
            color: Rgb::ORANGE,
            action: HomeAction::Scan(ScanRoute::locked(ScanMode::Diagnose)),
        },
        FeatureTile {
            title: "Plant Care Tools",
            description: "Light & soil meters",
            icon: IconKind::Wrench,
            color: Rgb::BLUE,
            action: HomeAction::Tools,
        },
        FeatureTile {
            title: "Expert Services",
            description: "Consultation & marketplace",
            icon: IconKind::Users,
            color: Rgb::PURPLE,
            action: HomeAction::Services,
        },
    ]
}

/// How many tasks the dashboard card shows.
pub const TODAY_PREVIEW: usize = 3;

/// The first few of today's tasks with their plants.
pub fn todays_tasks(garden: &Garden) -> Vec<TaskRow<'_>> {
    let mut rows = garden.tasks.with_plants(&garden.collection);
    rows.truncate(TODAY_PREVIEW);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;

    #[test]
    fn test_greeting_by_hour() {
        assert_eq!(greeting_for_hour(0), "Good Morning");
        assert_eq!(greeting_for_hour(11), "Good Morning");
        assert_eq!(greeting_for_hour(12), "Good Afternoon");
        assert_eq!(greeting_for_hour(16), "Good Afternoon");
        assert_eq!(greeting_for_hour(17), "Good Evening");
    }

    #[test]
    fn test_greeting_uses_name_when_signed_in() {
        let guest = Profile::from_config(&ProfileConfig::default());
        assert_eq!(greeting(9, &guest), "Good Morning!");

        let user = Profile::from_config(&ProfileConfig {
            guest: false,
            display_name: Some("Asha".to_string()),
        });
        assert_eq!(greeting(20, &user), "Good Evening, Asha!");
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(TimeOfDay::from_hour(3), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(13), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::Night.palette().0.hex(), "#1B5E20");
    }

    #[test]
    fn test_diagnosis_tile_locks_mode() {
        let tiles = feature_tiles();
        assert_eq!(
            tiles[1].action,
            HomeAction::Scan(ScanRoute::locked(ScanMode::Diagnose))
        );
        assert_eq!(tiles[0].action, HomeAction::Scan(ScanRoute::default()));
    }

    #[test]
    fn test_todays_tasks_preview() {
        let garden = Garden::seeded();
        let rows = todays_tasks(&garden);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].plant_name(), "Snake Plant");
        assert!(rows[1].task.completed);
    }
}
