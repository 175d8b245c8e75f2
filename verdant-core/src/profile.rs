//! Profile screen: settings toggles and menu layout
//!
//! Guests and signed-in users see different menus. Toggle items are bound to
//! [`Settings`] by id; navigation items carry the route they would open.

use crate::config::ProfileConfig;
use crate::presentation::Rgb;

/// User-adjustable switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub dark_mode: bool,
    pub notifications: bool,
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            sound: true,
        }
    }
}

/// Counters on the profile header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub plants_owned: u32,
    pub care_streak: u32,
    pub plants_identified: u32,
    pub health_score: u8,
}

pub fn user_stats() -> UserStats {
    UserStats {
        plants_owned: 12,
        care_streak: 28,
        plants_identified: 156,
        health_score: 87,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Navigation(&'static str),
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub color: Rgb,
    pub kind: MenuItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

const fn nav(
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    color: Rgb,
    route: &'static str,
) -> MenuItem {
    MenuItem {
        id,
        title,
        subtitle,
        color,
        kind: MenuItemKind::Navigation(route),
    }
}

const fn toggle(id: &'static str, title: &'static str, subtitle: &'static str, color: Rgb) -> MenuItem {
    MenuItem {
        id,
        title,
        subtitle,
        color,
        kind: MenuItemKind::Toggle,
    }
}

const DARK_MODE: MenuItem = toggle("dark-mode", "Dark Mode", "Switch to dark theme", Rgb::PURPLE);
const HELP: MenuItem = nav(
    "help",
    "Help & Support",
    "Get help and contact us",
    Rgb::DEEP_ORANGE,
    "/profile/help",
);

pub fn guest_menu() -> Vec<MenuSection> {
    vec![
        MenuSection {
            title: "Account",
            items: vec![
                nav(
                    "sign-up",
                    "Create Account",
                    "Sign up to save your plants and progress",
                    Rgb::GREEN,
                    "/auth/sign-up",
                ),
                nav(
                    "sign-in",
                    "Sign In",
                    "Already have an account? Sign in here",
                    Rgb::FOREST,
                    "/auth/sign-in",
                ),
            ],
        },
        MenuSection {
            title: "App Settings",
            items: vec![DARK_MODE],
        },
        MenuSection {
            title: "Support",
            items: vec![HELP],
        },
    ]
}

pub fn user_menu() -> Vec<MenuSection> {
    vec![
        MenuSection {
            title: "Account",
            items: vec![
                nav(
                    "edit-profile",
                    "Edit Profile",
                    "Update your personal information",
                    Rgb::FOREST,
                    "/profile/edit",
                ),
                nav(
                    "preferences",
                    "Preferences",
                    "Customize your app experience",
                    Rgb::GREY,
                    "/profile/preferences",
                ),
            ],
        },
        MenuSection {
            title: "Notifications",
            items: vec![
                toggle(
                    "push-notifications",
                    "Push Notifications",
                    "Care reminders and updates",
                    Rgb::ORANGE,
                ),
                toggle("sound", "Sound", "Notification sounds", Rgb::BLUE),
            ],
        },
        MenuSection {
            title: "App Settings",
            items: vec![
                DARK_MODE,
                nav(
                    "privacy",
                    "Privacy & Security",
                    "Manage your data and security",
                    Rgb::GREEN,
                    "/profile/privacy",
                ),
            ],
        },
        MenuSection {
            title: "Support",
            items: vec![HELP],
        },
    ]
}

/// Profile state for one user or guest.
#[derive(Debug, Clone)]
pub struct Profile {
    pub guest: bool,
    pub display_name: Option<String>,
    pub settings: Settings,
}

impl Profile {
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self {
            guest: config.guest,
            display_name: config.display_name.clone(),
            settings: Settings::default(),
        }
    }

    pub fn menu(&self) -> Vec<MenuSection> {
        if self.guest {
            guest_menu()
        } else {
            user_menu()
        }
    }

    /// Current value of a toggle item, `None` for non-toggles.
    pub fn toggle_value(&self, id: &str) -> Option<bool> {
        match id {
            "dark-mode" => Some(self.settings.dark_mode),
            "push-notifications" => Some(self.settings.notifications),
            "sound" => Some(self.settings.sound),
            _ => None,
        }
    }

    /// Flip a toggle item by id, returning the new value.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let slot = match id {
            "dark-mode" => &mut self.settings.dark_mode,
            "push-notifications" => &mut self.settings.notifications,
            "sound" => &mut self.settings.sound,
            _ => return None,
        };
        *slot = !*slot;
        tracing::debug!(setting = id, value = *slot, "Setting toggled");
        Some(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(sections: &[MenuSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title).collect()
    }

    #[test]
    fn test_guest_and_user_menus() {
        assert_eq!(titles(&guest_menu()), ["Account", "App Settings", "Support"]);
        assert_eq!(
            titles(&user_menu()),
            ["Account", "Notifications", "App Settings", "Support"]
        );
    }

    #[test]
    fn test_toggle_by_id() {
        let mut profile = Profile::from_config(&ProfileConfig::default());
        assert_eq!(profile.toggle_value("dark-mode"), Some(false));
        assert_eq!(profile.toggle("dark-mode"), Some(true));
        assert_eq!(profile.toggle("sound"), Some(false));
        assert_eq!(profile.toggle("help"), None);
    }

    #[test]
    fn test_guest_menu_selected_by_config() {
        let profile = Profile::from_config(&ProfileConfig {
            guest: false,
            display_name: Some("Asha".to_string()),
        });
        assert_eq!(profile.menu().len(), 4);
    }
}
