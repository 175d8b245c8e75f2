//! First-run walkthrough

use crate::presentation::{IconKind, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingStep {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: IconKind,
    pub color: Rgb,
}

pub const STEPS: [OnboardingStep; 3] = [
    OnboardingStep {
        title: "Identify Any Plant",
        description: "Simply take a photo and our AI will instantly identify your plant species with detailed information.",
        icon: IconKind::Camera,
        color: Rgb::GREEN,
    },
    OnboardingStep {
        title: "Plant Health Diagnosis",
        description: "Detect diseases early and get personalized treatment recommendations for your plants.",
        icon: IconKind::Stethoscope,
        color: Rgb::ORANGE,
    },
    OnboardingStep {
        title: "Expert Care Guidance",
        description: "Get tailored care schedules, watering reminders, and expert tips for each of your plants.",
        icon: IconKind::Leaf,
        color: Rgb::FOREST,
    },
];

/// Result of advancing the walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Step(usize),
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct Onboarding {
    current: usize,
    finished: bool,
}

impl Onboarding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static OnboardingStep {
        &STEPS[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn is_last(&self) -> bool {
        self.current == STEPS.len() - 1
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Label of the primary button.
    pub fn next_label(&self) -> &'static str {
        if self.is_last() {
            "Get Started"
        } else {
            "Next"
        }
    }

    pub fn next(&mut self) -> Progress {
        if self.is_last() {
            self.finish()
        } else {
            self.current += 1;
            Progress::Step(self.current)
        }
    }

    pub fn skip(&mut self) -> Progress {
        self.finish()
    }

    /// Follow a swipe to `index`; out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> Progress {
        if index < STEPS.len() {
            self.current = index;
        }
        Progress::Step(self.current)
    }

    fn finish(&mut self) -> Progress {
        self.finished = true;
        tracing::debug!(step = self.current, "Onboarding finished");
        Progress::Finished
    }
}
