//! Result presentation
//!
//! [`present`] turns a finished scan into a [`ResultView`]: a header, a
//! confidence badge, ordered sections and the available actions. It is a
//! pure function; hosts decide how to draw it. The `Display` impl renders
//! the same view as plain text for the CLI.

use std::fmt;

use crate::presentation::{self, Badge};
use crate::types::{
    AnalysisResult, DiagnosisReport, HealthScore, ImageRef, LightLevel, NewPlant,
    PlantIdentification, ScanMode,
};

/// Shown while the analysis is running.
pub const LOADING_TITLE: &str = "Analyzing Image...";
pub const LOADING_TEXT: &str =
    "Our AI is processing your image and identifying the plant species";

/// Something the user can do from the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    /// Only offered for identifications
    AddToGarden,
    ScanAnother,
}

impl ResultAction {
    pub fn label(&self) -> &'static str {
        match self {
            ResultAction::AddToGarden => "Add to My Garden",
            ResultAction::ScanAnother => "Scan Another Plant",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Text(String),
    Names {
        name: String,
        localized_name: String,
        scientific_name: String,
    },
    Condition {
        name: String,
        severity: Badge,
    },
    /// Label and value pairs
    Labeled(Vec<(&'static str, String)>),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
    Checklist(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSection {
    pub title: Option<&'static str>,
    pub body: SectionBody,
}

impl ResultSection {
    fn untitled(body: SectionBody) -> Self {
        Self { title: None, body }
    }

    fn titled(title: &'static str, body: SectionBody) -> Self {
        Self {
            title: Some(title),
            body,
        }
    }
}

/// Everything the result screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub image: ImageRef,
    pub mode: ScanMode,
    pub title: &'static str,
    /// "94% Confidence"
    pub confidence: String,
    pub sections: Vec<ResultSection>,
    pub actions: Vec<ResultAction>,
}

impl ResultView {
    pub fn has_action(&self, action: ResultAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn section(&self, title: &str) -> Option<&ResultSection> {
        self.sections.iter().find(|s| s.title == Some(title))
    }
}

pub fn header_title(mode: ScanMode) -> &'static str {
    if mode.is_diagnosis() {
        "Diagnosis Results"
    } else {
        "Plant Identified"
    }
}

/// Build the result screen for a finished scan.
pub fn present(image: &ImageRef, mode: ScanMode, result: &AnalysisResult) -> ResultView {
    let (sections, actions) = match result {
        AnalysisResult::Identification(id) => (
            identification_sections(id),
            vec![ResultAction::AddToGarden, ResultAction::ScanAnother],
        ),
        AnalysisResult::Diagnosis(report) => {
            (diagnosis_sections(report), vec![ResultAction::ScanAnother])
        }
    };

    ResultView {
        image: image.clone(),
        mode,
        title: header_title(mode),
        confidence: format!("{} Confidence", result.confidence()),
        sections,
        actions,
    }
}

fn identification_sections(id: &PlantIdentification) -> Vec<ResultSection> {
    vec![
        ResultSection::untitled(SectionBody::Names {
            name: id.name.clone(),
            localized_name: id.localized_name.clone(),
            scientific_name: id.scientific_name.clone(),
        }),
        ResultSection::untitled(SectionBody::Text(id.description.clone())),
        ResultSection::titled(
            "Care Instructions",
            SectionBody::Labeled(vec![
                ("Watering", id.care.watering.clone()),
                ("Light", id.care.light.clone()),
                ("Temperature", id.care.temperature.clone()),
                ("Humidity", id.care.humidity.clone()),
            ]),
        ),
        ResultSection::titled("Common Issues", SectionBody::Bullets(id.common_issues.clone())),
        ResultSection::titled("Fun Facts", SectionBody::Bullets(id.fun_facts.clone())),
    ]
}

fn diagnosis_sections(report: &DiagnosisReport) -> Vec<ResultSection> {
    vec![
        ResultSection::untitled(SectionBody::Condition {
            name: report.condition.clone(),
            severity: presentation::severity_badge(report.severity),
        }),
        ResultSection::untitled(SectionBody::Text(report.description.clone())),
        ResultSection::titled("Symptoms", SectionBody::Bullets(report.symptoms.clone())),
        ResultSection::titled(
            "Treatment Steps",
            SectionBody::Numbered(report.treatment.clone()),
        ),
        ResultSection::titled(
            "Prevention Tips",
            SectionBody::Checklist(report.prevention.clone()),
        ),
    ]
}

/// The plant "Add to My Garden" puts in the collection.
pub fn plant_from_identification(id: &PlantIdentification, image: &ImageRef) -> NewPlant {
    NewPlant {
        name: id.name.clone(),
        localized_name: id.localized_name.clone(),
        species: id.scientific_name.clone(),
        image: image.clone(),
        health: HealthScore::MAX,
        next_watering: "Water in 7 days".to_string(),
        last_watered: "Not yet".to_string(),
        light_level: light_from_care(&id.care.light),
    }
}

/// Rough light requirement from free-text care advice.
fn light_from_care(text: &str) -> LightLevel {
    let text = text.to_lowercase();
    if text.contains("bright") || text.contains("full sun") {
        LightLevel::High
    } else if text.contains("low light") || text.contains("shade") {
        LightLevel::Low
    } else {
        LightLevel::Medium
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "Image: {}", self.image)?;
        writeln!(f, "{}", self.confidence)?;

        for section in &self.sections {
            writeln!(f)?;
            if let Some(title) = section.title {
                writeln!(f, "{}", title)?;
            }
            match &section.body {
                SectionBody::Text(text) => writeln!(f, "{}", text)?,
                SectionBody::Names {
                    name,
                    localized_name,
                    scientific_name,
                } => {
                    writeln!(f, "{}", name)?;
                    writeln!(f, "{}", localized_name)?;
                    writeln!(f, "{}", scientific_name)?;
                }
                SectionBody::Condition { name, severity } => {
                    writeln!(f, "{} [{}]", name, severity.label)?;
                }
                SectionBody::Labeled(pairs) => {
                    for (label, value) in pairs {
                        writeln!(f, "  {}: {}", label, value)?;
                    }
                }
                SectionBody::Bullets(items) => {
                    for item in items {
                        writeln!(f, "  • {}", item)?;
                    }
                }
                SectionBody::Numbered(items) => {
                    for (i, item) in items.iter().enumerate() {
                        writeln!(f, "  {}. {}", i + 1, item)?;
                    }
                }
                SectionBody::Checklist(items) => {
                    for item in items {
                        writeln!(f, "  ✓ {}", item)?;
                    }
                }
            }
        }

        writeln!(f)?;
        let actions: Vec<_> = self.actions.iter().map(|a| a.label()).collect();
        write!(f, "[{}]", actions.join("] ["))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn image() -> ImageRef {
        ImageRef::new("file:///tmp/leaf.jpg")
    }

    #[test]
    fn test_identification_view() {
        let result = AnalysisResult::Identification(fixtures::sample_identification());
        let view = present(&image(), ScanMode::Identify, &result);

        assert_eq!(view.title, "Plant Identified");
        assert_eq!(view.confidence, "94% Confidence");
        assert_eq!(
            view.actions,
            vec![ResultAction::AddToGarden, ResultAction::ScanAnother]
        );

        let titles: Vec<_> = view.sections.iter().filter_map(|s| s.title).collect();
        assert_eq!(titles, ["Care Instructions", "Common Issues", "Fun Facts"]);

        match &view.section("Care Instructions").unwrap().body {
            SectionBody::Labeled(pairs) => {
                let labels: Vec<_> = pairs.iter().map(|(l, _)| *l).collect();
                assert_eq!(labels, ["Watering", "Light", "Temperature", "Humidity"]);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_diagnosis_view() {
        let result = AnalysisResult::Diagnosis(fixtures::sample_diagnosis());
        let view = present(&image(), ScanMode::Diagnose, &result);

        assert_eq!(view.title, "Diagnosis Results");
        assert_eq!(view.confidence, "87% Confidence");
        assert!(!view.has_action(ResultAction::AddToGarden));

        match &view.sections[0].body {
            SectionBody::Condition { name, severity } => {
                assert_eq!(name, "Leaf Spot Disease");
                assert_eq!(severity.label, "Medium Severity");
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert!(matches!(
            view.section("Treatment Steps").unwrap().body,
            SectionBody::Numbered(ref steps) if steps.len() == 5
        ));
    }

    #[test]
    fn test_text_rendering_numbers_treatment() {
        let result = AnalysisResult::Diagnosis(fixtures::sample_diagnosis());
        let text = present(&image(), ScanMode::Diagnose, &result).to_string();
        assert!(text.starts_with("Diagnosis Results\n"));
        assert!(text.contains("  1. Remove affected leaves immediately"));
        assert!(text.contains("Leaf Spot Disease [Medium Severity]"));
        assert!(text.ends_with("[Scan Another Plant]"));
    }

    #[test]
    fn test_plant_from_identification() {
        let id = fixtures::sample_identification();
        let plant = plant_from_identification(&id, &image());
        assert_eq!(plant.name, "Fiddle Leaf Fig");
        assert_eq!(plant.species, "Ficus lyrata");
        assert_eq!(plant.light_level, LightLevel::High);
        assert_eq!(plant.image, image());
    }
}
