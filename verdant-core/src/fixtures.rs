//! Static seed data
//!
//! The app ships without a backend, so the collection, the task list, and the
//! canned analysis payloads all come from here.

use chrono::NaiveTime;

use crate::types::{
    CareInstructions, Confidence, DiagnosisReport, HealthScore, ImageRef, LightLevel, Plant,
    PlantId, PlantIdentification, Priority, Severity, Task, TaskId, TaskKind,
};

fn pexels(photo: u32, width: u32) -> ImageRef {
    ImageRef::new(format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w={width}"
    ))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn plant(
    id: u32,
    name: &str,
    localized_name: &str,
    species: &str,
    photo: u32,
    health: u8,
    next_watering: &str,
    last_watered: &str,
    light_level: LightLevel,
    care_streak_days: u32,
    is_favorite: bool,
) -> Plant {
    Plant {
        id: PlantId(id),
        name: name.to_string(),
        localized_name: localized_name.to_string(),
        species: species.to_string(),
        image: pexels(photo, 400),
        health: HealthScore::saturating(health as u32),
        next_watering: next_watering.to_string(),
        last_watered: last_watered.to_string(),
        light_level,
        care_streak_days,
        is_favorite,
    }
}

/// Plants in a fresh collection.
pub fn seed_plants() -> Vec<Plant> {
    vec![
        plant(
            1,
            "Fiddle Leaf Fig",
            "फिडल लीफ फिग",
            "Ficus lyrata",
            1327838,
            85,
            "Water in 2 days",
            "3 days ago",
            LightLevel::High,
            12,
            true,
        ),
        plant(
            2,
            "Snake Plant",
            "सांप का पौधा",
            "Sansevieria trifasciata",
            1029604,
            92,
            "Water in 1 week",
            "1 week ago",
            LightLevel::Low,
            8,
            false,
        ),
        plant(
            3,
            "Monstera",
            "मॉन्स्टेरा",
            "Monstera deliciosa",
            1084199,
            78,
            "Water today",
            "4 days ago",
            LightLevel::Medium,
            15,
            true,
        ),
        plant(
            4,
            "Pothos",
            "पोथोस",
            "Epipremnum aureum",
            4503751,
            95,
            "Water in 3 days",
            "2 days ago",
            LightLevel::Medium,
            20,
            false,
        ),
        plant(
            5,
            "Peace Lily",
            "पीस लिली",
            "Spathiphyllum wallisii",
            1084199,
            88,
            "Water in 4 days",
            "3 days ago",
            LightLevel::Low,
            5,
            false,
        ),
    ]
}

fn task(
    id: u32,
    plant_id: u32,
    kind: TaskKind,
    hour: u32,
    completed: bool,
    priority: Priority,
) -> Task {
    Task {
        id: TaskId(id),
        plant_id: PlantId(plant_id),
        kind,
        scheduled_at: NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN),
        completed,
        priority,
    }
}

/// Today's care tasks; one of the five starts completed.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        task(1, 1, TaskKind::Water, 9, false, Priority::High),
        task(2, 2, TaskKind::Mist, 14, true, Priority::Medium),
        task(3, 3, TaskKind::Rotate, 18, false, Priority::Low),
        task(4, 4, TaskKind::Fertilize, 10, false, Priority::Medium),
        task(5, 5, TaskKind::Prune, 16, false, Priority::Low),
    ]
}

/// Canned identification returned for every non-diagnosis scan.
pub fn sample_identification() -> PlantIdentification {
    PlantIdentification {
        name: "Fiddle Leaf Fig".to_string(),
        localized_name: "फिडल लीफ फिग".to_string(),
        scientific_name: "Ficus lyrata".to_string(),
        confidence: Confidence::saturating(94),
        description: "A popular houseplant native to western Africa. Known for its large, \
                      violin-shaped leaves and tree-like growth pattern. Requires bright, \
                      indirect light and consistent care."
            .to_string(),
        care: CareInstructions {
            watering: "Water when top 1-2 inches of soil are dry. Usually every 7-10 days."
                .to_string(),
            light: "Bright, indirect light. Avoid direct sunlight which can scorch leaves."
                .to_string(),
            temperature: "Ideal range: 65-75°F (18-24°C). Avoid cold drafts.".to_string(),
            humidity: "Prefers 40-60% humidity. Use humidifier or pebble tray if needed."
                .to_string(),
        },
        common_issues: strings(&[
            "Brown spots from overwatering",
            "Leaf drop from inconsistent watering",
            "Yellowing from too much direct sun",
            "Slow growth in low light",
        ]),
        fun_facts: strings(&[
            "Can grow up to 50 feet tall in its native habitat",
            "Leaves can grow up to 18 inches long",
            "Popular Instagram plant due to its photogenic appearance",
            "Produces small green fruits in the wild",
        ]),
    }
}

/// Canned diagnosis returned for every diagnosis scan.
pub fn sample_diagnosis() -> DiagnosisReport {
    DiagnosisReport {
        condition: "Leaf Spot Disease".to_string(),
        severity: Severity::Medium,
        confidence: Confidence::saturating(87),
        description: "A common fungal infection that causes brown or black spots on leaves. \
                      Usually caused by overwatering or poor air circulation."
            .to_string(),
        symptoms: strings(&[
            "Brown or black circular spots on leaves",
            "Yellow halos around spots",
            "Leaf yellowing and dropping",
            "Reduced plant vigor",
        ]),
        treatment: strings(&[
            "Remove affected leaves immediately",
            "Improve air circulation around plant",
            "Reduce watering frequency",
            "Apply fungicide spray if severe",
            "Isolate plant from other plants",
        ]),
        prevention: strings(&[
            "Water at soil level, not on leaves",
            "Ensure good drainage",
            "Maintain proper spacing between plants",
            "Avoid overhead watering",
            "Regular inspection for early detection",
        ]),
    }
}
