//! Expert consultation and gardener directory
//!
//! Static listings only. Selecting a provider records booking intent; no
//! booking or payment is processed.

use crate::presentation::IconKind;
use crate::types::ImageRef;

/// A plant expert offering video consultations.
#[derive(Debug, Clone, PartialEq)]
pub struct Expert {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub reviews: u32,
    /// Price per consultation in rupees
    pub price: u32,
    pub image: ImageRef,
    pub availability: String,
    pub languages: Vec<String>,
}

impl Expert {
    pub fn languages_label(&self) -> String {
        format!("Languages: {}", self.languages.join(", "))
    }
}

/// A gardener available for home visits.
#[derive(Debug, Clone, PartialEq)]
pub struct Gardener {
    pub id: u32,
    pub name: String,
    pub experience: String,
    pub rating: f32,
    pub reviews: u32,
    /// Rupees per hour
    pub hourly_rate: u32,
    pub image: ImageRef,
    pub location: String,
    pub services: Vec<String>,
    pub availability: String,
}

impl Gardener {
    /// The first three services, as shown on the card.
    pub fn service_preview(&self) -> &[String] {
        &self.services[..self.services.len().min(3)]
    }
}

pub const CONSULTATION_FEATURES: [&str; 4] = [
    "30-minute video consultation",
    "Personalized care plan",
    "Follow-up support for 7 days",
    "Expert recommendations",
];

/// Icon for a gardening service name; unknown services get a wrench.
pub fn service_icon(service: &str) -> IconKind {
    match service {
        "Pruning" => IconKind::Scissors,
        "Watering" | "Fertilizing" => IconKind::Droplets,
        "Garden Design" | "Plant Installation" | "Organic Gardening" | "Plant Health Check" => {
            IconKind::UserCheck
        }
        _ => IconKind::Wrench,
    }
}

fn photo(id: u32) -> ImageRef {
    ImageRef::new(format!(
        "https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&w=200"
    ))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn experts() -> Vec<Expert> {
    vec![
        Expert {
            id: 1,
            name: "Dr. Priya Sharma".to_string(),
            specialty: "Plant Pathologist".to_string(),
            rating: 4.9,
            reviews: 156,
            price: 299,
            image: photo(5327585),
            availability: "Available now".to_string(),
            languages: strings(&["Hindi", "English"]),
        },
        Expert {
            id: 2,
            name: "Rajesh Kumar".to_string(),
            specialty: "Indoor Plant Expert".to_string(),
            rating: 4.8,
            reviews: 203,
            price: 199,
            image: photo(1239291),
            availability: "Available in 30 mins".to_string(),
            languages: strings(&["Hindi", "English", "Punjabi"]),
        },
        Expert {
            id: 3,
            name: "Dr. Meera Patel".to_string(),
            specialty: "Organic Gardening".to_string(),
            rating: 4.9,
            reviews: 89,
            price: 349,
            image: photo(3785079),
            availability: "Available tomorrow".to_string(),
            languages: strings(&["Hindi", "English", "Gujarati"]),
        },
    ]
}

pub fn gardeners() -> Vec<Gardener> {
    vec![
        Gardener {
            id: 1,
            name: "Ramesh Singh".to_string(),
            experience: "8 years experience".to_string(),
            rating: 4.9,
            reviews: 124,
            hourly_rate: 150,
            image: photo(1239291),
            location: "Connaught Place, Delhi".to_string(),
            services: strings(&["Plant Care", "Pruning", "Soil Testing", "Pest Control"]),
            availability: "Available today".to_string(),
        },
        Gardener {
            id: 2,
            name: "Sunita Devi".to_string(),
            experience: "12 years experience".to_string(),
            rating: 4.8,
            reviews: 89,
            hourly_rate: 200,
            image: photo(3785079),
            location: "Lajpat Nagar, Delhi".to_string(),
            services: strings(&[
                "Garden Design",
                "Plant Installation",
                "Maintenance",
                "Organic Gardening",
            ]),
            availability: "Available tomorrow".to_string(),
        },
        Gardener {
            id: 3,
            name: "Mohan Kumar".to_string(),
            experience: "6 years experience".to_string(),
            rating: 4.7,
            reviews: 156,
            hourly_rate: 120,
            image: photo(1239291),
            location: "Karol Bagh, Delhi".to_string(),
            services: strings(&["Watering", "Fertilizing", "Repotting", "Plant Health Check"]),
            availability: "Available now".to_string(),
        },
    ]
}

/// Which listing a directory shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    Consultation,
    Gardener,
}

impl DirectoryKind {
    pub fn title(&self) -> &'static str {
        match self {
            DirectoryKind::Consultation => "Online Consultation",
            DirectoryKind::Gardener => "Book a Gardener",
        }
    }
}

/// A provider listing with at most one selected entry.
#[derive(Debug, Clone)]
pub struct Directory<T> {
    entries: Vec<T>,
    selected: Option<usize>,
}

impl<T> Directory<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self {
            entries,
            selected: None,
        }
    }

    pub fn list(&self) -> &[T] {
        &self.entries
    }

    /// Mark the entry at `index` for booking. Out-of-range is ignored.
    pub fn select(&mut self, index: usize) -> Option<&T> {
        if index >= self.entries.len() {
            return None;
        }
        self.selected = Some(index);
        tracing::info!(index, "Provider selected for booking");
        self.entries.get(index)
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|i| self.entries.get(i))
    }
}
