//! The user's plant collection
//!
//! In-memory and insertion-ordered. Plants are never removed; ids are handed
//! out sequentially after the highest seeded id.

use crate::error::{Error, Result};
use crate::types::{NewPlant, Plant, PlantId};

/// How the plants screen lays out cards. Purely a host concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewLayout {
    #[default]
    Grid,
    List,
}

impl ViewLayout {
    pub fn toggled(self) -> Self {
        match self {
            ViewLayout::Grid => ViewLayout::List,
            ViewLayout::List => ViewLayout::Grid,
        }
    }
}

/// Summary shown above the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub need_water_today: usize,
    /// Rounded mean health, 0 when empty
    pub average_health: u8,
}

#[derive(Debug, Clone)]
pub struct CollectionStore {
    plants: Vec<Plant>,
    next_id: u32,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CollectionStore {
    pub fn new(plants: Vec<Plant>) -> Self {
        let next_id = plants.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        Self { plants, next_id }
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Plants whose name, localized name or species contains `query`,
    /// ignoring case. An empty query returns everything; whitespace is
    /// matched literally.
    pub fn list(&self, query: &str) -> Vec<&Plant> {
        if query.is_empty() {
            return self.plants.iter().collect();
        }
        let needle = query.to_lowercase();
        self.plants
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.localized_name.to_lowercase().contains(&needle)
                    || p.species.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn get(&self, id: PlantId) -> Result<&Plant> {
        self.plants
            .iter()
            .find(|p| p.id == id)
            .ok_or(Error::PlantNotFound(id))
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&mut self, id: PlantId) -> Result<bool> {
        let plant = self
            .plants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::PlantNotFound(id))?;
        plant.is_favorite = !plant.is_favorite;
        tracing::debug!(plant = %id, favorite = plant.is_favorite, "Favorite toggled");
        Ok(plant.is_favorite)
    }

    pub fn add(&mut self, new: NewPlant) -> PlantId {
        let id = PlantId(self.next_id);
        self.next_id += 1;
        tracing::info!(plant = %id, name = %new.name, "Plant added to collection");
        self.plants.push(Plant {
            id,
            name: new.name,
            localized_name: new.localized_name,
            species: new.species,
            image: new.image,
            health: new.health,
            next_watering: new.next_watering,
            last_watered: new.last_watered,
            light_level: new.light_level,
            care_streak_days: 0,
            is_favorite: false,
        });
        id
    }

    pub fn favorites(&self) -> Vec<&Plant> {
        self.plants.iter().filter(|p| p.is_favorite).collect()
    }

    pub fn stats(&self) -> CollectionStats {
        let total = self.plants.len();
        let need_water_today = self.plants.iter().filter(|p| p.needs_water_today()).count();
        let average_health = if total == 0 {
            0
        } else {
            let sum: u32 = self.plants.iter().map(|p| p.health.get() as u32).sum();
            ((sum as f64) / (total as f64)).round() as u8
        };
        CollectionStats {
            total,
            need_water_today,
            average_health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::{HealthScore, ImageRef, LightLevel};

    fn seeded() -> CollectionStore {
        CollectionStore::new(fixtures::seed_plants())
    }

    fn names(plants: Vec<&Plant>) -> Vec<&str> {
        plants.into_iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_names() {
        let store = seeded();
        assert_eq!(names(store.list("FICUS")), ["Fiddle Leaf Fig"]);
        assert_eq!(names(store.list("snake")), ["Snake Plant"]);
        assert_eq!(names(store.list("पोथोस")), ["Pothos"]);
        assert!(store.list("cactus").is_empty());
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let store = seeded();
        let ids: Vec<_> = store.list("").iter().map(|p| p.id.0).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_whitespace_in_query_is_literal() {
        let store = seeded();
        assert!(store.list("   ").is_empty());
        assert!(store.list("fig ").is_empty());
        assert!(store.list(" fig").is_empty());

        let names: Vec<_> = store.list("leaf fig").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Fiddle Leaf Fig"]);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut store = seeded();
        assert!(!store.toggle_favorite(PlantId(1)).unwrap());
        assert!(store.toggle_favorite(PlantId(1)).unwrap());
        assert!(matches!(
            store.toggle_favorite(PlantId(99)),
            Err(Error::PlantNotFound(PlantId(99)))
        ));
    }

    #[test]
    fn test_add_assigns_fresh_id() {
        let mut store = seeded();
        let id = store.add(NewPlant {
            name: "Rubber Plant".to_string(),
            localized_name: "रबर प्लांट".to_string(),
            species: "Ficus elastica".to_string(),
            image: ImageRef::new("file:///rubber.jpg"),
            health: HealthScore::MAX,
            next_watering: "Water in 5 days".to_string(),
            last_watered: "Not yet".to_string(),
            light_level: LightLevel::Medium,
        });
        assert_eq!(id, PlantId(6));
        assert_eq!(store.get(id).unwrap().name, "Rubber Plant");
        assert_eq!(names(store.list("ficus")), ["Fiddle Leaf Fig", "Rubber Plant"]);
    }

    #[test]
    fn test_stats() {
        let stats = seeded().stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.need_water_today, 1);
        // (85 + 92 + 78 + 95 + 88) / 5 = 87.6
        assert_eq!(stats.average_health, 88);
        assert_eq!(CollectionStore::default().stats().average_health, 0);
    }

    #[test]
    fn test_favorites() {
        assert_eq!(names(seeded().favorites()), ["Fiddle Leaf Fig", "Monstera"]);
    }
}
