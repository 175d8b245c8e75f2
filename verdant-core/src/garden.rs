//! The stores the app owns
//!
//! [`Garden`] is built once at startup and handed to the host; all store
//! access goes through it.

use crate::collection::CollectionStore;
use crate::fixtures;
use crate::results;
use crate::tasks::TaskStore;
use crate::types::{AnalysisResult, ImageRef, PlantId};

#[derive(Debug, Clone, Default)]
pub struct Garden {
    pub collection: CollectionStore,
    pub tasks: TaskStore,
}

impl Garden {
    pub fn new(collection: CollectionStore, tasks: TaskStore) -> Self {
        Self { collection, tasks }
    }

    /// Garden with the bundled plants and today's tasks.
    pub fn seeded() -> Self {
        Self::new(
            CollectionStore::new(fixtures::seed_plants()),
            TaskStore::new(fixtures::seed_tasks()),
        )
    }

    /// "Add to My Garden" from a result screen.
    ///
    /// Returns `None` for a diagnosis, which has nothing to add.
    pub fn add_from_result(&mut self, image: &ImageRef, result: &AnalysisResult) -> Option<PlantId> {
        let identification = result.as_identification()?;
        let plant = results::plant_from_identification(identification, image);
        Some(self.collection.add(plant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_from_identification() {
        let mut garden = Garden::seeded();
        let image = ImageRef::new("camera://back/capture-0001.jpg");
        let result = AnalysisResult::Identification(fixtures::sample_identification());

        let id = garden.add_from_result(&image, &result).unwrap();
        let plant = garden.collection.get(id).unwrap();
        assert_eq!(plant.name, "Fiddle Leaf Fig");
        assert_eq!(plant.image, image);
        assert_eq!(garden.collection.len(), 6);
    }

    #[test]
    fn test_diagnosis_adds_nothing() {
        let mut garden = Garden::seeded();
        let result = AnalysisResult::Diagnosis(fixtures::sample_diagnosis());
        assert!(garden.add_from_result(&ImageRef::new("x"), &result).is_none());
        assert_eq!(garden.collection.len(), 5);
    }
}
