//! Property tests for the collection and task stores
//!
//! - Search returns exactly the plants matching on some name field, in
//!   collection order
//! - Toggling twice restores the original state
//! - Pending and completed always partition the task list
//! - Percentages never leave 0..=100

use proptest::prelude::*;
use verdant_core::collection::CollectionStore;
use verdant_core::fixtures;
use verdant_core::tasks::TaskStore;
use verdant_core::{Confidence, HealthScore, PlantId, TaskId};

fn query() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("FIG".to_string()),
        Just("plant".to_string()),
        Just("ficus".to_string()),
        Just("मॉन्स्टेरा".to_string()),
        Just("fig ".to_string()),
        Just("   ".to_string()),
        "[a-zA-Z ]{0,6}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: search returns exactly the plants with a matching name field
    #[test]
    fn prop_search_is_exact_subset(q in query()) {
        let plants = fixtures::seed_plants();
        let store = CollectionStore::new(plants.clone());
        let lower = q.to_lowercase();
        let expected: Vec<u32> = plants
            .iter()
            .filter(|p| {
                [&p.name, &p.localized_name, &p.species]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&lower))
            })
            .map(|p| p.id.0)
            .collect();
        let actual: Vec<u32> = store.list(&q).iter().map(|p| p.id.0).collect();
        prop_assert_eq!(actual, expected, "query {:?}", q);
    }

    /// Property: search keeps collection order
    #[test]
    fn prop_search_preserves_order(q in query()) {
        let store = CollectionStore::new(fixtures::seed_plants());
        let ids: Vec<u32> = store.list(&q).iter().map(|p| p.id.0).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ids, sorted);
    }

    /// Property: toggling a favorite twice is the identity
    #[test]
    fn prop_favorite_toggle_is_involution(id in 1u32..=5) {
        let mut store = CollectionStore::new(fixtures::seed_plants());
        let before = store.get(PlantId(id)).unwrap().is_favorite;
        store.toggle_favorite(PlantId(id)).unwrap();
        store.toggle_favorite(PlantId(id)).unwrap();
        prop_assert_eq!(store.get(PlantId(id)).unwrap().is_favorite, before);
    }

    /// Property: any toggle sequence keeps pending + completed == total
    #[test]
    fn prop_tasks_partition(toggles in prop::collection::vec(1u32..=5, 0..20)) {
        let mut store = TaskStore::new(fixtures::seed_tasks());
        for id in &toggles {
            store.toggle_completion(TaskId(*id)).unwrap();
        }
        let stats = store.stats();
        prop_assert_eq!(store.pending().len() + store.completed().len(), 5);
        prop_assert_eq!(stats.pending + stats.completed, stats.total);
        prop_assert!(store.pending().iter().all(|t| !t.completed));
    }

    /// Property: percentages reject anything over 100 and saturate on demand
    #[test]
    fn prop_percentages_bounded(value in any::<u32>()) {
        let clamped = HealthScore::saturating(value);
        prop_assert!(clamped.get() <= 100);
        if value <= 255 {
            prop_assert_eq!(Confidence::new(value as u8).is_some(), value <= 100);
        }
    }
}
