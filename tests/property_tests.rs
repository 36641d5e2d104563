//! Property-based tests for the persistence store.
//!
//! After any sequence of mutations, the persisted snapshot must equal the
//! in-memory collection, and reloading from the backend must reproduce it.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use pindrop::storage::{KeyValueStore, MemoryStore, StorageData, DATA_KEY};
use pindrop::{NewPin, PinPatch, PinStatus, PinStore};

#[derive(Debug, Clone)]
enum Op {
    Add { name: String, lat: i32, lng: i32, status: PinStatus },
    Update { index: usize, status: Option<PinStatus>, rating: Option<Option<u8>>, notes: Option<String> },
    Remove { index: usize },
    RemoveUnknown,
}

fn status() -> impl Strategy<Value = PinStatus> {
    prop::sample::select(PinStatus::ALL.to_vec())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => ("[A-Za-z ]{1,20}", -9000i32..=9000, -18000i32..=18000, status())
            .prop_map(|(name, lat, lng, status)| Op::Add { name, lat, lng, status }),
        2 => (
            any::<usize>(),
            proptest::option::of(status()),
            proptest::option::of(proptest::option::of(1u8..=5)),
            proptest::option::of("[a-z ]{0,30}"),
        )
            .prop_map(|(index, status, rating, notes)| Op::Update { index, status, rating, notes }),
        1 => any::<usize>().prop_map(|index| Op::Remove { index }),
        1 => Just(Op::RemoveUnknown),
    ]
}

fn persisted(store: &PinStore<MemoryStore>) -> Option<StorageData> {
    store.backend().get(DATA_KEY).unwrap().map(|text| serde_json::from_str(&text).unwrap())
}

fn apply(store: &mut PinStore<MemoryStore>, op: Op) {
    let pick = |store: &PinStore<MemoryStore>, index: usize| {
        let pins = store.pins();
        (!pins.is_empty()).then(|| pins[index % pins.len()].id.clone())
    };

    match op {
        Op::Add { name, lat, lng, status } => {
            let pin = NewPin::new(name, f64::from(lat) / 100.0, f64::from(lng) / 100.0, "").with_status(status);
            store.add(pin).unwrap();
        }
        Op::Update { index, status, rating, notes } => {
            if let Some(id) = pick(&*store, index) {
                let patch = PinPatch { status, rating, notes, ..PinPatch::default() };
                assert!(store.update(&id, patch).unwrap());
            }
        }
        Op::Remove { index } => {
            if let Some(id) = pick(&*store, index) {
                assert!(store.remove(&id).unwrap());
            }
        }
        Op::RemoveUnknown => {
            assert!(!store.remove("no-such-pin").unwrap());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: the persisted snapshot always mirrors the in-memory collection.
    #[test]
    fn prop_persisted_matches_memory(ops in prop::collection::vec(op(), 1..25)) {
        let mut store = PinStore::load(MemoryStore::new()).unwrap();

        for op in ops {
            apply(&mut store, op);
            if let Some(saved) = persisted(&store) {
                prop_assert_eq!(&saved, store.data());
            } else {
                prop_assert!(store.pins().is_empty());
            }
        }

        let expected = store.data().clone();
        let reloaded = PinStore::load(store.into_backend()).unwrap();
        prop_assert_eq!(reloaded.data(), &expected);
    }

    /// Property: ids stay unique across any mutation sequence.
    #[test]
    fn prop_ids_are_unique(ops in prop::collection::vec(op(), 1..40)) {
        let mut store = PinStore::load(MemoryStore::new()).unwrap();
        for op in ops {
            apply(&mut store, op);
        }

        let mut ids: Vec<&str> = store.pins().iter().map(|p| p.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }

    /// Property: statistics counts always partition the collection.
    #[test]
    fn prop_status_counts_sum_to_total(ops in prop::collection::vec(op(), 0..30)) {
        let mut store = PinStore::load(MemoryStore::new()).unwrap();
        for op in ops {
            apply(&mut store, op);
        }

        let stats = store.stats();
        prop_assert_eq!(stats.visited + stats.wishlist + stats.favorite, stats.total);
        prop_assert!((0.0..=100.0).contains(&stats.completion_rate));
        prop_assert!((0.0..=5.0).contains(&stats.average_rating));
    }
}
