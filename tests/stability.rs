use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use stablesat::encoding::{
    decode, emit_map, ClauseBuilder, ClauseSet, Matching, Outcome, PersonId, PreferenceStore,
    Side, VariableRegistry,
};

fn encode(store: &PreferenceStore) -> (VariableRegistry, ClauseSet) {
    let registry = VariableRegistry::for_store(store);
    let clauses = ClauseBuilder::new(store, &registry).build().unwrap();
    (registry, clauses)
}

fn matching(pairs: &[(PersonId, Option<PersonId>)]) -> Matching {
    pairs
        .iter()
        .map(|&(p, r)| (p, r.map_or(Outcome::Unmatched, Outcome::Matched)))
        .collect()
}

fn satisfies(clauses: &ClauseSet, registry: &VariableRegistry, m: &Matching) -> bool {
    let assignment = m.to_assignment(registry).unwrap();
    clauses.first_unsatisfied(&assignment).is_none()
}

#[test]
fn both_stable_matchings_of_the_crossed_instance_are_admitted() {
    let store = PreferenceStore::parse("m1: 1 2\nm2: 2 1\nw1: 2 1\nw2: 1 2\n").unwrap();
    let (registry, clauses) = encode(&store);
    let map = emit_map(&registry);

    for expected in [
        matching(&[(1, Some(1)), (2, Some(2))]),
        matching(&[(1, Some(2)), (2, Some(1))]),
    ] {
        assert!(satisfies(&clauses, &registry, &expected));
        let transcript = expected.to_assignment(&registry).unwrap().to_transcript();
        let decoded = decode(&transcript, &map).unwrap().unwrap();
        assert_eq!(decoded, expected);
        assert!(decoded.blocking_pairs(&store).is_empty());
    }
}

#[test]
fn blocking_configuration_is_forbidden() {
    let store = PreferenceStore::parse("m1: 1 2\nm2: 2 1\nw1: 1 2\nw2: 2 1\n").unwrap();
    let (registry, clauses) = encode(&store);

    let stable = matching(&[(1, Some(1)), (2, Some(2))]);
    assert!(satisfies(&clauses, &registry, &stable));
    assert!(stable.blocking_pairs(&store).is_empty());

    let swapped = matching(&[(1, Some(2)), (2, Some(1))]);
    assert!(!satisfies(&clauses, &registry, &swapped));
    assert!(!swapped.blocking_pairs(&store).is_empty());
}

#[test]
fn cardinality_rejects_shared_receivers() {
    let store = PreferenceStore::parse("m1: 1 2\nm2: 1 2\nw1: 1 2\nw2: 1 2\n").unwrap();
    let (registry, clauses) = encode(&store);
    let shared = matching(&[(1, Some(1)), (2, Some(1))]);
    assert!(!satisfies(&clauses, &registry, &shared));

    // Leaving w2 without a partner is not allowed either.
    let lonely = matching(&[(1, Some(1)), (2, None)]);
    assert!(!satisfies(&clauses, &registry, &lonely));
}

#[test]
fn round_trip_keeps_unmatched_proposers() {
    let store = PreferenceStore::parse("m1: 1\nm2: 1\nm3:\nw1: 2 1\n").unwrap();
    let (registry, clauses) = encode(&store);
    let expected = matching(&[(1, None), (2, Some(1)), (3, None)]);
    assert!(satisfies(&clauses, &registry, &expected));

    let transcript = expected.to_assignment(&registry).unwrap().to_transcript();
    let decoded = decode(&transcript, &emit_map(&registry)).unwrap().unwrap();
    assert_eq!(decoded, expected);
    assert_eq!(decoded.to_result_lines(), "m1 unmatched\nm2 w1\nm3 unmatched\n");
}

fn random_store(rng: &mut StdRng, receivers: u32, proposers: u32) -> PreferenceStore {
    let mut store = PreferenceStore::new();
    for p in 1..=proposers {
        let mut list: Vec<PersonId> = (1..=receivers).filter(|_| rng.gen_bool(0.7)).collect();
        list.shuffle(rng);
        store.insert(Side::Proposer, p, list).unwrap();
    }
    for r in 1..=receivers {
        // Complete receiver lists keep every receiver/partner pair comparable.
        let mut list: Vec<PersonId> = (1..=proposers).collect();
        list.shuffle(rng);
        store.insert(Side::Receiver, r, list).unwrap();
    }
    store.validate().unwrap();
    store
}

#[test]
fn clauses_hold_exactly_for_stable_matchings() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..150 {
        let receivers = rng.gen_range(1..=3);
        let proposers = rng.gen_range(receivers..=4);
        let store = random_store(&mut rng, receivers, proposers);
        let (registry, clauses) = encode(&store);

        for chosen in (1..=proposers).permutations(receivers as usize) {
            let candidate: Matching = (1..=proposers)
                .map(|p| {
                    let outcome = chosen
                        .iter()
                        .position(|&q| q == p)
                        .map_or(Outcome::Unmatched, |i| Outcome::Matched(i as PersonId + 1));
                    (p, outcome)
                })
                .collect();
            assert_eq!(
                satisfies(&clauses, &registry, &candidate),
                candidate.blocking_pairs(&store).is_empty(),
                "{store:?}\n{candidate:?}"
            );
        }
    }
}

#[test]
fn registry_numbering_is_reproducible() {
    let store = PreferenceStore::parse("m3: 1\nm1: 1\nw1: 1 3\n").unwrap();
    let (first, _) = encode(&store);
    let (second, _) = encode(&store);
    assert_eq!(emit_map(&first), emit_map(&second));
    assert_eq!(first.len(), (1 + 2) * 2);
}
