#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can check
// bin placement through the engine's own accessors.

use crate::config::TableConfig;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::hash::{HashFn, KeyHash, StdHash};
use crate::table::ChainTable;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Erase(usize),
    Get(usize),
    Clear,
    Iterate,
    ScanErase(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Erase),
            2 => idx.clone().prop_map(Op::Get),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
            1 => idx.clone().prop_map(Op::ScanErase),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure<S: KeyHash<String>>(
    sut: &ChainTable<String, i32, S>,
    model: &HashMap<String, i32>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(sut.len(), model.len());
    prop_assert!(sut.len() as f64 / sut.bins() as f64 <= sut.load_threshold());
    let mut count = 0;
    for bin in 0..sut.bins() {
        for (k, v) in sut.chain(bin) {
            prop_assert_eq!(sut.hash_compress(k), bin);
            prop_assert_eq!(model.get(k), Some(v));
            count += 1;
        }
    }
    prop_assert_eq!(count, model.len());
    Ok(())
}

fn run_state_machine<S: KeyHash<String>>(
    mut sut: ChainTable<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut last_mod = sut.mod_count();
    let mut last_bins = sut.bins();

    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = pool[i].clone();
                let (_, old) = sut.insert_or_update(k.clone(), v);
                prop_assert_eq!(old, model.insert(k, v));
                prop_assert!(sut.mod_count() > last_mod);
            }
            Op::Erase(i) => {
                let k = &pool[i];
                match model.remove(k) {
                    Some(mv) => {
                        let (kk, vv) = sut.remove(k).expect("present in model");
                        prop_assert_eq!(&kk, k);
                        prop_assert_eq!(vv, mv);
                        prop_assert!(sut.mod_count() > last_mod);
                    }
                    None => {
                        prop_assert_eq!(sut.remove(k), Err(Error::KeyNotFound));
                        prop_assert_eq!(sut.mod_count(), last_mod);
                    }
                }
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.mod_count(), last_mod);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bins(), last_bins);
            }
            Op::Iterate => {
                let seen: Vec<&String> = sut.iter().map(|(k, _)| k).collect();
                let unique: BTreeSet<&String> = seen.iter().copied().collect();
                prop_assert_eq!(seen.len(), unique.len(), "iteration repeated a key");
                let expected: BTreeSet<&String> = model.keys().collect();
                prop_assert_eq!(unique, expected);
            }
            Op::ScanErase(i) => {
                // Erase one key through a cursor, then finish the scan.
                let target = &pool[i];
                let mut c = Cursor::begin(&sut);
                let mut visited = BTreeSet::new();
                while !c.is_end() {
                    let k = c.get(&sut).expect("live cursor").0.clone();
                    prop_assert!(visited.insert(k.clone()), "cursor repeated a key");
                    if &k == target {
                        c.erase(&mut sut).expect("erase at cursor");
                        model.remove(&k);
                    }
                    c.advance(&sut).expect("cursor stays valid after own erase");
                }
                let expected: BTreeSet<String> = model.keys().cloned().chain(
                    visited.contains(target).then(|| target.clone()),
                ).collect();
                prop_assert_eq!(visited, expected);
            }
        }

        prop_assert!(sut.mod_count() >= last_mod);
        prop_assert!(sut.bins() >= last_bins, "bins never shrink");
        last_mod = sut.mod_count();
        last_bins = sut.bins();
        check_structure(&sut, &model)?;
    }
    Ok(())
}

fn colliding(_: &String) -> i64 {
    -17
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - size equals distinct keys put minus keys erased; every live key reachable.
// - every key sits in the bin `hash_compress` names.
// - `len / bins <= load_threshold` after every operation; bins never shrink.
// - mod_count increases on put/erase/clear and stays put on lookups.
// - cursor erase mid-scan visits every element exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: ChainTable<String, i32, StdHash> = ChainTable::with_config(TableConfig::new()).unwrap();
        run_state_machine(sut, pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = ChainTable::with_config(TableConfig::new().hasher(HashFn::new(colliding))).unwrap();
        run_state_machine(sut, pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_threshold(
        (pool, ops) in arb_scenario(),
        threshold in prop_oneof![Just(0.5), Just(0.75), Just(2.0), Just(3.5)],
        bins in 1usize..8,
    ) {
        let sut: ChainTable<String, i32, StdHash> = ChainTable::with_config(
            TableConfig::new().load_threshold(threshold).initial_bins(bins),
        ).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}
