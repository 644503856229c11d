// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Large randomized soak over the red-black backend: structural audits
//! every thousand inserts, sortedness of the in-order walk, then teardown
//! with audits on the way back down.

use canopy_base::Id;
use canopy_engine::{Record, StoreSpec};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::HashSet;

const COUNT: usize = 10_000;
const AUDIT_EVERY: usize = 1_000;

fn random_keys(seed: u64, count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key = rng.random::<u64>() & ((1 << 60) - 1);
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys
}

fn in_order(dict: &Record) -> Vec<u64> {
    let mut out = Vec::with_capacity(dict.child_count());
    dict.traverse(|entry| {
        out.push(entry.record.id().payload());
        true
    });
    out
}

#[test]
fn test_ten_thousand_random_inserts_stay_balanced() {
    let mut dict = Record::book(Id::word("dict").unwrap(), StoreSpec::tree_dictionary());
    let keys = random_keys(0xC0FFEE, COUNT);

    for (n, &key) in keys.iter().enumerate() {
        dict.add(Record::new(Id::numeric(key))).unwrap();
        if (n + 1) % AUDIT_EVERY == 0 {
            dict.audit_subtree();
        }
    }

    let walked = in_order(&dict);
    assert_eq!(walked.len(), COUNT);
    assert!(walked.is_sorted());

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(walked, sorted);
}

#[test]
fn test_reverse_teardown_keeps_the_shape() {
    let mut dict = Record::book(Id::word("dict").unwrap(), StoreSpec::tree_dictionary());
    let count = 2_000u64;
    for n in 1..=count {
        dict.add(Record::new(Id::numeric(n))).unwrap();
    }
    for n in (1..=count).rev() {
        let rec = dict.remove_by_name(Id::numeric(n)).unwrap();
        assert_eq!(rec.id().payload(), n);
        if n % 250 == 0 {
            dict.audit_subtree();
        }
    }
    assert_eq!(dict.child_count(), 0);
    dict.audit_subtree();
}

#[test]
fn test_random_removals_interleaved_with_audits() {
    let mut dict = Record::book(Id::word("dict").unwrap(), StoreSpec::tree_dictionary());
    let keys = random_keys(0xDECAF, 4_000);
    for &key in &keys {
        dict.add(Record::new(Id::numeric(key))).unwrap();
    }

    let mut order = keys.clone();
    let mut rng = StdRng::seed_from_u64(0xDECAF ^ 1);
    for i in (1..order.len()).rev() {
        order.swap(i, rng.random_range(0..=i));
    }
    for (n, &key) in order.iter().enumerate() {
        let rec = dict.remove_by_name(Id::numeric(key)).unwrap();
        assert_eq!(rec.id().payload(), key);
        if (n + 1) % AUDIT_EVERY == 0 {
            dict.audit_subtree();
        }
    }
    assert_eq!(dict.child_count(), 0);
}
