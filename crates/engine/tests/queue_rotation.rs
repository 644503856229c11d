// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use canopy_base::Id;
use canopy_engine::{Record, StoreSpec};

fn payloads(queue: &Record) -> Vec<u64> {
    let mut out = Vec::new();
    queue.traverse(|entry| {
        out.push(entry.record.id().payload());
        true
    });
    out
}

#[test]
fn test_rotation_across_segment_boundaries() {
    let mut queue = Record::book(Id::word("queue").unwrap(), StoreSpec::queue(3));
    for n in 1..=5 {
        queue.append(false, Record::new(Id::numeric(n))).unwrap();
    }

    assert_eq!(queue.child_pop().unwrap().id().payload(), 1);
    assert_eq!(queue.child_pop().unwrap().id().payload(), 2);
    for n in [6, 7] {
        queue.append(false, Record::new(Id::numeric(n))).unwrap();
    }

    assert_eq!(payloads(&queue), [3, 4, 5, 6, 7]);
    assert_eq!(queue.child_count(), 5);
    queue.audit_subtree();
}

#[test]
fn test_pop_and_prepend_restore_the_queue() {
    let mut queue = Record::book(Id::word("queue").unwrap(), StoreSpec::queue(2));
    for n in 1..=4 {
        queue.append(false, Record::new(Id::numeric(n))).unwrap();
    }
    let before = payloads(&queue);

    let popped = queue.child_pop().unwrap();
    queue.append(true, popped).unwrap();

    assert_eq!(payloads(&queue), before);
    queue.audit_subtree();
}

#[test]
fn test_take_returns_the_back() {
    let mut queue = Record::book(Id::word("queue").unwrap(), StoreSpec::queue(3));
    for n in 1..=4 {
        queue.append(false, Record::new(Id::numeric(n))).unwrap();
    }
    assert_eq!(queue.child_take().unwrap().id().payload(), 4);
    assert_eq!(queue.child_take().unwrap().id().payload(), 3);
    assert_eq!(payloads(&queue), [1, 2]);
    queue.audit_subtree();
}
