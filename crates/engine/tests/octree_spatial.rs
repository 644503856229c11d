// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Spatial stores inside a record tree: octant descent, deterministic
//! placement on split planes, pruning, and traversal over octants.

use canopy_base::Id;
use canopy_engine::{Bounds, Data, Record, SpatialFn, StoreSpec};
use std::rc::Rc;

fn ball(name: u64, center: [f64; 3], radius: f64) -> Record {
    let mut bytes = Vec::with_capacity(32);
    for c in center {
        bytes.extend_from_slice(&c.to_le_bytes());
    }
    bytes.extend_from_slice(&radius.to_le_bytes());
    Record::register(
        Id::numeric(name),
        Data::buffer(Id::word("shape").unwrap(), Id::word("ball").unwrap(), bytes),
    )
}

fn decode(rec: &Record) -> ([f64; 3], f64) {
    let bytes = rec.read().expect("ball payload");
    let f = |i: usize| f64::from_le_bytes(bytes[i * 8..(i + 1) * 8].try_into().unwrap());
    ([f(0), f(1), f(2)], f(3))
}

fn containment() -> Rc<SpatialFn> {
    Rc::new(|rec: &Record, bounds: &Bounds| {
        let (center, radius) = decode(rec);
        (0..3).all(|a| (center[a] - bounds.center[a]).abs() + radius <= bounds.sub_wide)
    })
}

fn world() -> Record {
    Record::book(
        Id::word("world").unwrap(),
        StoreSpec::octree(Bounds::new([0.0; 3], 64.0), containment()),
    )
}

#[test]
fn test_traversal_covers_every_octant() {
    let mut world = world();
    let positions = [
        [20.0, 20.0, 20.0],
        [-20.0, 20.0, 20.0],
        [20.0, -20.0, -20.0],
        [-20.0, -20.0, -20.0],
        [1.0, 1.0, 1.0],
        [0.0, 0.0, 0.0],
    ];
    for (n, center) in positions.iter().enumerate() {
        world.add(ball(n as u64, *center, 1.0)).unwrap();
    }
    assert_eq!(world.child_count(), positions.len());

    let mut seen = Vec::new();
    world.traverse(|entry| {
        seen.push(entry.record.id().payload());
        true
    });
    seen.sort();
    assert_eq!(seen, [0, 1, 2, 3, 4, 5]);
    world.audit_subtree();
}

#[test]
fn test_split_plane_assignment_is_deterministic() {
    let mut left = world();
    let mut right = world();
    // Same straddling ball twice; both engines must place it identically.
    left.add(ball(7, [0.0; 3], 3.0)).unwrap();
    right.add(ball(7, [0.0; 3], 3.0)).unwrap();

    let a = left.find_by_position(0).unwrap();
    let b = right.find_by_position(0).unwrap();
    assert_eq!(a.id(), b.id());
    assert_eq!(a.path().to_string(), b.path().to_string());
}

#[test]
fn test_deep_traverse_crosses_a_spatial_level() {
    let mut world = world();
    for n in 0..4 {
        let rec = world.add(ball(n, [10.0 + n as f64, 10.0, 10.0], 0.5)).unwrap();
        rec.add(Record::new(Id::word("tag").unwrap())).unwrap();
    }

    let mut pre = 0;
    let mut post = 0;
    world.deep_traverse(
        |_| {
            pre += 1;
            true
        },
        |_| {
            post += 1;
            true
        },
    );
    assert_eq!(pre, 8);
    assert_eq!(post, 4);
}

#[test]
fn test_take_out_of_an_octant_then_reinsert() {
    let mut world = world();
    for n in 0..3 {
        world.add(ball(n, [8.0 * (n as f64 + 1.0), 0.0, 0.0], 0.5)).unwrap();
    }
    let floating = world.remove_by_name(Id::numeric(1)).unwrap();
    assert_eq!(world.child_count(), 2);
    world.audit_subtree();

    world.add(floating).unwrap();
    assert_eq!(world.child_count(), 3);
    assert!(world.find_by_name(Id::numeric(1)).is_some());
    world.audit_subtree();
}

#[test]
fn test_clone_rebuilds_the_octant_tree() {
    let mut world = world();
    for n in 0..5 {
        world.add(ball(n, [-30.0 + 12.0 * n as f64, 5.0, -5.0], 1.0)).unwrap();
    }
    let copy = world.clone_as(Id::word("copy").unwrap());
    assert_eq!(copy.child_count(), 5);
    for n in 0..5 {
        assert!(copy.find_by_name(Id::numeric(n)).is_some(), "{n}");
    }
    copy.audit_subtree();
}
