// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Catalog (by-function) ordering: caller comparators over payload bytes.

use canopy_base::Id;
use canopy_engine::{CompareFn, Data, Record, StoreSpec};
use std::rc::Rc;

fn word(name: &str) -> Id {
    Id::word(name).unwrap()
}

fn priority(rec: &Record) -> u8 {
    rec.read().map(|bytes| bytes[0]).unwrap_or(u8::MAX)
}

fn by_priority() -> Rc<CompareFn> {
    Rc::new(|a: &Record, b: &Record| priority(a).cmp(&priority(b)))
}

fn task(name: &str, prio: u8) -> Record {
    Record::register(word(name), Data::near(word("task"), word("prio"), &[prio]))
}

fn order(book: &Record) -> Vec<String> {
    let mut out = Vec::new();
    book.traverse(|entry| {
        out.push(entry.record.id().to_string());
        true
    });
    out
}

#[test]
fn test_catalog_insert_keeps_comparator_order() {
    let mut catalog =
        Record::book(word("tasks"), StoreSpec::tree_catalog(by_priority()));
    for (name, prio) in [("low", 9), ("high", 1), ("mid", 5)] {
        catalog.add(task(name, prio)).unwrap();
    }
    assert_eq!(order(&catalog), ["high", "mid", "low"]);
    catalog.audit_subtree();
}

#[test]
fn test_find_by_key_probes_with_a_template() {
    let mut catalog =
        Record::book(word("tasks"), StoreSpec::tree_catalog(by_priority()));
    for (name, prio) in [("low", 9), ("high", 1), ("mid", 5)] {
        catalog.add(task(name, prio)).unwrap();
    }
    let probe = task("probe", 5);
    let found = catalog.find_by_key(&probe).unwrap();
    assert_eq!(found.id(), word("mid"));
    assert!(catalog.find_by_key(&task("probe", 7)).is_none());
}

#[test]
fn test_sort_converts_a_book_into_a_catalog() {
    let mut book = Record::book(word("tasks"), StoreSpec::array(4));
    for (name, prio) in [("c", 3), ("a", 1), ("d", 4), ("b", 2)] {
        book.append(false, task(name, prio)).unwrap();
    }
    book.sort(by_priority());
    assert_eq!(order(&book), ["a", "b", "c", "d"]);

    // Later inserts respect the installed comparator.
    book.add(task("between", 3)).unwrap();
    assert_eq!(order(&book), ["a", "b", "c", "between", "d"]);
    book.audit_subtree();
}

#[test]
fn test_adjacent_pairs_satisfy_the_comparator() {
    let mut book = Record::book(word("tasks"), StoreSpec::list());
    for prio in [7u8, 2, 9, 4, 4, 1] {
        book.append(false, task(&format!("t{prio}"), prio)).unwrap();
    }
    book.sort(by_priority());

    let mut prev: Option<u8> = None;
    book.traverse(|entry| {
        if let Some(prev) = prev {
            assert!(prev <= priority(entry.record));
        }
        prev = Some(priority(entry.record));
        true
    });
}

#[test]
#[should_panic(expected = "cannot be re-sorted in place")]
fn test_populated_tree_store_rejects_resort() {
    let mut dict = Record::book(word("dict"), StoreSpec::tree_dictionary());
    dict.add(Record::new(Id::numeric(1))).unwrap();
    dict.add(Record::new(Id::numeric(2))).unwrap();
    dict.sort(by_priority());
}

#[test]
fn test_empty_tree_store_accepts_a_new_order() {
    let mut dict = Record::book(word("dict"), StoreSpec::tree_dictionary());
    dict.sort(by_priority());
    dict.add(task("only", 3)).unwrap();
    assert_eq!(order(&dict), ["only"]);
}

#[test]
fn test_duplicate_names_are_fine_in_a_catalog() {
    let mut book = Record::book(word("tasks"), StoreSpec::list());
    book.append(false, task("same", 2)).unwrap();
    book.append(false, task("same", 1)).unwrap();
    book.sort(by_priority());
    let mut prios = Vec::new();
    book.traverse(|entry| {
        prios.push(priority(entry.record));
        true
    });
    assert_eq!(prios, [1, 2]);
}
