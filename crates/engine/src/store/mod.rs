// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Child storage: one common header, five interchangeable backends.
//!
//! Every operation on children enters through the [`Store`] dispatcher; the
//! `match` on [`Backend`] below is the only place in the engine that knows
//! which concrete container is in play. Backends hold their records inline,
//! so any operation that relocates a record re-seats that record's own
//! store back-pointer (`store.owner`) before returning; grandchildren keep
//! pointing at the store allocation itself, which never moves.

use crate::record::Record;
use canopy_base::{Id, IndexingTag, StorageTag};
use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

mod array;
mod list;
mod octree;
mod queue;
mod rbtree;

pub(crate) use array::Array;
pub(crate) use list::List;
pub(crate) use octree::Octree;
pub(crate) use queue::PackedQueue;
pub(crate) use rbtree::RbTree;

/// User-sorted order over records.
pub type CompareFn = dyn Fn(&Record, &Record) -> Ordering;

/// Octant containment test: whether a record belongs inside the cube.
pub type SpatialFn = dyn Fn(&Record, &Bounds) -> bool;

/// A cubic octant region: a center and its half-width.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub center: [f64; 3],
    pub sub_wide: f64,
}

/// Smallest half-width an octant may be split to.
pub const MIN_SUB_WIDE: f64 = 1e-9;

impl Bounds {
    pub fn new(center: [f64; 3], sub_wide: f64) -> Bounds {
        assert!(sub_wide > MIN_SUB_WIDE, "octree bounds below the minimum half-width");
        Bounds { center, sub_wide }
    }

    /// Bounds of the child octant at `index`; each of the three index bits
    /// selects the sign of the offset along one axis.
    pub(crate) fn child(&self, index: usize) -> Bounds {
        let half = self.sub_wide * 0.5;
        let mut center = self.center;
        for (axis, c) in center.iter_mut().enumerate() {
            *c += if index >> axis & 1 == 1 { half } else { -half };
        }
        Bounds { center, sub_wide: half }
    }
}

/// Ordering policy of a store, with the comparator slot for the
/// user-sorted and spatial forms.
#[derive(Clone)]
pub enum Index {
    /// Arrival order; prepend and append are the only placements.
    ByInsertion,
    /// Dictionary order over the packed identifier; names are unique.
    ByName,
    /// Catalog order defined by a total, deterministic comparator.
    ByFunction(Rc<CompareFn>),
    /// As by-function; the comparator hashes rather than collates.
    ByHash(Rc<CompareFn>),
    /// Octant containment; only the octree backend carries this.
    Spatial(Rc<SpatialFn>),
}

impl Index {
    pub fn tag(&self) -> IndexingTag {
        match self {
            Index::ByInsertion => IndexingTag::ByInsertion,
            Index::ByName => IndexingTag::ByName,
            Index::ByFunction(_) => IndexingTag::ByFunction,
            Index::ByHash(_) => IndexingTag::ByHash,
            Index::Spatial(_) => IndexingTag::ByFunction,
        }
    }

    pub(crate) fn is_sorted(&self) -> bool {
        !matches!(self, Index::ByInsertion)
    }

    /// Comparator for sorted placement.
    ///
    /// # Panics
    ///
    /// Panics for insertion and spatial orders, which have no pairwise
    /// comparator.
    pub(crate) fn compare(&self, left: &Record, right: &Record) -> Ordering {
        match self {
            Index::ByName => left.id().cmp(&right.id()),
            Index::ByFunction(cmp) | Index::ByHash(cmp) => cmp(left, right),
            Index::ByInsertion | Index::Spatial(_) => {
                panic!("ordering comparison on a non-sorted store")
            }
        }
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tag(), f)
    }
}

/// Description of the store a book keeps its children in; the concrete
/// backend is allocated on first insertion.
#[derive(Clone)]
pub enum StoreSpec {
    LinkedList { index: Index },
    DynamicArray { index: Index, capacity: usize },
    PackedQueue { segment: usize },
    RedBlackTree { index: Index },
    Octree { bounds: Bounds, fit: Rc<SpatialFn> },
}

impl StoreSpec {
    /// Insertion-ordered linked list, the default book.
    pub fn list() -> StoreSpec {
        StoreSpec::LinkedList { index: Index::ByInsertion }
    }

    /// Name-sorted dictionary on the linked list.
    pub fn dictionary() -> StoreSpec {
        StoreSpec::LinkedList { index: Index::ByName }
    }

    /// Insertion-ordered dynamic array.
    pub fn array(capacity: usize) -> StoreSpec {
        StoreSpec::DynamicArray { index: Index::ByInsertion, capacity }
    }

    /// Name-sorted dictionary on the dynamic array.
    pub fn array_dictionary(capacity: usize) -> StoreSpec {
        StoreSpec::DynamicArray { index: Index::ByName, capacity }
    }

    /// Insertion-ordered packed queue with `segment` records per segment.
    pub fn queue(segment: usize) -> StoreSpec {
        assert!(segment > 0, "packed queue needs a non-zero segment size");
        StoreSpec::PackedQueue { segment }
    }

    /// Name-sorted dictionary on the red-black tree.
    pub fn tree_dictionary() -> StoreSpec {
        StoreSpec::RedBlackTree { index: Index::ByName }
    }

    /// Comparator-sorted catalog on the red-black tree.
    pub fn tree_catalog(cmp: Rc<CompareFn>) -> StoreSpec {
        StoreSpec::RedBlackTree { index: Index::ByFunction(cmp) }
    }

    /// Spatial store over `bounds` with the octant containment test `fit`.
    pub fn octree(bounds: Bounds, fit: Rc<SpatialFn>) -> StoreSpec {
        StoreSpec::Octree { bounds, fit }
    }

    pub fn storage(&self) -> StorageTag {
        match self {
            StoreSpec::LinkedList { .. } => StorageTag::LinkedList,
            StoreSpec::DynamicArray { .. } => StorageTag::DynamicArray,
            StoreSpec::PackedQueue { .. } => StorageTag::PackedQueue,
            StoreSpec::RedBlackTree { .. } => StorageTag::RedBlackTree,
            StoreSpec::Octree { .. } => StorageTag::Octree,
        }
    }

    pub fn indexing(&self) -> IndexingTag {
        match self {
            StoreSpec::LinkedList { index } | StoreSpec::DynamicArray { index, .. } => index.tag(),
            StoreSpec::PackedQueue { .. } => IndexingTag::ByInsertion,
            StoreSpec::RedBlackTree { index } => index.tag(),
            StoreSpec::Octree { .. } => IndexingTag::ByFunction,
        }
    }
}

impl fmt::Debug for StoreSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.storage(), self.indexing())
    }
}

pub(crate) enum Backend {
    List(List),
    Array(Array),
    Queue(PackedQueue),
    Tree(RbTree),
    Oct(Octree),
}

/// A record's child collection: the common header plus one backend.
pub struct Store {
    /// The record owning this store. Re-seated by the containing backend
    /// whenever that record is relocated.
    pub(crate) owner: *mut Record,
    pub(crate) writable: bool,
    auto_id: u64,
    count: usize,
    index: Index,
    backend: Backend,
}

impl Store {
    pub(crate) fn new(spec: StoreSpec, owner: *mut Record) -> Box<Store> {
        let (index, backend) = match spec {
            StoreSpec::LinkedList { index } => {
                assert!(!matches!(index, Index::Spatial(_)), "linked list cannot index spatially");
                (index, Backend::List(List::new()))
            }
            StoreSpec::DynamicArray { index, capacity } => {
                assert!(!matches!(index, Index::Spatial(_)), "dynamic array cannot index spatially");
                (index, Backend::Array(Array::new(capacity)))
            }
            StoreSpec::PackedQueue { segment } => {
                assert!(segment > 0, "packed queue needs a non-zero segment size");
                (Index::ByInsertion, Backend::Queue(PackedQueue::new(segment)))
            }
            StoreSpec::RedBlackTree { index } => {
                assert!(index.is_sorted(), "red-black tree store needs a sorted index");
                assert!(!matches!(index, Index::Spatial(_)), "red-black tree cannot index spatially");
                (index, Backend::Tree(RbTree::new()))
            }
            StoreSpec::Octree { bounds, fit } => {
                (Index::Spatial(fit.clone()), Backend::Oct(Octree::new(bounds, fit)))
            }
        };
        Box::new(Store { owner, writable: true, auto_id: 0, count: 0, index, backend })
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// Re-describes this store so a clone can allocate an equivalent one.
    pub(crate) fn spec(&self) -> StoreSpec {
        match &self.backend {
            Backend::List(_) => StoreSpec::LinkedList { index: self.index.clone() },
            Backend::Array(array) => {
                StoreSpec::DynamicArray { index: self.index.clone(), capacity: array.capacity() }
            }
            Backend::Queue(queue) => StoreSpec::PackedQueue { segment: queue.segment() },
            Backend::Tree(_) => StoreSpec::RedBlackTree { index: self.index.clone() },
            Backend::Oct(oct) => match &self.index {
                Index::Spatial(fit) => {
                    StoreSpec::Octree { bounds: oct.root_bounds(), fit: fit.clone() }
                }
                _ => unreachable!("octree store without a spatial index"),
            },
        }
    }

    pub(crate) fn index(&self) -> &Index {
        &self.index
    }

    pub(crate) fn storage(&self) -> StorageTag {
        match &self.backend {
            Backend::List(_) => StorageTag::LinkedList,
            Backend::Array(_) => StorageTag::DynamicArray,
            Backend::Queue(_) => StorageTag::PackedQueue,
            Backend::Tree(_) => StorageTag::RedBlackTree,
            Backend::Oct(_) => StorageTag::Octree,
        }
    }

    /// Next auto-assigned numeric identifier; never reclaimed.
    pub(crate) fn next_auto_id(&mut self) -> Id {
        let id = Id::numeric(self.auto_id);
        self.auto_id += 1;
        id
    }

    /// Places `rec` according to the index policy and returns its address
    /// inside the backend.
    pub(crate) fn add(&mut self, rec: Record) -> NonNull<Record> {
        let unique = matches!(self.index, Index::ByName);
        let inserted = match &mut self.backend {
            Backend::List(list) => {
                if self.index.is_sorted() {
                    list.sorted_insert(rec, &self.index, unique)
                } else {
                    list.push_back(rec)
                }
            }
            Backend::Array(array) => {
                if self.index.is_sorted() {
                    array.sorted_insert(rec, &self.index, unique)
                } else {
                    array.push_back(rec)
                }
            }
            Backend::Queue(queue) => queue.push_back(rec),
            Backend::Tree(tree) => tree.insert(rec, &self.index),
            Backend::Oct(oct) => oct.insert(rec),
        };
        self.count += 1;
        self.adopt(inserted);
        inserted
    }

    /// Insertion-ordered placement at either end.
    ///
    /// # Panics
    ///
    /// Panics when the store is not insertion-ordered; [`Record::append`]
    /// screens that off as a recoverable rejection before dispatching.
    pub(crate) fn append(&mut self, prepend: bool, rec: Record) -> NonNull<Record> {
        assert!(
            !self.index.is_sorted(),
            "{} store keeps {} order, not insertion order",
            self.storage(),
            self.index.tag()
        );
        let inserted = match &mut self.backend {
            Backend::List(list) => {
                if prepend {
                    list.push_front(rec)
                } else {
                    list.push_back(rec)
                }
            }
            Backend::Array(array) => {
                if prepend {
                    array.insert_at(0, rec)
                } else {
                    array.push_back(rec)
                }
            }
            Backend::Queue(queue) => {
                if prepend {
                    queue.push_front(rec)
                } else {
                    queue.push_back(rec)
                }
            }
            Backend::Tree(_) | Backend::Oct(_) => {
                panic!("{} store cannot take insertion-ordered records", self.storage())
            }
        };
        self.count += 1;
        self.adopt(inserted);
        inserted
    }

    fn adopt(&mut self, mut rec: NonNull<Record>) {
        unsafe {
            let rec = rec.as_mut();
            rec.parent = self as *mut Store;
            rec.relink();
        }
    }

    pub(crate) fn first(&self) -> Option<NonNull<Record>> {
        match &self.backend {
            Backend::List(list) => list.first(),
            Backend::Array(array) => array.first(),
            Backend::Queue(queue) => queue.first(),
            Backend::Tree(tree) => tree.first(),
            Backend::Oct(oct) => oct.first(),
        }
    }

    pub(crate) fn last(&self) -> Option<NonNull<Record>> {
        match &self.backend {
            Backend::List(list) => list.last(),
            Backend::Array(array) => array.last(),
            Backend::Queue(queue) => queue.last(),
            Backend::Tree(tree) => tree.last(),
            Backend::Oct(oct) => oct.last(),
        }
    }

    pub(crate) fn find_by_name(&self, id: Id) -> Option<NonNull<Record>> {
        match &self.backend {
            Backend::List(list) => list.find_by_name(id),
            Backend::Array(array) => array.find_by_name(id, matches!(self.index, Index::ByName)),
            Backend::Queue(queue) => queue.find_by_name(id),
            Backend::Tree(tree) => tree.find_by_name(id, &self.index),
            Backend::Oct(oct) => oct.find_by_name(id),
        }
    }

    /// Comparator lookup on a sorted store; `probe` carries the key fields
    /// the comparator inspects.
    ///
    /// # Panics
    ///
    /// Panics on stores with no pairwise order to search by.
    pub(crate) fn find_by_key(&self, probe: &Record) -> Option<NonNull<Record>> {
        assert!(
            self.index.is_sorted() && !matches!(self.index, Index::Spatial(_)),
            "{} store has no comparator lookup",
            self.storage()
        );
        match &self.backend {
            Backend::Tree(tree) => tree.find_by_key(probe, &self.index),
            Backend::List(list) => list.find_by_key(probe, &self.index),
            Backend::Array(array) => array.find_by_key(probe, &self.index),
            Backend::Queue(_) | Backend::Oct(_) => {
                panic!("{} store has no comparator lookup", self.storage())
            }
        }
    }

    pub(crate) fn find_by_position(&self, position: usize) -> Option<NonNull<Record>> {
        if position >= self.count {
            return None;
        }
        match &self.backend {
            Backend::List(list) => list.find_by_position(position),
            Backend::Array(array) => array.find_by_position(position),
            Backend::Queue(queue) => queue.find_by_position(position),
            Backend::Tree(tree) => tree.find_by_position(position),
            Backend::Oct(oct) => oct.find_by_position(position),
        }
    }

    pub(crate) fn prev_of(&self, child: *const Record) -> Option<NonNull<Record>> {
        match &self.backend {
            Backend::List(list) => list.prev_of(child),
            Backend::Array(array) => array.prev_of(child),
            Backend::Queue(queue) => queue.prev_of(child),
            Backend::Tree(tree) => tree.prev_of(child),
            Backend::Oct(oct) => oct.prev_of(child),
        }
    }

    pub(crate) fn next_of(&self, child: *const Record) -> Option<NonNull<Record>> {
        match &self.backend {
            Backend::List(list) => list.next_of(child),
            Backend::Array(array) => array.next_of(child),
            Backend::Queue(queue) => queue.next_of(child),
            Backend::Tree(tree) => tree.next_of(child),
            Backend::Oct(oct) => oct.next_of(child),
        }
    }

    /// Resumable name search. With `after` null this is a plain find; on a
    /// dictionary a non-null cursor ends the search, names being unique.
    pub(crate) fn next_by_name(&self, id: Id, after: *const Record) -> Option<NonNull<Record>> {
        if after.is_null() {
            return self.find_by_name(id);
        }
        if matches!(self.index, Index::ByName) {
            return None;
        }
        let mut cursor = self.next_of(after);
        while let Some(rec) = cursor {
            if unsafe { rec.as_ref() }.id() == id {
                return Some(rec);
            }
            cursor = self.next_of(rec.as_ptr());
        }
        None
    }

    /// Detaches `child` and moves it out. The result floats: its store
    /// back-pointer is re-seated when it lands in a store again, so upward
    /// navigation from inside a floating subtree stays undefined until
    /// then.
    pub(crate) fn take(&mut self, child: *mut Record) -> Record {
        let mut rec = match &mut self.backend {
            Backend::List(list) => list.take(child),
            Backend::Array(array) => array.take(child),
            Backend::Queue(queue) => queue.take(child),
            Backend::Tree(tree) => tree.take(child),
            Backend::Oct(oct) => oct.take(child),
        };
        self.count -= 1;
        rec.parent = std::ptr::null_mut();
        rec
    }

    pub(crate) fn take_first(&mut self) -> Option<Record> {
        let first = self.first()?;
        Some(self.take(first.as_ptr()))
    }

    pub(crate) fn take_last(&mut self) -> Option<Record> {
        let last = self.last()?;
        Some(self.take(last.as_ptr()))
    }

    /// Re-sorts the children in place under a new index policy.
    ///
    /// # Panics
    ///
    /// Panics on backends whose order is structural (packed queue,
    /// red-black tree, octree) once they hold more than one record.
    pub(crate) fn convert(&mut self, index: Index) {
        match &mut self.backend {
            Backend::List(list) => list.sort(&index),
            Backend::Array(array) => array.sort(&index),
            Backend::Queue(_) | Backend::Tree(_) | Backend::Oct(_) => {
                assert!(
                    self.count <= 1,
                    "{} store cannot be re-sorted in place",
                    self.storage()
                );
            }
        }
        self.index = index;
    }

    /// Finalizes every child; the store stays allocated, empty and
    /// writable.
    pub(crate) fn reset(&mut self) {
        match &mut self.backend {
            Backend::List(list) => list.clear(),
            Backend::Array(array) => array.clear(),
            Backend::Queue(queue) => queue.clear(),
            Backend::Tree(tree) => tree.clear(),
            Backend::Oct(oct) => oct.clear(),
        }
        self.count = 0;
        self.writable = true;
    }

    pub(crate) fn iter(&self) -> StoreIter<'_> {
        match &self.backend {
            Backend::List(list) => list.iter(),
            Backend::Array(array) => array.iter(),
            Backend::Queue(queue) => queue.iter(),
            Backend::Tree(tree) => tree.iter(self.count),
            Backend::Oct(oct) => oct.iter(),
        }
    }

    /// Walks the backend checking every structural invariant it declares:
    /// live-node count, parent and owner back-pointers, ordering, and the
    /// backend-specific shape (red-black coloring, octant containment).
    #[doc(hidden)]
    pub fn audit(&self) {
        let mut walked = 0;
        let mut prev: Option<NonNull<Record>> = None;
        for rec in self.iter() {
            walked += 1;
            let record = unsafe { rec.as_ref() };
            assert!(
                std::ptr::eq(record.parent, self),
                "child {} does not point back at its store",
                record.id()
            );
            record.assert_owner_seated();
            if let Some(prev) = prev
                && self.index.is_sorted()
                && !matches!(self.index, Index::Spatial(_))
            {
                let prev = unsafe { prev.as_ref() };
                assert!(
                    self.index.compare(prev, record) != Ordering::Greater,
                    "children {} and {} out of order",
                    prev.id(),
                    record.id()
                );
            }
            prev = Some(rec);
        }
        assert_eq!(self.count, walked, "store count drifted from live children");
        match &self.backend {
            Backend::Tree(tree) => tree.audit(),
            Backend::Oct(oct) => oct.audit(),
            _ => {}
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("storage", &self.storage())
            .field("indexing", &self.index.tag())
            .field("count", &self.count)
            .field("writable", &self.writable)
            .finish()
    }
}

/// Ordered walk over a store's records, dispatched per backend. The
/// red-black arm keeps the explicit in-order stack the traversal contract
/// calls for.
pub(crate) enum StoreIter<'a> {
    List(list::Iter<'a>),
    Array(array::Iter<'a>),
    Queue(queue::Iter<'a>),
    Tree(rbtree::Iter<'a>),
    Oct(octree::Iter<'a>),
}

impl Iterator for StoreIter<'_> {
    type Item = NonNull<Record>;

    fn next(&mut self) -> Option<NonNull<Record>> {
        match self {
            StoreIter::List(iter) => iter.next(),
            StoreIter::Array(iter) => iter.next(),
            StoreIter::Queue(iter) => iter.next(),
            StoreIter::Tree(iter) => iter.next(),
            StoreIter::Oct(iter) => iter.next(),
        }
    }
}
