// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! The universal tree node: metadata plus an optional data payload and an
//! optional child store, or — for links and agents — a reference in their
//! place.

pub use data::{Data, DataDrop, NEAR_CAPACITY};
pub use entry::Entry;
pub use path::{PATH_INLINE, Path};
pub use traverse::MAX_DEPTH;

pub mod data;
mod entry;
mod ops;
mod path;
mod traverse;

use crate::store::{Store, StoreSpec};
use canopy_base::{Attribute, Id, IndexingTag, StorageTag};
use std::cell::Cell;
use std::fmt;
use std::ptr::{self, NonNull};

/// Behavior bound to an agent record; opaque to the engine, invoked by the
/// signal layer above it.
pub type AgentFn = fn(&mut Record) -> bool;

/// What a record is: a plain node, an alias, or a behavior address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Normal,
    Link,
    Agent,
}

pub(crate) enum Body {
    Normal {
        data: Option<Box<Data>>,
        /// Backend description used when the first child arrives; a record
        /// that never has children never allocates a store.
        spec: StoreSpec,
        store: Option<Box<Store>>,
    },
    Link {
        target: NonNull<Record>,
    },
    Agent {
        address: AgentFn,
    },
}

/// The universal node of the record tree.
///
/// Records live inline inside their parent's store backend. The engine
/// re-seats the `store.owner` back-pointer whenever a backend relocates a
/// record; the store allocation itself is stable, so child→parent pointers
/// survive relocation untouched.
pub struct Record {
    id: Id,
    attribute: Attribute,
    /// Links and shadow aliases currently observing this record.
    shadows: Cell<u32>,
    /// The store containing this record; null for the root and for records
    /// not yet inserted anywhere.
    pub(crate) parent: *mut Store,
    pub(crate) body: Body,
}

impl Record {
    /// Empty normal record; children, if any ever arrive, go to a plain
    /// insertion-ordered list.
    pub fn new(id: Id) -> Record {
        Record::book(id, StoreSpec::list())
    }

    /// Record carrying a data payload.
    pub fn register(id: Id, data: Data) -> Record {
        let mut rec = Record::new(id);
        match &mut rec.body {
            Body::Normal { data: slot, .. } => *slot = Some(Box::new(data)),
            _ => unreachable!(),
        }
        rec
    }

    /// Container record whose children will live in the storage `spec`
    /// describes.
    pub fn book(id: Id, spec: StoreSpec) -> Record {
        Record {
            id,
            attribute: Attribute::NONE,
            shadows: Cell::new(0),
            parent: ptr::null_mut(),
            body: Body::Normal { data: None, spec, store: None },
        }
    }

    /// Alias observing `target`; reads and child operations forward to it.
    /// The target cannot be finalized while the link exists.
    ///
    /// The caller keeps `target` at a stable address for the lifetime of
    /// the link: records inside relocating backends (dynamic array,
    /// octree) do not qualify.
    pub fn link(id: Id, target: &Record) -> Record {
        target.hold_shadow();
        Record {
            id,
            attribute: Attribute::NONE,
            shadows: Cell::new(0),
            parent: ptr::null_mut(),
            body: Body::Link { target: NonNull::from(target) },
        }
    }

    /// Behavior record holding an opaque function address.
    pub fn agent(id: Id, address: AgentFn) -> Record {
        Record {
            id,
            attribute: Attribute::NONE,
            shadows: Cell::new(0),
            parent: ptr::null_mut(),
            body: Body::Agent { address },
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Record {
        self.attribute = self.attribute.with(attribute);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Data) -> Record {
        match &mut self.body {
            Body::Normal { data: slot, .. } => {
                assert!(slot.is_none(), "record already owns a data payload");
                *slot = Some(Box::new(data));
            }
            _ => panic!("only normal records carry data"),
        }
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn kind(&self) -> Kind {
        match &self.body {
            Body::Normal { .. } => Kind::Normal,
            Body::Link { .. } => Kind::Link,
            Body::Agent { .. } => Kind::Agent,
        }
    }

    /// Storage backend the record's children use (or would use).
    pub fn storage(&self) -> StorageTag {
        match &self.resolve().body {
            Body::Normal { store: Some(store), .. } => store.storage(),
            Body::Normal { spec, .. } => spec.storage(),
            _ => StorageTag::LinkedList,
        }
    }

    /// Ordering of the record's children.
    pub fn indexing(&self) -> IndexingTag {
        match &self.resolve().body {
            Body::Normal { store: Some(store), .. } => store.index().tag(),
            Body::Normal { spec, .. } => spec.indexing(),
            _ => IndexingTag::ByInsertion,
        }
    }

    /// Number of children; zero for records without a store.
    pub fn child_count(&self) -> usize {
        match &self.resolve().body {
            Body::Normal { store: Some(store), .. } => store.count(),
            _ => 0,
        }
    }

    pub fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    /// The record containing this one, `None` at the root or while
    /// floating.
    pub fn parent(&self) -> Option<&Record> {
        if self.parent.is_null() {
            return None;
        }
        unsafe { Some(&*(*self.parent).owner) }
    }

    /// Follows link records to the real node they observe.
    pub fn resolve(&self) -> &Record {
        let mut cur = self;
        while let Body::Link { target } = &cur.body {
            cur = unsafe { target.as_ref() };
        }
        cur
    }

    pub(crate) fn resolve_mut(&mut self) -> &mut Record {
        let mut cur = NonNull::from(self);
        loop {
            match unsafe { &mut cur.as_mut().body } {
                Body::Link { target } => cur = *target,
                _ => return unsafe { cur.as_mut() },
            }
        }
    }

    /// The target a link record observes; `None` for non-links.
    pub fn link_target(&self) -> Option<&Record> {
        match &self.body {
            Body::Link { target } => Some(unsafe { target.as_ref() }),
            _ => None,
        }
    }

    /// The function address of an agent record.
    pub fn agent_address(&self) -> Option<AgentFn> {
        match &self.body {
            Body::Agent { address } => Some(*address),
            _ => None,
        }
    }

    /// How many links and shadow aliases observe this record.
    pub fn shadow_count(&self) -> u32 {
        self.shadows.get()
    }

    pub(crate) fn hold_shadow(&self) {
        self.shadows.set(self.shadows.get() + 1);
    }

    pub(crate) fn release_shadow(&self) {
        debug_assert!(self.shadows.get() > 0, "shadow count underflow");
        self.shadows.set(self.shadows.get() - 1);
    }

    /// Re-seats the owner back-pointer of this record's store after the
    /// record was moved in memory. Backends call this for every record
    /// they relocate.
    pub(crate) fn relink(&mut self) {
        let me = self as *mut Record;
        if let Body::Normal { store: Some(store), .. } = &mut self.body {
            store.owner = me;
        }
    }

    #[doc(hidden)]
    pub fn assert_owner_seated(&self) {
        if let Body::Normal { store: Some(store), .. } = &self.body {
            assert!(
                ptr::eq(store.owner, self),
                "store of {} points at a stale owner address",
                self.id
            );
        }
    }

    pub(crate) fn store(&self) -> Option<&Store> {
        match &self.body {
            Body::Normal { store, .. } => store.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn store_mut(&mut self) -> Option<&mut Store> {
        match &mut self.body {
            Body::Normal { store, .. } => store.as_deref_mut(),
            _ => None,
        }
    }

    /// The child store, allocating it from the spec on first use.
    ///
    /// # Panics
    ///
    /// Panics for links (callers resolve first) and agents, which have no
    /// children.
    pub(crate) fn ensure_store(&mut self) -> &mut Store {
        let me = self as *mut Record;
        match &mut self.body {
            Body::Normal { store, spec, .. } => {
                store.get_or_insert_with(|| Store::new(spec.clone(), me))
            }
            _ => panic!("link and agent records have no child store"),
        }
    }

    /// Deep copy under a new identifier: metadata, data payload and — for
    /// books — every descendant. The copy floats until inserted; links are
    /// cloned as additional observers of the same target.
    pub fn clone_as(&self, id: Id) -> Record {
        match &self.body {
            Body::Normal { data, spec, store } => {
                let spec = store.as_ref().map_or_else(|| spec.clone(), |s| s.spec());
                let mut rec = Record::book(id, spec);
                rec.attribute = self.attribute;
                if let Body::Normal { data: slot, .. } = &mut rec.body {
                    *slot = data.as_ref().map(|d| Box::new(d.clone_payload()));
                }
                if let Some(store) = store {
                    for child in store.iter() {
                        let child = unsafe { child.as_ref() };
                        rec.add(child.clone_as(child.id()))
                            .expect("clone target store is writable");
                    }
                }
                rec
            }
            Body::Link { target } => Record::link(id, unsafe { target.as_ref() })
                .with_attribute(self.attribute),
            Body::Agent { address } => {
                Record::agent(id, *address).with_attribute(self.attribute)
            }
        }
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert_eq!(
                self.shadows.get(),
                0,
                "finalizing record {} while {} shadows observe it",
                self.id,
                self.shadows.get()
            );
        }
        if let Body::Link { target } = &self.body {
            unsafe { target.as_ref() }.release_shadow();
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Record");
        s.field("id", &self.id).field("kind", &self.kind());
        if self.attribute != Attribute::NONE {
            s.field("attribute", &self.attribute);
        }
        if let Body::Normal { data, store, .. } = &self.body {
            if let Some(data) = data {
                s.field("data", data);
            }
            if let Some(store) = store {
                s.field("store", store);
            }
        }
        s.finish()
    }
}
