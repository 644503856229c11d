// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! The public record API. Every operation resolves link records to their
//! target, then dispatches through the store attached to that target; the
//! backends stay invisible to callers.

use crate::record::{Body, Data, Path, Record};
use crate::store::{CompareFn, Index, StoreSpec};
use crate::{Error, Result};
use canopy_base::Id;
use std::ptr::NonNull;
use std::rc::Rc;
use tracing::instrument;

impl Record {
    /// Moves `child` into this record's store, honoring the store's
    /// indexing. A pending identifier is resolved from the store's auto-id
    /// counter here. Returns the child at its new address.
    ///
    /// # Panics
    ///
    /// Panics on duplicate dictionary keys, on records outside an octree's
    /// root cube, and when called on an agent record.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), child = %child.id()))]
    pub fn add(&mut self, mut child: Record) -> Result<&mut Record> {
        let me = self.resolve_mut();
        let store = me.ensure_store();
        if !store.writable {
            return Err(Error::NotWritable);
        }
        if child.id().is_auto() {
            let id = store.next_auto_id();
            child.set_id(id);
        }
        let rec = store.add(child);
        Ok(unsafe { &mut *rec.as_ptr() })
    }

    /// Places `child` at an end of an insertion-ordered store: the back,
    /// or the front when `prepend` is set.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), prepend))]
    pub fn append(&mut self, prepend: bool, mut child: Record) -> Result<&mut Record> {
        let me = self.resolve_mut();
        let store = me.ensure_store();
        if !store.writable {
            return Err(Error::NotWritable);
        }
        if store.index().is_sorted() {
            return Err(Error::Storage {
                storage: store.storage(),
                operation: "take records in insertion order",
            });
        }
        if child.id().is_auto() {
            let id = store.next_auto_id();
            child.set_id(id);
        }
        let rec = store.append(prepend, child);
        Ok(unsafe { &mut *rec.as_ptr() })
    }

    pub fn first(&self) -> Option<&Record> {
        self.resolve().store()?.first().map(|rec| unsafe { &*rec.as_ptr() })
    }

    pub fn first_mut(&mut self) -> Option<&mut Record> {
        self.resolve_mut().store_mut()?.first().map(|rec| unsafe { &mut *rec.as_ptr() })
    }

    pub fn last(&self) -> Option<&Record> {
        self.resolve().store()?.last().map(|rec| unsafe { &*rec.as_ptr() })
    }

    pub fn last_mut(&mut self) -> Option<&mut Record> {
        self.resolve_mut().store_mut()?.last().map(|rec| unsafe { &mut *rec.as_ptr() })
    }

    pub fn find_by_name(&self, id: Id) -> Option<&Record> {
        self.resolve().store()?.find_by_name(id).map(|rec| unsafe { &*rec.as_ptr() })
    }

    pub fn find_by_name_mut(&mut self, id: Id) -> Option<&mut Record> {
        self.resolve_mut().store_mut()?.find_by_name(id).map(|rec| unsafe { &mut *rec.as_ptr() })
    }

    /// Comparator lookup on a sorted store; `probe` carries whatever the
    /// comparator inspects.
    pub fn find_by_key(&self, probe: &Record) -> Option<&Record> {
        self.resolve().store()?.find_by_key(probe).map(|rec| unsafe { &*rec.as_ptr() })
    }

    pub fn find_by_key_mut(&mut self, probe: &Record) -> Option<&mut Record> {
        self.resolve_mut().store_mut()?.find_by_key(probe).map(|rec| unsafe { &mut *rec.as_ptr() })
    }

    /// Child at `position` in storage order.
    pub fn find_by_position(&self, position: usize) -> Option<&Record> {
        self.resolve().store()?.find_by_position(position).map(|rec| unsafe { &*rec.as_ptr() })
    }

    pub fn find_by_position_mut(&mut self, position: usize) -> Option<&mut Record> {
        self.resolve_mut()
            .store_mut()?
            .find_by_position(position)
            .map(|rec| unsafe { &mut *rec.as_ptr() })
    }

    /// Descends one name per level; links are resolved at every step.
    pub fn find_by_path(&self, path: &Path) -> Option<&Record> {
        let mut cur = self.resolve();
        for id in path.iter() {
            cur = cur.find_by_name(id)?;
        }
        Some(cur)
    }

    pub fn find_by_path_mut(&mut self, path: &Path) -> Option<&mut Record> {
        let mut cur = self.resolve_mut();
        for id in path.iter() {
            cur = cur.find_by_name_mut(id)?;
        }
        Some(cur)
    }

    /// Resumable name search: with a cursor, the scan continues after it;
    /// on a dictionary store a cursor ends the search, names being unique.
    pub fn find_next_by_name(&self, id: Id, after: Option<&Record>) -> Option<&Record> {
        let store = self.resolve().store()?;
        let cursor = after.map_or(std::ptr::null(), |rec| rec as *const Record);
        store.next_by_name(id, cursor).map(|rec| unsafe { &*rec.as_ptr() })
    }

    /// The sibling before this record, in its parent's storage order.
    pub fn prev_sibling(&self) -> Option<&Record> {
        let parent = NonNull::new(self.parent)?;
        unsafe { parent.as_ref() }.prev_of(self).map(|rec| unsafe { &*rec.as_ptr() })
    }

    /// The sibling after this record.
    pub fn next_sibling(&self) -> Option<&Record> {
        let parent = NonNull::new(self.parent)?;
        unsafe { parent.as_ref() }.next_of(self).map(|rec| unsafe { &*rec.as_ptr() })
    }

    /// Parent-side sibling navigation, for callers holding the book rather
    /// than the child.
    pub fn prev_of(&self, child: &Record) -> Option<&Record> {
        self.resolve().store()?.prev_of(child).map(|rec| unsafe { &*rec.as_ptr() })
    }

    pub fn next_of(&self, child: &Record) -> Option<&Record> {
        self.resolve().store()?.next_of(child).map(|rec| unsafe { &*rec.as_ptr() })
    }

    /// Moves the last child out into the caller's hands.
    pub fn child_take(&mut self) -> Option<Record> {
        self.resolve_mut().store_mut()?.take_last()
    }

    /// Moves the first child out into the caller's hands.
    pub fn child_pop(&mut self) -> Option<Record> {
        self.resolve_mut().store_mut()?.take_first()
    }

    /// Detaches the child named `id` and hands it over; dropping the
    /// result finalizes it.
    #[instrument(level = "trace", skip_all, fields(parent = %self.id(), child = %id))]
    pub fn remove_by_name(&mut self, id: Id) -> Option<Record> {
        let store = self.resolve_mut().store_mut()?;
        let child = store.find_by_name(id)?;
        Some(store.take(child.as_ptr()))
    }

    /// Detaches the child at `position` in storage order.
    pub fn remove_at(&mut self, position: usize) -> Option<Record> {
        let store = self.resolve_mut().store_mut()?;
        let child = store.find_by_position(position)?;
        Some(store.take(child.as_ptr()))
    }

    /// Re-sorts an unsorted store into dictionary order. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics on packed queue, red-black tree and octree stores holding
    /// more than one record; their order is structural.
    #[instrument(level = "trace", skip_all, fields(record = %self.id()))]
    pub fn to_dictionary(&mut self) {
        let me = self.resolve_mut();
        if me.indexing() == canopy_base::IndexingTag::ByName {
            return;
        }
        match &mut me.body {
            Body::Normal { store: Some(store), .. } => store.convert(Index::ByName),
            Body::Normal { spec, .. } => match spec {
                StoreSpec::LinkedList { index }
                | StoreSpec::DynamicArray { index, .. }
                | StoreSpec::RedBlackTree { index } => *index = Index::ByName,
                StoreSpec::PackedQueue { .. } => {
                    panic!("packed-queue store cannot become a dictionary")
                }
                StoreSpec::Octree { .. } => panic!("octree store cannot become a dictionary"),
            },
            _ => {}
        }
    }

    /// Re-sorts the children in place under `cmp` and keeps the store in
    /// that catalog order.
    ///
    /// # Panics
    ///
    /// As [`Record::to_dictionary`].
    #[instrument(level = "trace", skip_all, fields(record = %self.id()))]
    pub fn sort(&mut self, cmp: Rc<CompareFn>) {
        let me = self.resolve_mut();
        match &mut me.body {
            Body::Normal { store: Some(store), .. } => store.convert(Index::ByFunction(cmp)),
            Body::Normal { spec, .. } => match spec {
                StoreSpec::LinkedList { index }
                | StoreSpec::DynamicArray { index, .. }
                | StoreSpec::RedBlackTree { index } => *index = Index::ByFunction(cmp),
                StoreSpec::PackedQueue { .. } => {
                    panic!("packed-queue store cannot take a sort order")
                }
                StoreSpec::Octree { .. } => panic!("octree store cannot take a sort order"),
            },
            _ => {}
        }
    }

    /// Finalizes every child; the store stays, empty and writable.
    #[instrument(level = "trace", skip_all, fields(record = %self.id()))]
    pub fn branch_reset(&mut self) {
        if let Some(store) = self.resolve_mut().store_mut() {
            store.reset();
        }
    }

    /// Writes the identifiers from the root down to this record into
    /// `path`, reusing its allocation.
    pub fn path_into(&self, path: &mut Path) {
        path.clear();
        let mut cur = self;
        while let Some(parent) = cur.parent() {
            path.push(cur.id());
            cur = parent;
        }
        path.reverse();
    }

    pub fn path(&self) -> Path {
        let mut path = Path::new();
        self.path_into(&mut path);
        path
    }

    // -- data access ------------------------------------------------------

    /// The data payload, looked through links.
    pub fn data(&self) -> Option<&Data> {
        match &self.resolve().body {
            Body::Normal { data, .. } => data.as_deref(),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut Data> {
        match &mut self.resolve_mut().body {
            Body::Normal { data, .. } => data.as_deref_mut(),
            _ => None,
        }
    }

    /// Attaches a payload to a record that has none.
    pub fn set_data(&mut self, data: Data) -> Result<()> {
        match &mut self.resolve_mut().body {
            Body::Normal { data: slot, .. } => {
                if slot.is_some() {
                    return Err(Error::DataExists);
                }
                *slot = Some(Box::new(data));
                Ok(())
            }
            _ => Err(Error::NotWritable),
        }
    }

    /// The payload bytes; `None` for handle and stream payloads, whose
    /// content lives behind the library record.
    ///
    /// # Panics
    ///
    /// Panics on a normal record with no data at all: reading a register
    /// that was never given a value is a caller bug, not an empty result.
    pub fn read(&self) -> Option<&[u8]> {
        match &self.resolve().body {
            Body::Normal { data, .. } => {
                data.as_ref().expect("reading a record that owns no data").bytes()
            }
            _ => None,
        }
    }

    /// Copies payload bytes into `dest`, returning the copied length.
    pub fn read_into(&self, dest: &mut [u8]) -> Option<usize> {
        self.data()?.read_into(dest)
    }

    /// Overwrites the payload in place, within its capacity.
    pub fn update(&mut self, value: &[u8]) -> Result<()> {
        self.data_mut().ok_or(Error::NoData)?.update(value)
    }

    /// Replaces an owned buffer payload wholesale, transferring ownership
    /// of `value` in.
    pub fn update_swap(&mut self, value: Vec<u8>) -> Result<()> {
        self.data_mut().ok_or(Error::NoData)?.update_swap(value)
    }

    /// Zeroes the payload without releasing it.
    pub fn data_reset(&mut self) {
        if let Some(data) = self.data_mut() {
            data.reset();
        }
    }

    /// Drops the payload, running its destructor.
    pub fn data_delete(&mut self) {
        if let Body::Normal { data, .. } = &mut self.resolve_mut().body {
            *data = None;
        }
    }

    /// Walks the subtree checking every structural invariant the stores
    /// declare. Test support; not part of the public contract.
    #[doc(hidden)]
    pub fn audit_subtree(&self) {
        if let Some(store) = self.resolve().store() {
            store.audit();
            for child in store.iter() {
                unsafe { child.as_ref() }.audit_subtree();
            }
        }
    }
}
