// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Shallow and deep traversal. The deep walk is iterative: an explicit
//! frame stack lives inline up to [`MAX_DEPTH`] levels and spills to the
//! heap past that, so no tree shape can exhaust the call stack.

use crate::record::{Entry, Record};
use crate::store::StoreIter;
use smallvec::SmallVec;
use std::ptr::NonNull;
use tracing::instrument;

/// Depth the deep-traversal stack handles without heap allocation.
pub const MAX_DEPTH: usize = 64;

struct Frame<'a> {
    /// Book whose children this frame is walking.
    record: &'a Record,
    iter: StoreIter<'a>,
    /// Next child due, pulled one ahead so entries can expose it.
    upcoming: Option<NonNull<Record>>,
    prev: Option<NonNull<Record>>,
    position: usize,
    /// Neighborhood of `record` itself in its parent, captured when this
    /// frame was pushed; replayed for the post callback.
    made_prev: Option<NonNull<Record>>,
    made_next: Option<NonNull<Record>>,
    made_position: usize,
}

fn deref<'a>(rec: Option<NonNull<Record>>) -> Option<&'a Record> {
    rec.map(|rec| unsafe { &*rec.as_ptr() })
}

impl Record {
    /// Visits the direct children in storage order. The callback returns
    /// `false` to stop early; the traversal then reports `false`.
    pub fn traverse<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(&Entry<'_>) -> bool,
    {
        let rec = self.resolve();
        let Some(store) = rec.store() else {
            return true;
        };
        let mut iter = store.iter();
        let mut upcoming = iter.next();
        let mut prev = None;
        let mut position = 0;
        while let Some(cur) = upcoming {
            upcoming = iter.next();
            let entry = Entry {
                parent: Some(rec),
                prev: deref(prev),
                record: unsafe { &*cur.as_ptr() },
                next: deref(upcoming),
                position,
                depth: 0,
            };
            if !visit(&entry) {
                return false;
            }
            prev = Some(cur);
            position += 1;
        }
        true
    }

    /// Depth-first walk over every descendant without recursion.
    ///
    /// `pre` runs for each record as it is reached; `post` runs for each
    /// book as its subtree is left — and never for the traversal root.
    /// Links are visited as records but not followed downward. Either
    /// callback returns `false` to abandon the walk.
    #[instrument(level = "trace", skip_all, fields(root = %self.id()))]
    pub fn deep_traverse<Pre, Post>(&self, mut pre: Pre, mut post: Post) -> bool
    where
        Pre: FnMut(&Entry<'_>) -> bool,
        Post: FnMut(&Entry<'_>) -> bool,
    {
        let root = self.resolve();
        let Some(store) = root.store() else {
            return true;
        };
        if store.count() == 0 {
            return true;
        }

        let mut stack: SmallVec<[Frame<'_>; MAX_DEPTH]> = SmallVec::new();
        let mut iter = store.iter();
        let upcoming = iter.next();
        stack.push(Frame {
            record: root,
            iter,
            upcoming,
            prev: None,
            position: 0,
            made_prev: None,
            made_next: None,
            made_position: 0,
        });

        while !stack.is_empty() {
            let top = stack.len() - 1;
            match stack[top].upcoming {
                Some(cur) => {
                    stack[top].upcoming = stack[top].iter.next();
                    let record = unsafe { &*cur.as_ptr() };
                    let entry = Entry {
                        parent: Some(stack[top].record),
                        prev: deref(stack[top].prev),
                        record,
                        next: deref(stack[top].upcoming),
                        position: stack[top].position,
                        depth: top,
                    };
                    if !pre(&entry) {
                        return false;
                    }
                    let made_prev = stack[top].prev;
                    let made_next = stack[top].upcoming;
                    let made_position = stack[top].position;
                    stack[top].prev = Some(cur);
                    stack[top].position += 1;

                    if let Some(child_store) = record.store()
                        && child_store.count() > 0
                    {
                        let mut child_iter = child_store.iter();
                        let child_upcoming = child_iter.next();
                        stack.push(Frame {
                            record,
                            iter: child_iter,
                            upcoming: child_upcoming,
                            prev: None,
                            position: 0,
                            made_prev,
                            made_next,
                            made_position,
                        });
                    }
                }
                None => {
                    let done = stack.pop().expect("frame stack underflow");
                    if let Some(parent) = stack.last() {
                        let entry = Entry {
                            parent: Some(parent.record),
                            prev: deref(done.made_prev),
                            record: done.record,
                            next: deref(done.made_next),
                            position: done.made_position,
                            depth: stack.len() - 1,
                        };
                        if !post(&entry) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}
