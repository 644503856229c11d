// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Name interning. Short names pack straight into word or acronym
//! identifiers; anything longer is stored once in the intern registry — a
//! record subtree under the type root — and referred to by the compact
//! numeric id the registry assigned it.

use crate::record::{Data, Record};
use crate::store::StoreSpec;
use canopy_base::{Attribute, Id};
use std::borrow::Cow;
use tracing::{instrument, trace};

/// Well-known child of the root holding engine type information.
pub const TYPE_ROOT: Id = Id::system(1);

/// Well-known child of the type root holding interned names.
pub const NAME_POOL: Id = Id::system(2);

/// Payload tag carried by every interned name entry.
const NAME_TAG: Id = Id::system(3);

/// The intern registry, created under the type root on first use.
fn pool(root: &mut Record) -> &mut Record {
    if root.find_by_name(TYPE_ROOT).is_none() {
        root.add(
            Record::book(TYPE_ROOT, StoreSpec::tree_dictionary()).with_attribute(Attribute::SYSTEM),
        )
        .expect("root store is writable");
    }
    let types = root.find_by_name_mut(TYPE_ROOT).expect("type root exists");
    if types.find_by_name(NAME_POOL).is_none() {
        types
            .add(Record::book(NAME_POOL, StoreSpec::list()).with_attribute(Attribute::SYSTEM))
            .expect("type root store is writable");
    }
    types.find_by_name_mut(NAME_POOL).expect("name pool exists")
}

fn find(pool: &Record, text: &str) -> Option<Id> {
    let mut found = None;
    pool.traverse(|entry| {
        let matches = entry
            .record
            .data()
            .and_then(Data::bytes)
            .is_some_and(|bytes| bytes == text.as_bytes());
        if matches {
            found = Some(entry.record.id());
        }
        !matches
    });
    found
}

/// Interns `text` and returns its registry id; an exact byte match reuses
/// the existing entry.
#[instrument(level = "trace", skip(root, bytes))]
pub(crate) fn intern(root: &mut Record, text: &str, bytes: Cow<'static, [u8]>) -> Id {
    let pool = pool(root);
    if let Some(id) = find(pool, text) {
        return id;
    }
    let data = match bytes {
        Cow::Borrowed(bytes) => Data::borrowed(NAME_POOL, NAME_TAG, bytes),
        Cow::Owned(bytes) => {
            let mut data = Data::buffer(NAME_POOL, NAME_TAG, bytes);
            data.seal();
            data
        }
    };
    let id = pool
        .add(Record::register(Id::auto(), data).with_attribute(Attribute::SYSTEM))
        .expect("name pool store is writable")
        .id();
    trace!(%id, "interned name");
    id
}

/// Maps an interned id back to its text.
pub(crate) fn resolve(root: &Record, id: Id) -> Option<String> {
    let types = root.find_by_name(TYPE_ROOT)?;
    let pool = types.find_by_name(NAME_POOL)?;
    let entry = pool.find_by_name(id)?;
    let bytes = entry.data()?.bytes()?;
    String::from_utf8(bytes.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_root() -> Record {
        Record::book(Id::system(0), StoreSpec::tree_dictionary())
    }

    #[test]
    fn test_intern_assigns_and_reuses_ids() {
        let mut root = test_root();
        let first = intern(&mut root, "a rather long name", Cow::Owned(b"a rather long name".to_vec()));
        let again = intern(&mut root, "a rather long name", Cow::Owned(b"a rather long name".to_vec()));
        let other = intern(&mut root, "another long name", Cow::Owned(b"another long name".to_vec()));
        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[test]
    fn test_resolve_round_trip() {
        let mut root = test_root();
        let id = intern(&mut root, "some/deep/path name", Cow::Owned(b"some/deep/path name".to_vec()));
        assert_eq!(resolve(&root, id).as_deref(), Some("some/deep/path name"));
    }

    #[test]
    fn test_static_names_are_factual() {
        let mut root = test_root();
        let id = intern(&mut root, "borrowed name text", Cow::Borrowed(b"borrowed name text"));
        let types = root.find_by_name(TYPE_ROOT).unwrap();
        let pool = types.find_by_name(NAME_POOL).unwrap();
        let entry = pool.find_by_name(id).unwrap();
        assert!(entry.data().unwrap().attribute.contains(Attribute::FACTUAL));
        assert!(!entry.data().unwrap().writable());
    }
}
