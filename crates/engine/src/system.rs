// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Root record and engine lifecycle. The root is a name-sorted dictionary
//! on the red-black backend; every namespace the layers above care about
//! ("system", "user", "public", ...) is just a child they create — the
//! engine attaches no meaning to any of them.

use crate::naming;
use crate::record::Record;
use crate::store::StoreSpec;
use canopy_base::{Attribute, Id};
use std::borrow::Cow;
use tracing::instrument;

/// Identifier of the root record itself.
pub const ROOT_ID: Id = Id::system(0);

/// Owns the record tree: one root record, created at initiation, torn
/// down — children first — at shutdown or drop.
pub struct System {
    root: Box<Record>,
}

impl System {
    #[instrument(level = "debug", name = "system::new")]
    pub fn new() -> System {
        let root = Box::new(
            Record::book(ROOT_ID, StoreSpec::tree_dictionary()).with_attribute(Attribute::SYSTEM),
        );
        System { root }
    }

    pub fn root(&self) -> &Record {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Record {
        &mut self.root
    }

    /// Packs `text` into an identifier: word-encodable names pack
    /// directly, everything else goes through the intern registry.
    pub fn name_id(&mut self, text: &str) -> Id {
        match Id::word(text) {
            Some(id) => id,
            None => self.intern(text),
        }
    }

    /// Interns `text`, copying its bytes into the registry.
    pub fn intern(&mut self, text: &str) -> Id {
        naming::intern(&mut self.root, text, Cow::Owned(text.as_bytes().to_vec()))
    }

    /// Interns a static string without copying; the entry is marked
    /// factual.
    pub fn intern_static(&mut self, text: &'static str) -> Id {
        naming::intern(&mut self.root, text, Cow::Borrowed(text.as_bytes()))
    }

    /// Text of `id`: word and acronym ids decode directly, numeric ids go
    /// through the intern registry.
    pub fn resolve_name(&self, id: Id) -> Option<String> {
        use canopy_base::IdClass;
        match id.class() {
            IdClass::Word | IdClass::Acronym => id.to_text(),
            IdClass::Numeric => naming::resolve(&self.root, id),
            IdClass::System | IdClass::Auto => None,
        }
    }

    /// Recursively finalizes every descendant, then the root itself.
    #[instrument(level = "debug", name = "system::shutdown", skip(self))]
    pub fn shutdown(mut self) {
        self.root.branch_reset();
    }
}

impl Default for System {
    fn default() -> System {
        System::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_base::IndexingTag;
    use canopy_base::StorageTag;

    #[test]
    fn test_root_is_a_tree_dictionary() {
        let system = System::new();
        assert_eq!(system.root().id(), ROOT_ID);
        assert_eq!(system.root().storage(), StorageTag::RedBlackTree);
        assert_eq!(system.root().indexing(), IndexingTag::ByName);
        assert_eq!(system.root().child_count(), 0);
    }

    #[test]
    fn test_namespaces_are_plain_children() {
        let mut system = System::new();
        for name in ["system", "user", "public", "data", "network", "temp"] {
            system.root_mut().add(Record::new(Id::word(name).unwrap())).unwrap();
        }
        assert_eq!(system.root().child_count(), 6);
        let names: Vec<String> = {
            let mut out = Vec::new();
            system.root_mut().traverse(|entry| {
                out.push(entry.record.id().to_string());
                true
            });
            out
        };
        assert_eq!(names, ["data", "network", "public", "system", "temp", "user"]);
        system.shutdown();
    }

    #[test]
    fn test_name_id_splits_on_word_fit() {
        let mut system = System::new();
        let short = system.name_id("inbox");
        let long = system.name_id("a name too long to pack");
        assert_eq!(short, Id::word("inbox").unwrap());
        assert_eq!(system.resolve_name(short).as_deref(), Some("inbox"));
        assert_eq!(system.resolve_name(long).as_deref(), Some("a name too long to pack"));
    }
}
