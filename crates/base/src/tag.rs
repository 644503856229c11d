// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Which concrete child-storage backend a record uses for its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StorageTag {
    #[default]
    LinkedList = 0,
    DynamicArray = 1,
    PackedQueue = 2,
    RedBlackTree = 3,
    Octree = 4,
}

impl Display for StorageTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StorageTag::LinkedList => f.write_str("linked-list"),
            StorageTag::DynamicArray => f.write_str("dynamic-array"),
            StorageTag::PackedQueue => f.write_str("packed-queue"),
            StorageTag::RedBlackTree => f.write_str("red-black-tree"),
            StorageTag::Octree => f.write_str("octree"),
        }
    }
}

/// How a store orders its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IndexingTag {
    #[default]
    ByInsertion = 0,
    ByName = 1,
    ByFunction = 2,
    ByHash = 3,
}

impl IndexingTag {
    /// Whether children are kept in a comparator-defined order rather than
    /// arrival order.
    pub fn is_sorted(self) -> bool {
        !matches!(self, IndexingTag::ByInsertion)
    }
}

impl Display for IndexingTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IndexingTag::ByInsertion => f.write_str("by-insertion"),
            IndexingTag::ByName => f.write_str("by-name"),
            IndexingTag::ByFunction => f.write_str("by-function"),
            IndexingTag::ByHash => f.write_str("by-hash"),
        }
    }
}

/// Attribute word carried by records and data payloads.
///
/// A plain bit set rather than an enum so the signal layer above can claim
/// bits of its own without touching this crate.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(u16);

impl Attribute {
    pub const NONE: Attribute = Attribute(0);
    /// Not visible outside its owning subtree.
    pub const PRIVATE: Attribute = Attribute(1 << 0);
    /// Immutable once written; also set on borrowed (non-owned) payloads.
    pub const FACTUAL: Attribute = Attribute(1 << 1);
    /// Skipped by traversals started by the embedder.
    pub const HIDDEN: Attribute = Attribute(1 << 2);
    /// Engine-owned record.
    pub const SYSTEM: Attribute = Attribute(1 << 3);

    pub fn contains(self, other: Attribute) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn with(self, other: Attribute) -> Attribute {
        Attribute(self.0 | other.0)
    }

    #[must_use]
    pub fn without(self, other: Attribute) -> Attribute {
        Attribute(self.0 & !other.0)
    }

    pub fn bits(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (bit, name) in [
            (Attribute::PRIVATE, "private"),
            (Attribute::FACTUAL, "factual"),
            (Attribute::HIDDEN, "hidden"),
            (Attribute::SYSTEM, "system"),
        ] {
            if self.contains(bit) {
                set.entry(&name);
            }
        }
        set.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_bits() {
        let attr = Attribute::NONE.with(Attribute::FACTUAL).with(Attribute::SYSTEM);
        assert!(attr.contains(Attribute::FACTUAL));
        assert!(attr.contains(Attribute::SYSTEM));
        assert!(!attr.contains(Attribute::PRIVATE));
        assert!(!attr.without(Attribute::FACTUAL).contains(Attribute::FACTUAL));
    }

    #[test]
    fn test_tag_wire_values() {
        assert_eq!(StorageTag::Octree as u8, 4);
        assert_eq!(IndexingTag::ByHash as u8, 3);
    }

    #[test]
    fn test_sorted_indexing() {
        assert!(!IndexingTag::ByInsertion.is_sorted());
        assert!(IndexingTag::ByName.is_sorted());
        assert!(IndexingTag::ByFunction.is_sorted());
    }
}
