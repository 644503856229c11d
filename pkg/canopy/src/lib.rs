// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! Umbrella crate re-exporting the Canopy record engine surface.
//!
//! ```
//! use canopy::{Id, Record, StoreSpec, System};
//!
//! let mut system = System::new();
//! let inbox = system
//!     .root_mut()
//!     .add(Record::book(Id::word("inbox").unwrap(), StoreSpec::array(4)))
//!     .unwrap();
//! inbox.append(false, Record::new(Id::auto())).unwrap();
//! assert_eq!(inbox.child_count(), 1);
//! ```

pub use canopy_base::{Attribute, Id, IdClass, IndexingTag, StorageTag, encoding};
pub use canopy_engine::{
    AgentFn, Bounds, CompareFn, Data, DataDrop, Entry, Error, Index, Kind, MAX_DEPTH,
    MIN_SUB_WIDE, NAME_POOL, NEAR_CAPACITY, PATH_INLINE, Path, Record, Result, ROOT_ID, SpatialFn,
    StoreSpec, System, TYPE_ROOT,
};
