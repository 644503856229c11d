// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

//! In-memory hierarchical record engine: a tree of typed nodes acting as
//! books (containers), registers (data leaves) or links, over five
//! interchangeable child-storage backends. Layer 1 of the Canopy platform
//! and a self-contained programmable tree database on its own.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::Error;
pub use naming::{NAME_POOL, TYPE_ROOT};
pub use record::{
    AgentFn, Data, DataDrop, Entry, Kind, MAX_DEPTH, NEAR_CAPACITY, PATH_INLINE, Path, Record,
};
pub use store::{Bounds, CompareFn, Index, MIN_SUB_WIDE, SpatialFn, StoreSpec};
pub use system::{ROOT_ID, System};

mod error;
mod naming;
mod record;
mod store;
mod system;

pub type Result<T> = std::result::Result<T, Error>;
