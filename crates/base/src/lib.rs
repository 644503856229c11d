// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::Error;
pub use id::{Id, IdClass};
pub use tag::{Attribute, IndexingTag, StorageTag};

pub mod encoding;
mod error;
mod id;
mod tag;

pub type Result<T> = std::result::Result<T, Error>;
