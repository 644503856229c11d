// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use canopy_base::StorageTag;

/// Runtime rejections surfaced to the immediate caller.
///
/// Precondition violations (unsupported backend operation, duplicate
/// dictionary key, octree spatial overflow, finalizing a shadowed record)
/// are not errors: they panic. Lookup misses are `Option::None`. What
/// remains here are policy rejections a caller may legitimately recover
/// from.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("record or payload is not writable")]
    NotWritable,

    #[error("record already owns a data payload")]
    DataExists,

    #[error("record owns no data payload")]
    NoData,

    #[error("payload of {needed} bytes exceeds the capacity of {capacity}")]
    Capacity { needed: usize, capacity: usize },

    #[error("{storage} store cannot {operation}")]
    Storage { storage: StorageTag, operation: &'static str },
}
