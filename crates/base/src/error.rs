// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Errors produced while packing text into identifiers.
///
/// The lossy entry points (`Id::word`, `Id::acronym`) collapse these into
/// `None`; the `try_` variants surface them so callers can report which
/// constraint a name violated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    #[error("name `{0}` does not fit the word alphabet")]
    WordAlphabet(String),

    #[error("name `{0}` exceeds {1} word characters")]
    WordLength(String, usize),

    #[error("name `{0}` does not fit the acronym alphabet")]
    AcronymAlphabet(String),

    #[error("name `{0}` exceeds {1} acronym characters")]
    AcronymLength(String, usize),

    #[error("empty name")]
    EmptyName,

    #[error("numeric identifier {0} exceeds the 60-bit payload")]
    NumericRange(u64),
}
