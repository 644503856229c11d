// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use crate::encoding::{acronym, word};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

const PAYLOAD_BITS: u32 = 60;
const PAYLOAD_MASK: u64 = (1 << PAYLOAD_BITS) - 1;
const CLASS_SHIFT: u32 = PAYLOAD_BITS;

/// How the 60-bit payload of an [`Id`] is to be interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IdClass {
    /// Plain unsigned integer.
    Numeric = 0,
    /// Word-encoded text, 5-bit alphabet, up to 11 characters.
    Word = 1,
    /// Acronym-encoded text, 6-bit alphabet, up to 9 characters.
    Acronym = 2,
    /// Reserved engine-internal identifier.
    System = 3,
    /// Pending identifier; the owning store assigns a numeric one on insert.
    Auto = 4,
}

impl IdClass {
    fn from_bits(bits: u64) -> IdClass {
        match bits {
            0 => IdClass::Numeric,
            1 => IdClass::Word,
            2 => IdClass::Acronym,
            3 => IdClass::System,
            4 => IdClass::Auto,
            _ => unreachable!("invalid identifier class {bits}"),
        }
    }
}

/// A packed record identifier.
///
/// Layout is a single little-endian 64-bit word: bits 0–59 carry the
/// payload, bits 60–62 the [`IdClass`] tag, bit 63 stays zero. The class
/// lives in the high bits so raw unsigned comparison groups identifiers by
/// class and, within the word and acronym classes, orders them
/// lexicographically (see [`crate::encoding`]).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    /// Numeric identifier.
    ///
    /// # Panics
    ///
    /// Panics when `value` exceeds the 60-bit payload range.
    pub const fn numeric(value: u64) -> Id {
        assert!(value <= PAYLOAD_MASK, "numeric identifier exceeds the 60-bit payload");
        Id(value)
    }

    /// Reserved engine-internal identifier. The engine claims a handful of
    /// these for well-known records (the intern registry among them);
    /// embedders should treat the system class as opaque.
    pub const fn system(value: u64) -> Id {
        assert!(value <= PAYLOAD_MASK);
        Id(value | (IdClass::System as u64) << CLASS_SHIFT)
    }

    /// The pending sentinel; stores replace it with the next auto-id.
    pub const fn auto() -> Id {
        Id((IdClass::Auto as u64) << CLASS_SHIFT)
    }

    /// Word-encodes `text`, or `None` when it does not fit the alphabet or
    /// length limit. Upper-case input panics; see [`word::pack`].
    pub fn word(text: &str) -> Option<Id> {
        Id::try_word(text).ok()
    }

    /// Word-encodes `text`, reporting which constraint failed.
    pub fn try_word(text: &str) -> Result<Id> {
        Ok(Id(word::pack(text)? | (IdClass::Word as u64) << CLASS_SHIFT))
    }

    /// Acronym-encodes `text`, or `None` when it does not fit.
    pub fn acronym(text: &str) -> Option<Id> {
        Id::try_acronym(text).ok()
    }

    /// Acronym-encodes `text`, reporting which constraint failed.
    pub fn try_acronym(text: &str) -> Result<Id> {
        Ok(Id(acronym::pack(text)? | (IdClass::Acronym as u64) << CLASS_SHIFT))
    }

    /// Numeric identifier, surfacing range overflow instead of panicking.
    pub fn try_numeric(value: u64) -> Result<Id> {
        if value > PAYLOAD_MASK {
            return Err(Error::NumericRange(value));
        }
        Ok(Id(value))
    }

    pub fn class(self) -> IdClass {
        IdClass::from_bits(self.0 >> CLASS_SHIFT)
    }

    pub fn payload(self) -> u64 {
        self.0 & PAYLOAD_MASK
    }

    /// Whether this is the pending sentinel awaiting a store-assigned id.
    pub fn is_auto(self) -> bool {
        self.class() == IdClass::Auto
    }

    /// The raw 64-bit wire word.
    pub fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds an identifier from its wire word.
    ///
    /// # Panics
    ///
    /// Panics when the class bits or the reserved bit are invalid.
    pub fn from_bits(bits: u64) -> Id {
        assert_eq!(bits >> 63, 0, "reserved identifier bit set");
        let _ = IdClass::from_bits(bits >> CLASS_SHIFT);
        Id(bits)
    }

    /// Parses the textual form [`Id::to_text`] produces: decimal digits
    /// make a numeric id, lower-case names pack as words, and anything
    /// with upper-case falls to the acronym alphabet. System and auto ids
    /// have no parsable text form.
    pub fn parse(text: &str) -> Result<Id> {
        let trimmed = text.trim_matches(' ');
        if trimmed.is_empty() {
            return Err(Error::EmptyName);
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let value: u128 = trimmed.parse().map_err(|_| Error::NumericRange(u64::MAX))?;
            if value > PAYLOAD_MASK as u128 {
                return Err(Error::NumericRange(value.min(u64::MAX as u128) as u64));
            }
            return Ok(Id::numeric(value as u64));
        }
        if trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
            return Id::try_acronym(trimmed);
        }
        Id::try_word(trimmed).or_else(|_| Id::try_acronym(trimmed))
    }

    /// Decodes word and acronym identifiers back to text; numeric ids render
    /// in decimal. Auto has no textual form.
    pub fn to_text(self) -> Option<String> {
        match self.class() {
            IdClass::Numeric => Some(self.payload().to_string()),
            IdClass::Word => Some(word::unpack(self.payload())),
            IdClass::Acronym => Some(acronym::unpack(self.payload())),
            IdClass::System => Some(format!("sys:{}", self.payload())),
            IdClass::Auto => None,
        }
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("(auto)"),
        }
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:?}, {})", self.class(), self)
    }
}
