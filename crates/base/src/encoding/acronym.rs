// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use crate::{Error, Result};

/// Maximum acronym length; 9 characters of 6 bits occupy 54 of the 60
/// payload bits.
pub const MAX_LEN: usize = 9;

const BITS: u32 = 6;
const CHAR_MASK: u64 = (1 << BITS) - 1;
const BASE: u8 = 0x20;
const LAST: u8 = 0x5F;

/// Packs an acronym into its 54-bit payload, most-significant character
/// first. The alphabet is ASCII `0x20..=0x5F` shifted down by `0x20`, which
/// covers digits, upper-case letters and most punctuation; lower-case ASCII
/// is out of range. Surrounding spaces are trimmed before packing.
pub fn pack(text: &str) -> Result<u64> {
    let trimmed = text.trim_matches(' ');
    if trimmed.is_empty() {
        return Err(Error::EmptyName);
    }
    if trimmed.len() > MAX_LEN {
        return Err(Error::AcronymLength(text.to_string(), MAX_LEN));
    }

    let mut packed = 0u64;
    for (i, ch) in trimmed.bytes().enumerate() {
        if !(BASE..=LAST).contains(&ch) {
            return Err(Error::AcronymAlphabet(text.to_string()));
        }
        packed |= ((ch - BASE) as u64) << ((MAX_LEN - 1 - i) as u32 * BITS);
    }
    Ok(packed)
}

/// Inverse of [`pack`]; trailing spaces (zero codes) are dropped.
pub fn unpack(packed: u64) -> String {
    let mut text = String::with_capacity(MAX_LEN);
    for i in 0..MAX_LEN {
        let code = (packed >> ((MAX_LEN - 1 - i) as u32 * BITS)) & CHAR_MASK;
        text.push((code as u8 + BASE) as char);
    }
    text.truncate(text.trim_end_matches(' ').len());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for name in ["A", "CDP", "HTTP/2", "ISO-8601", "X+Y=Z", "@HOME", "NINECHARS"] {
            let packed = pack(name).unwrap();
            assert_eq!(unpack(packed), name, "{name}");
        }
    }

    #[test]
    fn test_trims_surrounding_spaces() {
        assert_eq!(pack(" CDP  "), pack("CDP"));
    }

    #[test]
    fn test_lexicographic_order() {
        let names = ["!", "A", "AB", "B", "B2", "Z"];
        let mut packed: Vec<u64> = names.iter().map(|n| pack(n).unwrap()).collect();
        let sorted = packed.clone();
        packed.sort();
        assert_eq!(packed, sorted);
    }

    #[test]
    fn test_rejects_over_length() {
        assert!(matches!(pack("TENCHARSXX"), Err(Error::AcronymLength(..))));
    }

    #[test]
    fn test_rejects_alphabet_misses() {
        assert!(matches!(pack("lower"), Err(Error::AcronymAlphabet(_))));
        assert!(matches!(pack("A~B"), Err(Error::AcronymAlphabet(_))));
    }
}
