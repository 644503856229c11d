// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use crate::{Error, Result};

/// Maximum word name length; 11 characters of 5 bits occupy 55 of the 60
/// payload bits.
pub const MAX_LEN: usize = 11;

const BITS: u32 = 5;
const CHAR_MASK: u64 = (1 << BITS) - 1;

fn encode_char(ch: u8) -> Option<u64> {
    match ch {
        b' ' => Some(0),
        b'a'..=b'z' => Some((ch - b'a' + 1) as u64),
        b':' => Some(27),
        b'_' => Some(28),
        b'-' => Some(29),
        b'.' => Some(30),
        b'/' => Some(31),
        _ => None,
    }
}

fn decode_char(code: u64) -> char {
    match code {
        0 => ' ',
        1..=26 => (b'a' + (code as u8 - 1)) as char,
        27 => ':',
        28 => '_',
        29 => '-',
        30 => '.',
        31 => '/',
        _ => unreachable!(),
    }
}

/// Packs a word name into its 55-bit payload, most-significant character
/// first. Surrounding spaces are trimmed before packing.
///
/// # Panics
///
/// Panics on upper-case ASCII; the word alphabet is lower-case only and a
/// capitalized name bound for it is a caller bug, not bad input.
pub fn pack(text: &str) -> Result<u64> {
    let trimmed = text.trim_matches(' ');
    assert!(
        !trimmed.bytes().any(|b| b.is_ascii_uppercase()),
        "upper-case character in word name {text:?}"
    );
    if trimmed.is_empty() {
        return Err(Error::EmptyName);
    }
    if trimmed.len() > MAX_LEN {
        return Err(Error::WordLength(text.to_string(), MAX_LEN));
    }

    let mut packed = 0u64;
    for (i, ch) in trimmed.bytes().enumerate() {
        let code = encode_char(ch).ok_or_else(|| Error::WordAlphabet(text.to_string()))?;
        packed |= code << ((MAX_LEN - 1 - i) as u32 * BITS);
    }
    Ok(packed)
}

/// Inverse of [`pack`]; trailing spaces (zero codes) are dropped.
pub fn unpack(packed: u64) -> String {
    let mut text = String::with_capacity(MAX_LEN);
    for i in 0..MAX_LEN {
        let code = (packed >> ((MAX_LEN - 1 - i) as u32 * BITS)) & CHAR_MASK;
        text.push(decode_char(code));
    }
    text.truncate(text.trim_end_matches(' ').len());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for name in ["a", "apple", "type:record", "n-1.2/x", "elevenchars"] {
            let packed = pack(name).unwrap();
            assert_eq!(unpack(packed), name, "{name}");
        }
    }

    #[test]
    fn test_trims_surrounding_spaces() {
        assert_eq!(pack("  apple "), pack("apple"));
    }

    #[test]
    fn test_interior_space_survives() {
        let packed = pack("a b").unwrap();
        assert_eq!(unpack(packed), "a b");
    }

    #[test]
    fn test_lexicographic_order() {
        let names = ["a", "aa", "apple", "apples", "b", "banana", "z/"];
        let mut packed: Vec<u64> = names.iter().map(|n| pack(n).unwrap()).collect();
        let sorted = packed.clone();
        packed.sort();
        assert_eq!(packed, sorted);
    }

    #[test]
    fn test_rejects_over_length() {
        assert_eq!(pack("twelve-chars"), Err(Error::WordLength("twelve-chars".into(), MAX_LEN)));
    }

    #[test]
    fn test_rejects_alphabet_misses() {
        assert!(matches!(pack("caf9"), Err(Error::WordAlphabet(_))));
        assert!(matches!(pack("a,b"), Err(Error::WordAlphabet(_))));
        assert_eq!(pack("   "), Err(Error::EmptyName));
    }

    #[test]
    #[should_panic(expected = "upper-case character")]
    fn test_upper_case_panics() {
        let _ = pack("Apple");
    }
}
