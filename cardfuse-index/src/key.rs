//! Canonical key normalization
//!
//! A canonical key is a one-letter deck code followed by the card number
//! zero-padded to three digits (`A` + `7` → `A007`). Sources that carry
//! structured identity hand us the two parts separately; this module is the
//! only place that joins them.

use crate::types::CanonicalKey;

/// Deck codes accepted by the primary catalog
pub const VALID_GROUP_CODES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Width the numeric part of a key is padded to
pub const SEQUENCE_WIDTH: usize = 3;

/// Join a group code and a raw sequence number into a key string
///
/// - empty number → empty string (the caller rejects the row)
/// - integer number → zero-padded to [`SEQUENCE_WIDTH`]
/// - anything else → used verbatim
///
/// The group code is trimmed and prepended when non-empty. Never fails.
pub fn normalize(group: &str, number: &str) -> String {
    let number = number.trim();
    if number.is_empty() {
        return String::new();
    }

    let padded = match number.parse::<i64>() {
        Ok(n) => format!("{:0width$}", n, width = SEQUENCE_WIDTH),
        Err(_) => number.to_string(),
    };

    let group = group.trim();
    if group.is_empty() {
        padded
    } else {
        format!("{}{}", group, padded)
    }
}

/// Normalize into a [`CanonicalKey`], `None` when the number is empty
pub fn canonical_key(group: &str, number: &str) -> Option<CanonicalKey> {
    CanonicalKey::parse(&normalize(group, number))
}

/// Whether `group` is one of the catalog's deck codes
pub fn is_valid_group(group: &str) -> bool {
    VALID_GROUP_CODES.contains(&group.trim())
}
