//! Normalization of free-text numeric form input.
//!
//! Form fields accept anything the user types. Every non-digit character is
//! dropped before parsing, so `"1,250"` reads as 1250 and `"-7"` as 7. Empty
//! or digit-free input reads as 0.

use regex::Regex;

use crate::numbers::saturating_u64_to_u32;

/// Strip every character that is not an ASCII digit.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    Regex::new(r"[^0-9]")
        .map(|re| re.replace_all(raw, "").into_owned())
        .unwrap_or_default()
}

/// Parse a resource count, saturating at `u64::MAX` for oversized input.
#[must_use]
pub fn normalize_count(raw: &str) -> u64 {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return 0;
    }
    if digits.len() != raw.trim().len() {
        log::debug!("normalized count input {raw:?} to digits {digits:?}");
    }
    // Only overflow can fail once the string is all digits.
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// Parse a track level, saturating at `u32::MAX`.
#[must_use]
pub fn normalize_level(raw: &str) -> u32 {
    saturating_u64_to_u32(normalize_count(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_signs() {
        assert_eq!(normalize_count("1,250"), 1250);
        assert_eq!(normalize_count(" 42 "), 42);
        assert_eq!(normalize_count("-7"), 7);
        assert_eq!(normalize_count("12abc3"), 123);
    }

    #[test]
    fn empty_and_non_numeric_read_as_zero() {
        assert_eq!(normalize_count(""), 0);
        assert_eq!(normalize_count("abc"), 0);
        assert_eq!(normalize_level("   "), 0);
    }

    #[test]
    fn oversized_input_saturates() {
        assert_eq!(normalize_count("99999999999999999999999"), u64::MAX);
        assert_eq!(normalize_level("5000000000"), u32::MAX);
    }

    #[test]
    fn leading_zeros_parse() {
        assert_eq!(normalize_level("007"), 7);
    }
}
