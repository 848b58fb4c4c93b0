//! Collector-number parsing and validation.

use lazy_static::lazy_static;
use regex::{Regex, RegexSet};

use crate::error::{Result, TrackerError};

lazy_static! {
    static ref PREFIXED_NUMBER: Regex = Regex::new(r"^\w+-\d+$").unwrap();
    static ref VALID_NUMBER: RegexSet = RegexSet::new([
        r"^\d+/\d+$",
        r"^[A-Z]+\d+/[A-Z]*\d+$",
        r"^\d+$",
        r"^[A-Z]+\d+$",
        r"^[A-Za-z]+-\d+$",
        r"^[A-Za-z]+\d+[A-Za-z]*$",
        r"^[A-Z]{2,6}\d+$",
        r"^[A-Z]+\d+[A-Za-z]+$",
        r"^\d+[A-Z]+$",
        r"^[A-Za-z0-9]+-[A-Za-z0-9]+$",
    ])
    .unwrap();
}

/// Reduce a user-entered number to the form the providers index by.
///
/// `"25/102"` becomes `"25"`, `"Promo-001"` becomes `"001"`; anything else is
/// returned trimmed and unchanged.
pub fn parse_card_number(input: &str) -> String {
    let input = input.trim();
    if let Some((number, _total)) = input.split_once('/') {
        return number.trim().to_string();
    }
    if PREFIXED_NUMBER.is_match(input) {
        if let Some((_, number)) = input.split_once('-') {
            return number.trim().to_string();
        }
    }
    input.to_string()
}

/// Validate a user-entered number and return its parsed form.
pub fn validate_card_number(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidArgument(
            "Card number is required".to_string(),
        ));
    }
    if !VALID_NUMBER.is_match(trimmed) {
        return Err(TrackerError::InvalidArgument(format!(
            "Invalid card number '{}'. Examples: 25/102, TG20, SV001/SV198, V001, VMAX045",
            trimmed
        )));
    }
    Ok(parse_card_number(trimmed))
}

/// Whether the number is all ASCII digits.
pub(crate) fn is_numeric(number: &str) -> bool {
    !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
}

/// Left-pad a number with zeros to `width` characters.
pub(crate) fn zero_pad(number: &str, width: usize) -> String {
    format!("{:0>width$}", number, width = width)
}
