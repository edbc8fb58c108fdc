//! Decimal string range checks.
//!
//! Values are compared purely as strings: the magnitudes are left padded with zeros to an equal
//! length and then compared lexicographically. This allows bounds of any width to be checked
//! without ever parsing into a fixed width integer.
//!
//! A zero magnitude is never negative, so `-0` compares equal to `0`. An empty magnitude is
//! treated as zero, patterns are responsible for rejecting empty values. Any value whose magnitude
//! holds something other than ASCII digits is out of bounds.

use std::cmp::Ordering;

/// Check that `value <= max`.
pub fn check_max(value: &str, max: &str) -> bool {
    is_decimal(value) && compare(value, max) != Ordering::Greater
}

/// Check that `value >= min`.
pub fn check_min(value: &str, min: &str) -> bool {
    is_decimal(value) && compare(value, min) != Ordering::Less
}

/// Check that the given value falls within the optional inclusive bounds.
pub fn within_bounds(value: &str, min: Option<&str>, max: Option<&str>) -> bool {
    max.map(|max| check_max(value, max)).unwrap_or(true) && min.map(|min| check_min(value, min)).unwrap_or(true)
}

/// Compare two optionally signed decimal strings by numeric value.
pub fn compare(lhs: &str, rhs: &str) -> Ordering {
    let (lhs_neg, lhs_mag) = split_sign(lhs);
    let (rhs_neg, rhs_mag) = split_sign(rhs);
    match (lhs_neg, rhs_neg) {
        (false, false) => compare_magnitude(lhs_mag, rhs_mag),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // Larger magnitudes are smaller numbers on the negative side.
        (true, true) => compare_magnitude(rhs_mag, lhs_mag),
    }
}

/// Split the sign from the magnitude of a decimal string.
fn split_sign(val: &str) -> (bool, &str) {
    match val.strip_prefix('-') {
        Some(mag) => (!is_zero(mag), mag),
        None => (false, val),
    }
}

/// Check that the given value is an optionally signed run of ASCII digits.
fn is_decimal(val: &str) -> bool {
    let mag = val.strip_prefix('-').unwrap_or(val);
    mag.bytes().all(|b| b.is_ascii_digit())
}

fn is_zero(mag: &str) -> bool {
    mag.chars().all(|c| c == '0')
}

/// Compare two unsigned magnitudes after left padding both to the same width.
fn compare_magnitude(lhs: &str, rhs: &str) -> Ordering {
    let width = lhs.len().max(rhs.len());
    let lhs = format!("{:0>width$}", lhs, width = width);
    let rhs = format!("{:0>width$}", rhs, width = width);
    lhs.cmp(&rhs)
}
