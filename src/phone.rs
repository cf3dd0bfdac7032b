//! Phone number normalization
//!
//! Turns loosely formatted numbers (`415.555.2671`, `+1 415-555-2671`) into
//! the `+<country><subscriber>` form the messaging endpoints expect. Numbers
//! without a country code are assumed to be North American and get `+1`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CpaasError, Result};

const NANP_PREFIX: &str = "+1";

// ASCII digits only; `\d` in the regex crate would also match other scripts
static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{4,14}$").expect("E164 regex should compile"));
static SUBSCRIBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5,14}$").expect("SUBSCRIBER regex should compile"));

/// Normalize a phone number to E.164 form
///
/// Dots, hyphens and whitespace are removed first. A number that is then
/// already valid E.164 is returned unchanged. Otherwise, a number that does
/// not start with `+1` is treated as a bare subscriber number and prefixed
/// with `+1`. Everything else is rejected.
///
/// Every successful result is valid E.164, so normalizing twice gives the
/// same result as normalizing once.
///
/// # Errors
///
/// Returns `CpaasError::InvalidPhoneNumber` if no valid number can be produced.
///
/// # Example
/// ```
/// use cpaas_sdk::phone::normalize_phone;
///
/// assert_eq!(normalize_phone("415.555.2671").unwrap(), "+14155552671");
/// assert_eq!(normalize_phone("+44 20 7946 0958").unwrap(), "+442079460958");
/// assert!(normalize_phone("1234").is_err());
/// ```
pub fn normalize_phone(input: &str) -> Result<String> {
    let stripped: String = input
        .chars()
        .filter(|c| !matches!(c, '.' | '-') && !c.is_whitespace())
        .collect();

    if E164.is_match(&stripped) {
        return Ok(stripped);
    }

    // A `+1` number that failed above has the wrong length; nothing to fix
    if stripped.starts_with(NANP_PREFIX) {
        return Err(CpaasError::invalid_phone_number(input));
    }

    if SUBSCRIBER.is_match(&stripped) {
        let prefixed = format!("{NANP_PREFIX}{stripped}");
        if E164.is_match(&prefixed) {
            return Ok(prefixed);
        }
    }

    Err(CpaasError::invalid_phone_number(input))
}
