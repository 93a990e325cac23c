//! Calendar date parsing and formatting
//!
//! Dates are entered and shown as DD/MM/YYYY and stored as ISO YYYY-MM-DD.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{Error, Result};

const DISPLAY_FMT: &str = "%d/%m/%Y";
const ISO_FMT: &str = "%Y-%m-%d";

/// Accepted year range for birth and session dates
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Parse a DD/MM/YYYY date into its ISO storage form.
///
/// Accepts only the fixed zero-padded layout; rejects invalid calendar
/// dates and years outside 1900-2100.
pub fn to_iso(input: &str) -> Result<String> {
    let input = input.trim();
    if input.len() != 10 {
        return Err(invalid(input));
    }
    let date = NaiveDate::parse_from_str(input, DISPLAY_FMT).map_err(|_| invalid(input))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(invalid(input));
    }
    Ok(date.format(ISO_FMT).to_string())
}

/// Format a stored ISO date for display.
///
/// Malformed stored values pass through unchanged.
pub fn to_display(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, ISO_FMT) {
        Ok(date) => date.format(DISPLAY_FMT).to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Today's date in display form, the default for new sessions
pub fn today_display() -> String {
    Local::now().format(DISPLAY_FMT).to_string()
}

fn invalid(input: &str) -> Error {
    Error::Validation(format!("invalid date '{input}', expected DD/MM/YYYY"))
}
