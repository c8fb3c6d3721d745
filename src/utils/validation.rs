//! Input validation utilities.
//!
//! This module contains the format checks applied to values entered in the
//! form preview: numbers, money amounts and dates.

use crate::form::schema::DateFormat;
use chrono::{NaiveDate, NaiveDateTime};
use log::*;
use regex::Regex;

const NUMBER_PATTERN: &str = r"^-?\d+(\.\d+)?$";
const MONEY_PATTERN: &str = r"^(\d{1,3}(,\d{3})+|\d+)(\.\d{1,2})?$";

fn matches(pattern: &str, text: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            warn!("Failed to compile regex pattern '{}': {}", pattern, e);
            false
        }
    }
}

/// Check that the text is a plain decimal number.
///
/// Accepts an optional leading minus sign and an optional fractional part.
pub fn is_number(text: &str) -> bool {
    matches(NUMBER_PATTERN, text.trim())
}

/// Check that the text is a money amount.
///
/// Accepts at most two decimals and, optionally, comma thousands separators
/// (`8,920.50`). A leading currency symbol is ignored.
pub fn is_money(text: &str, currency: &str) -> bool {
    let text = text.trim();
    let text = if currency.is_empty() {
        text
    } else {
        text.strip_prefix(currency).unwrap_or(text).trim_start()
    };
    matches(MONEY_PATTERN, text)
}

/// Check that the text is a date in the given picker format.
///
/// # Arguments
/// * `text` - The entered value
/// * `format` - `YYYY-MM-DD` or `YYYY-MM-DD HH:mm`
pub fn is_date(text: &str, format: DateFormat) -> bool {
    let text = text.trim();
    match format {
        DateFormat::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
        DateFormat::DateTime => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").is_ok(),
    }
}

/// Count characters the way length limits count them.
///
/// Chinese characters count as one each.
pub fn char_count(text: &str) -> u32 {
    text.chars().count() as u32
}

/// Format an amount with comma thousands separators.
///
pub fn with_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
