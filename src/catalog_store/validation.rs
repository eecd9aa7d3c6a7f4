//! Input checks shared by the loaders.

use super::error::CatalogError;
use super::models::RatingRejection;
use chrono::{Datelike, NaiveDate};

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years that format back to exactly four digits.
const YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse a `YYYY-MM-DD` calendar date with a four-digit year.
pub fn parse_date(value: &str) -> Result<NaiveDate, CatalogError> {
    let invalid = || CatalogError::InvalidDate {
        value: value.to_string(),
    };
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| invalid())?;
    if !YEARS.contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

/// The storage form of a date. Year filters read the first four characters
/// back through `strftime('%Y', ..)`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn validate_score(score: i64) -> Result<(), RatingRejection> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(RatingRejection::InvalidScore)
    }
}

/// Distinct names in first-seen order.
pub fn distinct_names(names: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::with_capacity(names.len());
    names
        .iter()
        .map(String::as_str)
        .filter(|name| seen.insert(*name))
        .collect()
}
