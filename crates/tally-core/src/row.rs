//! Row parsing for loosely-formatted statement lines
//!
//! A statement row is `date <delim> description <delim> amount`, with an
//! unknown delimiter, an unknown date convention, and a locale-ambiguous
//! decimal format. Parsing is a fixed cascade of explicit attempts, first
//! success wins, so identical input always produces the identical result.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::sniff;

/// Explicit date patterns, tried in order
pub const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
];

/// General fallback tier: ISO date-times and English month-name forms
const GENERAL_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Region-convention tier: two-digit-year forms, month-first before day-first
const REGIONAL_DATE_FORMATS: [&str; 2] = ["%m/%d/%y", "%d/%m/%y"];

/// Currency symbols stripped from amount fields
const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Why a single statement row failed to parse.
///
/// Display strings are part of the upload error contract; callers surface
/// them verbatim as `Row <n>: <reason>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Empty row.")]
    Empty,

    #[error("Unable to detect a column separator.")]
    NoDelimiter,

    #[error("Expected at least three columns (date, description, amount).")]
    ColumnCount,

    #[error("Invalid date '{0}'.")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'.")]
    InvalidAmount(String),
}

/// One successfully parsed statement row
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

/// Parse one raw statement line into a (date, description, amount) triple.
///
/// Fields beyond the third are ignored. Each field is trimmed and has one
/// surrounding pair of quote characters stripped; there is no escape-aware
/// CSV splitting beyond that, so an embedded delimiter shifts the columns
/// (a preserved limitation, not a bug).
pub fn parse_row(raw_line: &str) -> Result<ParsedRow, RowError> {
    let line = raw_line.trim();
    if line.is_empty() {
        return Err(RowError::Empty);
    }

    let delimiter = sniff::detect(line).ok_or(RowError::NoDelimiter)?;

    let fields: Vec<&str> = line.split(delimiter).map(clean_field).collect();
    if fields.len() < 3 {
        return Err(RowError::ColumnCount);
    }

    let date = parse_date(fields[0]).ok_or_else(|| RowError::InvalidDate(fields[0].to_string()))?;
    let amount =
        parse_amount(fields[2]).ok_or_else(|| RowError::InvalidAmount(fields[2].to_string()))?;

    Ok(ParsedRow {
        date,
        description: fields[1].to_string(),
        amount,
    })
}

/// Trim a field and strip a single pair of surrounding quote characters
fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(field)
}

/// Try the explicit patterns, then the general tier, then the regional tier.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in DATE_FORMATS.iter().chain(GENERAL_DATE_FORMATS.iter()) {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            // chrono's %Y accepts "24" as year 24; require a real four-digit
            // year here so two-digit forms fall through to the %y tier
            if date.year() >= 1000 {
                return Some(date);
            }
        }
    }
    for format in REGIONAL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Parse an amount allowing a leading sign, thousands separators, and a
/// currency symbol: first under the neutral convention (`,` thousands,
/// `.` decimal), then under the continental one (`.` thousands, `,` decimal).
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    parse_amount_with(text, ',', '.').or_else(|| parse_amount_with(text, '.', ','))
}

fn parse_amount_with(text: &str, thousands: char, decimal: char) -> Option<f64> {
    let mut rest = text;
    let mut negative = false;

    if let Some(after) = rest.strip_prefix('-') {
        negative = true;
        rest = after.trim_start();
    } else if let Some(after) = rest.strip_prefix('+') {
        rest = after.trim_start();
    }

    for symbol in CURRENCY_SYMBOLS {
        if let Some(after) = rest.strip_prefix(symbol) {
            rest = after.trim_start();
            break;
        }
        if let Some(before) = rest.strip_suffix(symbol) {
            rest = before.trim_end();
            break;
        }
    }

    // A sign tucked behind the currency symbol ("$-5.00")
    if let Some(after) = rest.strip_prefix('-') {
        if negative {
            return None;
        }
        negative = true;
        rest = after.trim_start();
    }

    let magnitude = parse_magnitude(rest, thousands, decimal)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Digits with optional grouping and one decimal separator. Groups after the
/// first must hold exactly three digits, which is what rejects `1.234,56`
/// under the neutral convention and hands it to the continental tier.
fn parse_magnitude(text: &str, thousands: char, decimal: char) -> Option<f64> {
    let mut int_part = String::new();
    let mut frac_part = String::new();
    let mut in_fraction = false;
    let mut group: Option<usize> = None;

    for c in text.chars() {
        if c.is_ascii_digit() {
            if in_fraction {
                frac_part.push(c);
            } else {
                int_part.push(c);
                if let Some(len) = group.as_mut() {
                    *len += 1;
                    if *len > 3 {
                        return None;
                    }
                }
            }
        } else if c == thousands {
            if in_fraction || int_part.is_empty() {
                return None;
            }
            match group {
                Some(3) => {}
                Some(_) => return None,
                None if int_part.len() > 3 => return None,
                None => {}
            }
            group = Some(0);
        } else if c == decimal {
            if in_fraction || int_part.is_empty() {
                return None;
            }
            if let Some(len) = group {
                if len != 3 {
                    return None;
                }
            }
            in_fraction = true;
        } else {
            return None;
        }
    }

    if int_part.is_empty() {
        return None;
    }
    if !in_fraction {
        if let Some(len) = group {
            if len != 3 {
                return None;
            }
        }
    }

    format!("{int_part}.{frac_part}").parse().ok()
}
