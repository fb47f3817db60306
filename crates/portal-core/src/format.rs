//! Display formatting helpers (pt-BR conventions) and the backend's date
//! wire format.
//!
//! All functions are total. Bad input comes back as an empty string, a
//! placeholder, or unchanged, never as a panic.

use chrono::{NaiveDate, NaiveDateTime};
use unicode_normalization::UnicodeNormalization;

use crate::domain::is_sentinel;
use crate::validation::digits_only;

/// Shown in place of a date the backend did not provide.
pub const DATE_PLACEHOLDER: &str = "-";

/// Date format the backend expects in filter fields.
pub const WIRE_DATE_FORMAT: &str = "%Y%m%d";

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const DISPLAY_DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Slice `digits` into consecutive groups and join them with `separators`.
/// `separators[i]` is placed before group `i`.
fn mask(digits: &str, groups: &[usize], separators: &[&str]) -> String {
    let mut out = String::with_capacity(digits.len() + 6);
    let mut start = 0;
    for (size, sep) in groups.iter().zip(separators) {
        out.push_str(sep);
        out.push_str(&digits[start..start + size]);
        start += size;
    }
    out
}

/// `00.000.000/0000-00`. Short input comes back digits-only, long input
/// unchanged.
pub fn format_cnpj(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let digits = digits_only(value);
    match digits.len() {
        14 => mask(&digits, &[2, 3, 3, 4, 2], &["", ".", ".", "/", "-"]),
        n if n < 14 => digits,
        _ => value.to_string(),
    }
}

/// `000.000.000-00`.
pub fn format_cpf(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let digits = digits_only(value);
    match digits.len() {
        11 => mask(&digits, &[3, 3, 3, 2], &["", ".", ".", "-"]),
        n if n < 11 => digits,
        _ => value.to_string(),
    }
}

/// `(00) 0000-0000` for landlines, `(00) 00000-0000` for mobiles.
pub fn format_phone(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let digits = digits_only(value);
    match digits.len() {
        10 => mask(&digits, &[2, 4, 4], &["(", ") ", "-"]),
        11 => mask(&digits, &[2, 5, 4], &["(", ") ", "-"]),
        n if n < 10 => digits,
        _ => value.to_string(),
    }
}

/// Brazilian real: `R$ 1.234,50`. Missing or non-finite amounts render as
/// `R$ 0,00`.
pub fn format_currency(value: Option<f64>) -> String {
    let amount = match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// `DD/MM/YYYY HH:MM`.
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DISPLAY_DATE_TIME_FORMAT).to_string()
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format an ISO-8601 date or datetime string as `DD/MM/YYYY`, or with
/// `with_time` as `DD/MM/YYYY HH:MM`. Unparseable input yields `""`.
pub fn format_date_str(value: &str, with_time: bool) -> String {
    match parse_iso(value) {
        Some(dt) if with_time => format_date_time(dt),
        Some(dt) => format_date(dt.date()),
        None => String::new(),
    }
}

/// Encode a calendar date as the backend's 8-digit `YYYYMMDD` token.
pub fn to_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// `YYYY-MM-DD` (as typed into a date field) → `YYYYMMDD`. Empty or invalid
/// input yields `""`, which the backend reads as "no bound".
pub fn date_to_wire(value: &str) -> String {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(to_wire_date)
        .unwrap_or_default()
}

/// Decode a `YYYYMMDD` token from the backend as `DD/MM/YYYY`.
///
/// Empty values, "not found" sentinels and 8-character tokens that are not
/// all digits become [`DATE_PLACEHOLDER`]. Values of any other length are
/// passed through untouched since the backend occasionally sends dates
/// already formatted.
pub fn wire_to_display(value: &str) -> String {
    if value.is_empty() || is_sentinel(value) {
        return DATE_PLACEHOLDER.to_string();
    }
    if value.len() != 8 {
        return value.to_string();
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return DATE_PLACEHOLDER.to_string();
    }
    format!("{}/{}/{}", &value[6..8], &value[4..6], &value[0..4])
}

const BYTE_UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Human readable size with 1024 steps, e.g. `1.5 KB`. Trailing zeros in the
/// fraction are dropped.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(BYTE_UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut number = format!("{scaled:.decimals$}");
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }
    format!("{number} {}", BYTE_UNITS[exponent])
}

/// Cut `value` to `max_chars` characters, appending `...` when shortened.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Strip diacritics: decompose (NFD) and drop combining marks.
pub fn remove_accents(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Upper-case the first character, lower-case the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
