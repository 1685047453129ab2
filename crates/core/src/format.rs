//! Display formatting helpers

use chrono::{DateTime, NaiveDate, NaiveTime};

/// `YYYY-MM-DD` (or an RFC 3339 timestamp) as `DD/MM/YYYY`
///
/// Input that cannot be parsed is returned unchanged; empty input renders as `-`.
pub fn format_date(date: &str) -> String {
    if date.trim().is_empty() {
        return "-".to_string();
    }
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.format("%d/%m/%Y").to_string();
    }
    match DateTime::parse_from_rfc3339(date) {
        Ok(ts) => ts.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// RFC 3339 timestamp as `DD/MM/YYYY às HH:MM`
pub fn format_date_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(ts) => ts.format("%d/%m/%Y às %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Eight digits as `00000-000`; anything else unchanged
pub fn format_cep(cep: &str) -> String {
    if cep.len() == 8 && cep.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}", &cep[..5], &cep[5..])
    } else {
        cep.to_string()
    }
}

pub fn unformat_cep(cep: &str) -> String {
    cep.chars().filter(char::is_ascii_digit).collect()
}

pub fn full_name(name: &str, surname: &str) -> String {
    format!("{name} {surname}").trim().to_string()
}

/// Upper-case the first letter, lower-case the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Cut to `max_len` characters and append `...` when shortened
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    format!("{cut}...")
}

/// Booking slots from `start` (inclusive) to `end` (exclusive)
pub fn time_options(start: &str, end: &str, interval_minutes: u32) -> Vec<String> {
    let (Ok(start), Ok(end)) = (
        NaiveTime::parse_from_str(start, "%H:%M"),
        NaiveTime::parse_from_str(end, "%H:%M"),
    ) else {
        return Vec::new();
    };
    if interval_minutes == 0 {
        return Vec::new();
    }

    let step = chrono::Duration::minutes(i64::from(interval_minutes));
    let mut slots = Vec::new();
    let mut current = start;
    while current < end {
        slots.push(current.format("%H:%M").to_string());
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    slots
}
