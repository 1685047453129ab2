//! Form field validation

use crate::constants::{BUSINESS_HOURS_END, BUSINESS_HOURS_START, MIN_PASSWORD_LEN, ROOMS};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

/// Reasons a form is rejected before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Fill in all required fields")]
    RequiredFields,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password must have at least {} characters", MIN_PASSWORD_LEN)]
    InvalidPassword,

    #[error("Invalid CEP")]
    InvalidCep,

    #[error("Invalid time (use HH:MM)")]
    InvalidTime,

    #[error("Invalid date")]
    InvalidDate,

    #[error("The date must be today or later")]
    PastDate,

    #[error("Appointments only on weekdays")]
    NotWeekday,

    #[error("Time must be between {} and {}", BUSINESS_HOURS_START, BUSINESS_HOURS_END)]
    OutsideBusinessHours,

    #[error("Unknown room: {0}")]
    UnknownRoom(String),
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A CEP is valid when it carries exactly eight digits, punctuation aside
pub fn is_valid_cep(cep: &str) -> bool {
    cep.chars().filter(char::is_ascii_digit).count() == 8
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn is_valid_time(time: &str) -> bool {
    TIME_RE.is_match(time)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

pub fn is_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Slots start at opening time and end before closing time
pub fn is_within_business_hours(time: &str) -> bool {
    let (Some(time), Some(start), Some(end)) = (
        parse_time(time),
        parse_time(BUSINESS_HOURS_START),
        parse_time(BUSINESS_HOURS_END),
    ) else {
        return false;
    };
    time >= start && time < end
}

pub fn is_known_room(room: &str) -> bool {
    ROOMS.contains(&room)
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    if !is_valid_time(time) {
        return None;
    }
    NaiveTime::parse_from_str(time, "%H:%M").ok()
}

/// Check the sign-in form
pub fn validate_credentials(email: &str, password: &str) -> Result<(), FormError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(FormError::RequiredFields);
    }
    if !is_valid_email(email) {
        return Err(FormError::InvalidEmail);
    }
    if !is_valid_password(password) {
        return Err(FormError::InvalidPassword);
    }
    Ok(())
}

/// Check the registration form
pub fn validate_registration(
    name: &str,
    surname: &str,
    email: &str,
    password: &str,
    cep: &str,
) -> Result<(), FormError> {
    if [name, surname, email, password, cep]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(FormError::RequiredFields);
    }
    validate_credentials(email, password)?;
    if !is_valid_cep(cep) {
        return Err(FormError::InvalidCep);
    }
    Ok(())
}

/// Check a booking request against the calendar rules
pub fn validate_new_appointment(
    date: &str,
    time: &str,
    room: &str,
    today: NaiveDate,
) -> Result<(), FormError> {
    if date.trim().is_empty() || time.trim().is_empty() || room.trim().is_empty() {
        return Err(FormError::RequiredFields);
    }

    let day = parse_date(date)?;
    if !is_future_date(day, today) {
        return Err(FormError::PastDate);
    }
    if !is_weekday(day) {
        return Err(FormError::NotWeekday);
    }
    if !is_valid_time(time) {
        return Err(FormError::InvalidTime);
    }
    if !is_within_business_hours(time) {
        return Err(FormError::OutsideBusinessHours);
    }
    if !is_known_room(room) {
        return Err(FormError::UnknownRoom(room.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_cep_ignores_punctuation() {
        assert!(is_valid_cep("01310-100"));
        assert!(is_valid_cep("01310100"));
        assert!(!is_valid_cep("0131-010"));
    }

    #[test]
    fn test_time_format() {
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("9:30"));
    }

    #[test]
    fn test_business_hours_exclude_closing_time() {
        assert!(is_within_business_hours("08:00"));
        assert!(is_within_business_hours("17:30"));
        assert!(!is_within_business_hours("18:00"));
        assert!(!is_within_business_hours("07:59"));
    }

    #[test]
    fn test_credentials() {
        assert_eq!(validate_credentials("", "secret1"), Err(FormError::RequiredFields));
        assert_eq!(validate_credentials("nope", "secret1"), Err(FormError::InvalidEmail));
        assert_eq!(validate_credentials("a@b.com", "123"), Err(FormError::InvalidPassword));
        assert!(validate_credentials("a@b.com", "secret1").is_ok());
    }

    #[test]
    fn test_registration_requires_cep() {
        assert_eq!(
            validate_registration("Ana", "Silva", "a@b.com", "secret1", "123"),
            Err(FormError::InvalidCep)
        );
        assert!(validate_registration("Ana", "Silva", "a@b.com", "secret1", "01310-100").is_ok());
    }

    #[test]
    fn test_new_appointment_rules() {
        let today = monday();
        assert!(validate_new_appointment("2026-03-02", "09:30", "Sala 012", today).is_ok());
        assert_eq!(
            validate_new_appointment("2026-03-01", "09:30", "Sala 012", today),
            Err(FormError::PastDate)
        );
        assert_eq!(
            validate_new_appointment("2026-03-07", "09:30", "Sala 012", today),
            Err(FormError::NotWeekday)
        );
        assert_eq!(
            validate_new_appointment("2026-03-03", "19:00", "Sala 012", today),
            Err(FormError::OutsideBusinessHours)
        );
        assert_eq!(
            validate_new_appointment("2026-03-03", "10:00", "Sala 999", today),
            Err(FormError::UnknownRoom("Sala 999".into()))
        );
        assert_eq!(
            validate_new_appointment("03/03/2026", "10:00", "Sala 012", today),
            Err(FormError::InvalidDate)
        );
    }
}
