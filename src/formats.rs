// Context-free field formats.
//
// Each format is a pure predicate over a single value. Formats are a closed
// enum so a rule cannot reference a format that has no checker behind it.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

// Date, `T` or space separator, time, optional fraction and zone
static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ](\d{2}:\d{2}:\d{2})(\.\d{1,9})?(Z|[+-]\d{2}:?\d{2})?$")
        .unwrap()
});

static THREE_LETTER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

static TWO_LETTER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9 ().-]+$").unwrap());

// Named field formats understood by the structural validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFormat {
    Email,
    Date,
    DateTime,
    AirportCode,
    CurrencyCode,
    CountryCode,
    Phone,
    PositiveInteger,
    NonNegativeNumber,
}

impl FieldFormat {
    pub const ALL: [FieldFormat; 9] = [
        FieldFormat::Email,
        FieldFormat::Date,
        FieldFormat::DateTime,
        FieldFormat::AirportCode,
        FieldFormat::CurrencyCode,
        FieldFormat::CountryCode,
        FieldFormat::Phone,
        FieldFormat::PositiveInteger,
        FieldFormat::NonNegativeNumber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldFormat::Email => "email",
            FieldFormat::Date => "date",
            FieldFormat::DateTime => "datetime",
            FieldFormat::AirportCode => "airport_code",
            FieldFormat::CurrencyCode => "currency_code",
            FieldFormat::CountryCode => "country_code",
            FieldFormat::Phone => "phone",
            FieldFormat::PositiveInteger => "positive_integer",
            FieldFormat::NonNegativeNumber => "non_negative_number",
        }
    }

    // Human readable expectation used in violation reasons
    pub fn expectation(&self) -> &'static str {
        match self {
            FieldFormat::Email => "a valid email address",
            FieldFormat::Date => "a calendar date in YYYY-MM-DD format",
            FieldFormat::DateTime => "a timestamp in YYYY-MM-DDThh:mm:ss format",
            FieldFormat::AirportCode => "a 3-letter uppercase airport code",
            FieldFormat::CurrencyCode => "a 3-letter uppercase currency code",
            FieldFormat::CountryCode => "a 2-letter uppercase country code",
            FieldFormat::Phone => "a phone number of 7 to 20 characters",
            FieldFormat::PositiveInteger => "an integer greater than zero",
            FieldFormat::NonNegativeNumber => "a number greater than or equal to zero",
        }
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        match self {
            FieldFormat::Email => value.as_str().is_some_and(is_email),
            FieldFormat::Date => value.as_str().is_some_and(is_date),
            FieldFormat::DateTime => value.as_str().is_some_and(is_datetime),
            FieldFormat::AirportCode => value.as_str().is_some_and(is_airport_code),
            FieldFormat::CurrencyCode => value.as_str().is_some_and(is_currency_code),
            FieldFormat::CountryCode => value.as_str().is_some_and(is_country_code),
            FieldFormat::Phone => value.as_str().is_some_and(is_phone),
            FieldFormat::PositiveInteger => is_positive_integer(value),
            FieldFormat::NonNegativeNumber => is_non_negative_number(value),
        }
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Looking up a format by a name nobody registered is a programming error,
// kept apart from ValidationError so it is never mistaken for bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown field format '{0}'")]
pub struct UnknownFormat(pub String);

impl FromStr for FieldFormat {
    type Err = UnknownFormat;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FieldFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name() == name)
            .ok_or_else(|| UnknownFormat(name.to_string()))
    }
}

pub fn is_email(value: &str) -> bool {
    value.len() <= 254 && !value.contains("..") && EMAIL_REGEX.is_match(value)
}

pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

// Parses a strict `YYYY-MM-DD` string into a real calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn is_datetime(value: &str) -> bool {
    let Some(caps) = DATETIME_REGEX.captures(value) else {
        return false;
    };
    let date_ok = caps
        .get(1)
        .is_some_and(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").is_ok());
    let time_ok = caps
        .get(2)
        .is_some_and(|m| NaiveTime::parse_from_str(m.as_str(), "%H:%M:%S").is_ok());
    date_ok && time_ok
}

pub fn is_airport_code(value: &str) -> bool {
    THREE_LETTER_REGEX.is_match(value)
}

pub fn is_currency_code(value: &str) -> bool {
    THREE_LETTER_REGEX.is_match(value)
}

pub fn is_country_code(value: &str) -> bool {
    TWO_LETTER_REGEX.is_match(value)
}

pub fn is_phone(value: &str) -> bool {
    let len = value.chars().count();
    (7..=20).contains(&len)
        && PHONE_REGEX.is_match(value)
        && value.chars().any(|c| c.is_ascii_digit())
}

// Integer-typed JSON number strictly above zero; floats never qualify
pub fn is_positive_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_u64().is_some_and(|v| v > 0),
        _ => false,
    }
}

// JSON number or numeric string, finite and >= 0
pub fn is_non_negative_number(value: &Value) -> bool {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.is_some_and(|n| n.is_finite() && n >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("a@b.com", true; "simple address")]
    #[test_case("first.last+tag@mail.example.org", true; "dotted with plus")]
    #[test_case("not-an-email", false; "missing at sign")]
    #[test_case("a@b", false; "missing tld")]
    #[test_case("a..b@c.com", false; "double dot")]
    #[test_case("", false; "empty")]
    fn test_email(value: &str, expected: bool) {
        assert_eq!(is_email(value), expected);
        assert_eq!(FieldFormat::Email.is_valid(&json!(value)), expected);
    }

    #[test_case("2025-06-11", true; "real date")]
    #[test_case("2024-02-29", true; "leap day")]
    #[test_case("2023-02-29", false; "not a leap year")]
    #[test_case("2025-13-01", false; "month out of range")]
    #[test_case("2025-6-11", false; "unpadded month")]
    #[test_case("11/06/2025", false; "wrong layout")]
    fn test_date(value: &str, expected: bool) {
        assert_eq!(is_date(value), expected);
    }

    #[test_case("2025-06-11T10:00:00", true; "t separator")]
    #[test_case("2025-06-11 10:00:00", true; "space separator")]
    #[test_case("2025-06-11T10:00:00.123Z", true; "fraction and zulu")]
    #[test_case("2025-06-11T10:00:00+02:00", true; "offset")]
    #[test_case("2025-06-11T25:00:00", false; "hour out of range")]
    #[test_case("2025-02-30T10:00:00", false; "impossible date")]
    #[test_case("2025-06-11", false; "date only")]
    fn test_datetime(value: &str, expected: bool) {
        assert_eq!(is_datetime(value), expected);
    }

    #[test_case(FieldFormat::AirportCode, "JFK", true; "airport upper")]
    #[test_case(FieldFormat::AirportCode, "jfk", false; "airport lower")]
    #[test_case(FieldFormat::AirportCode, "JFKX", false; "airport too long")]
    #[test_case(FieldFormat::CurrencyCode, "USD", true; "currency")]
    #[test_case(FieldFormat::CurrencyCode, "US1", false; "currency digit")]
    #[test_case(FieldFormat::CountryCode, "US", true; "country")]
    #[test_case(FieldFormat::CountryCode, "USA", false; "country too long")]
    #[test_case(FieldFormat::Phone, "+1 (555) 123-4567", true; "formatted phone")]
    #[test_case(FieldFormat::Phone, "555.1234", true; "dotted phone")]
    #[test_case(FieldFormat::Phone, "12345", false; "phone too short")]
    #[test_case(FieldFormat::Phone, "call me maybe", false; "phone letters")]
    #[test_case(FieldFormat::Phone, "+1-555-123-4567-8901-23", false; "phone too long")]
    fn test_code_formats(format: FieldFormat, value: &str, expected: bool) {
        assert_eq!(format.is_valid(&json!(value)), expected);
    }

    #[test]
    fn test_numeric_formats() {
        assert!(is_positive_integer(&json!(1)));
        assert!(!is_positive_integer(&json!(0)));
        assert!(!is_positive_integer(&json!(-3)));
        assert!(!is_positive_integer(&json!(2.5)));
        assert!(!is_positive_integer(&json!("4")));

        assert!(is_non_negative_number(&json!(0)));
        assert!(is_non_negative_number(&json!(12.75)));
        assert!(is_non_negative_number(&json!("3.5")));
        assert!(!is_non_negative_number(&json!(-0.01)));
        assert!(!is_non_negative_number(&json!("abc")));
        assert!(!is_non_negative_number(&Value::Null));
    }

    #[test]
    fn test_string_formats_reject_non_strings() {
        assert!(!FieldFormat::Email.is_valid(&json!(42)));
        assert!(!FieldFormat::Date.is_valid(&Value::Null));
        assert!(!FieldFormat::AirportCode.is_valid(&json!(["JFK"])));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let samples = [
            json!("a@b.com"),
            json!("2025-06-11"),
            json!("2025-06-11T10:00:00Z"),
            json!("LHR"),
            json!("GB"),
            json!("+44 20 7946 0958"),
            json!(7),
            json!(0.5),
        ];
        for format in FieldFormat::ALL {
            for sample in &samples {
                let first = format.is_valid(sample);
                assert_eq!(first, format.is_valid(sample), "{} on {}", format, sample);
            }
        }
    }

    #[test]
    fn test_format_names_round_trip() {
        for format in FieldFormat::ALL {
            assert_eq!(format.name().parse::<FieldFormat>(), Ok(format));
        }
        assert_eq!(
            "postal_code".parse::<FieldFormat>(),
            Err(UnknownFormat("postal_code".to_string()))
        );
    }
}
