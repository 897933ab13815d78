// Building blocks shared across request types: identifier shapes, passenger
// type counts, names, phones, addresses and booking contacts.

use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{object_list, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_each_item, check_enum, check_formats,
    check_nested, check_pattern, check_string_lengths, require_fields, ArrayRules,
    LengthBounds,
};
use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

// Passenger, segment, journey, market and payment keys
pub static KEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{8,64}$").unwrap());
pub const KEY_DESCRIPTION: &str = "8 to 64 letters, digits, '_' or '-'";

pub static RECORD_LOCATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{6}$").unwrap());
pub const RECORD_LOCATOR_DESCRIPTION: &str = "6 uppercase letters or digits";

pub static CULTURE_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}-[A-Z]{2}$").unwrap());
pub const CULTURE_CODE_DESCRIPTION: &str = "a culture code like en-US";

// Promotion and voucher basis codes
pub static PROMO_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{1,8}$").unwrap());
pub const PROMO_CODE_DESCRIPTION: &str = "1 to 8 uppercase letters or digits";

pub const PASSENGER_TYPES: [&str; 7] = ["ADT", "CHD", "INF", "SNR", "YTH", "MIL", "STU"];

// Most passengers a single booking or search may carry
pub const MAX_PASSENGERS: u64 = 9;

pub const GENDERS: [&str; 3] = ["Male", "Female", "Unspecified"];

pub const PHONE_TYPES: [&str; 5] = ["Home", "Work", "Mobile", "Fax", "Other"];

pub const NAME_TITLES: [&str; 6] = ["MR", "MRS", "MS", "MSTR", "MISS", "DR"];

// serde default for flags that are on unless the caller says otherwise
pub(crate) fn default_true() -> bool {
    true
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn check_key(data: &Payload, field: &str) -> Result<(), ValidationError> {
    check_pattern(data, field, &KEY_REGEX, KEY_DESCRIPTION)
}

pub fn check_record_locator(data: &Payload, field: &str) -> Result<(), ValidationError> {
    check_pattern(data, field, &RECORD_LOCATOR_REGEX, RECORD_LOCATOR_DESCRIPTION)
}

// Number of passengers of one type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PassengerTypeCount {
    #[serde(rename = "type")]
    pub type_code: String,
    pub count: u32,
}

impl PassengerTypeCount {
    pub fn new(type_code: impl Into<String>, count: u32) -> Self {
        Self {
            type_code: type_code.into(),
            count,
        }
    }

    pub fn adults(count: u32) -> Self {
        Self::new("ADT", count)
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("type", self.type_code.as_str());
        payload.put("count", self.count);
        payload
    }
}

pub fn passenger_counts_value(passengers: &[PassengerTypeCount]) -> Value {
    object_list(passengers, PassengerTypeCount::to_payload)
}

// Non-empty list of {type, count}, enumerated types, at most nine in total
pub fn check_passenger_counts(data: &Payload, field: &str) -> Result<(), ValidationError> {
    let items = check_array_field(
        data,
        field,
        &ArrayRules::non_empty()
            .requiring(&["type", "count"])
            .with_formats(&[("count", FieldFormat::PositiveInteger)]),
    )?;
    check_each_item(data, field, |item| check_enum(item, "type", &PASSENGER_TYPES))?;

    let total: u64 = items
        .iter()
        .filter_map(|item| item.get("count").and_then(Value::as_u64))
        .sum();
    if total > MAX_PASSENGERS {
        return Err(ValidationError::for_field(
            field,
            format!("must not exceed {} passengers in total", MAX_PASSENGERS),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub first: String,
    pub last: String,
    #[serde(default)]
    pub middle: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PersonName {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            ..Default::default()
        }
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("first", self.first.as_str());
        payload.put_opt("middle", self.middle.as_deref());
        payload.put("last", self.last.as_str());
        payload.put_opt("title", self.title.as_deref());
        payload
    }
}

// Required first/last name of 1-32 characters and an optional known title
pub fn check_person_name(name: &Payload) -> Result<(), ValidationError> {
    require_fields(name, &["first", "last"])?;
    check_string_lengths(
        name,
        &[
            ("first", LengthBounds::new(1, 32)),
            ("middle", LengthBounds::max(32)),
            ("last", LengthBounds::new(1, 32)),
        ],
    )?;
    check_enum(name, "title", &NAME_TITLES)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    #[serde(rename = "type")]
    pub type_code: String,
    pub number: String,
}

impl PhoneNumber {
    pub fn mobile(number: impl Into<String>) -> Self {
        Self {
            type_code: "Mobile".to_string(),
            number: number.into(),
        }
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("type", self.type_code.as_str());
        payload.put("number", self.number.as_str());
        payload
    }
}

pub fn check_phone_numbers(data: &Payload, field: &str) -> Result<(), ValidationError> {
    check_each_item(data, field, |phone| {
        require_fields(phone, &["type", "number"])?;
        check_enum(phone, "type", &PHONE_TYPES)?;
        check_formats(phone, &[("number", FieldFormat::Phone)])
    })
}

// Postal address; every field optional so callers can express partial input
// and let the owning request decide which fields are mandatory
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub line_one: Option<String>,
    pub line_two: Option<String>,
    pub city: Option<String>,
    pub province_state: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

impl Address {
    pub fn new(
        line_one: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            line_one: Some(line_one.into()),
            city: Some(city.into()),
            country_code: Some(country_code.into()),
            ..Default::default()
        }
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put_opt("lineOne", self.line_one.as_deref());
        payload.put_opt("lineTwo", self.line_two.as_deref());
        payload.put_opt("city", self.city.as_deref());
        payload.put_opt("provinceState", self.province_state.as_deref());
        payload.put_opt("postalCode", self.postal_code.as_deref());
        payload.put_opt("countryCode", self.country_code.as_deref());
        payload
    }
}

pub const ADDRESS_CORE_FIELDS: [&str; 3] = ["lineOne", "city", "countryCode"];

pub fn check_address_shape(address: &Payload) -> Result<(), ValidationError> {
    check_formats(address, &[("countryCode", FieldFormat::CountryCode)])?;
    check_string_lengths(
        address,
        &[
            ("lineOne", LengthBounds::new(1, 128)),
            ("lineTwo", LengthBounds::max(128)),
            ("city", LengthBounds::new(1, 64)),
            ("provinceState", LengthBounds::max(3)),
            ("postalCode", LengthBounds::max(10)),
        ],
    )
}

// Address whose core fields are all-or-nothing
pub fn check_optional_address(address: &Payload) -> Result<(), ValidationError> {
    if !address.is_empty() {
        require_fields(address, &ADDRESS_CORE_FIELDS)?;
    }
    check_address_shape(address)
}

// Address whose core fields are mandatory
pub fn check_required_address(address: &Payload) -> Result<(), ValidationError> {
    require_fields(address, &ADDRESS_CORE_FIELDS)?;
    check_address_shape(address)
}

// Booking contact shared by booking creation and contact updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingContact {
    pub contact_type_code: String,
    pub name: PersonName,
    pub email_address: String,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub culture_code: Option<String>,
}

impl BookingContact {
    // Primary ("P") contact
    pub fn primary(name: PersonName, email_address: impl Into<String>) -> Self {
        Self {
            contact_type_code: "P".to_string(),
            name,
            email_address: email_address.into(),
            ..Default::default()
        }
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("contactTypeCode", self.contact_type_code.as_str());
        payload.put("name", Value::Object(self.name.to_payload()));
        payload.put("emailAddress", self.email_address.as_str());
        if !self.phone_numbers.is_empty() {
            payload.put(
                "phoneNumbers",
                object_list(&self.phone_numbers, PhoneNumber::to_payload),
            );
        }
        if let Some(address) = &self.address {
            payload.put("address", Value::Object(address.to_payload()));
        }
        payload.put_opt("companyName", self.company_name.as_deref());
        payload.put_opt("cultureCode", self.culture_code.as_deref());
        payload
    }
}

pub fn check_booking_contact(contact: &Payload) -> Result<(), ValidationError> {
    require_fields(
        contact,
        &["contactTypeCode", "name.first", "name.last", "emailAddress"],
    )?;
    check_formats(contact, &[("emailAddress", FieldFormat::Email)])?;
    check_string_lengths(
        contact,
        &[
            ("contactTypeCode", LengthBounds::exactly(1)),
            ("companyName", LengthBounds::max(64)),
        ],
    )?;
    check_pattern(
        contact,
        "cultureCode",
        &CULTURE_CODE_REGEX,
        CULTURE_CODE_DESCRIPTION,
    )?;
    check_nested(contact, "name", check_person_name)?;
    check_phone_numbers(contact, "phoneNumbers")?;
    check_nested(contact, "address", check_optional_address)
}
