// Booking lifecycle: selling journeys, committing, retrieving, cancelling and
// editing passengers and contacts.

use super::common::{
    check_booking_contact, check_key, check_passenger_counts, check_person_name,
    check_record_locator, default_true, passenger_counts_value, today, BookingContact,
    PassengerTypeCount, PersonName, GENDERS, KEY_DESCRIPTION, KEY_REGEX, PASSENGER_TYPES,
    PROMO_CODE_DESCRIPTION, PROMO_CODE_REGEX,
};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{object_list, ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_each_item, check_each_matches, check_enum, check_formats,
    check_nested, check_not_after, check_pattern, check_string_lengths, require_any,
    require_fields, require_group, ArrayRules, LengthBounds,
};
use serde::Deserialize;
use serde_json::Value;

pub const MAX_BOOKING_PASSENGERS: usize = 9;

// Passenger types allowed to travel with an infant on their lap
const INFANT_CARRIER_TYPES: [&str; 3] = ["ADT", "SNR", "MIL"];

// One journey to sell with the fare picked from availability
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySellKey {
    pub journey_key: String,
    pub fare_availability_key: String,
    pub standby_priority_code: Option<String>,
}

impl JourneySellKey {
    pub fn new(journey_key: impl Into<String>, fare_availability_key: impl Into<String>) -> Self {
        Self {
            journey_key: journey_key.into(),
            fare_availability_key: fare_availability_key.into(),
            standby_priority_code: None,
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("journeyKey", self.journey_key.as_str());
        payload.put("fareAvailabilityKey", self.fare_availability_key.as_str());
        payload.put_opt("standbyPriorityCode", self.standby_priority_code.as_deref());
        payload
    }
}

// Sell journeys into the in-session booking.
// `preventOverlap` is always emitted; `suppressPassengerAgeValidation` only when true.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSellRequest {
    pub keys: Vec<JourneySellKey>,
    pub passengers: Vec<PassengerTypeCount>,
    pub currency_code: String,
    pub promotion_code: Option<String>,
    #[serde(default = "default_true")]
    pub prevent_overlap: bool,
    #[serde(default)]
    pub suppress_passenger_age_validation: bool,
}

impl TripSellRequest {
    pub fn new(
        keys: Vec<JourneySellKey>,
        passengers: Vec<PassengerTypeCount>,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            keys,
            passengers,
            currency_code: currency_code.into(),
            promotion_code: None,
            prevent_overlap: true,
            suppress_passenger_age_validation: false,
        }
    }

    // One journey for `adults` adult passengers
    pub fn single_journey(
        journey_key: impl Into<String>,
        fare_availability_key: impl Into<String>,
        adults: u32,
        currency_code: impl Into<String>,
    ) -> Self {
        Self::new(
            vec![JourneySellKey::new(journey_key, fare_availability_key)],
            vec![PassengerTypeCount::adults(adults)],
            currency_code,
        )
    }
}

impl ApiRequest for TripSellRequest {
    fn name(&self) -> &'static str {
        "TripSellRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v4/trip/sell")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("keys", object_list(&self.keys, JourneySellKey::to_payload));
        payload.put("passengers", passenger_counts_value(&self.passengers));
        payload.put("currencyCode", self.currency_code.as_str());
        payload.put_opt("promotionCode", self.promotion_code.as_deref());
        payload.put("preventOverlap", self.prevent_overlap);
        payload.put_if_true(
            "suppressPassengerAgeValidation",
            self.suppress_passenger_age_validation,
        );
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["keys", "passengers", "currencyCode"])?;
        check_formats(&data, &[("currencyCode", FieldFormat::CurrencyCode)])?;
        check_pattern(
            &data,
            "promotionCode",
            &PROMO_CODE_REGEX,
            PROMO_CODE_DESCRIPTION,
        )?;
        check_array_field(
            &data,
            "keys",
            &ArrayRules::non_empty().requiring(&["journeyKey", "fareAvailabilityKey"]),
        )?;
        check_each_item(&data, "keys", |key| {
            check_key(key, "journeyKey")?;
            check_key(key, "fareAvailabilityKey")?;
            check_string_lengths(key, &[("standbyPriorityCode", LengthBounds::max(4))])
        })?;
        check_passenger_counts(&data, "passengers")
    }
}

// Passenger details captured at booking time
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPassenger {
    #[serde(rename = "type")]
    pub passenger_type: String,
    pub name: PersonName,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl BookingPassenger {
    pub fn new(passenger_type: impl Into<String>, name: PersonName) -> Self {
        Self {
            passenger_type: passenger_type.into(),
            name,
            ..Default::default()
        }
    }

    pub fn adult(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self::new("ADT", PersonName::new(first, last))
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("type", self.passenger_type.as_str());
        payload.put("name", Value::Object(self.name.to_payload()));
        payload.put_opt("dateOfBirth", self.date_of_birth.as_deref());
        payload.put_opt("gender", self.gender.as_deref());
        payload.put_opt("nationality", self.nationality.as_deref());
        payload
    }
}

// Commit a new booking. `notifyContacts` is emitted only when true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreateRequest {
    pub passengers: Vec<BookingPassenger>,
    pub contact: BookingContact,
    pub received_by: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub notify_contacts: bool,
}

impl BookingCreateRequest {
    pub fn new(passengers: Vec<BookingPassenger>, contact: BookingContact) -> Self {
        Self {
            passengers,
            contact,
            ..Default::default()
        }
    }
}

fn count_types(items: &[Value], types: &[&str]) -> usize {
    items
        .iter()
        .filter(|item| {
            item.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| types.contains(&t))
        })
        .count()
}

impl ApiRequest for BookingCreateRequest {
    fn name(&self) -> &'static str {
        "BookingCreateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v3/booking")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put(
            "passengers",
            object_list(&self.passengers, BookingPassenger::to_payload),
        );
        payload.put("contact", Value::Object(self.contact.to_payload()));
        payload.put_opt("receivedBy", self.received_by.as_deref());
        payload.put_non_empty("comments", &self.comments);
        payload.put_if_true("notifyContacts", self.notify_contacts);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["passengers", "contact"])?;
        check_string_lengths(&data, &[("receivedBy", LengthBounds::max(64))])?;

        let passengers = check_array_field(
            &data,
            "passengers",
            &ArrayRules::between(1, MAX_BOOKING_PASSENGERS)
                .requiring(&["type", "name.first", "name.last"])
                .with_formats(&[
                    ("dateOfBirth", FieldFormat::Date),
                    ("nationality", FieldFormat::CountryCode),
                ]),
        )?;

        let infants = count_types(passengers, &["INF"]);
        let carriers = count_types(passengers, &INFANT_CARRIER_TYPES);
        if infants > carriers {
            return Err(ValidationError::for_field(
                "passengers",
                "must not contain more infants than adults",
            ));
        }

        let today = today();
        check_each_item(&data, "passengers", |passenger| {
            check_enum(passenger, "type", &PASSENGER_TYPES)?;
            check_enum(passenger, "gender", &GENDERS)?;
            check_not_after(passenger, "dateOfBirth", today)?;
            check_nested(passenger, "name", check_person_name)
        })?;

        for (index, comment) in self.comments.iter().enumerate() {
            let len = comment.trim().chars().count();
            if len == 0 || len > 256 {
                return Err(ValidationError::for_field(
                    format!("comments[{}]", index),
                    "must be between 1 and 256 characters",
                ));
            }
        }

        check_nested(&data, "contact", check_booking_contact)
    }
}

// Look up an existing booking; the locator alone is not enough
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRetrieveRequest {
    pub record_locator: String,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub origin: Option<String>,
}

impl BookingRetrieveRequest {
    pub fn by_last_name(record_locator: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            record_locator: record_locator.into(),
            last_name: Some(last_name.into()),
            ..Default::default()
        }
    }

    pub fn by_email(record_locator: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            record_locator: record_locator.into(),
            email_address: Some(email_address.into()),
            ..Default::default()
        }
    }
}

impl ApiRequest for BookingRetrieveRequest {
    fn name(&self) -> &'static str {
        "BookingRetrieveRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::get("/api/nsk/v1/booking/retrieve")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("recordLocator", self.record_locator.as_str());
        payload.put_opt("lastName", self.last_name.as_deref());
        payload.put_opt("emailAddress", self.email_address.as_deref());
        payload.put_opt("origin", self.origin.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["recordLocator"])?;
        check_record_locator(&data, "recordLocator")?;
        check_formats(
            &data,
            &[
                ("emailAddress", FieldFormat::Email),
                ("origin", FieldFormat::AirportCode),
            ],
        )?;
        check_string_lengths(&data, &[("lastName", LengthBounds::new(1, 32))])?;
        require_any(&data, &["lastName", "emailAddress", "origin"])
    }
}

// Cancel some or all journeys of a booking.
// No journey keys means the whole itinerary; `waivePenalty` only when true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancelRequest {
    pub record_locator: String,
    #[serde(default)]
    pub journey_keys: Vec<String>,
    pub reason_code: Option<String>,
    #[serde(default)]
    pub waive_penalty: bool,
}

impl BookingCancelRequest {
    pub fn entire_booking(record_locator: impl Into<String>) -> Self {
        Self {
            record_locator: record_locator.into(),
            ..Default::default()
        }
    }

    pub fn journeys(record_locator: impl Into<String>, journey_keys: Vec<String>) -> Self {
        Self {
            record_locator: record_locator.into(),
            journey_keys,
            ..Default::default()
        }
    }
}

impl ApiRequest for BookingCancelRequest {
    fn name(&self) -> &'static str {
        "BookingCancelRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::delete("/api/nsk/v1/booking/journeys")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("recordLocator", self.record_locator.as_str());
        payload.put_non_empty("journeyKeys", &self.journey_keys);
        payload.put_opt("reasonCode", self.reason_code.as_deref());
        payload.put_if_true("waivePenalty", self.waive_penalty);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["recordLocator"])?;
        check_record_locator(&data, "recordLocator")?;
        check_string_lengths(&data, &[("reasonCode", LengthBounds::new(1, 4))])?;
        check_each_matches(&data, "journeyKeys", &KEY_REGEX, KEY_DESCRIPTION)
    }
}

// Edit an existing passenger; at least one attribute must change
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerUpdateRequest {
    pub passenger_key: String,
    pub name: Option<PersonName>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub loyalty_number: Option<String>,
}

impl PassengerUpdateRequest {
    pub fn new(passenger_key: impl Into<String>) -> Self {
        Self {
            passenger_key: passenger_key.into(),
            ..Default::default()
        }
    }

    pub fn rename(passenger_key: impl Into<String>, name: PersonName) -> Self {
        Self {
            name: Some(name),
            ..Self::new(passenger_key)
        }
    }
}

impl ApiRequest for PassengerUpdateRequest {
    fn name(&self) -> &'static str {
        "PassengerUpdateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::patch("/api/nsk/v2/booking/passengers")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("passengerKey", self.passenger_key.as_str());
        if let Some(name) = &self.name {
            payload.put("name", Value::Object(name.to_payload()));
        }
        payload.put_opt("dateOfBirth", self.date_of_birth.as_deref());
        payload.put_opt("gender", self.gender.as_deref());
        payload.put_opt("nationality", self.nationality.as_deref());
        payload.put_opt("loyaltyNumber", self.loyalty_number.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["passengerKey"])?;
        check_key(&data, "passengerKey")?;
        require_any(
            &data,
            &[
                "name",
                "dateOfBirth",
                "gender",
                "nationality",
                "loyaltyNumber",
            ],
        )?;
        check_formats(
            &data,
            &[
                ("dateOfBirth", FieldFormat::Date),
                ("nationality", FieldFormat::CountryCode),
            ],
        )?;
        check_enum(&data, "gender", &GENDERS)?;
        check_string_lengths(&data, &[("loyaltyNumber", LengthBounds::new(1, 32))])?;
        check_not_after(&data, "dateOfBirth", today())?;
        require_group(&data, &["name.first", "name.last"])?;
        check_nested(&data, "name", check_person_name)
    }
}

// Add or replace a booking contact
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BookingContactRequest {
    pub contact: BookingContact,
}

impl BookingContactRequest {
    pub fn new(contact: BookingContact) -> Self {
        Self { contact }
    }
}

impl ApiRequest for BookingContactRequest {
    fn name(&self) -> &'static str {
        "BookingContactRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/booking/contacts")
    }

    fn to_payload(&self) -> Payload {
        self.contact.to_payload()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_booking_contact(&self.to_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::common::{Address, PhoneNumber};
    use serde_json::json;
    use test_case::test_case;

    fn contact() -> BookingContact {
        BookingContact::primary(PersonName::new("Ada", "Lovelace"), "ada@example.com")
    }

    #[test]
    fn test_trip_sell() {
        let request = TripSellRequest::single_journey("journey_0001", "fare_00001", 2, "USD");
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["preventOverlap"], json!(true));
        assert!(!payload.contains_key("suppressPassengerAgeValidation"));
        assert!(!payload.contains_key("promotionCode"));
        assert_eq!(payload["keys"][0]["journeyKey"], json!("journey_0001"));
    }

    #[test]
    fn test_trip_sell_rules() {
        let bad_key = TripSellRequest::single_journey("j1", "fare_00001", 1, "USD");
        assert_eq!(bad_key.validate().unwrap_err().field(), Some("keys[0].journeyKey"));

        let no_currency = TripSellRequest::single_journey("journey_0001", "fare_00001", 1, "");
        assert_eq!(no_currency.validate().unwrap_err().field(), Some("currencyCode"));

        let no_keys = TripSellRequest::new(vec![], vec![PassengerTypeCount::adults(1)], "USD");
        assert_eq!(no_keys.validate().unwrap_err().field(), Some("keys"));

        let mut overlap_off = TripSellRequest::single_journey("journey_0001", "fare_00001", 1, "USD");
        overlap_off.prevent_overlap = false;
        assert_eq!(overlap_off.to_payload()["preventOverlap"], json!(false));
    }

    #[test]
    fn test_booking_create_minimal() {
        let request = BookingCreateRequest::new(vec![BookingPassenger::adult("Ada", "Lovelace")], contact());
        let payload = request.validated_payload().unwrap();
        assert!(!payload.contains_key("notifyContacts"));
        assert!(!payload.contains_key("comments"));
        assert!(!payload.contains_key("receivedBy"));
        assert_eq!(payload["passengers"][0]["name"]["last"], json!("Lovelace"));
    }

    #[test]
    fn test_booking_create_infants_need_adults() {
        let infant = BookingPassenger::new("INF", PersonName::new("Baby", "Lovelace"));
        let request = BookingCreateRequest::new(
            vec![BookingPassenger::adult("Ada", "Lovelace"), infant.clone(), infant],
            contact(),
        );
        assert_eq!(request.validate().unwrap_err().field(), Some("passengers"));
    }

    #[test]
    fn test_booking_create_passenger_rules() {
        let mut passenger = BookingPassenger::adult("Ada", "Lovelace");
        passenger.gender = Some("female".to_string());
        let request = BookingCreateRequest::new(vec![passenger.clone()], contact());
        assert_eq!(request.validate().unwrap_err().field(), Some("passengers[0].gender"));

        passenger.gender = Some("Female".to_string());
        passenger.date_of_birth = Some("2999-01-01".to_string());
        let request = BookingCreateRequest::new(vec![passenger.clone()], contact());
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("passengers[0].dateOfBirth")
        );

        passenger.date_of_birth = Some("1815-12-10".to_string());
        passenger.nationality = Some("GBR".to_string());
        let request = BookingCreateRequest::new(vec![passenger], contact());
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("passengers[0].nationality")
        );

        let too_many = BookingCreateRequest::new(
            (0..10).map(|_| BookingPassenger::adult("A", "B")).collect(),
            contact(),
        );
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_booking_create_contact_and_comments() {
        let mut bad_contact = contact();
        bad_contact.email_address = "nope".to_string();
        let request = BookingCreateRequest::new(vec![BookingPassenger::adult("A", "B")], bad_contact);
        assert_eq!(request.validate().unwrap_err().field(), Some("contact.emailAddress"));

        let request = BookingCreateRequest {
            comments: vec!["window seat please".to_string(), "  ".to_string()],
            notify_contacts: true,
            ..BookingCreateRequest::new(vec![BookingPassenger::adult("A", "B")], contact())
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("comments[1]"));
        assert_eq!(request.to_payload()["notifyContacts"], json!(true));
    }

    #[test_case(BookingRetrieveRequest::by_last_name("ABC123", "Lovelace"), None; "by last name")]
    #[test_case(BookingRetrieveRequest::by_email("ABC123", "ada@example.com"), None; "by email")]
    #[test_case(BookingRetrieveRequest::by_email("ABC123", "ada"), Some("emailAddress"); "bad email")]
    #[test_case(BookingRetrieveRequest::by_last_name("abc123", "Lovelace"), Some("recordLocator"); "lowercase locator")]
    #[test_case(BookingRetrieveRequest::by_last_name("", "Lovelace"), Some("recordLocator"); "missing locator")]
    fn test_booking_retrieve(request: BookingRetrieveRequest, failing_field: Option<&str>) {
        match failing_field {
            None => assert!(request.validate().is_ok()),
            Some(field) => assert_eq!(request.validate().unwrap_err().field(), Some(field)),
        }
    }

    #[test]
    fn test_booking_retrieve_needs_second_factor() {
        let request = BookingRetrieveRequest {
            record_locator: "ABC123".to_string(),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert!(err.message.contains("lastName, emailAddress, origin"));
        assert_eq!(request.endpoint().method, crate::request::HttpMethod::Get);
    }

    #[test]
    fn test_booking_cancel() {
        let all = BookingCancelRequest::entire_booking("ABC123");
        assert_eq!(
            Value::Object(all.validated_payload().unwrap()),
            json!({"recordLocator": "ABC123"})
        );

        let some = BookingCancelRequest {
            waive_penalty: true,
            reason_code: Some("SC".to_string()),
            ..BookingCancelRequest::journeys("ABC123", vec!["journey_0001".to_string()])
        };
        let payload = some.validated_payload().unwrap();
        assert_eq!(payload["waivePenalty"], json!(true));
        assert_eq!(payload["journeyKeys"], json!(["journey_0001"]));

        let bad = BookingCancelRequest::journeys("ABC123", vec!["x".to_string()]);
        assert_eq!(bad.validate().unwrap_err().field(), Some("journeyKeys[0]"));

        let long_reason = BookingCancelRequest {
            reason_code: Some("TOOLONG".to_string()),
            ..BookingCancelRequest::entire_booking("ABC123")
        };
        assert_eq!(long_reason.validate().unwrap_err().field(), Some("reasonCode"));
    }

    #[test]
    fn test_passenger_update() {
        let empty = PassengerUpdateRequest::new("pax_00001");
        assert!(empty.validate().is_err());

        let rename = PassengerUpdateRequest::rename("pax_00001", PersonName::new("Ada", "Byron"));
        assert!(rename.validate().is_ok());
        let endpoint = rename.endpoint();
        assert_eq!(endpoint.method, crate::request::HttpMethod::Patch);
        assert_eq!(endpoint.path, "/api/nsk/v2/booking/passengers");
        assert_eq!(rename.to_payload()["passengerKey"], json!("pax_00001"));

        let half_name = PassengerUpdateRequest::rename("pax_00001", PersonName::new("", "Byron"));
        assert_eq!(half_name.validate().unwrap_err().field(), Some("name.first"));

        let loyalty = PassengerUpdateRequest {
            loyalty_number: Some("FF123456".to_string()),
            gender: Some("Unspecified".to_string()),
            ..PassengerUpdateRequest::new("pax_00001")
        };
        assert!(loyalty.validate().is_ok());

        let bad_key = PassengerUpdateRequest::rename("p1", PersonName::new("A", "B"));
        assert_eq!(bad_key.validate().unwrap_err().field(), Some("passengerKey"));
    }

    #[test]
    fn test_booking_contact_request_address_group() {
        let mut with_address = contact();
        with_address.phone_numbers.push(PhoneNumber::mobile("+351 21 000 0000"));
        with_address.address = Some(Address {
            postal_code: Some("1000-001".to_string()),
            ..Default::default()
        });
        let err = BookingContactRequest::new(with_address.clone()).validate().unwrap_err();
        assert_eq!(err.field(), Some("address.lineOne"));

        with_address.address = Some(Address {
            postal_code: Some("1000-001".to_string()),
            ..Address::new("Rua Augusta 1", "Lisbon", "PT")
        });
        assert!(BookingContactRequest::new(with_address).validate().is_ok());
    }

    #[test]
    fn test_booking_contact_request_from_json() {
        let request: BookingContactRequest = serde_json::from_value(json!({
            "contactTypeCode": "P",
            "name": {"first": "Ada", "last": "Lovelace"},
            "emailAddress": "ada@example.com",
            "address": {"lineOne": "1 Main St", "city": "Boston", "countryCode": "US", "provinceState": "MASS"}
        }))
        .unwrap();
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("address.provinceState")
        );
    }
}
