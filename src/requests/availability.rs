// Availability searches: journey search and low-fare calendar

use super::common::{
    check_passenger_counts, default_true, passenger_counts_value, today, PassengerTypeCount,
    PROMO_CODE_DESCRIPTION, PROMO_CODE_REGEX,
};
use crate::error::ValidationError;
use crate::formats::{self, FieldFormat};
use crate::request::{object_list, ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_date_order, check_each_item, check_formats, check_not_before,
    check_pattern, require_fields, ArrayRules,
};
use serde::Deserialize;
use serde_json::Value;

pub const MAX_SEARCH_CRITERIA: usize = 4;

// Longest window a low-fare calendar may span
pub const MAX_LOWFARE_SPAN_DAYS: i64 = 31;

// Origin and destination must be two different stations
fn check_distinct_stations(
    data: &Payload,
    origin: &str,
    destination: &str,
) -> Result<(), ValidationError> {
    let from = data.get(origin).and_then(Value::as_str);
    let to = data.get(destination).and_then(Value::as_str);
    if from.is_some() && from == to {
        return Err(ValidationError::for_field(
            destination,
            format!("must differ from {}", origin),
        ));
    }
    Ok(())
}

// Travel window as it appears under `dates` on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripDates {
    begin_date: String,
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripCriterionFields {
    origin_station_code: String,
    destination_station_code: String,
    dates: TripDates,
}

impl From<TripCriterionFields> for TripCriterion {
    fn from(fields: TripCriterionFields) -> Self {
        Self {
            origin_station_code: fields.origin_station_code,
            destination_station_code: fields.destination_station_code,
            begin_date: fields.dates.begin_date,
            end_date: fields.dates.end_date,
        }
    }
}

// One leg of a search: origin, destination and travel date window
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "TripCriterionFields")]
pub struct TripCriterion {
    pub origin_station_code: String,
    pub destination_station_code: String,
    pub begin_date: String,
    pub end_date: Option<String>,
}

impl TripCriterion {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        begin_date: impl Into<String>,
    ) -> Self {
        Self {
            origin_station_code: origin.into(),
            destination_station_code: destination.into(),
            begin_date: begin_date.into(),
            end_date: None,
        }
    }

    pub fn through(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    fn to_payload(&self) -> Payload {
        let mut dates = Payload::new();
        dates.put("beginDate", self.begin_date.as_str());
        dates.put_opt("endDate", self.end_date.as_deref());

        let mut payload = Payload::new();
        payload.put("originStationCode", self.origin_station_code.as_str());
        payload.put(
            "destinationStationCode",
            self.destination_station_code.as_str(),
        );
        payload.put("dates", Value::Object(dates));
        payload
    }
}

// Journey availability search.
// `includeTaxesAndFees` is always emitted; `bypassCache` only when set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySearchRequest {
    pub passengers: Vec<PassengerTypeCount>,
    pub criteria: Vec<TripCriterion>,
    pub currency_code: Option<String>,
    pub promotion_code: Option<String>,
    #[serde(default = "default_true")]
    pub include_taxes_and_fees: bool,
    #[serde(default)]
    pub bypass_cache: bool,
}

impl Default for AvailabilitySearchRequest {
    fn default() -> Self {
        Self {
            passengers: Vec::new(),
            criteria: Vec::new(),
            currency_code: None,
            promotion_code: None,
            include_taxes_and_fees: true,
            bypass_cache: false,
        }
    }
}

impl AvailabilitySearchRequest {
    pub fn new(passengers: Vec<PassengerTypeCount>, criteria: Vec<TripCriterion>) -> Self {
        Self {
            passengers,
            criteria,
            ..Default::default()
        }
    }

    // Single outbound leg for `adults` adult passengers
    pub fn one_way(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
        adults: u32,
    ) -> Self {
        Self::new(
            vec![PassengerTypeCount::adults(adults)],
            vec![TripCriterion::new(origin, destination, departure_date)],
        )
    }

    // Outbound leg plus the reversed return leg
    pub fn round_trip(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
        return_date: impl Into<String>,
        adults: u32,
    ) -> Self {
        let origin = origin.into();
        let destination = destination.into();
        Self::new(
            vec![PassengerTypeCount::adults(adults)],
            vec![
                TripCriterion::new(origin.clone(), destination.clone(), departure_date),
                TripCriterion::new(destination, origin, return_date),
            ],
        )
    }

    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }
}

impl ApiRequest for AvailabilitySearchRequest {
    fn name(&self) -> &'static str {
        "AvailabilitySearchRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v4/availability/search")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("passengers", passenger_counts_value(&self.passengers));
        payload.put(
            "criteria",
            object_list(&self.criteria, TripCriterion::to_payload),
        );
        payload.put_opt("currencyCode", self.currency_code.as_deref());
        payload.put_opt("promotionCode", self.promotion_code.as_deref());
        payload.put("includeTaxesAndFees", self.include_taxes_and_fees);
        payload.put_if_true("bypassCache", self.bypass_cache);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["passengers", "criteria"])?;
        check_formats(&data, &[("currencyCode", FieldFormat::CurrencyCode)])?;
        check_pattern(
            &data,
            "promotionCode",
            &PROMO_CODE_REGEX,
            PROMO_CODE_DESCRIPTION,
        )?;
        check_passenger_counts(&data, "passengers")?;

        check_array_field(
            &data,
            "criteria",
            &ArrayRules::between(1, MAX_SEARCH_CRITERIA)
                .requiring(&[
                    "originStationCode",
                    "destinationStationCode",
                    "dates.beginDate",
                ])
                .with_formats(&[
                    ("originStationCode", FieldFormat::AirportCode),
                    ("destinationStationCode", FieldFormat::AirportCode),
                    ("dates.beginDate", FieldFormat::Date),
                    ("dates.endDate", FieldFormat::Date),
                ]),
        )?;

        let today = today();
        check_each_item(&data, "criteria", |criterion| {
            check_distinct_stations(criterion, "originStationCode", "destinationStationCode")?;
            check_not_before(criterion, "dates.beginDate", today)?;
            check_date_order(criterion, "dates.beginDate", "dates.endDate")
        })
    }
}

// Low-fare calendar over a bounded date window.
// `includeTaxesAndFees` is emitted only when the caller set it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowFareSearchRequest {
    pub origin: String,
    pub destination: String,
    pub begin_date: String,
    pub end_date: String,
    pub passengers: Vec<PassengerTypeCount>,
    pub currency_code: Option<String>,
    pub include_taxes_and_fees: Option<bool>,
}

impl LowFareSearchRequest {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        begin_date: impl Into<String>,
        end_date: impl Into<String>,
        adults: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            begin_date: begin_date.into(),
            end_date: end_date.into(),
            passengers: vec![PassengerTypeCount::adults(adults)],
            ..Default::default()
        }
    }
}

impl ApiRequest for LowFareSearchRequest {
    fn name(&self) -> &'static str {
        "LowFareSearchRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v2/availability/lowfare")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("origin", self.origin.as_str());
        payload.put("destination", self.destination.as_str());
        payload.put("beginDate", self.begin_date.as_str());
        payload.put("endDate", self.end_date.as_str());
        payload.put("passengers", passenger_counts_value(&self.passengers));
        payload.put_opt("currencyCode", self.currency_code.as_deref());
        payload.put_opt("includeTaxesAndFees", self.include_taxes_and_fees);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(
            &data,
            &["origin", "destination", "beginDate", "endDate", "passengers"],
        )?;
        check_formats(
            &data,
            &[
                ("origin", FieldFormat::AirportCode),
                ("destination", FieldFormat::AirportCode),
                ("beginDate", FieldFormat::Date),
                ("endDate", FieldFormat::Date),
                ("currencyCode", FieldFormat::CurrencyCode),
            ],
        )?;
        check_distinct_stations(&data, "origin", "destination")?;
        check_date_order(&data, "beginDate", "endDate")?;

        if let (Some(begin), Some(end)) = (
            formats::parse_date(&self.begin_date),
            formats::parse_date(&self.end_date),
        ) {
            if (end - begin).num_days() > MAX_LOWFARE_SPAN_DAYS {
                return Err(ValidationError::for_field(
                    "endDate",
                    format!(
                        "must be within {} days of beginDate",
                        MAX_LOWFARE_SPAN_DAYS
                    ),
                ));
            }
        }

        check_passenger_counts(&data, "passengers")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_one_way_search_validates() {
        let request = AvailabilitySearchRequest::one_way("JFK", "LAX", "2099-06-11", 2);
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["criteria"][0]["originStationCode"], json!("JFK"));
        assert_eq!(payload["criteria"][0]["dates"], json!({"beginDate": "2099-06-11"}));
        assert_eq!(payload["passengers"], json!([{"type": "ADT", "count": 2}]));
        assert_eq!(payload["includeTaxesAndFees"], json!(true));
        assert!(!payload.contains_key("bypassCache"));
        assert!(!payload.contains_key("currencyCode"));
    }

    #[test]
    fn test_round_trip_reverses_second_leg() {
        let request = AvailabilitySearchRequest::round_trip("JFK", "LAX", "2099-06-11", "2099-06-18", 1)
            .with_currency("USD");
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["criteria"][1]["originStationCode"], json!("LAX"));
        assert_eq!(payload["criteria"][1]["destinationStationCode"], json!("JFK"));
        assert_eq!(payload["currencyCode"], json!("USD"));
    }

    #[test_case("2099-06-10", false; "end before begin")]
    #[test_case("2099-06-11", true; "same day")]
    #[test_case("2099-06-12", true; "end after begin")]
    fn test_end_date_ordering(end_date: &str, valid: bool) {
        let request = AvailabilitySearchRequest::new(
            vec![PassengerTypeCount::adults(1)],
            vec![TripCriterion::new("JFK", "LAX", "2099-06-11").through(end_date)],
        );
        let result = request.validate();
        assert_eq!(result.is_ok(), valid);
        if let Err(err) = result {
            assert_eq!(err.field(), Some("criteria[0].dates.endDate"));
        }
    }

    #[test]
    fn test_search_rejects_past_and_same_station() {
        let past = AvailabilitySearchRequest::one_way("JFK", "LAX", "2001-01-01", 1);
        assert_eq!(
            past.validate().unwrap_err().field(),
            Some("criteria[0].dates.beginDate")
        );

        let same = AvailabilitySearchRequest::one_way("JFK", "JFK", "2099-01-01", 1);
        assert_eq!(
            same.validate().unwrap_err().field(),
            Some("criteria[0].destinationStationCode")
        );

        let lower = AvailabilitySearchRequest::one_way("jfk", "LAX", "2099-01-01", 1);
        assert_eq!(
            lower.validate().unwrap_err().field(),
            Some("criteria[0].originStationCode")
        );
    }

    #[test]
    fn test_search_passenger_rules() {
        let mut request = AvailabilitySearchRequest::one_way("JFK", "LAX", "2099-01-01", 0);
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("passengers[0].count")
        );

        request.passengers = vec![];
        assert_eq!(request.validate().unwrap_err().field(), Some("passengers"));

        request.passengers = vec![PassengerTypeCount::new("ALIEN", 1)];
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("passengers[0].type")
        );
    }

    #[test]
    fn test_search_criteria_bounds() {
        let mut request = AvailabilitySearchRequest::one_way("JFK", "LAX", "2099-01-01", 1);
        request.criteria = vec![];
        assert_eq!(request.validate().unwrap_err().field(), Some("criteria"));

        request.criteria = (0..5)
            .map(|_| TripCriterion::new("JFK", "LAX", "2099-01-01"))
            .collect();
        assert!(request.validate().unwrap_err().message.contains("at most 4"));
    }

    #[test]
    fn test_search_optional_fields() {
        let request = AvailabilitySearchRequest {
            promotion_code: Some("summer-sale".to_string()),
            ..AvailabilitySearchRequest::one_way("JFK", "LAX", "2099-01-01", 1)
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("promotionCode"));

        let request = AvailabilitySearchRequest {
            bypass_cache: true,
            include_taxes_and_fees: false,
            ..AvailabilitySearchRequest::one_way("JFK", "LAX", "2099-01-01", 1)
        };
        let payload = request.to_payload();
        assert_eq!(payload["bypassCache"], json!(true));
        assert_eq!(payload["includeTaxesAndFees"], json!(false));
    }

    #[test]
    fn test_search_from_json_defaults_flags() {
        let request: AvailabilitySearchRequest = serde_json::from_value(json!({
            "passengers": [{"type": "ADT", "count": 1}],
            "criteria": [{
                "originStationCode": "LHR",
                "destinationStationCode": "CDG",
                "dates": {"beginDate": "2099-03-01"}
            }]
        }))
        .unwrap();
        assert!(request.include_taxes_and_fees);
        assert!(!request.bypass_cache);
        assert_eq!(request.criteria[0].begin_date, "2099-03-01");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_search_from_json_nested_dates() {
        let request: AvailabilitySearchRequest = serde_json::from_value(json!({
            "passengers": [{"type": "ADT", "count": 1}],
            "criteria": [{
                "originStationCode": "LHR",
                "destinationStationCode": "CDG",
                "dates": {"beginDate": "2099-03-10", "endDate": "2099-03-01"}
            }]
        }))
        .unwrap();
        assert_eq!(request.criteria[0].end_date.as_deref(), Some("2099-03-01"));
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("criteria[0].dates.endDate")
        );

        let flat = serde_json::from_value::<AvailabilitySearchRequest>(json!({
            "passengers": [{"type": "ADT", "count": 1}],
            "criteria": [{
                "originStationCode": "LHR",
                "destinationStationCode": "CDG",
                "beginDate": "2099-03-01"
            }]
        }));
        assert!(flat.is_err());
    }

    #[test]
    fn test_search_payload_deserializes_back() {
        let request = AvailabilitySearchRequest::round_trip("JFK", "LAX", "2099-06-11", "2099-06-18", 2)
            .with_currency("USD");
        let rebuilt: AvailabilitySearchRequest =
            serde_json::from_value(Value::Object(request.to_payload())).unwrap();
        assert_eq!(rebuilt, request);
    }

    #[test]
    fn test_lowfare_window() {
        assert!(LowFareSearchRequest::new("JFK", "LAX", "2099-01-01", "2099-01-31", 1)
            .validate()
            .is_ok());

        let err = LowFareSearchRequest::new("JFK", "LAX", "2099-01-01", "2099-03-01", 1)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("endDate"));

        let err = LowFareSearchRequest::new("JFK", "LAX", "2099-01-10", "2099-01-01", 1)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("endDate"));
    }

    #[test]
    fn test_lowfare_optional_flag_emission() {
        let mut request = LowFareSearchRequest::new("JFK", "LAX", "2099-01-01", "2099-01-05", 1);
        assert!(!request.to_payload().contains_key("includeTaxesAndFees"));
        request.include_taxes_and_fees = Some(false);
        assert_eq!(request.to_payload()["includeTaxesAndFees"], json!(false));
    }
}
