// Seat assignment and seat map lookups

use super::common::{check_key, CULTURE_CODE_DESCRIPTION, CULTURE_CODE_REGEX};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{object_list, ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_each_item, check_enum, check_formats, check_pattern, exactly_one,
    require_fields, ArrayRules,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

pub static SEAT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}[A-Z]$").unwrap());

pub const INVENTORY_CONTROL_TYPES: [&str; 2] = ["Session", "HoldSeat"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub passenger_key: String,
    pub segment_key: String,
    pub seat_number: Option<String>,
    pub unit_key: Option<String>,
}

impl SeatAssignment {
    pub fn new(
        passenger_key: impl Into<String>,
        segment_key: impl Into<String>,
        seat_number: impl Into<String>,
    ) -> Self {
        Self {
            passenger_key: passenger_key.into(),
            segment_key: segment_key.into(),
            seat_number: Some(seat_number.into()),
            unit_key: None,
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("passengerKey", self.passenger_key.as_str());
        payload.put("segmentKey", self.segment_key.as_str());
        payload.put_opt("seatNumber", self.seat_number.as_deref());
        payload.put_opt("unitKey", self.unit_key.as_deref());
        payload
    }
}

// Assign seats to passengers. `waiveFee` is always emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignmentRequest {
    pub seat_assignments: Vec<SeatAssignment>,
    #[serde(default)]
    pub waive_fee: bool,
    pub inventory_control: Option<String>,
}

impl SeatAssignmentRequest {
    pub fn new(seat_assignments: Vec<SeatAssignment>) -> Self {
        Self {
            seat_assignments,
            ..Default::default()
        }
    }

    pub fn for_single_seat(
        passenger_key: impl Into<String>,
        segment_key: impl Into<String>,
        seat_number: impl Into<String>,
    ) -> Self {
        Self::new(vec![SeatAssignment::new(
            passenger_key,
            segment_key,
            seat_number,
        )])
    }
}

impl ApiRequest for SeatAssignmentRequest {
    fn name(&self) -> &'static str {
        "SeatAssignmentRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v2/booking/seats")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put(
            "seatAssignments",
            object_list(&self.seat_assignments, SeatAssignment::to_payload),
        );
        payload.put("waiveFee", self.waive_fee);
        payload.put_opt("inventoryControl", self.inventory_control.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["seatAssignments"])?;
        check_enum(&data, "inventoryControl", &INVENTORY_CONTROL_TYPES)?;
        check_array_field(
            &data,
            "seatAssignments",
            &ArrayRules::non_empty().requiring(&["passengerKey", "segmentKey"]),
        )?;
        check_each_item(&data, "seatAssignments", |assignment| {
            check_key(assignment, "passengerKey")?;
            check_key(assignment, "segmentKey")?;
            check_key(assignment, "unitKey")?;
            check_pattern(
                assignment,
                "seatNumber",
                &SEAT_NUMBER_REGEX,
                "a row number followed by an uppercase seat letter",
            )
        })?;

        let mut seen = HashSet::new();
        for (index, assignment) in self.seat_assignments.iter().enumerate() {
            if !seen.insert((&assignment.passenger_key, &assignment.segment_key)) {
                return Err(ValidationError::for_field(
                    format!("seatAssignments[{}].passengerKey", index),
                    "already has a seat on this segment",
                ));
            }
        }
        Ok(())
    }
}

// Fetch the seat map for exactly one journey or one segment.
// `includePropertyLookup` is emitted only when true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMapRequest {
    pub journey_key: Option<String>,
    pub segment_key: Option<String>,
    pub culture_code: Option<String>,
    pub currency_code: Option<String>,
    #[serde(default)]
    pub include_property_lookup: bool,
}

impl SeatMapRequest {
    pub fn for_journey(journey_key: impl Into<String>) -> Self {
        Self {
            journey_key: Some(journey_key.into()),
            ..Default::default()
        }
    }

    pub fn for_segment(segment_key: impl Into<String>) -> Self {
        Self {
            segment_key: Some(segment_key.into()),
            ..Default::default()
        }
    }
}

impl ApiRequest for SeatMapRequest {
    fn name(&self) -> &'static str {
        "SeatMapRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::get("/api/nsk/v3/seatmaps")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put_opt("journeyKey", self.journey_key.as_deref());
        payload.put_opt("segmentKey", self.segment_key.as_deref());
        payload.put_opt("cultureCode", self.culture_code.as_deref());
        payload.put_opt("currencyCode", self.currency_code.as_deref());
        payload.put_if_true("includePropertyLookup", self.include_property_lookup);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        exactly_one(&data, &["journeyKey", "segmentKey"])?;
        check_formats(&data, &[("currencyCode", FieldFormat::CurrencyCode)])?;
        check_key(&data, "journeyKey")?;
        check_key(&data, "segmentKey")?;
        check_pattern(
            &data,
            "cultureCode",
            &CULTURE_CODE_REGEX,
            CULTURE_CODE_DESCRIPTION,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_single_seat_scenario() {
        let request = SeatAssignmentRequest::for_single_seat("p1234567", "s1234567", "12A");
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["seatAssignments"][0]["seatNumber"], json!("12A"));
        assert_eq!(payload["waiveFee"], json!(false));
        assert!(!payload.contains_key("inventoryControl"));
    }

    #[test_case("12A", true; "two digit row")]
    #[test_case("1F", true; "single digit row")]
    #[test_case("123K", true; "three digit row")]
    #[test_case("1234A", false; "four digit row")]
    #[test_case("12a", false; "lowercase letter")]
    #[test_case("A12", false; "letter first")]
    fn test_seat_number_shape(seat: &str, valid: bool) {
        let request = SeatAssignmentRequest::for_single_seat("p1234567", "s1234567", seat);
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_seat_keys() {
        let err = SeatAssignmentRequest::for_single_seat("p1", "s1234567", "12A")
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("seatAssignments[0].passengerKey"));

        let err = SeatAssignmentRequest::for_single_seat("p1234567", "bad key!", "12A")
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("seatAssignments[0].segmentKey"));

        let without_seat = SeatAssignmentRequest::new(vec![SeatAssignment {
            passenger_key: "p1234567".to_string(),
            segment_key: "s1234567".to_string(),
            seat_number: None,
            unit_key: Some("unit_12A_0001".to_string()),
        }]);
        assert!(without_seat.validate().is_ok());
    }

    #[test]
    fn test_duplicate_passenger_on_segment() {
        let request = SeatAssignmentRequest::new(vec![
            SeatAssignment::new("p1234567", "s1234567", "12A"),
            SeatAssignment::new("p7654321", "s1234567", "12B"),
            SeatAssignment::new("p1234567", "s1234567", "14C"),
        ]);
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("seatAssignments[2].passengerKey")
        );
    }

    #[test]
    fn test_seat_assignment_flags() {
        let request = SeatAssignmentRequest {
            waive_fee: true,
            inventory_control: Some("Hold".to_string()),
            ..SeatAssignmentRequest::for_single_seat("p1234567", "s1234567", "12A")
        };
        assert_eq!(request.to_payload()["waiveFee"], json!(true));
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("inventoryControl")
        );
        assert!(SeatAssignmentRequest::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_seat_map_exactly_one_key() {
        assert!(SeatMapRequest::for_journey("journey_0001").validate().is_ok());
        assert!(SeatMapRequest::for_segment("segment_0001").validate().is_ok());
        assert!(SeatMapRequest::default().validate().is_err());

        let both = SeatMapRequest {
            segment_key: Some("segment_0001".to_string()),
            ..SeatMapRequest::for_journey("journey_0001")
        };
        assert!(both.validate().unwrap_err().message.contains("found 2"));

        let lookup = SeatMapRequest {
            include_property_lookup: true,
            ..SeatMapRequest::for_journey("journey_0001")
        };
        assert_eq!(lookup.to_payload()["includePropertyLookup"], json!(true));
        assert!(!SeatMapRequest::for_journey("journey_0001")
            .to_payload()
            .contains_key("includePropertyLookup"));
    }
}
