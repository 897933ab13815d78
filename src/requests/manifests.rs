// Flight manifest lookup

use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{check_enum, check_formats, check_pattern, require_fields};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

pub const MANIFEST_TYPES: [&str; 3] = ["Passenger", "Crew", "Special"];

static CARRIER_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{2}$").unwrap());

static FLIGHT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,4}$").unwrap());

// `checkedInOnly` is emitted only when true
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightManifestRequest {
    pub carrier_code: String,
    pub flight_number: String,
    pub departure_date: String,
    pub origin: Option<String>,
    pub manifest_type: Option<String>,
    #[serde(default)]
    pub checked_in_only: bool,
}

impl FlightManifestRequest {
    pub fn new(
        carrier_code: impl Into<String>,
        flight_number: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self {
            carrier_code: carrier_code.into(),
            flight_number: flight_number.into(),
            departure_date: departure_date.into(),
            ..Default::default()
        }
    }

    pub fn from_station(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl ApiRequest for FlightManifestRequest {
    fn name(&self) -> &'static str {
        "FlightManifestRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::get("/api/nsk/v1/manifest")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("carrierCode", self.carrier_code.as_str());
        payload.put("flightNumber", self.flight_number.as_str());
        payload.put("departureDate", self.departure_date.as_str());
        payload.put_opt("origin", self.origin.as_deref());
        payload.put_opt("manifestType", self.manifest_type.as_deref());
        payload.put_if_true("checkedInOnly", self.checked_in_only);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["carrierCode", "flightNumber", "departureDate"])?;
        check_pattern(
            &data,
            "carrierCode",
            &CARRIER_CODE_REGEX,
            "a 2-character carrier code",
        )?;
        check_pattern(
            &data,
            "flightNumber",
            &FLIGHT_NUMBER_REGEX,
            "1 to 4 digits",
        )?;
        check_formats(
            &data,
            &[
                ("departureDate", FieldFormat::Date),
                ("origin", FieldFormat::AirportCode),
            ],
        )?;
        check_enum(&data, "manifestType", &MANIFEST_TYPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("NK", "123", true; "alpha carrier")]
    #[test_case("9W", "7", true; "alnum carrier")]
    #[test_case("NKS", "123", false; "three char carrier")]
    #[test_case("nk", "123", false; "lowercase carrier")]
    #[test_case("NK", "12345", false; "five digit flight")]
    #[test_case("NK", "12A", false; "suffixed flight")]
    fn test_flight_identity(carrier: &str, flight: &str, valid: bool) {
        let request = FlightManifestRequest::new(carrier, flight, "2030-06-01");
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_manifest_options() {
        let mut request = FlightManifestRequest::new("NK", "123", "2030-06-01").from_station("FLL");
        assert!(request.validate().is_ok());
        assert!(!request.to_payload().contains_key("checkedInOnly"));

        request.checked_in_only = true;
        request.manifest_type = Some("Crew".to_string());
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["checkedInOnly"], json!(true));

        request.manifest_type = Some("Cargo".to_string());
        assert_eq!(request.validate().unwrap_err().field(), Some("manifestType"));

        let bad_date = FlightManifestRequest::new("NK", "123", "06/01/2030");
        assert_eq!(bad_date.validate().unwrap_err().field(), Some("departureDate"));
    }
}
