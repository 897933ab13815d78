// Check-in and boarding pass retrieval

use super::common::{check_key, check_record_locator, KEY_DESCRIPTION, KEY_REGEX};
use crate::error::ValidationError;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_each_matches, check_enum, check_string_lengths, require_fields,
    ArrayRules, LengthBounds,
};
use serde::Deserialize;

pub const BOARDING_PASS_FORMATS: [&str; 3] = ["Pdf", "Mobile", "Barcode"];

// Check passengers in on one journey. `verifyDocuments` is always emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub record_locator: String,
    pub journey_key: String,
    pub passenger_keys: Vec<String>,
    #[serde(default)]
    pub verify_documents: bool,
}

impl CheckInRequest {
    pub fn new(
        record_locator: impl Into<String>,
        journey_key: impl Into<String>,
        passenger_keys: Vec<String>,
    ) -> Self {
        Self {
            record_locator: record_locator.into(),
            journey_key: journey_key.into(),
            passenger_keys,
            verify_documents: false,
        }
    }
}

impl ApiRequest for CheckInRequest {
    fn name(&self) -> &'static str {
        "CheckInRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post(format!(
            "/api/nsk/v3/booking/checkin/journey/{}",
            self.journey_key
        ))
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("recordLocator", self.record_locator.as_str());
        payload.put("journeyKey", self.journey_key.as_str());
        payload.put("passengerKeys", self.passenger_keys.clone());
        payload.put("verifyDocuments", self.verify_documents);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["recordLocator", "journeyKey"])?;
        check_record_locator(&data, "recordLocator")?;
        check_key(&data, "journeyKey")?;
        check_array_field(&data, "passengerKeys", &ArrayRules::non_empty())?;
        check_each_matches(&data, "passengerKeys", &KEY_REGEX, KEY_DESCRIPTION)
    }
}

/// Which passengers a boarding pass request covers. The tag doubles as the
/// final path segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "by")]
pub enum BoardingPassTarget {
    #[serde(rename = "journey")]
    ByJourney {
        #[serde(rename = "journeyKey")]
        journey_key: String,
        #[serde(rename = "passengerKeys")]
        passenger_keys: Vec<String>,
    },
    #[serde(rename = "segment")]
    BySegment {
        #[serde(rename = "segmentKey")]
        segment_key: String,
        #[serde(rename = "passengerKey")]
        passenger_key: String,
    },
    #[serde(rename = "recordLocator")]
    ByRecordLocator {
        #[serde(rename = "recordLocator")]
        record_locator: String,
        #[serde(rename = "lastName")]
        last_name: String,
    },
}

impl BoardingPassTarget {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::ByJourney { .. } => "journey",
            Self::BySegment { .. } => "segment",
            Self::ByRecordLocator { .. } => "recordLocator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPassRequest {
    #[serde(flatten)]
    pub target: BoardingPassTarget,
    pub format: Option<String>,
}

impl BoardingPassRequest {
    pub fn by_journey(journey_key: impl Into<String>, passenger_keys: Vec<String>) -> Self {
        Self::new(BoardingPassTarget::ByJourney {
            journey_key: journey_key.into(),
            passenger_keys,
        })
    }

    pub fn by_segment(segment_key: impl Into<String>, passenger_key: impl Into<String>) -> Self {
        Self::new(BoardingPassTarget::BySegment {
            segment_key: segment_key.into(),
            passenger_key: passenger_key.into(),
        })
    }

    pub fn by_record_locator(
        record_locator: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self::new(BoardingPassTarget::ByRecordLocator {
            record_locator: record_locator.into(),
            last_name: last_name.into(),
        })
    }

    fn new(target: BoardingPassTarget) -> Self {
        Self {
            target,
            format: None,
        }
    }

    pub fn in_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

impl ApiRequest for BoardingPassRequest {
    fn name(&self) -> &'static str {
        "BoardingPassRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post(format!(
            "/api/nsk/v3/boardingpasses/{}",
            self.target.path_segment()
        ))
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        match &self.target {
            BoardingPassTarget::ByJourney {
                journey_key,
                passenger_keys,
            } => {
                payload.put("journeyKey", journey_key.as_str());
                payload.put("passengerKeys", passenger_keys.clone());
            }
            BoardingPassTarget::BySegment {
                segment_key,
                passenger_key,
            } => {
                payload.put("segmentKey", segment_key.as_str());
                payload.put("passengerKey", passenger_key.as_str());
            }
            BoardingPassTarget::ByRecordLocator {
                record_locator,
                last_name,
            } => {
                payload.put("recordLocator", record_locator.as_str());
                payload.put("lastName", last_name.as_str());
            }
        }
        payload.put_opt("format", self.format.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        match &self.target {
            BoardingPassTarget::ByJourney { .. } => {
                require_fields(&data, &["journeyKey"])?;
                check_key(&data, "journeyKey")?;
                check_array_field(&data, "passengerKeys", &ArrayRules::non_empty())?;
                check_each_matches(&data, "passengerKeys", &KEY_REGEX, KEY_DESCRIPTION)?;
            }
            BoardingPassTarget::BySegment { .. } => {
                require_fields(&data, &["segmentKey", "passengerKey"])?;
                check_key(&data, "segmentKey")?;
                check_key(&data, "passengerKey")?;
            }
            BoardingPassTarget::ByRecordLocator { .. } => {
                require_fields(&data, &["recordLocator", "lastName"])?;
                check_record_locator(&data, "recordLocator")?;
                check_string_lengths(&data, &[("lastName", LengthBounds::new(1, 32))])?;
            }
        }
        check_enum(&data, "format", &BOARDING_PASS_FORMATS)
    }
}
