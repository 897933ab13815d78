// Booking-flow navigation: asking what comes next and validating or
// executing a step

use super::common::{check_key, check_record_locator, PROMO_CODE_DESCRIPTION, PROMO_CODE_REGEX};
use crate::error::ValidationError;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_enum, check_nested, check_pattern, check_string_lengths, require_fields, LengthBounds,
};
use serde::Deserialize;
use serde_json::Value;

pub const ACTION_TYPES: [&str; 9] = [
    "SelectJourney",
    "AddPassenger",
    "UpdatePassenger",
    "SelectSeat",
    "AddBaggage",
    "AddPayment",
    "ApplyPromotion",
    "CommitBooking",
    "CancelBooking",
];

/// A navigation call. Each variant is sent to its own action path and carries
/// only the fields that action accepts.
///
/// `validateAction` and `executeAction` take an `actionType` plus free-form
/// `actionData` whose required keys depend on the action type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum NavigationActionRequest {
    #[serde(rename = "getNextAction")]
    GetNextAction {
        #[serde(rename = "currentStep", default)]
        current_step: Option<String>,
        #[serde(rename = "recordLocator", default)]
        record_locator: Option<String>,
    },
    #[serde(rename = "getNavigationActions")]
    GetNavigationActions {
        #[serde(rename = "currentPage", default)]
        current_page: Option<String>,
        #[serde(rename = "includeDisabled", default)]
        include_disabled: bool,
    },
    #[serde(rename = "validateAction")]
    ValidateAction {
        #[serde(rename = "actionType")]
        action_type: String,
        #[serde(rename = "actionData", default)]
        action_data: Payload,
    },
    #[serde(rename = "executeAction")]
    ExecuteAction {
        #[serde(rename = "actionType")]
        action_type: String,
        #[serde(rename = "actionData", default)]
        action_data: Payload,
        #[serde(rename = "idempotencyKey", default)]
        idempotency_key: Option<String>,
    },
}

impl NavigationActionRequest {
    pub fn next_action() -> Self {
        Self::GetNextAction {
            current_step: None,
            record_locator: None,
        }
    }

    pub fn available_actions(current_page: impl Into<String>) -> Self {
        Self::GetNavigationActions {
            current_page: Some(current_page.into()),
            include_disabled: false,
        }
    }

    pub fn validate_action(action_type: impl Into<String>, action_data: Payload) -> Self {
        Self::ValidateAction {
            action_type: action_type.into(),
            action_data,
        }
    }

    pub fn execute_action(action_type: impl Into<String>, action_data: Payload) -> Self {
        Self::ExecuteAction {
            action_type: action_type.into(),
            action_data,
            idempotency_key: None,
        }
    }

    // Path segment naming the action
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetNextAction { .. } => "getNextAction",
            Self::GetNavigationActions { .. } => "getNavigationActions",
            Self::ValidateAction { .. } => "validateAction",
            Self::ExecuteAction { .. } => "executeAction",
        }
    }
}

// Keys an action type needs inside `actionData`
fn required_action_data(action_type: &str) -> &'static [&'static str] {
    match action_type {
        "AddPassenger" | "UpdatePassenger" => &["passengerInfo"],
        "AddPayment" => &["paymentMethod"],
        "SelectJourney" => &["journeyKey"],
        "SelectSeat" => &["passengerKey", "unitKey"],
        "ApplyPromotion" => &["promotionCode"],
        "CancelBooking" => &["recordLocator"],
        _ => &[],
    }
}

fn check_passenger_info(info: &Payload) -> Result<(), ValidationError> {
    require_fields(info, &["firstName", "lastName"])?;
    check_string_lengths(
        info,
        &[
            ("firstName", LengthBounds::new(1, 32)),
            ("lastName", LengthBounds::new(1, 32)),
        ],
    )
}

fn check_action_data(action_type: &str, data: &Payload) -> Result<(), ValidationError> {
    require_fields(data, required_action_data(action_type))?;
    check_nested(data, "passengerInfo", check_passenger_info)?;
    check_key(data, "journeyKey")?;
    check_key(data, "passengerKey")?;
    check_key(data, "unitKey")?;
    check_record_locator(data, "recordLocator")?;
    check_pattern(
        data,
        "promotionCode",
        &PROMO_CODE_REGEX,
        PROMO_CODE_DESCRIPTION,
    )
}

impl ApiRequest for NavigationActionRequest {
    fn name(&self) -> &'static str {
        "NavigationActionRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post(format!("/api/nsk/v1/navigation/{}", self.action()))
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        match self {
            Self::GetNextAction {
                current_step,
                record_locator,
            } => {
                payload.put_opt("currentStep", current_step.as_deref());
                payload.put_opt("recordLocator", record_locator.as_deref());
            }
            Self::GetNavigationActions {
                current_page,
                include_disabled,
            } => {
                payload.put_opt("currentPage", current_page.as_deref());
                payload.put_if_true("includeDisabled", *include_disabled);
            }
            Self::ValidateAction {
                action_type,
                action_data,
            } => {
                payload.put("actionType", action_type.as_str());
                payload.put("actionData", Value::Object(action_data.clone()));
            }
            Self::ExecuteAction {
                action_type,
                action_data,
                idempotency_key,
            } => {
                payload.put("actionType", action_type.as_str());
                payload.put("actionData", Value::Object(action_data.clone()));
                payload.put_opt("idempotencyKey", idempotency_key.as_deref());
            }
        }
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        match self {
            Self::GetNextAction { .. } => {
                check_string_lengths(&data, &[("currentStep", LengthBounds::max(64))])?;
                check_record_locator(&data, "recordLocator")
            }
            Self::GetNavigationActions { .. } => {
                check_string_lengths(&data, &[("currentPage", LengthBounds::max(64))])
            }
            Self::ValidateAction {
                action_type,
                action_data,
            }
            | Self::ExecuteAction {
                action_type,
                action_data,
                ..
            } => {
                require_fields(&data, &["actionType"])?;
                check_enum(&data, "actionType", &ACTION_TYPES)?;
                check_string_lengths(&data, &[("idempotencyKey", LengthBounds::new(8, 64))])?;
                check_action_data(action_type, action_data)
                    .map_err(|e| e.nested_under("actionData"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn data(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_variant_paths() {
        assert_eq!(
            NavigationActionRequest::next_action().endpoint().path,
            "/api/nsk/v1/navigation/getNextAction"
        );
        assert_eq!(
            NavigationActionRequest::available_actions("passengers")
                .endpoint()
                .path,
            "/api/nsk/v1/navigation/getNavigationActions"
        );
        assert!(NavigationActionRequest::next_action().validate().is_ok());
    }

    #[test]
    fn test_include_disabled_only_when_true() {
        let mut request = NavigationActionRequest::available_actions("seats");
        assert!(!request.to_payload().contains_key("includeDisabled"));
        if let NavigationActionRequest::GetNavigationActions {
            include_disabled, ..
        } = &mut request
        {
            *include_disabled = true;
        }
        assert_eq!(request.to_payload()["includeDisabled"], json!(true));
    }

    #[test_case("AddPassenger", json!({"passengerInfo": {"firstName": "Ada", "lastName": "Lovelace"}}), None; "passenger info")]
    #[test_case("AddPassenger", json!({}), Some("actionData.passengerInfo"); "passenger info missing")]
    #[test_case("UpdatePassenger", json!({"passengerInfo": {"firstName": "Ada"}}), Some("actionData.passengerInfo.lastName"); "passenger info incomplete")]
    #[test_case("UpdatePassenger", json!({"passengerInfo": "Ada"}), Some("actionData.passengerInfo"); "passenger info not object")]
    #[test_case("AddPayment", json!({}), Some("actionData.paymentMethod"); "payment method missing")]
    #[test_case("AddPayment", json!({"paymentMethod": "CreditCard"}), None; "payment method")]
    #[test_case("SelectJourney", json!({"journeyKey": "journey_0001"}), None; "journey")]
    #[test_case("SelectSeat", json!({"passengerKey": "p1234567"}), Some("actionData.unitKey"); "seat unit missing")]
    #[test_case("ApplyPromotion", json!({"promotionCode": "summer"}), Some("actionData.promotionCode"); "promotion shape")]
    #[test_case("CancelBooking", json!({"recordLocator": "ABC123"}), None; "cancel")]
    #[test_case("CommitBooking", json!({}), None; "commit needs nothing")]
    fn test_action_data_by_type(action_type: &str, action_data: Value, failing: Option<&str>) {
        let request = NavigationActionRequest::validate_action(action_type, data(action_data));
        match failing {
            None => assert!(request.validate().is_ok()),
            Some(field) => assert_eq!(request.validate().unwrap_err().field(), Some(field)),
        }
    }

    #[test]
    fn test_action_type_enumerated() {
        let request = NavigationActionRequest::execute_action("FlyAway", Payload::new());
        assert_eq!(request.validate().unwrap_err().field(), Some("actionType"));
        let request = NavigationActionRequest::execute_action("", Payload::new());
        assert_eq!(request.validate().unwrap_err().field(), Some("actionType"));
    }

    #[test]
    fn test_idempotency_key_length() {
        let request = NavigationActionRequest::ExecuteAction {
            action_type: "CommitBooking".to_string(),
            action_data: Payload::new(),
            idempotency_key: Some("short".to_string()),
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("idempotencyKey"));

        let request = NavigationActionRequest::ExecuteAction {
            action_type: "CommitBooking".to_string(),
            action_data: Payload::new(),
            idempotency_key: Some("commit-7f3a9c21".to_string()),
        };
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["actionData"], json!({}));
    }

    #[test]
    fn test_deserializes_tagged_input() {
        let request: NavigationActionRequest = serde_json::from_value(json!({
            "action": "executeAction",
            "actionType": "SelectJourney",
            "actionData": {"journeyKey": "journey_0001"}
        }))
        .unwrap();
        assert_eq!(request.action(), "executeAction");
        assert!(request.validate().is_ok());
    }
}
