// Outbound notifications about a booking

use super::common::check_record_locator;
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_enum, check_formats, check_pattern, check_string_lengths, is_present, require_fields,
    LengthBounds,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

pub const MESSAGE_TYPES: [&str; 3] = ["Email", "Sms", "Queue"];

static QUEUE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{1,10}$").unwrap());

pub const MAX_BODY_LENGTH: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendRequest {
    pub message_type: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub record_locator: Option<String>,
    pub send_at: Option<String>,
}

impl MessageSendRequest {
    pub fn email(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            message_type: "Email".to_string(),
            recipient: recipient.into(),
            subject: Some(subject.into()),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn sms(phone_number: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_type: "Sms".to_string(),
            recipient: phone_number.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn queue(queue_code: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_type: "Queue".to_string(),
            recipient: queue_code.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn about(mut self, record_locator: impl Into<String>) -> Self {
        self.record_locator = Some(record_locator.into());
        self
    }
}

impl ApiRequest for MessageSendRequest {
    fn name(&self) -> &'static str {
        "MessageSendRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/messages")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("messageType", self.message_type.as_str());
        payload.put("recipient", self.recipient.as_str());
        payload.put_opt("subject", self.subject.as_deref());
        payload.put("body", self.body.as_str());
        payload.put_opt("recordLocator", self.record_locator.as_deref());
        payload.put_opt("sendAt", self.send_at.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["messageType", "recipient", "body"])?;
        check_enum(&data, "messageType", &MESSAGE_TYPES)?;

        match self.message_type.as_str() {
            "Email" => {
                require_fields(&data, &["subject"])?;
                check_formats(&data, &[("recipient", FieldFormat::Email)])?;
            }
            "Sms" => check_formats(&data, &[("recipient", FieldFormat::Phone)])?,
            _ => check_pattern(
                &data,
                "recipient",
                &QUEUE_CODE_REGEX,
                "a queue code of 1 to 10 uppercase letters or digits",
            )?,
        }
        if self.message_type != "Email" && is_present(&data, "subject") {
            return Err(ValidationError::for_field(
                "subject",
                "is only allowed for Email messages",
            ));
        }

        check_string_lengths(
            &data,
            &[
                ("subject", LengthBounds::max(128)),
                ("body", LengthBounds::new(1, MAX_BODY_LENGTH)),
            ],
        )?;
        check_record_locator(&data, "recordLocator")?;
        check_formats(&data, &[("sendAt", FieldFormat::DateTime)])
    }
}
