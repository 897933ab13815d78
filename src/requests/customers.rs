// Customer (person) account creation

use super::common::{
    check_person_name, today, PersonName, CULTURE_CODE_DESCRIPTION, CULTURE_CODE_REGEX,
};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_formats, check_nested, check_not_after, check_pattern, check_string_lengths,
    require_fields, LengthBounds,
};
use serde::Deserialize;
use serde_json::Value;

// `marketingOptIn` is always emitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateRequest {
    pub username: String,
    pub password: String,
    pub name: PersonName,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub culture_code: Option<String>,
    #[serde(default)]
    pub marketing_opt_in: bool,
}

impl CustomerCreateRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>, name: PersonName) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            name,
            ..Default::default()
        }
    }
}

impl ApiRequest for CustomerCreateRequest {
    fn name(&self) -> &'static str {
        "CustomerCreateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/persons")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("username", self.username.as_str());
        payload.put("password", self.password.as_str());
        payload.put("name", Value::Object(self.name.to_payload()));
        payload.put_opt("dateOfBirth", self.date_of_birth.as_deref());
        payload.put_opt("phone", self.phone.as_deref());
        payload.put_opt("nationality", self.nationality.as_deref());
        payload.put_opt("cultureCode", self.culture_code.as_deref());
        payload.put("marketingOptIn", self.marketing_opt_in);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["username", "password", "name.first", "name.last"])?;
        check_formats(
            &data,
            &[
                ("username", FieldFormat::Email),
                ("dateOfBirth", FieldFormat::Date),
                ("phone", FieldFormat::Phone),
                ("nationality", FieldFormat::CountryCode),
            ],
        )?;
        check_string_lengths(&data, &[("password", LengthBounds::new(8, 64))])?;
        check_pattern(
            &data,
            "cultureCode",
            &CULTURE_CODE_REGEX,
            CULTURE_CODE_DESCRIPTION,
        )?;
        check_not_after(&data, "dateOfBirth", today())?;
        check_nested(&data, "name", check_person_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;
    use test_case::test_case;

    fn customer() -> CustomerCreateRequest {
        CustomerCreateRequest::new("ada@example.com", "s3cure-pass", PersonName::new("Ada", "Lovelace"))
    }

    #[test]
    fn test_minimal_customer() {
        let payload = customer().validated_payload().unwrap();
        assert_eq!(payload["marketingOptIn"], json!(false));
        assert!(!payload.contains_key("phone"));
    }

    #[test_case("short", false; "seven or fewer")]
    #[test_case("eightchr", true; "eight")]
    #[test_case(&"p".repeat(64), true; "sixty four")]
    #[test_case(&"p".repeat(65), false; "sixty five")]
    fn test_password_length(password: &str, valid: bool) {
        let request = CustomerCreateRequest {
            password: password.to_string(),
            ..customer()
        };
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_customer_fields() {
        let bad_user = CustomerCreateRequest {
            username: "ada".to_string(),
            ..customer()
        };
        assert_eq!(bad_user.validate().unwrap_err().field(), Some("username"));

        let tomorrow = (today() + Duration::days(1)).format("%Y-%m-%d").to_string();
        let unborn = CustomerCreateRequest {
            date_of_birth: Some(tomorrow),
            ..customer()
        };
        assert_eq!(unborn.validate().unwrap_err().field(), Some("dateOfBirth"));

        let long_name = CustomerCreateRequest {
            name: PersonName::new("A".repeat(33), "Lovelace"),
            ..customer()
        };
        assert_eq!(long_name.validate().unwrap_err().field(), Some("name.first"));

        let full = CustomerCreateRequest {
            date_of_birth: Some("1990-12-10".to_string()),
            phone: Some("+44 20 7946 0958".to_string()),
            nationality: Some("GB".to_string()),
            culture_code: Some("en-GB".to_string()),
            marketing_opt_in: true,
            ..customer()
        };
        assert!(full.validate().is_ok());
        assert_eq!(full.to_payload()["marketingOptIn"], json!(true));

        let bad_culture = CustomerCreateRequest {
            culture_code: Some("english".to_string()),
            ..customer()
        };
        assert_eq!(bad_culture.validate().unwrap_err().field(), Some("cultureCode"));
    }
}
