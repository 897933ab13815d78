// Authentication requests: token creation, MFA challenge/verify, password change

use super::common::{check_key, CULTURE_CODE_DESCRIPTION, CULTURE_CODE_REGEX};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_enum, check_formats, check_integer_range, check_non_empty_strings, check_pattern,
    check_string_lengths, require_fields, LengthBounds,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

// Upper bound on a token's requested lifetime (one day)
pub const MAX_TOKEN_EXPIRATION_MINUTES: i64 = 1440;

pub const MFA_TYPES: [&str; 4] = ["Email", "Sms", "Voice", "Totp"];

static MFA_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4,8}$").unwrap());

fn credentials(username: &str, password: &str, domain: Option<&str>) -> Payload {
    let mut payload = Payload::new();
    payload.put("username", username);
    payload.put("password", password);
    payload.put_opt("domain", domain);
    payload
}

// Create a session token for an agent or customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationTokenRequest {
    pub username: String,
    pub password: String,
    pub domain: Option<String>,
    pub role_code: Option<String>,
    pub culture_code: Option<String>,
    pub expiration_minutes: Option<i64>,
    pub application_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthenticationTokenRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    // Agent login scoped to a domain and role
    pub fn for_agent(
        username: impl Into<String>,
        password: impl Into<String>,
        domain: impl Into<String>,
        role_code: impl Into<String>,
    ) -> Self {
        Self {
            domain: Some(domain.into()),
            role_code: Some(role_code.into()),
            ..Self::new(username, password)
        }
    }

    pub fn expiring_in(mut self, minutes: i64) -> Self {
        self.expiration_minutes = Some(minutes);
        self
    }
}

impl ApiRequest for AuthenticationTokenRequest {
    fn name(&self) -> &'static str {
        "AuthenticationTokenRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/token")
    }

    fn to_payload(&self) -> Payload {
        let mut creds = credentials(&self.username, &self.password, self.domain.as_deref());
        creds.put_opt("roleCode", self.role_code.as_deref());

        let mut payload = Payload::new();
        payload.put("credentials", Value::Object(creds));
        payload.put_opt("applicationName", self.application_name.as_deref());
        payload.put_opt("cultureCode", self.culture_code.as_deref());
        payload.put_opt("expirationMinutes", self.expiration_minutes);
        payload.put_non_empty("roles", &self.roles);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["credentials.username", "credentials.password"])?;
        check_formats(&data, &[("credentials.username", FieldFormat::Email)])?;
        check_string_lengths(
            &data,
            &[
                ("credentials.domain", LengthBounds::max(10)),
                ("credentials.roleCode", LengthBounds::max(4)),
                ("applicationName", LengthBounds::max(64)),
            ],
        )?;
        check_pattern(
            &data,
            "cultureCode",
            &CULTURE_CODE_REGEX,
            CULTURE_CODE_DESCRIPTION,
        )?;
        check_integer_range(
            &data,
            "expirationMinutes",
            1,
            MAX_TOKEN_EXPIRATION_MINUTES,
        )?;
        check_non_empty_strings(&data, "roles")
    }
}

// Start a multi-factor challenge; where the code is sent depends on the type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaChallengeRequest {
    pub username: String,
    pub mfa_type: String,
    pub destination: Option<String>,
}

impl MfaChallengeRequest {
    pub fn by_email(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            mfa_type: "Email".to_string(),
            destination: Some(email.into()),
        }
    }

    pub fn by_sms(username: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            mfa_type: "Sms".to_string(),
            destination: Some(phone.into()),
        }
    }

    pub fn by_totp(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            mfa_type: "Totp".to_string(),
            destination: None,
        }
    }
}

impl ApiRequest for MfaChallengeRequest {
    fn name(&self) -> &'static str {
        "MfaChallengeRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/mfa/challenge")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("username", self.username.as_str());
        payload.put("mfaType", self.mfa_type.as_str());
        payload.put_opt("destination", self.destination.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["username", "mfaType"])?;
        check_formats(&data, &[("username", FieldFormat::Email)])?;
        check_enum(&data, "mfaType", &MFA_TYPES)?;

        match self.mfa_type.as_str() {
            "Email" => {
                require_fields(&data, &["destination"])?;
                check_formats(&data, &[("destination", FieldFormat::Email)])
            }
            "Sms" | "Voice" => {
                require_fields(&data, &["destination"])?;
                check_formats(&data, &[("destination", FieldFormat::Phone)])
            }
            _ if self.destination.is_some() => Err(ValidationError::for_field(
                "destination",
                "must not be provided for Totp challenges",
            )),
            _ => Ok(()),
        }
    }
}

// Answer a multi-factor challenge with the received code
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaVerifyRequest {
    pub challenge_id: String,
    pub code: String,
    #[serde(default)]
    pub remember_device: bool,
}

impl MfaVerifyRequest {
    pub fn new(challenge_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            challenge_id: challenge_id.into(),
            code: code.into(),
            remember_device: false,
        }
    }
}

impl ApiRequest for MfaVerifyRequest {
    fn name(&self) -> &'static str {
        "MfaVerifyRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/mfa/verify")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("challengeId", self.challenge_id.as_str());
        payload.put("code", self.code.as_str());
        payload.put_if_true("rememberDevice", self.remember_device);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["challengeId", "code"])?;
        check_key(&data, "challengeId")?;
        check_pattern(&data, "code", &MFA_CODE_REGEX, "4 to 8 digits")
    }
}

// Change the password of an existing login
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
    pub domain: Option<String>,
}

impl PasswordChangeRequest {
    pub fn new(
        username: impl Into<String>,
        current_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            current_password: current_password.into(),
            new_password: new_password.into(),
            domain: None,
        }
    }
}

impl ApiRequest for PasswordChangeRequest {
    fn name(&self) -> &'static str {
        "PasswordChangeRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/token/password")
    }

    fn to_payload(&self) -> Payload {
        let creds = credentials(
            &self.username,
            &self.current_password,
            self.domain.as_deref(),
        );
        let mut payload = Payload::new();
        payload.put("credentials", Value::Object(creds));
        payload.put("newPassword", self.new_password.as_str());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(
            &data,
            &[
                "credentials.username",
                "credentials.password",
                "newPassword",
            ],
        )?;
        check_formats(&data, &[("credentials.username", FieldFormat::Email)])?;
        check_string_lengths(
            &data,
            &[
                ("credentials.domain", LengthBounds::max(10)),
                ("newPassword", LengthBounds::new(8, 64)),
            ],
        )?;
        if self.new_password == self.current_password {
            return Err(ValidationError::for_field(
                "newPassword",
                "must differ from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_token_request_minimal() {
        assert!(AuthenticationTokenRequest::new("a@b.com", "secret")
            .validate()
            .is_ok());

        let err = AuthenticationTokenRequest::new("not-an-email", "x")
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("credentials.username"));
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_token_request_missing_password() {
        let err = AuthenticationTokenRequest::new("a@b.com", "")
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("credentials.password"));
    }

    #[test]
    fn test_token_payload_omits_optional_keys() {
        let payload = AuthenticationTokenRequest::new("a@b.com", "secret").to_payload();
        assert_eq!(
            Value::Object(payload),
            json!({"credentials": {"username": "a@b.com", "password": "secret"}})
        );
    }

    #[test]
    fn test_agent_token_payload() {
        let request = AuthenticationTokenRequest::for_agent("agent@air.com", "pw", "WWW", "AGNT")
            .expiring_in(30);
        let payload = request.validated_payload().unwrap();
        assert_eq!(payload["credentials"]["domain"], json!("WWW"));
        assert_eq!(payload["credentials"]["roleCode"], json!("AGNT"));
        assert_eq!(payload["expirationMinutes"], json!(30));
    }

    #[test_case(0, false; "zero minutes")]
    #[test_case(1, true; "one minute")]
    #[test_case(1440, true; "one day")]
    #[test_case(1441, false; "over a day")]
    #[test_case(-5, false; "negative")]
    fn test_token_expiration_bounds(minutes: i64, valid: bool) {
        let request = AuthenticationTokenRequest::new("a@b.com", "secret").expiring_in(minutes);
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test_case("en-US", true; "valid culture")]
    #[test_case("EN-us", false; "wrong case")]
    #[test_case("english", false; "free text")]
    fn test_token_culture_code(culture: &str, valid: bool) {
        let request = AuthenticationTokenRequest {
            culture_code: Some(culture.to_string()),
            ..AuthenticationTokenRequest::new("a@b.com", "secret")
        };
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_token_length_caps_and_roles() {
        let request = AuthenticationTokenRequest::for_agent("a@b.com", "pw", "DEF", "TOOLONG");
        assert_eq!(
            request.validate().unwrap_err().field(),
            Some("credentials.roleCode")
        );

        let request = AuthenticationTokenRequest {
            roles: vec!["AGNT".to_string(), String::new()],
            ..AuthenticationTokenRequest::new("a@b.com", "secret")
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("roles[1]"));
    }

    #[test]
    fn test_token_request_from_json() {
        let request: AuthenticationTokenRequest = serde_json::from_value(json!({
            "username": "a@b.com",
            "password": "secret",
            "domain": "WWW",
            "expirationMinutes": 60
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.domain.as_deref(), Some("WWW"));
    }

    #[test]
    fn test_mfa_challenge_destination_depends_on_type() {
        assert!(MfaChallengeRequest::by_email("a@b.com", "c@d.com").validate().is_ok());
        assert!(MfaChallengeRequest::by_sms("a@b.com", "+1 555 123 4567").validate().is_ok());
        assert!(MfaChallengeRequest::by_totp("a@b.com").validate().is_ok());

        let err = MfaChallengeRequest::by_sms("a@b.com", "c@d.com").validate().unwrap_err();
        assert_eq!(err.field(), Some("destination"));

        let totp = MfaChallengeRequest {
            destination: Some("c@d.com".to_string()),
            ..MfaChallengeRequest::by_totp("a@b.com")
        };
        assert_eq!(totp.validate().unwrap_err().field(), Some("destination"));

        let voice = MfaChallengeRequest {
            mfa_type: "Voice".to_string(),
            destination: None,
            ..MfaChallengeRequest::by_totp("a@b.com")
        };
        assert_eq!(voice.validate().unwrap_err().field(), Some("destination"));

        let unknown = MfaChallengeRequest {
            mfa_type: "Pigeon".to_string(),
            ..MfaChallengeRequest::by_totp("a@b.com")
        };
        assert_eq!(unknown.validate().unwrap_err().field(), Some("mfaType"));
    }

    #[test]
    fn test_mfa_verify() {
        let mut request = MfaVerifyRequest::new("chal_12345678", "123456");
        assert!(request.validate().is_ok());
        assert!(!request.to_payload().contains_key("rememberDevice"));

        request.remember_device = true;
        assert_eq!(request.to_payload()["rememberDevice"], json!(true));

        request.code = "12ab".to_string();
        assert_eq!(request.validate().unwrap_err().field(), Some("code"));
    }

    #[test]
    fn test_password_change() {
        assert!(PasswordChangeRequest::new("a@b.com", "old-secret", "new-secret-1")
            .validate()
            .is_ok());

        let err = PasswordChangeRequest::new("a@b.com", "same-secret", "same-secret")
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("newPassword"));

        let err = PasswordChangeRequest::new("a@b.com", "old-secret", "short")
            .validate()
            .unwrap_err();
        assert!(err.message.contains("between 8 and 64"));
    }
}
