// Travel agency / carrier organization maintenance

use super::common::{check_required_address, Address};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{object_list, ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_each_item, check_enum, check_formats, check_nested,
    check_number_range, check_pattern, check_string_lengths, require_any, require_fields,
    ArrayRules, LengthBounds,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub static ORGANIZATION_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_-]{3,10}$").unwrap());
const ORGANIZATION_CODE_DESCRIPTION: &str = "3 to 10 uppercase letters, digits, '_' or '-'";

pub const ORGANIZATION_TYPES: [&str; 5] =
    ["Default", "Master", "Carrier", "TravelAgency", "ThirdParty"];

pub const ORGANIZATION_STATUSES: [&str; 4] = ["Default", "Active", "Pending", "Cancelled"];

pub const RESTRICTION_TYPES: [&str; 4] = ["Market", "Channel", "FareClass", "Currency"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl OrganizationContact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("firstName", self.first_name.as_str());
        payload.put("lastName", self.last_name.as_str());
        payload.put("email", self.email.as_str());
        payload.put_opt("phone", self.phone.as_deref());
        payload
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDiscount {
    pub discount_code: String,
    pub percentage: f64,
}

impl OrganizationDiscount {
    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("discountCode", self.discount_code.as_str());
        payload.put("percentage", self.percentage);
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRestriction {
    pub restriction_type: String,
    pub value: String,
}

impl OrganizationRestriction {
    pub fn new(restriction_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            restriction_type: restriction_type.into(),
            value: value.into(),
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("restrictionType", self.restriction_type.as_str());
        payload.put("value", self.value.as_str());
        payload
    }
}

fn check_organization_code(data: &Payload, field: &str) -> Result<(), ValidationError> {
    check_pattern(
        data,
        field,
        &ORGANIZATION_CODE_REGEX,
        ORGANIZATION_CODE_DESCRIPTION,
    )
}

fn check_contact(contact: &Payload) -> Result<(), ValidationError> {
    require_fields(contact, &["firstName", "lastName", "email"])?;
    check_formats(
        contact,
        &[("email", FieldFormat::Email), ("phone", FieldFormat::Phone)],
    )?;
    check_string_lengths(
        contact,
        &[
            ("firstName", LengthBounds::new(1, 32)),
            ("lastName", LengthBounds::new(1, 32)),
        ],
    )
}

fn check_discount(discount: &Payload) -> Result<(), ValidationError> {
    require_fields(discount, &["discountCode", "percentage"])?;
    check_string_lengths(discount, &[("discountCode", LengthBounds::new(1, 8))])?;
    check_number_range(discount, "percentage", 0.0, 100.0)
}

fn check_restriction(restriction: &Payload) -> Result<(), ValidationError> {
    check_enum(restriction, "restrictionType", &RESTRICTION_TYPES)?;
    match restriction.get("value").and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::for_field("value", "must not be empty")),
    }
}

// Rules shared by create and update once the payload is built
fn check_organization_fields(data: &Payload) -> Result<(), ValidationError> {
    check_organization_code(data, "organizationCode")?;
    check_organization_code(data, "parentOrganizationCode")?;
    if data.get("parentOrganizationCode").is_some()
        && data.get("parentOrganizationCode") == data.get("organizationCode")
    {
        return Err(ValidationError::for_field(
            "parentOrganizationCode",
            "must differ from organizationCode",
        ));
    }
    check_string_lengths(data, &[("name", LengthBounds::new(1, 64))])?;
    check_enum(data, "type", &ORGANIZATION_TYPES)?;
    check_enum(data, "status", &ORGANIZATION_STATUSES)?;
    check_nested(data, "contact", check_contact)
}

// Register a new organization. `allowsCredit` is always emitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCreateRequest {
    pub organization_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub organization_type: String,
    pub status: Option<String>,
    pub parent_organization_code: Option<String>,
    pub contact: Option<OrganizationContact>,
    pub address: Option<Address>,
    pub discount: Option<OrganizationDiscount>,
    #[serde(default)]
    pub restrictions: Vec<OrganizationRestriction>,
    #[serde(default)]
    pub allows_credit: bool,
}

impl OrganizationCreateRequest {
    pub fn new(
        organization_code: impl Into<String>,
        name: impl Into<String>,
        organization_type: impl Into<String>,
    ) -> Self {
        Self {
            organization_code: organization_code.into(),
            name: name.into(),
            organization_type: organization_type.into(),
            ..Default::default()
        }
    }

    pub fn travel_agency(
        organization_code: impl Into<String>,
        name: impl Into<String>,
        parent_organization_code: impl Into<String>,
    ) -> Self {
        Self {
            parent_organization_code: Some(parent_organization_code.into()),
            ..Self::new(organization_code, name, "TravelAgency")
        }
    }
}

impl ApiRequest for OrganizationCreateRequest {
    fn name(&self) -> &'static str {
        "OrganizationCreateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v2/organizations")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("organizationCode", self.organization_code.as_str());
        payload.put("name", self.name.as_str());
        payload.put("type", self.organization_type.as_str());
        payload.put_opt("status", self.status.as_deref());
        payload.put_opt(
            "parentOrganizationCode",
            self.parent_organization_code.as_deref(),
        );
        if let Some(contact) = &self.contact {
            payload.put("contact", Value::Object(contact.to_payload()));
        }
        if let Some(address) = &self.address {
            payload.put("address", Value::Object(address.to_payload()));
        }
        if let Some(discount) = &self.discount {
            payload.put("discount", Value::Object(discount.to_payload()));
        }
        if !self.restrictions.is_empty() {
            payload.put(
                "restrictions",
                object_list(&self.restrictions, OrganizationRestriction::to_payload),
            );
        }
        payload.put("allowsCredit", self.allows_credit);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["organizationCode", "name", "type"])?;
        check_organization_fields(&data)?;
        check_nested(&data, "address", check_required_address)?;
        check_nested(&data, "discount", check_discount)?;
        if data.contains_key("restrictions") {
            check_array_field(
                &data,
                "restrictions",
                &ArrayRules::default().requiring(&["restrictionType", "value"]),
            )?;
        }
        check_each_item(&data, "restrictions", check_restriction)
    }
}

// Replace selected attributes of an existing organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUpdateRequest {
    pub organization_code: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub parent_organization_code: Option<String>,
    pub contact: Option<OrganizationContact>,
}

impl OrganizationUpdateRequest {
    pub fn new(organization_code: impl Into<String>) -> Self {
        Self {
            organization_code: organization_code.into(),
            ..Default::default()
        }
    }

    pub fn with_status(organization_code: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::new(organization_code)
        }
    }
}

impl ApiRequest for OrganizationUpdateRequest {
    fn name(&self) -> &'static str {
        "OrganizationUpdateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::put(format!(
            "/api/nsk/v2/organizations/{}",
            self.organization_code
        ))
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("organizationCode", self.organization_code.as_str());
        payload.put_opt("name", self.name.as_deref());
        payload.put_opt("status", self.status.as_deref());
        payload.put_opt(
            "parentOrganizationCode",
            self.parent_organization_code.as_deref(),
        );
        if let Some(contact) = &self.contact {
            payload.put("contact", Value::Object(contact.to_payload()));
        }
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["organizationCode"])?;
        require_any(
            &data,
            &["name", "status", "parentOrganizationCode", "contact"],
        )?;
        check_organization_fields(&data)
    }
}
