// Voucher issuance, maintenance and lookup

use super::common::{check_record_locator, PROMO_CODE_DESCRIPTION, PROMO_CODE_REGEX};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_enum, check_formats, check_integer_range, check_nested, check_pattern,
    check_positive_amount, check_string_lengths, exactly_one, require_any, require_fields,
    require_group, require_if_present, LengthBounds,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub const VOUCHER_STATUSES: [&str; 5] = ["Available", "Void", "Expired", "Redeemed", "Reserved"];

pub const VOUCHER_TYPES: [&str; 4] = ["Credit", "Service", "SingleUse", "MultiUse"];

// Voucher references travel in the request path
pub static VOUCHER_REFERENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,20}$").unwrap());
const VOUCHER_REFERENCE_DESCRIPTION: &str = "1 to 20 letters, digits, '_' or '-'";

pub const MAX_VOUCHER_QUANTITY: i64 = 100;

pub const MAX_SEARCH_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoucherCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl VoucherCustomer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: None,
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put_opt("firstName", self.first_name.as_deref());
        payload.put_opt("lastName", self.last_name.as_deref());
        payload.put_opt("email", self.email.as_deref());
        payload
    }
}

fn check_voucher_customer(customer: &Payload) -> Result<(), ValidationError> {
    require_group(customer, &["firstName", "lastName"])?;
    check_formats(customer, &[("email", FieldFormat::Email)])?;
    check_string_lengths(
        customer,
        &[
            ("firstName", LengthBounds::max(32)),
            ("lastName", LengthBounds::max(32)),
        ],
    )
}

// Issue one or more vouchers of a given basis
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherCreateRequest {
    pub voucher_basis_code: String,
    pub amount: f64,
    pub currency_code: String,
    pub quantity: Option<i64>,
    pub expiration: Option<String>,
    pub customer: Option<VoucherCustomer>,
    pub note: Option<String>,
}

impl VoucherCreateRequest {
    pub fn new(
        voucher_basis_code: impl Into<String>,
        amount: f64,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            voucher_basis_code: voucher_basis_code.into(),
            amount,
            currency_code: currency_code.into(),
            ..Default::default()
        }
    }

    // Single voucher issued to a named customer
    pub fn for_customer(
        voucher_basis_code: impl Into<String>,
        amount: f64,
        currency_code: impl Into<String>,
        customer: VoucherCustomer,
    ) -> Self {
        Self {
            quantity: Some(1),
            customer: Some(customer),
            ..Self::new(voucher_basis_code, amount, currency_code)
        }
    }
}

impl ApiRequest for VoucherCreateRequest {
    fn name(&self) -> &'static str {
        "VoucherCreateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v2/vouchers")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("voucherBasisCode", self.voucher_basis_code.as_str());
        payload.put("amount", self.amount);
        payload.put("currencyCode", self.currency_code.as_str());
        payload.put_opt("quantity", self.quantity);
        payload.put_opt("expiration", self.expiration.as_deref());
        if let Some(customer) = &self.customer {
            payload.put("customer", Value::Object(customer.to_payload()));
        }
        payload.put_opt("note", self.note.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["voucherBasisCode", "amount", "currencyCode"])?;
        check_pattern(
            &data,
            "voucherBasisCode",
            &PROMO_CODE_REGEX,
            PROMO_CODE_DESCRIPTION,
        )?;
        check_positive_amount(&data, "amount")?;
        check_formats(
            &data,
            &[
                ("currencyCode", FieldFormat::CurrencyCode),
                ("expiration", FieldFormat::Date),
            ],
        )?;
        check_integer_range(&data, "quantity", 1, MAX_VOUCHER_QUANTITY)?;
        check_string_lengths(&data, &[("note", LengthBounds::max(256))])?;
        check_nested(&data, "customer", check_voucher_customer)
    }
}

// Change exactly one attribute of an existing voucher
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherUpdateRequest {
    pub voucher_reference: String,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub voucher_type: Option<String>,
    pub expiration: Option<String>,
}

impl VoucherUpdateRequest {
    pub fn new(voucher_reference: impl Into<String>) -> Self {
        Self {
            voucher_reference: voucher_reference.into(),
            ..Default::default()
        }
    }

    pub fn set_status(voucher_reference: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::new(voucher_reference)
        }
    }

    pub fn set_type(voucher_reference: impl Into<String>, voucher_type: impl Into<String>) -> Self {
        Self {
            voucher_type: Some(voucher_type.into()),
            ..Self::new(voucher_reference)
        }
    }

    pub fn extend_to(voucher_reference: impl Into<String>, expiration: impl Into<String>) -> Self {
        Self {
            expiration: Some(expiration.into()),
            ..Self::new(voucher_reference)
        }
    }
}

impl ApiRequest for VoucherUpdateRequest {
    fn name(&self) -> &'static str {
        "VoucherUpdateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::patch(format!("/api/nsk/v1/vouchers/{}", self.voucher_reference))
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("voucherReference", self.voucher_reference.as_str());
        payload.put_opt("status", self.status.as_deref());
        payload.put_opt("type", self.voucher_type.as_deref());
        payload.put_opt("expiration", self.expiration.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["voucherReference"])?;
        check_pattern(
            &data,
            "voucherReference",
            &VOUCHER_REFERENCE_REGEX,
            VOUCHER_REFERENCE_DESCRIPTION,
        )?;
        exactly_one(&data, &["status", "type", "expiration"])?;
        check_enum(&data, "status", &VOUCHER_STATUSES)?;
        check_enum(&data, "type", &VOUCHER_TYPES)?;
        check_formats(&data, &[("expiration", FieldFormat::Date)])
    }
}

// Voucher lookup. The upstream query uses flattened `Group.Field` names.
// `ActiveOnly` is emitted only when true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoucherSearchRequest {
    pub voucher_reference: Option<String>,
    pub record_locator: Option<String>,
    pub market_origin: Option<String>,
    pub market_destination: Option<String>,
    pub market_departure_date: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<String>,
    pub page_size: Option<i64>,
    pub last_index: Option<i64>,
    pub active_only: bool,
}

const SEARCH_CRITERIA: [&str; 8] = [
    "VoucherReference",
    "RecordLocator",
    "Market.Origin",
    "Market.Destination",
    "Market.DepartureDate",
    "CustomerName.FirstName",
    "CustomerName.LastName",
    "Status",
];

impl VoucherSearchRequest {
    pub fn by_reference(voucher_reference: impl Into<String>) -> Self {
        Self {
            voucher_reference: Some(voucher_reference.into()),
            ..Default::default()
        }
    }

    pub fn by_record_locator(record_locator: impl Into<String>) -> Self {
        Self {
            record_locator: Some(record_locator.into()),
            ..Default::default()
        }
    }

    pub fn by_market(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self {
            market_origin: Some(origin.into()),
            market_destination: Some(destination.into()),
            market_departure_date: Some(departure_date.into()),
            ..Default::default()
        }
    }

    pub fn by_customer(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Default::default()
        }
    }

    pub fn page(mut self, page_size: i64, last_index: i64) -> Self {
        self.page_size = Some(page_size);
        self.last_index = Some(last_index);
        self
    }
}

impl ApiRequest for VoucherSearchRequest {
    fn name(&self) -> &'static str {
        "VoucherSearchRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::get("/api/nsk/v1/vouchers")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put_opt("VoucherReference", self.voucher_reference.as_deref());
        payload.put_opt("RecordLocator", self.record_locator.as_deref());
        payload.put_opt("Market.Origin", self.market_origin.as_deref());
        payload.put_opt("Market.Destination", self.market_destination.as_deref());
        payload.put_opt(
            "Market.DepartureDate",
            self.market_departure_date.as_deref(),
        );
        payload.put_opt("CustomerName.FirstName", self.first_name.as_deref());
        payload.put_opt("CustomerName.LastName", self.last_name.as_deref());
        payload.put_opt("Status", self.status.as_deref());
        payload.put_opt("PageSize", self.page_size);
        payload.put_opt("LastIndex", self.last_index);
        payload.put_if_true("ActiveOnly", self.active_only);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_any(&data, &SEARCH_CRITERIA)?;
        require_group(
            &data,
            &["Market.Origin", "Market.Destination", "Market.DepartureDate"],
        )?;
        require_if_present(&data, "CustomerName.FirstName", "CustomerName.LastName")?;
        check_formats(
            &data,
            &[
                ("Market.Origin", FieldFormat::AirportCode),
                ("Market.Destination", FieldFormat::AirportCode),
                ("Market.DepartureDate", FieldFormat::Date),
            ],
        )?;
        check_string_lengths(
            &data,
            &[
                ("VoucherReference", LengthBounds::new(1, 20)),
                ("CustomerName.FirstName", LengthBounds::max(32)),
                ("CustomerName.LastName", LengthBounds::max(32)),
            ],
        )?;
        check_record_locator(&data, "RecordLocator")?;
        check_enum(&data, "Status", &VOUCHER_STATUSES)?;
        check_integer_range(&data, "PageSize", 1, MAX_SEARCH_PAGE_SIZE)?;
        check_integer_range(&data, "LastIndex", 0, i64::MAX)
    }
}
