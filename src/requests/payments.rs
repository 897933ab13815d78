// Payments and refunds.
//
// `paymentMethodType` selects which shape `paymentDetails` must have; the
// details map stays loosely typed because the tag is caller-supplied input.

use super::common::{check_key, current_year};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_enum, check_formats, check_integer_range, check_nested, check_pattern,
    check_positive_amount, check_string_lengths, lookup, require_fields, LengthBounds,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub const PAYMENT_METHOD_TYPES: [&str; 5] = [
    "CreditCard",
    "DebitCard",
    "MobileMoney",
    "Voucher",
    "BankTransfer",
];

pub const REFUND_DESTINATIONS: [&str; 3] = ["OriginalPayment", "Voucher", "CustomerCredit"];

pub const MAX_INSTALLMENTS: i64 = 24;

static CVV_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").unwrap());

// Card number with spaces and hyphens removed must be 12-19 digits
fn check_card_number(details: &Payload, field: &str) -> Result<(), ValidationError> {
    let Some(value) = lookup(details, field) else {
        return Ok(());
    };
    let digits: Option<String> = value
        .as_str()
        .map(|raw| raw.chars().filter(|c| *c != ' ' && *c != '-').collect());
    match digits {
        Some(d) if (12..=19).contains(&d.len()) && d.chars().all(|c| c.is_ascii_digit()) => Ok(()),
        _ => Err(ValidationError::for_field(field, "must be 12 to 19 digits")),
    }
}

// Integer or digit string within [min, max]; card forms often submit strings
fn check_numeric_integer(
    details: &Payload,
    field: &str,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    let Some(value) = lookup(details, field) else {
        return Ok(());
    };
    let number = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            s.parse::<i64>().ok()
        }
        _ => None,
    };
    match number {
        Some(n) if (min..=max).contains(&n) => Ok(()),
        _ => Err(ValidationError::for_field(
            field,
            format!("must be a number between {} and {}", min, max),
        )),
    }
}

fn check_card_details(details: &Payload) -> Result<(), ValidationError> {
    require_fields(
        details,
        &[
            "accountNumber",
            "expirationMonth",
            "expirationYear",
            "cvv",
            "holderName",
        ],
    )?;
    check_card_number(details, "accountNumber")?;
    check_numeric_integer(details, "expirationMonth", 1, 12)?;
    check_numeric_integer(details, "expirationYear", i64::from(current_year()), 9999)?;
    check_pattern(details, "cvv", &CVV_REGEX, "3 or 4 digits")?;
    check_string_lengths(details, &[("holderName", LengthBounds::new(1, 64))])
}

fn check_mobile_money_details(details: &Payload) -> Result<(), ValidationError> {
    require_fields(details, &["provider", "phoneNumber"])?;
    check_formats(details, &[("phoneNumber", FieldFormat::Phone)])?;
    check_string_lengths(details, &[("provider", LengthBounds::new(1, 32))])
}

fn check_voucher_details(details: &Payload) -> Result<(), ValidationError> {
    require_fields(details, &["voucherNumber"])
}

fn check_bank_transfer_details(details: &Payload) -> Result<(), ValidationError> {
    require_fields(details, &["bankCode", "accountNumber"])?;
    check_string_lengths(
        details,
        &[
            ("bankCode", LengthBounds::new(1, 11)),
            ("accountNumber", LengthBounds::new(1, 34)),
        ],
    )
}

// Card data used by the card factories
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub account_number: String,
    pub expiration_month: u32,
    pub expiration_year: i32,
    pub cvv: String,
    pub holder_name: String,
}

impl CardDetails {
    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("accountNumber", self.account_number.as_str());
        payload.put("expirationMonth", self.expiration_month);
        payload.put("expirationYear", self.expiration_year);
        payload.put("cvv", self.cvv.as_str());
        payload.put("holderName", self.holder_name.as_str());
        payload
    }
}

// Apply a payment to the in-session booking.
// `storePaymentMethod` is emitted only when true.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProcessRequest {
    pub amount: f64,
    pub currency_code: String,
    pub payment_method_type: String,
    #[serde(default)]
    pub payment_details: Payload,
    pub installments: Option<i64>,
    #[serde(default)]
    pub store_payment_method: bool,
}

impl PaymentProcessRequest {
    pub fn new(
        amount: f64,
        currency_code: impl Into<String>,
        payment_method_type: impl Into<String>,
        payment_details: Payload,
    ) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
            payment_method_type: payment_method_type.into(),
            payment_details,
            ..Default::default()
        }
    }

    pub fn credit_card(amount: f64, currency_code: impl Into<String>, card: &CardDetails) -> Self {
        Self::new(amount, currency_code, "CreditCard", card.to_payload())
    }

    pub fn debit_card(amount: f64, currency_code: impl Into<String>, card: &CardDetails) -> Self {
        Self::new(amount, currency_code, "DebitCard", card.to_payload())
    }

    pub fn mobile_money(
        amount: f64,
        currency_code: impl Into<String>,
        provider: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        let mut details = Payload::new();
        details.put("provider", Value::String(provider.into()));
        details.put("phoneNumber", Value::String(phone_number.into()));
        Self::new(amount, currency_code, "MobileMoney", details)
    }

    pub fn voucher(
        amount: f64,
        currency_code: impl Into<String>,
        voucher_number: impl Into<String>,
    ) -> Self {
        let mut details = Payload::new();
        details.put("voucherNumber", Value::String(voucher_number.into()));
        Self::new(amount, currency_code, "Voucher", details)
    }

    pub fn bank_transfer(
        amount: f64,
        currency_code: impl Into<String>,
        bank_code: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        let mut details = Payload::new();
        details.put("bankCode", Value::String(bank_code.into()));
        details.put("accountNumber", Value::String(account_number.into()));
        Self::new(amount, currency_code, "BankTransfer", details)
    }

    pub fn in_installments(mut self, installments: i64) -> Self {
        self.installments = Some(installments);
        self
    }
}

impl ApiRequest for PaymentProcessRequest {
    fn name(&self) -> &'static str {
        "PaymentProcessRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v6/booking/payments")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("amount", self.amount);
        payload.put("currencyCode", self.currency_code.as_str());
        payload.put("paymentMethodType", self.payment_method_type.as_str());
        payload.put("paymentDetails", Value::Object(self.payment_details.clone()));
        payload.put_opt("installments", self.installments);
        payload.put_if_true("storePaymentMethod", self.store_payment_method);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(
            &data,
            &[
                "amount",
                "currencyCode",
                "paymentMethodType",
                "paymentDetails",
            ],
        )?;
        check_positive_amount(&data, "amount")?;
        check_formats(&data, &[("currencyCode", FieldFormat::CurrencyCode)])?;
        check_enum(&data, "paymentMethodType", &PAYMENT_METHOD_TYPES)?;

        if self.installments.is_some() {
            if self.payment_method_type != "CreditCard" {
                return Err(ValidationError::for_field(
                    "installments",
                    "is only allowed for CreditCard payments",
                ));
            }
            check_integer_range(&data, "installments", 1, MAX_INSTALLMENTS)?;
        }

        let check_details: fn(&Payload) -> Result<(), ValidationError> =
            match self.payment_method_type.as_str() {
                "CreditCard" | "DebitCard" => check_card_details,
                "MobileMoney" => check_mobile_money_details,
                "Voucher" => check_voucher_details,
                _ => check_bank_transfer_details,
            };
        check_nested(&data, "paymentDetails", check_details)
    }
}

// Return money from an existing payment. `forceRefund` only when true.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub payment_key: String,
    pub amount: f64,
    pub currency_code: String,
    pub refund_to: Option<String>,
    pub reason: Option<String>,
    #[serde(default)]
    pub force_refund: bool,
}

impl RefundRequest {
    pub fn new(payment_key: impl Into<String>, amount: f64, currency_code: impl Into<String>) -> Self {
        Self {
            payment_key: payment_key.into(),
            amount,
            currency_code: currency_code.into(),
            ..Default::default()
        }
    }

    // Refund into a travel voucher instead of the original tender
    pub fn to_voucher(payment_key: impl Into<String>, amount: f64, currency_code: impl Into<String>) -> Self {
        Self {
            refund_to: Some("Voucher".to_string()),
            ..Self::new(payment_key, amount, currency_code)
        }
    }
}

impl ApiRequest for RefundRequest {
    fn name(&self) -> &'static str {
        "RefundRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v2/booking/payments/refunds")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("paymentKey", self.payment_key.as_str());
        payload.put("amount", self.amount);
        payload.put("currencyCode", self.currency_code.as_str());
        payload.put_opt("refundTo", self.refund_to.as_deref());
        payload.put_opt("reason", self.reason.as_deref());
        payload.put_if_true("forceRefund", self.force_refund);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["paymentKey", "amount", "currencyCode"])?;
        check_key(&data, "paymentKey")?;
        check_positive_amount(&data, "amount")?;
        check_formats(&data, &[("currencyCode", FieldFormat::CurrencyCode)])?;
        check_enum(&data, "refundTo", &REFUND_DESTINATIONS)?;
        check_string_lengths(&data, &[("reason", LengthBounds::new(1, 64))])
    }
}
