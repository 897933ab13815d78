// Ancillary products sold onto a booking: bundles, SSRs, third-party add-ons
// and baggage

use super::common::{check_key, KEY_DESCRIPTION, KEY_REGEX};
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{object_list, ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_date_order, check_each_item, check_each_matches, check_enum,
    check_formats, check_integer_range, check_number_range, check_pattern, check_string_lengths,
    require_fields, require_if_present, ArrayRules, LengthBounds,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static BUNDLE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{1,4}$").unwrap());

static SSR_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{4}$").unwrap());

pub const MAX_SSRS_PER_REQUEST: usize = 20;

pub const ADD_ON_TYPES: [&str; 6] = ["Insurance", "Activity", "Hotel", "Car", "Lounge", "Transfer"];

// Add-on types that cover a stay and so need both ends of the date range
pub const DATED_ADD_ON_TYPES: [&str; 2] = ["Hotel", "Car"];

pub const BAG_TYPES: [&str; 4] = ["Checked", "CarryOn", "Sports", "Oversize"];

pub const MAX_BAGS: i64 = 10;

pub const MAX_BAG_WEIGHT_KG: f64 = 32.0;

// NaN and infinities have no JSON form and are never written to a payload
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|n| n.is_finite())
}

fn check_finite(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(n) if !n.is_finite() => Err(ValidationError::for_field(
            field,
            "must be a finite number",
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleAddRequest {
    pub bundle_code: String,
    #[serde(default)]
    pub passenger_keys: Vec<String>,
    pub journey_key: Option<String>,
}

impl BundleAddRequest {
    pub fn new(bundle_code: impl Into<String>, passenger_keys: Vec<String>) -> Self {
        Self {
            bundle_code: bundle_code.into(),
            passenger_keys,
            journey_key: None,
        }
    }

    pub fn on_journey(mut self, journey_key: impl Into<String>) -> Self {
        self.journey_key = Some(journey_key.into());
        self
    }
}

impl ApiRequest for BundleAddRequest {
    fn name(&self) -> &'static str {
        "BundleAddRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/booking/bundles")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("bundleCode", self.bundle_code.as_str());
        payload.put("passengerKeys", self.passenger_keys.clone());
        payload.put_opt("journeyKey", self.journey_key.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["bundleCode"])?;
        check_pattern(
            &data,
            "bundleCode",
            &BUNDLE_CODE_REGEX,
            "1 to 4 uppercase letters or digits",
        )?;
        check_array_field(&data, "passengerKeys", &ArrayRules::non_empty())?;
        check_each_matches(&data, "passengerKeys", &KEY_REGEX, KEY_DESCRIPTION)?;
        check_key(&data, "journeyKey")
    }
}

// One special service request line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrItem {
    pub ssr_code: String,
    pub passenger_key: String,
    pub market_key: String,
    #[serde(default = "default_ssr_count")]
    pub count: i64,
    pub note: Option<String>,
}

fn default_ssr_count() -> i64 {
    1
}

impl SsrItem {
    pub fn new(
        ssr_code: impl Into<String>,
        passenger_key: impl Into<String>,
        market_key: impl Into<String>,
    ) -> Self {
        Self {
            ssr_code: ssr_code.into(),
            passenger_key: passenger_key.into(),
            market_key: market_key.into(),
            count: default_ssr_count(),
            note: None,
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("ssrCode", self.ssr_code.as_str());
        payload.put("passengerKey", self.passenger_key.as_str());
        payload.put("marketKey", self.market_key.as_str());
        payload.put("count", self.count);
        payload.put_opt("note", self.note.as_deref());
        payload
    }
}

fn check_ssr_item(ssr: &Payload) -> Result<(), ValidationError> {
    check_pattern(
        ssr,
        "ssrCode",
        &SSR_CODE_REGEX,
        "4 uppercase letters or digits",
    )?;
    check_key(ssr, "passengerKey")?;
    check_key(ssr, "marketKey")?;
    check_integer_range(ssr, "count", 1, 9)?;
    check_string_lengths(ssr, &[("note", LengthBounds::max(90))])
}

// `forceWaveOnSell` is emitted only when the caller set it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrAddRequest {
    pub ssrs: Vec<SsrItem>,
    pub force_wave_on_sell: Option<bool>,
}

impl SsrAddRequest {
    pub fn new(ssrs: Vec<SsrItem>) -> Self {
        Self {
            ssrs,
            force_wave_on_sell: None,
        }
    }

    pub fn single(
        ssr_code: impl Into<String>,
        passenger_key: impl Into<String>,
        market_key: impl Into<String>,
    ) -> Self {
        Self::new(vec![SsrItem::new(ssr_code, passenger_key, market_key)])
    }
}

impl ApiRequest for SsrAddRequest {
    fn name(&self) -> &'static str {
        "SsrAddRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v2/booking/ssrs")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("ssrs", object_list(&self.ssrs, SsrItem::to_payload));
        payload.put_opt("forceWaveOnSell", self.force_wave_on_sell);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        check_array_field(
            &data,
            "ssrs",
            &ArrayRules::between(1, MAX_SSRS_PER_REQUEST).requiring(&[
                "ssrCode",
                "passengerKey",
                "marketKey",
                "count",
            ]),
        )?;
        check_each_item(&data, "ssrs", check_ssr_item)
    }
}

// Third-party product (insurance, hotel, car, ...) attached to a booking
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnRequest {
    pub add_on_type: String,
    pub reference_code: String,
    #[serde(default)]
    pub passenger_keys: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub amount: Option<f64>,
    pub currency_code: Option<String>,
    pub description: Option<String>,
}

impl AddOnRequest {
    pub fn new(add_on_type: impl Into<String>, reference_code: impl Into<String>) -> Self {
        Self {
            add_on_type: add_on_type.into(),
            reference_code: reference_code.into(),
            ..Default::default()
        }
    }

    pub fn between(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    pub fn priced(mut self, amount: f64, currency_code: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency_code = Some(currency_code.into());
        self
    }
}

impl ApiRequest for AddOnRequest {
    fn name(&self) -> &'static str {
        "AddOnRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/addons")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("addOnType", self.add_on_type.as_str());
        payload.put("referenceCode", self.reference_code.as_str());
        payload.put_non_empty("passengerKeys", &self.passenger_keys);
        payload.put_opt("startDate", self.start_date.as_deref());
        payload.put_opt("endDate", self.end_date.as_deref());
        payload.put_opt("amount", finite(self.amount));
        payload.put_opt("currencyCode", self.currency_code.as_deref());
        payload.put_opt("description", self.description.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["addOnType", "referenceCode"])?;
        check_finite("amount", self.amount)?;
        if DATED_ADD_ON_TYPES.contains(&self.add_on_type.as_str()) {
            require_fields(&data, &["startDate", "endDate"])?;
        }
        require_if_present(&data, "amount", "currencyCode")?;
        check_enum(&data, "addOnType", &ADD_ON_TYPES)?;
        check_formats(
            &data,
            &[
                ("startDate", FieldFormat::Date),
                ("endDate", FieldFormat::Date),
                ("amount", FieldFormat::NonNegativeNumber),
                ("currencyCode", FieldFormat::CurrencyCode),
            ],
        )?;
        check_string_lengths(
            &data,
            &[
                ("referenceCode", LengthBounds::new(1, 32)),
                ("description", LengthBounds::max(256)),
            ],
        )?;
        check_date_order(&data, "startDate", "endDate")?;
        check_each_matches(&data, "passengerKeys", &KEY_REGEX, KEY_DESCRIPTION)
    }
}

// Extra bags for one passenger on one journey. `waiveFee` only when true.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaggageAddRequest {
    pub passenger_key: String,
    pub journey_key: String,
    pub bag_type: String,
    pub count: i64,
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub waive_fee: bool,
}

impl BaggageAddRequest {
    pub fn checked(
        passenger_key: impl Into<String>,
        journey_key: impl Into<String>,
        count: i64,
    ) -> Self {
        Self {
            passenger_key: passenger_key.into(),
            journey_key: journey_key.into(),
            bag_type: "Checked".to_string(),
            count,
            ..Default::default()
        }
    }
}

impl ApiRequest for BaggageAddRequest {
    fn name(&self) -> &'static str {
        "BaggageAddRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/booking/baggage")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("passengerKey", self.passenger_key.as_str());
        payload.put("journeyKey", self.journey_key.as_str());
        payload.put("bagType", self.bag_type.as_str());
        payload.put("count", self.count);
        payload.put_opt("weightKg", finite(self.weight_kg));
        payload.put_if_true("waiveFee", self.waive_fee);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["passengerKey", "journeyKey", "bagType"])?;
        check_finite("weightKg", self.weight_kg)?;
        check_key(&data, "passengerKey")?;
        check_key(&data, "journeyKey")?;
        check_enum(&data, "bagType", &BAG_TYPES)?;
        check_integer_range(&data, "count", 1, MAX_BAGS)?;
        check_formats(&data, &[("weightKg", FieldFormat::NonNegativeNumber)])?;
        check_number_range(&data, "weightKg", 0.0, MAX_BAG_WEIGHT_KG)
    }
}
