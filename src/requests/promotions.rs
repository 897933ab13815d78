// Promotion codes: checking applicability and defining new promotions

use super::common::{default_true, PROMO_CODE_DESCRIPTION, PROMO_CODE_REGEX};
use super::organizations::ORGANIZATION_CODE_REGEX;
use crate::error::ValidationError;
use crate::formats::FieldFormat;
use crate::request::{object_list, ApiRequest, Endpoint, Payload, PayloadExt};
use crate::structural::{
    check_array_field, check_date_order, check_each_item, check_enum, check_formats,
    check_number_range, check_pattern, check_positive_amount, check_string_lengths,
    require_fields, ArrayRules, LengthBounds,
};
use serde::Deserialize;
use serde_json::Value;

pub const DISCOUNT_TYPES: [&str; 2] = ["Percentage", "Amount"];

// Check whether a promotion code applies to a prospective trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionValidateRequest {
    pub promotion_code: String,
    pub currency_code: Option<String>,
    pub organization_code: Option<String>,
    pub travel_date: Option<String>,
}

impl PromotionValidateRequest {
    pub fn new(promotion_code: impl Into<String>) -> Self {
        Self {
            promotion_code: promotion_code.into(),
            ..Default::default()
        }
    }

    pub fn for_travel_on(
        promotion_code: impl Into<String>,
        travel_date: impl Into<String>,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            travel_date: Some(travel_date.into()),
            currency_code: Some(currency_code.into()),
            ..Self::new(promotion_code)
        }
    }
}

impl ApiRequest for PromotionValidateRequest {
    fn name(&self) -> &'static str {
        "PromotionValidateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/promotions/validate")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("promotionCode", self.promotion_code.as_str());
        payload.put_opt("currencyCode", self.currency_code.as_deref());
        payload.put_opt("organizationCode", self.organization_code.as_deref());
        payload.put_opt("travelDate", self.travel_date.as_deref());
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(&data, &["promotionCode"])?;
        check_pattern(
            &data,
            "promotionCode",
            &PROMO_CODE_REGEX,
            PROMO_CODE_DESCRIPTION,
        )?;
        check_formats(
            &data,
            &[
                ("currencyCode", FieldFormat::CurrencyCode),
                ("travelDate", FieldFormat::Date),
            ],
        )?;
        check_pattern(
            &data,
            "organizationCode",
            &ORGANIZATION_CODE_REGEX,
            "an organization code",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionMarket {
    pub origin: String,
    pub destination: String,
}

impl PromotionMarket {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("origin", self.origin.as_str());
        payload.put("destination", self.destination.as_str());
        payload
    }
}

fn check_market(market: &Payload) -> Result<(), ValidationError> {
    if market.get("origin") == market.get("destination") {
        return Err(ValidationError::for_field(
            "destination",
            "must differ from origin",
        ));
    }
    Ok(())
}

// Define a promotion. `active` is always emitted and defaults to true.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCreateRequest {
    pub promotion_code: String,
    pub description: Option<String>,
    pub effective_begin_date: String,
    pub effective_end_date: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub currency_code: Option<String>,
    #[serde(default)]
    pub markets: Vec<PromotionMarket>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl PromotionCreateRequest {
    pub fn percentage(
        promotion_code: impl Into<String>,
        percent: f64,
        effective_begin_date: impl Into<String>,
        effective_end_date: impl Into<String>,
    ) -> Self {
        Self {
            promotion_code: promotion_code.into(),
            description: None,
            effective_begin_date: effective_begin_date.into(),
            effective_end_date: effective_end_date.into(),
            discount_type: "Percentage".to_string(),
            discount_value: percent,
            currency_code: None,
            markets: Vec::new(),
            active: true,
        }
    }

    pub fn amount(
        promotion_code: impl Into<String>,
        amount: f64,
        currency_code: impl Into<String>,
        effective_begin_date: impl Into<String>,
        effective_end_date: impl Into<String>,
    ) -> Self {
        Self {
            discount_type: "Amount".to_string(),
            currency_code: Some(currency_code.into()),
            ..Self::percentage(
                promotion_code,
                amount,
                effective_begin_date,
                effective_end_date,
            )
        }
    }

    pub fn in_markets(mut self, markets: Vec<PromotionMarket>) -> Self {
        self.markets = markets;
        self
    }
}

impl ApiRequest for PromotionCreateRequest {
    fn name(&self) -> &'static str {
        "PromotionCreateRequest"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/api/nsk/v1/promotions")
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.put("promotionCode", self.promotion_code.as_str());
        payload.put_opt("description", self.description.as_deref());
        payload.put("effectiveBeginDate", self.effective_begin_date.as_str());
        payload.put("effectiveEndDate", self.effective_end_date.as_str());
        payload.put("discountType", self.discount_type.as_str());
        payload.put("discountValue", self.discount_value);
        payload.put_opt("currencyCode", self.currency_code.as_deref());
        if !self.markets.is_empty() {
            payload.put(
                "markets",
                object_list(&self.markets, PromotionMarket::to_payload),
            );
        }
        payload.put("active", self.active);
        payload
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let data = self.to_payload();
        require_fields(
            &data,
            &[
                "promotionCode",
                "effectiveBeginDate",
                "effectiveEndDate",
                "discountType",
                "discountValue",
            ],
        )?;
        if data.get("discountType").and_then(Value::as_str) == Some("Amount") {
            require_fields(&data, &["currencyCode"])?;
        }
        check_pattern(
            &data,
            "promotionCode",
            &PROMO_CODE_REGEX,
            PROMO_CODE_DESCRIPTION,
        )?;
        check_formats(
            &data,
            &[
                ("effectiveBeginDate", FieldFormat::Date),
                ("effectiveEndDate", FieldFormat::Date),
                ("currencyCode", FieldFormat::CurrencyCode),
            ],
        )?;
        check_enum(&data, "discountType", &DISCOUNT_TYPES)?;
        check_string_lengths(&data, &[("description", LengthBounds::max(128))])?;
        check_date_order(&data, "effectiveBeginDate", "effectiveEndDate")?;
        check_positive_amount(&data, "discountValue")?;
        if self.discount_type == "Percentage" {
            check_number_range(&data, "discountValue", 0.0, 100.0)?;
        }
        if data.contains_key("markets") {
            check_array_field(
                &data,
                "markets",
                &ArrayRules::default()
                    .requiring(&["origin", "destination"])
                    .with_formats(&[
                        ("origin", FieldFormat::AirportCode),
                        ("destination", FieldFormat::AirportCode),
                    ]),
            )?;
        }
        check_each_item(&data, "markets", check_market)
    }
}
