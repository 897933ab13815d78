// Structural validators over a serialized request payload.
//
// Every helper is a pure function of (payload, rule) and stops at the first
// violation it finds. Field names may be dotted paths into nested objects;
// a literal key containing dots (`Market.Origin`) wins over path traversal.

use crate::error::ValidationError;
use crate::formats::{self, FieldFormat};
use crate::request::Payload;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

// Inclusive character-length bounds for a string field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub const fn max(max: usize) -> Self {
        Self { min: 0, max }
    }

    pub const fn exactly(len: usize) -> Self {
        Self { min: len, max: len }
    }
}

// Shape rules for a list-valued field
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRules<'a> {
    pub min_items: usize,
    pub max_items: Option<usize>,
    pub required: &'a [&'a str],
    pub formats: &'a [(&'a str, FieldFormat)],
}

impl<'a> ArrayRules<'a> {
    pub const fn non_empty() -> Self {
        Self {
            min_items: 1,
            max_items: None,
            required: &[],
            formats: &[],
        }
    }

    pub const fn between(min_items: usize, max_items: usize) -> Self {
        Self {
            min_items,
            max_items: Some(max_items),
            required: &[],
            formats: &[],
        }
    }

    pub const fn requiring(mut self, required: &'a [&'a str]) -> Self {
        self.required = required;
        self
    }

    pub const fn with_formats(mut self, formats: &'a [(&'a str, FieldFormat)]) -> Self {
        self.formats = formats;
        self
    }
}

// Resolve a field name or dotted path inside the payload
pub fn lookup<'a>(data: &'a Payload, path: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(path) {
        return Some(value);
    }
    if !path.contains('.') {
        return None;
    }
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

// Absent, null, and empty-string values all count as blank
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

pub fn is_present(data: &Payload, field: &str) -> bool {
    !is_blank(lookup(data, field))
}

// Present and not null; empty strings still count as provided
fn provided<'a>(data: &'a Payload, field: &str) -> Option<&'a Value> {
    lookup(data, field).filter(|value| !value.is_null())
}

pub fn require_fields(data: &Payload, names: &[&str]) -> Result<(), ValidationError> {
    for name in names {
        if is_blank(lookup(data, name)) {
            return Err(ValidationError::for_field(*name, "is required"));
        }
    }
    Ok(())
}

pub fn check_formats(
    data: &Payload,
    field_formats: &[(&str, FieldFormat)],
) -> Result<(), ValidationError> {
    for (field, format) in field_formats {
        if let Some(value) = provided(data, field) {
            if !format.is_valid(value) {
                return Err(ValidationError::for_field(
                    *field,
                    format!("must be {}", format.expectation()),
                ));
            }
        }
    }
    Ok(())
}

pub fn check_string_lengths(
    data: &Payload,
    field_bounds: &[(&str, LengthBounds)],
) -> Result<(), ValidationError> {
    for (field, bounds) in field_bounds {
        let Some(value) = provided(data, field) else {
            continue;
        };
        let Some(text) = value.as_str() else {
            return Err(ValidationError::for_field(*field, "must be a string"));
        };
        let len = text.chars().count();
        if len < bounds.min || len > bounds.max {
            let reason = if bounds.min == bounds.max {
                format!("must be exactly {} characters", bounds.min)
            } else if bounds.min == 0 {
                format!("must be at most {} characters", bounds.max)
            } else {
                format!(
                    "must be between {} and {} characters",
                    bounds.min, bounds.max
                )
            };
            return Err(ValidationError::for_field(*field, reason));
        }
    }
    Ok(())
}

// Checks list shape, then per-item required sub-fields and sub-field formats.
// Item violations are reported as `field[index].subfield`.
pub fn check_array_field<'a>(
    data: &'a Payload,
    field: &str,
    rules: &ArrayRules<'_>,
) -> Result<&'a Vec<Value>, ValidationError> {
    let Some(items) = lookup(data, field).and_then(Value::as_array) else {
        return Err(ValidationError::for_field(field, "must be a list"));
    };

    if items.len() < rules.min_items {
        return Err(ValidationError::for_field(
            field,
            format!("must contain at least {} item(s)", rules.min_items),
        ));
    }
    if let Some(max) = rules.max_items {
        if items.len() > max {
            return Err(ValidationError::for_field(
                field,
                format!("must contain at most {} item(s)", max),
            ));
        }
    }

    if rules.required.is_empty() && rules.formats.is_empty() {
        return Ok(items);
    }

    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(ValidationError::for_field(
                format!("{}[{}]", field, index),
                "must be an object",
            ));
        };
        require_fields(object, rules.required)
            .and_then(|_| check_formats(object, rules.formats))
            .map_err(|e| e.nested_under(&format!("{}[{}]", field, index)))?;
    }

    Ok(items)
}

// Runs `check` against every object in a list field, re-rooting errors at
// `field[index]`. Absent lists are skipped; shape is `check_array_field`'s job.
pub fn check_each_item<F>(data: &Payload, field: &str, mut check: F) -> Result<(), ValidationError>
where
    F: FnMut(&Payload) -> Result<(), ValidationError>,
{
    let Some(items) = provided(data, field).and_then(Value::as_array) else {
        return Ok(());
    };
    for (index, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", field, index);
        let object = item
            .as_object()
            .ok_or_else(|| ValidationError::for_field(path.as_str(), "must be an object"))?;
        check(object).map_err(|e| e.nested_under(&path))?;
    }
    Ok(())
}

// Runs `check` against a nested object field when present
pub fn check_nested<F>(data: &Payload, field: &str, check: F) -> Result<(), ValidationError>
where
    F: FnOnce(&Payload) -> Result<(), ValidationError>,
{
    let Some(value) = provided(data, field) else {
        return Ok(());
    };
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::for_field(field, "must be an object"))?;
    check(object).map_err(|e| e.nested_under(field))
}

// Case-sensitive membership in a closed set of legal values
pub fn check_enum(data: &Payload, field: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    let Some(value) = provided(data, field) else {
        return Ok(());
    };
    match value.as_str() {
        Some(text) if allowed.contains(&text) => Ok(()),
        _ => Err(ValidationError::for_field(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        )),
    }
}

pub fn check_pattern(
    data: &Payload,
    field: &str,
    pattern: &Regex,
    description: &str,
) -> Result<(), ValidationError> {
    let Some(value) = provided(data, field) else {
        return Ok(());
    };
    match value.as_str() {
        Some(text) if pattern.is_match(text) => Ok(()),
        _ => Err(ValidationError::for_field(
            field,
            format!("must be {}", description),
        )),
    }
}

// Inclusive numeric bounds; numeric strings are accepted like the
// non_negative_number format
pub fn check_number_range(
    data: &Payload,
    field: &str,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    let Some(value) = provided(data, field) else {
        return Ok(());
    };
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n >= min && n <= max => Ok(()),
        Some(_) => Err(ValidationError::for_field(
            field,
            format!("must be between {} and {}", min, max),
        )),
        None => Err(ValidationError::for_field(field, "must be a number")),
    }
}

// Strictly positive amount (money fields)
pub fn check_positive_amount(data: &Payload, field: &str) -> Result<(), ValidationError> {
    let Some(value) = provided(data, field) else {
        return Ok(());
    };
    match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => Ok(()),
        _ => Err(ValidationError::for_field(
            field,
            "must be a number greater than zero",
        )),
    }
}

// Inclusive integer bounds; the value must be integer-typed
pub fn check_integer_range(
    data: &Payload,
    field: &str,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    let Some(value) = provided(data, field) else {
        return Ok(());
    };
    match value.as_i64() {
        Some(n) if (min..=max).contains(&n) => Ok(()),
        _ => Err(ValidationError::for_field(
            field,
            format!("must be an integer between {} and {}", min, max),
        )),
    }
}

pub fn require_any(data: &Payload, names: &[&str]) -> Result<(), ValidationError> {
    if names.iter().any(|name| is_present(data, name)) {
        return Ok(());
    }
    Err(ValidationError::new(format!(
        "At least one of {} must be provided",
        names.join(", ")
    )))
}

fn count_present(data: &Payload, names: &[&str]) -> usize {
    names.iter().filter(|name| is_present(data, name)).count()
}

pub fn exactly_one(data: &Payload, names: &[&str]) -> Result<(), ValidationError> {
    let count = count_present(data, names);
    if count == 1 {
        return Ok(());
    }
    Err(ValidationError::new(format!(
        "Exactly one of {} must be provided, found {}",
        names.join(", "),
        count
    )))
}

pub fn at_most_one(data: &Payload, names: &[&str]) -> Result<(), ValidationError> {
    let count = count_present(data, names);
    if count <= 1 {
        return Ok(());
    }
    Err(ValidationError::new(format!(
        "At most one of {} may be provided, found {}",
        names.join(", "),
        count
    )))
}

// All-or-nothing group: once any member is given, every member is required
pub fn require_group(data: &Payload, names: &[&str]) -> Result<(), ValidationError> {
    if count_present(data, names) == 0 {
        return Ok(());
    }
    require_fields(data, names)
}

// `requirer` present demands `required` present
pub fn require_if_present(
    data: &Payload,
    requirer: &str,
    required: &str,
) -> Result<(), ValidationError> {
    if is_present(data, requirer) && !is_present(data, required) {
        return Err(ValidationError::for_field(
            required,
            format!("is required when {} is provided", requirer),
        ));
    }
    Ok(())
}

fn date_at(data: &Payload, field: &str) -> Option<NaiveDate> {
    lookup(data, field)
        .and_then(Value::as_str)
        .and_then(formats::parse_date)
}

// `later` must not precede `earlier` when both are valid dates
pub fn check_date_order(data: &Payload, earlier: &str, later: &str) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (date_at(data, earlier), date_at(data, later)) {
        if end < start {
            return Err(ValidationError::for_field(
                later,
                format!("must not be earlier than {}", earlier),
            ));
        }
    }
    Ok(())
}

pub fn check_not_before(
    data: &Payload,
    field: &str,
    floor: NaiveDate,
) -> Result<(), ValidationError> {
    match date_at(data, field) {
        Some(date) if date < floor => Err(ValidationError::for_field(
            field,
            "must not be in the past",
        )),
        _ => Ok(()),
    }
}

pub fn check_not_after(
    data: &Payload,
    field: &str,
    ceiling: NaiveDate,
) -> Result<(), ValidationError> {
    match date_at(data, field) {
        Some(date) if date > ceiling => Err(ValidationError::for_field(
            field,
            "must not be in the future",
        )),
        _ => Ok(()),
    }
}

// Every element of a list of strings must be non-empty
pub fn check_non_empty_strings(data: &Payload, field: &str) -> Result<(), ValidationError> {
    let Some(items) = provided(data, field).and_then(Value::as_array) else {
        return Ok(());
    };
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(text) if !text.trim().is_empty() => {}
            _ => {
                return Err(ValidationError::for_field(
                    format!("{}[{}]", field, index),
                    "must be a non-empty string",
                ))
            }
        }
    }
    Ok(())
}

// Every element of a list of strings must match `pattern`
pub fn check_each_matches(
    data: &Payload,
    field: &str,
    pattern: &Regex,
    description: &str,
) -> Result<(), ValidationError> {
    let Some(items) = provided(data, field).and_then(Value::as_array) else {
        return Ok(());
    };
    for (index, item) in items.iter().enumerate() {
        if !item.as_str().is_some_and(|text| pattern.is_match(text)) {
            return Err(ValidationError::for_field(
                format!("{}[{}]", field, index),
                format!("must be {}", description),
            ));
        }
    }
    Ok(())
}
