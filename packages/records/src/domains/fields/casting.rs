//! Field casting - raw caller input to canonical stored values.
//!
//! Casting never fails. Input that does not fit the field's shape degrades to
//! `None` ("absent"), which the builders turn into key removal. The emptiness
//! check in [`is_empty`] runs before any type-specific rule, so clearing a
//! field means the same thing for every field type.
//!
//! Numeric strings accept `,` as the decimal separator. `"1,234"` therefore
//! parses as `1.234`, never as a thousands-grouped `1234`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::models::{
    Address, CanonicalValue, DateRange, FieldDefinition, FieldType, GeoPoint, KeyNumber,
    LabelValue, NumberPair, NumberRange,
};
use crate::common::parse_identifier;

/// `true` for a missing value, `null`, a blank string or an empty list.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Cast one raw delta value for `field`.
///
/// `field` is `None` when the registry does not describe the key; such values
/// are kept unmodified (after the emptiness check).
pub fn cast_field(field: Option<&FieldDefinition>, raw: Option<&Value>) -> Option<CanonicalValue> {
    if is_empty(raw) {
        return None;
    }
    let raw = raw?;

    let Some(field) = field else {
        return Some(CanonicalValue::Raw(raw.clone()));
    };

    match field.field_type {
        FieldType::Text
        | FieldType::Select
        | FieldType::Email
        | FieldType::Tel
        | FieldType::Textarea => cast_text(raw).map(CanonicalValue::Text),
        FieldType::Multiselect | FieldType::LabelArray => {
            non_empty(items(raw).filter_map(cast_text).collect()).map(CanonicalValue::TextList)
        }
        FieldType::Number => parse_number(raw).map(CanonicalValue::Number),
        FieldType::NumberArray => {
            non_empty(items(raw).filter_map(parse_number).collect()).map(CanonicalValue::NumberList)
        }
        FieldType::Boolean => parse_bool(raw).map(CanonicalValue::Bool),
        FieldType::Date => parse_date(raw).map(CanonicalValue::Date),
        FieldType::RangeNumber => cast_number_range(raw).map(CanonicalValue::NumberRange),
        FieldType::RangeDate => cast_date_range(raw).map(CanonicalValue::DateRange),
        FieldType::GeoPoint => parse_geo_point(raw).map(CanonicalValue::GeoPoint),
        FieldType::GeoPointArray => {
            non_empty(items(raw).filter_map(parse_geo_point).collect()).map(CanonicalValue::GeoPoints)
        }
        FieldType::PairNumber => cast_number_pair(raw).map(CanonicalValue::NumberPair),
        FieldType::LabelValuePairs => {
            non_empty(items(raw).filter_map(parse_label_value).collect())
                .map(CanonicalValue::LabelValues)
        }
        FieldType::KeyValueNumber => {
            non_empty(items(raw).filter_map(parse_key_number).collect())
                .map(CanonicalValue::KeyNumbers)
        }
        FieldType::Address => cast_address(raw).map(CanonicalValue::Address),
        FieldType::Reference => parse_reference(raw).map(CanonicalValue::Reference),
        FieldType::ReferenceMulti => {
            non_empty(items(raw).filter_map(parse_reference).collect())
                .map(CanonicalValue::References)
        }
        FieldType::Unknown => Some(CanonicalValue::Raw(raw.clone())),
    }
}

// =============================================================================
// Scalars
// =============================================================================

/// Trimmed text. Numbers and booleans are accepted in their JSON spelling.
pub fn cast_text(raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Finite decimal from a JSON number or a string using `.` or `,` as separator.
pub fn parse_number(raw: &Value) -> Option<f64> {
    let n = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.replace(',', ".").parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Booleans, `0`/`1`, and the tokens `true/false/yes/no/1/0` (any case).
pub fn parse_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64()? {
            x if x == 1.0 => Some(true),
            x if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// An instant from RFC 3339, a naive ISO date/datetime (taken as UTC), or
/// epoch milliseconds.
pub fn parse_date(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::Number(n) => {
            let millis = n.as_f64().filter(|m| m.is_finite())?;
            DateTime::from_timestamp_millis(millis as i64)
        }
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// A well-formed opaque identifier; anything else is rejected, never coerced.
pub fn parse_reference(raw: &Value) -> Option<Uuid> {
    match raw {
        Value::String(s) => parse_identifier(s),
        _ => None,
    }
}

// =============================================================================
// Structured shapes
// =============================================================================

fn cast_number_range(raw: &Value) -> Option<NumberRange> {
    Some(NumberRange {
        from: parse_number(raw.get("from")?)?,
        to: parse_number(raw.get("to")?)?,
    })
}

fn cast_date_range(raw: &Value) -> Option<DateRange> {
    Some(DateRange {
        start: parse_date(raw.get("start")?)?,
        end: parse_date(raw.get("end")?)?,
    })
}

fn parse_geo_point(raw: &Value) -> Option<GeoPoint> {
    Some(GeoPoint {
        lat: parse_number(raw.get("lat")?)?,
        lng: parse_number(raw.get("lng")?)?,
    })
}

fn cast_number_pair(raw: &Value) -> Option<NumberPair> {
    Some(NumberPair {
        a: parse_number(raw.get("a")?)?,
        b: parse_number(raw.get("b")?)?,
    })
}

fn parse_label_value(raw: &Value) -> Option<LabelValue> {
    Some(LabelValue {
        label: cast_text(raw.get("label")?)?,
        value: cast_text(raw.get("value")?)?,
    })
}

fn parse_key_number(raw: &Value) -> Option<KeyNumber> {
    Some(KeyNumber {
        key: cast_text(raw.get("key")?)?,
        value: parse_number(raw.get("value")?)?,
    })
}

fn cast_address(raw: &Value) -> Option<Address> {
    let parts = raw.as_object()?;
    let mut address = Address::default();
    for part in Address::PARTS {
        if let Some(value) = parts.get(part).and_then(cast_text) {
            address.set_part(part, value);
        }
    }
    (!address.is_empty()).then_some(address)
}

// =============================================================================
// Helpers
// =============================================================================

/// Elements of a list input; a lone scalar counts as a one-element list.
fn items(raw: &Value) -> std::slice::Iter<'_, Value> {
    match raw {
        Value::Array(items) => items.iter(),
        other => std::slice::from_ref(other).iter(),
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
