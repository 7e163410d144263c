//! Canonical (storage-ready) field values.
//!
//! Every value here is non-empty and type-correct. Emptiness is never
//! represented; a field that should not be stored has no `CanonicalValue`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberPair {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelValue {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyNumber {
    pub key: String,
    pub value: f64,
}

/// Postal address; only recognized, non-empty parts are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub extra: Option<String>,
}

impl Address {
    /// Sub-field keys accepted in address input, in storage order.
    pub const PARTS: [&'static str; 6] = ["street", "city", "zip", "province", "country", "extra"];

    pub fn is_empty(&self) -> bool {
        self.parts().all(|(_, value)| value.is_none())
    }

    pub fn set_part(&mut self, part: &str, value: String) {
        match part {
            "street" => self.street = Some(value),
            "city" => self.city = Some(value),
            "zip" => self.zip = Some(value),
            "province" => self.province = Some(value),
            "country" => self.country = Some(value),
            "extra" => self.extra = Some(value),
            _ => {}
        }
    }

    fn parts(&self) -> impl Iterator<Item = (&'static str, Option<&String>)> {
        [
            ("street", self.street.as_ref()),
            ("city", self.city.as_ref()),
            ("zip", self.zip.as_ref()),
            ("province", self.province.as_ref()),
            ("country", self.country.as_ref()),
            ("extra", self.extra.as_ref()),
        ]
        .into_iter()
    }
}

/// Type-normalized value of one field, or of one record metadata path.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Text(String),
    TextList(Vec<String>),
    Number(f64),
    NumberList(Vec<f64>),
    Bool(bool),
    Date(DateTime<Utc>),
    NumberRange(NumberRange),
    DateRange(DateRange),
    GeoPoint(GeoPoint),
    GeoPoints(Vec<GeoPoint>),
    NumberPair(NumberPair),
    LabelValues(Vec<LabelValue>),
    KeyNumbers(Vec<KeyNumber>),
    Address(Address),
    Reference(Uuid),
    References(Vec<Uuid>),
    /// Value of a field the registry does not describe, stored as given.
    Raw(Value),
}

impl CanonicalValue {
    /// JSON form persisted in the record's data document.
    pub fn to_json(&self) -> Value {
        match self {
            CanonicalValue::Text(s) => Value::String(s.clone()),
            CanonicalValue::TextList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            CanonicalValue::Number(n) => number_json(*n),
            CanonicalValue::NumberList(items) => {
                Value::Array(items.iter().copied().map(number_json).collect())
            }
            CanonicalValue::Bool(b) => Value::Bool(*b),
            CanonicalValue::Date(at) => date_json(at),
            CanonicalValue::NumberRange(range) => object([
                ("from", number_json(range.from)),
                ("to", number_json(range.to)),
            ]),
            CanonicalValue::DateRange(range) => object([
                ("start", date_json(&range.start)),
                ("end", date_json(&range.end)),
            ]),
            CanonicalValue::GeoPoint(point) => geo_json(point),
            CanonicalValue::GeoPoints(points) => Value::Array(points.iter().map(geo_json).collect()),
            CanonicalValue::NumberPair(pair) => {
                object([("a", number_json(pair.a)), ("b", number_json(pair.b))])
            }
            CanonicalValue::LabelValues(rows) => Value::Array(
                rows.iter()
                    .map(|row| {
                        object([
                            ("label", Value::String(row.label.clone())),
                            ("value", Value::String(row.value.clone())),
                        ])
                    })
                    .collect(),
            ),
            CanonicalValue::KeyNumbers(rows) => Value::Array(
                rows.iter()
                    .map(|row| {
                        object([
                            ("key", Value::String(row.key.clone())),
                            ("value", number_json(row.value)),
                        ])
                    })
                    .collect(),
            ),
            CanonicalValue::Address(address) => {
                let mut map = Map::new();
                for (part, value) in address.parts() {
                    if let Some(value) = value {
                        map.insert(part.to_string(), Value::String(value.clone()));
                    }
                }
                Value::Object(map)
            }
            CanonicalValue::Reference(id) => Value::String(id.to_string()),
            CanonicalValue::References(ids) => {
                Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect())
            }
            CanonicalValue::Raw(value) => value.clone(),
        }
    }

    /// The referenced id, for single-pointer values.
    pub fn as_reference(&self) -> Option<Uuid> {
        match self {
            CanonicalValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            CanonicalValue::TextList(items) => Some(items),
            _ => None,
        }
    }
}

/// Integral values are stored as JSON integers so `"42"` round-trips as `42`.
fn number_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

fn date_json(at: &DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn geo_json(point: &GeoPoint) -> Value {
    object([("lat", number_json(point.lat)), ("lng", number_json(point.lng))])
}

fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}
