use std::fmt;

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::condition::Operator;

/// A scalar read from an order context or written into a condition.
///
/// Numbers are exact decimals, so `2.5` kg compares equal to `2.50` kg and
/// never drifts the way a binary float would.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
}

/// The right-hand side of a condition: a single scalar, or a list for `in`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    Scalar(FieldValue),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Compare this value to another using the given operator.
    ///
    /// Returns `None` when the pair cannot be compared: mixed types, ordering
    /// operators on strings, or `in` (which needs a list, not a scalar).
    #[must_use]
    pub fn compare(&self, op: Operator, other: &FieldValue) -> Option<bool> {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => match op {
                Operator::Eq => Some(a == b),
                Operator::Gt => Some(a > b),
                Operator::Gte => Some(a >= b),
                Operator::Lt => Some(a < b),
                Operator::Lte => Some(a <= b),
                Operator::In => None,
            },
            (FieldValue::Text(a), FieldValue::Text(b)) => match op {
                Operator::Eq => Some(a == b),
                _ => None,
            },
            _ => None,
        }
    }

    /// The runtime type name used in diagnostics: `"number"` or `"string"`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl ConditionValue {
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, ConditionValue::List(_))
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(Decimal::from(v))
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Number(Decimal::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Number(Decimal::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<FieldValue> for ConditionValue {
    fn from(v: FieldValue) -> Self {
        ConditionValue::Scalar(v)
    }
}

impl From<Vec<FieldValue>> for ConditionValue {
    fn from(v: Vec<FieldValue>) -> Self {
        ConditionValue::List(v)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Scalar(v) => write!(f, "{v}"),
            ConditionValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Serde: JSON numbers map to `Number`, JSON strings to `Text`. Numeric strings
// stay strings; there is no coercion in either direction.
// ---------------------------------------------------------------------------

/// Key serde_json uses to hand the raw text of a number to a visitor when
/// its `arbitrary_precision` feature is on.
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Parse a JSON number token, which may carry an exponent.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Parse through the shortest round-trip text form so `0.1` becomes exactly
/// `0.1` rather than its binary expansion. Only formats without raw number
/// text (TOML) reach this.
fn decimal_from_f64(v: f64) -> Option<Decimal> {
    parse_decimal(&v.to_string())
}

fn serialize_number<S: Serializer>(n: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if n.fract().is_zero() {
        if let Some(i) = n.to_i64() {
            return serializer.serialize_i64(i);
        }
    }
    // Written from the decimal text, so every digit survives.
    serde_json::Number::from_str(&n.to_string())
        .map_err(|e| serde::ser::Error::custom(format!("number {n} has no JSON representation: {e}")))?
        .serialize(serializer)
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Binary formats keep the variant tag and the exact decimal, so
        // `2.5` and `"2.5"` never encode alike.
        if !serializer.is_human_readable() {
            return match self {
                FieldValue::Number(n) => {
                    serializer.serialize_newtype_variant("FieldValue", 0, "Number", &n.normalize())
                }
                FieldValue::Text(s) => serializer.serialize_newtype_variant("FieldValue", 1, "Text", s),
            };
        }
        match self {
            FieldValue::Number(n) => serialize_number(n, serializer),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for ConditionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionValue::Scalar(v) => v.serialize(serializer),
            ConditionValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        decimal_from_f64(v)
            .map(FieldValue::Number)
            .ok_or_else(|| E::custom(format!("number {v} is outside the decimal range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FieldValue, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == JSON_NUMBER_TOKEN => {
                let raw: String = map.next_value()?;
                parse_decimal(&raw).map(FieldValue::Number).ok_or_else(|| {
                    de::Error::custom(format!("number {raw} is outside the decimal range"))
                })
            }
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

struct ConditionValueVisitor;

impl<'de> Visitor<'de> for ConditionValueVisitor {
    type Value = ConditionValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a string, or a list of them")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ConditionValue, E> {
        FieldValueVisitor.visit_i64(v).map(ConditionValue::Scalar)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ConditionValue, E> {
        FieldValueVisitor.visit_u64(v).map(ConditionValue::Scalar)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ConditionValue, E> {
        FieldValueVisitor.visit_f64(v).map(ConditionValue::Scalar)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ConditionValue, E> {
        FieldValueVisitor.visit_str(v).map(ConditionValue::Scalar)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ConditionValue, E> {
        FieldValueVisitor.visit_string(v).map(ConditionValue::Scalar)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<ConditionValue, A::Error> {
        FieldValueVisitor.visit_map(map).map(ConditionValue::Scalar)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ConditionValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<FieldValue>()? {
            items.push(item);
        }
        Ok(ConditionValue::List(items))
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConditionValueVisitor)
    }
}
