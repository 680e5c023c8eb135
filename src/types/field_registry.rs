use std::collections::BTreeMap;
use std::fmt;

use super::condition::Operator;
use super::error::EvalError;
use super::value::FieldValue;

/// The declared type of an order-context field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A decimal quantity such as `distance_km`.
    Number,
    /// A string drawn from a fixed, ordered set of legal values.
    Enum(Vec<String>),
    /// A free-form string with no closed value set (zones, cities).
    Text,
}

impl FieldKind {
    /// Build an enum kind from any list of string-like values.
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Whether conditions on this kind may use `op`.
    ///
    /// Ordering operators are numeric only; `eq` and `in` work everywhere.
    #[must_use]
    pub fn supports(&self, op: Operator) -> bool {
        match self {
            FieldKind::Number => true,
            FieldKind::Enum(_) | FieldKind::Text => matches!(op, Operator::Eq | Operator::In),
        }
    }

    /// Whether `value` has the runtime type this kind stores, ignoring enum membership.
    #[must_use]
    pub fn has_type_of(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Number, FieldValue::Number(_))
                | (FieldKind::Enum(_) | FieldKind::Text, FieldValue::Text(_))
        )
    }

    /// Whether `value` is a legal value of this kind, including enum membership.
    #[must_use]
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldKind::Enum(values), FieldValue::Text(s)) => values.iter().any(|v| v == s),
            _ => self.has_type_of(value),
        }
    }

    /// The runtime value type this kind is stored as: `"number"` or `"string"`.
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Enum(_) | FieldKind::Text => "string",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Number => write!(f, "number"),
            FieldKind::Enum(values) => write!(f, "enum({})", values.join("|")),
            FieldKind::Text => write!(f, "text"),
        }
    }
}

/// Registry entry for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: String,
    pub kind: FieldKind,
}

/// Catalogue of the fields a condition may reference.
///
/// Lookups are by field name. Iteration is sorted by name so anything derived
/// from the registry is reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldSpec>,
}

impl FieldRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// The delivery catalogue offered by the rule authoring screens.
    #[must_use]
    pub fn delivery() -> Self {
        use FieldKind::{Number, Text};

        Self::new()
            .with_field("distance_km", "Distance (km)", Number)
            .with_field("distance_miles", "Distance (miles)", Number)
            .with_field("weight_kg", "Weight (kg)", Number)
            .with_field("weight_lbs", "Weight (lbs)", Number)
            .with_field(
                "time_of_day",
                "Time of Day",
                FieldKind::enumeration(["morning", "afternoon", "evening", "night"]),
            )
            .with_field(
                "delivery_urgency",
                "Delivery Urgency",
                FieldKind::enumeration(["standard", "express", "urgent"]),
            )
            .with_field(
                "day_of_week",
                "Day of Week",
                FieldKind::enumeration([
                    "monday",
                    "tuesday",
                    "wednesday",
                    "thursday",
                    "friday",
                    "saturday",
                    "sunday",
                ]),
            )
            .with_field(
                "demand_level",
                "Demand Level",
                FieldKind::enumeration(["low", "medium", "high", "very_high"]),
            )
            .with_field("order_volume", "Order Volume", Number)
            .with_field("courier_availability", "Courier Availability (%)", Number)
            .with_field("delivery_zone", "Delivery Zone", Text)
            .with_field(
                "area_type",
                "Area Type",
                FieldKind::enumeration(["urban", "suburban", "rural"]),
            )
            .with_field("city", "City", Text)
            .with_field(
                "customer_tier",
                "Customer Tier",
                FieldKind::enumeration(["standard", "preferred", "enterprise"]),
            )
            .with_field("order_frequency", "Order Frequency", Number)
            .with_field(
                "loyalty_level",
                "Loyalty Level",
                FieldKind::enumeration(["new", "regular", "vip"]),
            )
    }

    /// Add or replace a field, builder style.
    #[must_use]
    pub fn with_field(mut self, name: &str, label: &str, kind: FieldKind) -> Self {
        self.insert(name, label, kind);
        self
    }

    /// Add or replace a field. Returns the previous spec if the name was taken.
    pub fn insert(&mut self, name: &str, label: &str, kind: FieldKind) -> Option<FieldSpec> {
        self.fields.insert(
            name.to_owned(),
            FieldSpec {
                label: label.to_owned(),
                kind,
            },
        )
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Look up a field by name, failing with [`EvalError::FieldUnknown`].
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::FieldUnknown`] if `name` is not registered.
    pub fn describe(&self, name: &str) -> Result<&FieldSpec, EvalError> {
        self.get(name).ok_or_else(|| EvalError::FieldUnknown {
            field: name.to_owned(),
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over all registered fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}
