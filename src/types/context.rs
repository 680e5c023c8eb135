use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// Flat mapping from field name to value for one pricing request.
///
/// Built once by the caller from an order (`distance_km`, `delivery_zone`, ...)
/// and only read by the engine. Keys are kept sorted so serialization and
/// hashing are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderContext {
    values: BTreeMap<String, FieldValue>,
}

impl OrderContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, builder style. A later set of the same field wins.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field value (mutable reference version).
    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.values.insert(field.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for OrderContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
