use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value::{ConditionValue, FieldValue};

/// Comparison operators available to pricing conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
}

impl Operator {
    /// The operator's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::In => "in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The price change a condition contributes when its rule is triggered.
///
/// Serialized as `{"type": "fixed" | "percentage", "value": <number>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Adjustment {
    /// Add a fixed currency amount.
    Fixed(Decimal),
    /// Add this percentage of the running total at the time of application.
    Percentage(Decimal),
}

impl Adjustment {
    /// The amount this adjustment adds to `running_total`.
    ///
    /// Returns `None` on decimal overflow.
    #[must_use]
    pub fn delta(self, running_total: Decimal) -> Option<Decimal> {
        match self {
            Adjustment::Fixed(amount) => Some(amount),
            Adjustment::Percentage(percent) => running_total
                .checked_mul(percent)?
                .checked_div(Decimal::ONE_HUNDRED),
        }
    }

    /// The raw configured value (amount or percent).
    #[must_use]
    pub fn value(self) -> Decimal {
        match self {
            Adjustment::Fixed(v) | Adjustment::Percentage(v) => v,
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::Fixed(v) => write!(f, "+{v}"),
            Adjustment::Percentage(v) => write!(f, "+{v}%"),
        }
    }
}

/// One predicate over an order-context field plus the adjustment it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
    pub then: Adjustment,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} then {}",
            self.field, self.operator, self.value, self.then
        )
    }
}

/// Intermediate builder for a condition's predicate.
/// Created by [`field()`]; requires a comparison method to produce a [`Predicate`].
#[derive(Debug, Clone)]
pub struct FieldExpr {
    name: String,
}

/// A predicate still waiting for its adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: String,
    operator: Operator,
    value: ConditionValue,
}

impl FieldExpr {
    fn predicate(self, operator: Operator, value: ConditionValue) -> Predicate {
        Predicate {
            field: self.name,
            operator,
            value,
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<FieldValue>) -> Predicate {
        self.predicate(Operator::Eq, ConditionValue::Scalar(value.into()))
    }

    #[must_use]
    pub fn gt(self, value: impl Into<FieldValue>) -> Predicate {
        self.predicate(Operator::Gt, ConditionValue::Scalar(value.into()))
    }

    #[must_use]
    pub fn gte(self, value: impl Into<FieldValue>) -> Predicate {
        self.predicate(Operator::Gte, ConditionValue::Scalar(value.into()))
    }

    #[must_use]
    pub fn lt(self, value: impl Into<FieldValue>) -> Predicate {
        self.predicate(Operator::Lt, ConditionValue::Scalar(value.into()))
    }

    #[must_use]
    pub fn lte(self, value: impl Into<FieldValue>) -> Predicate {
        self.predicate(Operator::Lte, ConditionValue::Scalar(value.into()))
    }

    /// Membership test, the `in` operator.
    #[must_use]
    pub fn one_of<I, V>(self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.predicate(Operator::In, ConditionValue::List(list))
    }
}

impl Predicate {
    /// Attach an adjustment, completing the condition.
    #[must_use]
    pub fn then(self, adjustment: Adjustment) -> Condition {
        Condition {
            field: self.field,
            operator: self.operator,
            value: self.value,
            then: adjustment,
        }
    }

    #[must_use]
    pub fn then_fixed(self, amount: impl Into<Decimal>) -> Condition {
        self.then(Adjustment::Fixed(amount.into()))
    }

    #[must_use]
    pub fn then_percentage(self, percent: impl Into<Decimal>) -> Condition {
        self.then(Adjustment::Percentage(percent.into()))
    }
}

#[must_use]
pub fn field(name: &str) -> FieldExpr {
    FieldExpr {
        name: name.to_owned(),
    }
}
