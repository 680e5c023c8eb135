use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::condition::Operator;

/// Why a single rule could not be evaluated against a context.
///
/// These never abort a quote: the engine skips the rule and records the
/// error in the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalError {
    #[error("condition references unknown field '{field}'")]
    FieldUnknown { field: String },

    #[error("field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("order context has no value for field '{field}'")]
    MissingField { field: String },

    #[error("rule configuration error: {reason}")]
    RuleConfiguration { reason: String },
}

impl EvalError {
    /// Whether the error lies in the rule itself rather than in the order context.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EvalError::FieldUnknown { .. } | EvalError::RuleConfiguration { .. }
        )
    }
}

/// A rule that should not be saved or activated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate rule id '{id}'")]
    DuplicateRuleId { id: String },

    #[error("rule '{rule}' has an empty name")]
    EmptyName { rule: String },

    #[error("rule '{rule}' has a negative base amount")]
    NegativeBaseAmount { rule: String },

    #[error("condition {index} of rule '{rule}' references unknown field '{field}'")]
    UnknownField {
        rule: String,
        index: usize,
        field: String,
    },

    #[error("condition {index} of rule '{rule}': operator '{operator}' is not valid for {kind} field '{field}'")]
    OperatorNotSupported {
        rule: String,
        index: usize,
        field: String,
        operator: Operator,
        kind: String,
    },

    #[error("condition {index} of rule '{rule}': field '{field}' expects a {expected} value, got a {found}")]
    ValueKindMismatch {
        rule: String,
        index: usize,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("condition {index} of rule '{rule}': {value} is not a legal value of field '{field}'")]
    ValueNotAllowed {
        rule: String,
        index: usize,
        field: String,
        value: String,
    },

    #[error("condition {index} of rule '{rule}': operator 'in' requires a list value")]
    InWithoutList { rule: String, index: usize },

    #[error("condition {index} of rule '{rule}': operator '{operator}' does not accept a list value")]
    ListWithoutIn {
        rule: String,
        index: usize,
        operator: Operator,
    },

    #[error("condition {index} of rule '{rule}': 'in' list is empty")]
    EmptyList { rule: String, index: usize },

    #[error("condition {index} of rule '{rule}' has a negative adjustment")]
    NegativeAdjustment { rule: String, index: usize },

    #[error("condition {index} of rule '{rule}': field '{field}' belongs to {owner} rules, not {rule_type}")]
    FieldOutsideRuleType {
        rule: String,
        index: usize,
        field: String,
        rule_type: String,
        owner: String,
    },
}

impl From<ValidationError> for EvalError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownField { field, .. } => EvalError::FieldUnknown { field },
            other => EvalError::RuleConfiguration {
                reason: other.to_string(),
            },
        }
    }
}

/// A quote that cannot be produced at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("no triggered rule supplies a base fare")]
    NoBaseFare,

    #[error("arithmetic overflow while applying rule '{rule_id}'")]
    Overflow { rule_id: String },

    /// The settled total is too large to carry the configured minor units.
    #[error("total {total} cannot carry {minor_units} decimal places")]
    UnrepresentableTotal { total: Decimal, minor_units: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_unknown_message() {
        let err = EvalError::FieldUnknown {
            field: "parcel_colour".into(),
        };
        assert_eq!(
            err.to_string(),
            "condition references unknown field 'parcel_colour'"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn type_mismatch_message() {
        let err = EvalError::TypeMismatch {
            field: "distance_km".into(),
            expected: "number".into(),
            found: "\"far\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'distance_km' expects number, got \"far\""
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn missing_field_message() {
        let err = EvalError::MissingField {
            field: "weight_kg".into(),
        };
        assert_eq!(
            err.to_string(),
            "order context has no value for field 'weight_kg'"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn eval_error_serializes_with_kind_tag() {
        let err = EvalError::MissingField {
            field: "city".into(),
        };
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"kind":"missing_field","field":"city"}"#
        );
    }

    #[test]
    fn operator_not_supported_message() {
        let err = ValidationError::OperatorNotSupported {
            rule: "surge".into(),
            index: 0,
            field: "demand_level".into(),
            operator: Operator::Gt,
            kind: "enum(low|high)".into(),
        };
        assert_eq!(
            err.to_string(),
            "condition 0 of rule 'surge': operator 'gt' is not valid for enum(low|high) field 'demand_level'"
        );
    }

    #[test]
    fn unknown_field_becomes_field_unknown() {
        let err: EvalError = ValidationError::UnknownField {
            rule: "r".into(),
            index: 2,
            field: "mood".into(),
        }
        .into();
        assert_eq!(err, EvalError::FieldUnknown { field: "mood".into() });
    }

    #[test]
    fn other_validation_errors_become_rule_configuration() {
        let err: EvalError = ValidationError::InWithoutList {
            rule: "zone".into(),
            index: 1,
        }
        .into();
        assert_eq!(
            err,
            EvalError::RuleConfiguration {
                reason: "condition 1 of rule 'zone': operator 'in' requires a list value".into()
            }
        );
    }

    #[test]
    fn duplicate_rule_message() {
        let err = ValidationError::DuplicateRuleId { id: "base".into() };
        assert_eq!(err.to_string(), "duplicate rule id 'base'");
    }

    #[test]
    fn quote_error_messages() {
        assert_eq!(
            QuoteError::NoBaseFare.to_string(),
            "no triggered rule supplies a base fare"
        );
        assert_eq!(
            QuoteError::Overflow {
                rule_id: "surge".into()
            }
            .to_string(),
            "arithmetic overflow while applying rule 'surge'"
        );
        assert_eq!(
            QuoteError::UnrepresentableTotal {
                total: Decimal::MAX,
                minor_units: 2
            }
            .to_string(),
            "total 79228162514264337593543950335 cannot carry 2 decimal places"
        );
    }
}
