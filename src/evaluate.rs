use tracing::warn;

use crate::config::MissingFieldPolicy;
use crate::{
    Condition, ConditionValue, EvalError, FieldRegistry, Operator, OrderContext, Rule, RuleOutcome,
    TriggeredAdjustment,
};

/// Decide whether one condition holds for the context.
///
/// A missing context value is reported as [`EvalError::MissingField`]; the
/// caller decides what that means.
pub(crate) fn matches(
    condition: &Condition,
    ctx: &OrderContext,
    registry: &FieldRegistry,
) -> Result<bool, EvalError> {
    let spec = registry.describe(&condition.field)?;
    let actual = ctx
        .get(&condition.field)
        .ok_or_else(|| EvalError::MissingField {
            field: condition.field.clone(),
        })?;

    if !spec.kind.accepts(actual) {
        return Err(EvalError::TypeMismatch {
            field: condition.field.clone(),
            expected: spec.kind.to_string(),
            found: actual.to_string(),
        });
    }

    match (&condition.value, condition.operator) {
        (ConditionValue::List(items), Operator::In) => Ok(items.contains(actual)),
        (ConditionValue::Scalar(_), Operator::In) => Err(EvalError::RuleConfiguration {
            reason: format!("operator 'in' on field '{}' requires a list", condition.field),
        }),
        (ConditionValue::List(_), op) => Err(EvalError::RuleConfiguration {
            reason: format!(
                "operator '{op}' on field '{}' does not accept a list",
                condition.field
            ),
        }),
        (ConditionValue::Scalar(expected), op) => {
            actual
                .compare(op, expected)
                .ok_or_else(|| EvalError::RuleConfiguration {
                    reason: format!(
                        "operator '{op}' cannot compare {} field '{}' with {expected}",
                        spec.kind, condition.field
                    ),
                })
        }
    }
}

/// Decide whether a rule is triggered and collect its adjustments.
///
/// The whole rule is checked against the registry before any condition is
/// evaluated, so a malformed condition is reported even when an earlier
/// condition would have failed.
pub(crate) fn evaluate_rule(
    rule: &Rule,
    ctx: &OrderContext,
    registry: &FieldRegistry,
    missing_field: MissingFieldPolicy,
) -> Result<RuleOutcome, EvalError> {
    if !rule.is_active {
        return Ok(RuleOutcome::NotTriggered);
    }

    crate::validate::check_structure(registry, rule)?;

    let mut adjustments = Vec::with_capacity(rule.conditions.len());
    for (index, condition) in rule.conditions.iter().enumerate() {
        let matched = match matches(condition, ctx, registry) {
            Ok(matched) => matched,
            Err(EvalError::MissingField { field })
                if missing_field == MissingFieldPolicy::NonMatch =>
            {
                warn!(
                    rule_id = %rule.id,
                    field = %field,
                    "order context lacks field; condition treated as non-match"
                );
                false
            }
            Err(err) => return Err(err),
        };
        if !matched {
            return Ok(RuleOutcome::NotTriggered);
        }
        adjustments.push(TriggeredAdjustment {
            condition_index: index,
            adjustment: condition.then,
        });
    }

    Ok(RuleOutcome::Triggered(adjustments))
}
