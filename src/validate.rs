use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::{
    Condition, ConditionValue, FieldRegistry, FieldSpec, FieldValue, Operator, Rule, RuleType,
    ValidationError,
};

/// Structural checks the engine relies on at evaluation time: every field is
/// registered, every operator suits its field, every value has the field's type.
pub(crate) fn check_structure(registry: &FieldRegistry, rule: &Rule) -> Result<(), ValidationError> {
    if rule.base_amount < Decimal::ZERO {
        return Err(ValidationError::NegativeBaseAmount {
            rule: rule.id.clone(),
        });
    }
    for (index, condition) in rule.conditions.iter().enumerate() {
        check_condition(registry, &rule.id, index, condition)?;
    }
    Ok(())
}

/// Full rule-save validation: structure plus authoring constraints.
pub(crate) fn validate_rule(registry: &FieldRegistry, rule: &Rule) -> Result<(), ValidationError> {
    if rule.name.trim().is_empty() {
        return Err(ValidationError::EmptyName {
            rule: rule.id.clone(),
        });
    }
    check_structure(registry, rule)?;
    for (index, condition) in rule.conditions.iter().enumerate() {
        check_authoring(rule, index, condition)?;
    }
    Ok(())
}

pub(crate) fn validate_rules(registry: &FieldRegistry, rules: &[Rule]) -> Result<(), ValidationError> {
    check_duplicates(rules)?;
    for rule in rules {
        validate_rule(registry, rule)?;
    }
    Ok(())
}

fn check_duplicates(rules: &[Rule]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id.as_str()) {
            return Err(ValidationError::DuplicateRuleId {
                id: rule.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_condition(
    registry: &FieldRegistry,
    rule_id: &str,
    index: usize,
    condition: &Condition,
) -> Result<(), ValidationError> {
    let spec = registry
        .get(&condition.field)
        .ok_or_else(|| ValidationError::UnknownField {
            rule: rule_id.to_owned(),
            index,
            field: condition.field.clone(),
        })?;

    if !spec.kind.supports(condition.operator) {
        return Err(ValidationError::OperatorNotSupported {
            rule: rule_id.to_owned(),
            index,
            field: condition.field.clone(),
            operator: condition.operator,
            kind: spec.kind.to_string(),
        });
    }

    match (&condition.value, condition.operator) {
        (ConditionValue::List(items), Operator::In) => {
            if items.is_empty() {
                return Err(ValidationError::EmptyList {
                    rule: rule_id.to_owned(),
                    index,
                });
            }
            for item in items {
                check_value(spec, rule_id, index, condition, item)?;
            }
            Ok(())
        }
        (ConditionValue::List(_), _) => Err(ValidationError::ListWithoutIn {
            rule: rule_id.to_owned(),
            index,
            operator: condition.operator,
        }),
        (ConditionValue::Scalar(_), Operator::In) => Err(ValidationError::InWithoutList {
            rule: rule_id.to_owned(),
            index,
        }),
        (ConditionValue::Scalar(value), _) => check_value(spec, rule_id, index, condition, value),
    }
}

fn check_value(
    spec: &FieldSpec,
    rule_id: &str,
    index: usize,
    condition: &Condition,
    value: &FieldValue,
) -> Result<(), ValidationError> {
    if !spec.kind.has_type_of(value) {
        return Err(ValidationError::ValueKindMismatch {
            rule: rule_id.to_owned(),
            index,
            field: condition.field.clone(),
            expected: spec.kind.value_type(),
            found: value.type_name(),
        });
    }
    if !spec.kind.accepts(value) {
        return Err(ValidationError::ValueNotAllowed {
            rule: rule_id.to_owned(),
            index,
            field: condition.field.clone(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_authoring(rule: &Rule, index: usize, condition: &Condition) -> Result<(), ValidationError> {
    if condition.then.value() < Decimal::ZERO {
        return Err(ValidationError::NegativeAdjustment {
            rule: rule.id.clone(),
            index,
        });
    }
    if let Some(owner) = RuleType::owning(&condition.field) {
        if owner != rule.rule_type {
            return Err(ValidationError::FieldOutsideRuleType {
                rule: rule.id.clone(),
                index,
                field: condition.field.clone(),
                rule_type: rule.rule_type.to_string(),
                owner: owner.to_string(),
            });
        }
    }
    Ok(())
}
