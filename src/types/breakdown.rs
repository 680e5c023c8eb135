use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::condition::Adjustment;
use super::error::EvalError;

/// One adjustment as it was applied to the running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAdjustment {
    pub rule_id: String,
    pub condition_index: usize,
    pub adjustment: Adjustment,
    /// The amount actually added to the total.
    pub delta: Decimal,
    /// The total after this adjustment.
    pub running_total: Decimal,
}

/// A rule left out of the quote because it could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub rule_id: String,
    pub error: EvalError,
}

/// Full account of how a quote was reached.
///
/// Contains no timing or other ambient data, so identical inputs always
/// produce identical breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct PriceBreakdown {
    base_amount: Decimal,
    base_rule_id: Option<String>,
    applied: Vec<AppliedAdjustment>,
    skipped: Vec<SkippedRule>,
    subtotal: Decimal,
    final_total: Decimal,
}

impl PriceBreakdown {
    pub(crate) fn new(
        base_amount: Decimal,
        base_rule_id: Option<String>,
        applied: Vec<AppliedAdjustment>,
        skipped: Vec<SkippedRule>,
        subtotal: Decimal,
        final_total: Decimal,
    ) -> Self {
        Self {
            base_amount,
            base_rule_id,
            applied,
            skipped,
            subtotal,
            final_total,
        }
    }

    /// The base fare that seeded the total, zero if no triggered rule supplied one.
    #[must_use]
    pub fn base_amount(&self) -> Decimal {
        self.base_amount
    }

    /// The rule whose base amount seeded the total.
    #[must_use]
    pub fn base_rule_id(&self) -> Option<&str> {
        self.base_rule_id.as_deref()
    }

    /// Adjustments in the order they were applied.
    #[must_use]
    pub fn applied(&self) -> &[AppliedAdjustment] {
        &self.applied
    }

    /// Rules skipped because of configuration or context errors.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    /// The running total before flooring and rounding.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// The price: floored at zero and rounded to the currency's minor unit.
    #[must_use]
    pub fn final_total(&self) -> Decimal {
        self.final_total
    }

    /// Ids of rules that contributed at least one adjustment, in application order.
    #[must_use]
    pub fn contributing_rules(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for a in &self.applied {
            if ids.last() != Some(&a.rule_id.as_str()) {
                ids.push(&a.rule_id);
            }
        }
        ids
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base_rule_id {
            Some(id) => write!(f, "base: {} ({id})", self.base_amount)?,
            None => write!(f, "base: none")?,
        }
        let applied: Vec<String> = self
            .applied
            .iter()
            .map(|a| format!("{}#{} {}", a.rule_id, a.condition_index, a.adjustment))
            .collect();
        write!(f, ", applied: [{}]", applied.join(", "))?;
        if !self.skipped.is_empty() {
            let skipped: Vec<&str> = self.skipped.iter().map(|s| s.rule_id.as_str()).collect();
            write!(f, ", skipped: [{}]", skipped.join(", "))?;
        }
        write!(f, ", total: {}", self.final_total)
    }
}
