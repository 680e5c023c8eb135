use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::breakdown::{PriceBreakdown, SkippedRule};
use super::context::OrderContext;
use super::rule::Rule;

/// Wire shape of a quote request: `{"rules": [...], "context": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub context: OrderContext,
}

/// One applied adjustment in the compact response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDelta {
    pub rule_id: String,
    pub condition_index: usize,
    pub delta: Decimal,
}

/// Wire shape of a quote response, the compact view of a [`PriceBreakdown`].
///
/// Amounts serialize as decimal strings so no precision is lost in transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub base_amount: Decimal,
    pub applied: Vec<AppliedDelta>,
    pub final_total: Decimal,
    /// Rules left out because they could not be evaluated. Omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRule>,
}

impl From<&PriceBreakdown> for QuoteResponse {
    fn from(b: &PriceBreakdown) -> Self {
        Self {
            base_amount: b.base_amount(),
            applied: b
                .applied()
                .iter()
                .map(|a| AppliedDelta {
                    rule_id: a.rule_id.clone(),
                    condition_index: a.condition_index,
                    delta: a.delta,
                })
                .collect(),
            final_total: b.final_total(),
            skipped: b.skipped().to_vec(),
        }
    }
}
