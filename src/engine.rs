//! The pricing engine: turns a rule snapshot and an order context into a
//! price breakdown.
//!
//! Quoting algorithm:
//!
//! 1. Keep active rules and order them by ascending `priority`. The sort is
//!    stable, so equal priorities keep the order the caller supplied.
//! 2. Match every rule. A rule that cannot be evaluated is skipped and its
//!    error recorded; it never aborts the quote.
//! 3. The first triggered rule with a positive `base_amount` seeds the
//!    running total. Other triggered rules contribute adjustments only.
//! 4. Adjustments apply rule by rule, condition by condition. Percentages
//!    are taken of the running total at the moment they apply, so their
//!    position in the order changes the result.
//! 5. The total is floored at zero and rounded half-up to the currency's
//!    minor unit.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::{
    AppliedAdjustment, Condition, EvalError, FieldRegistry, OrderContext, PriceBreakdown,
    QuoteError, QuoteRequest, QuoteResponse, Rule, RuleOutcome, SkippedRule, TriggeredAdjustment,
    ValidationError,
};

/// Stateless pricing evaluator. Thread-safe and designed to live behind `Arc`.
///
/// # Example
///
/// ```
/// use fareplan::{field, OrderContext, PricingEngine, Rule, RuleType};
/// use rust_decimal::Decimal;
///
/// let rules = vec![
///     Rule::builder("base_fare", RuleType::Distance).base_amount(500_i64).build(),
///     Rule::builder("surge", RuleType::Surge)
///         .when(field("demand_level").eq("high").then_fixed(150_i64))
///         .build(),
/// ];
/// let ctx = OrderContext::new().set("demand_level", "high");
///
/// let breakdown = PricingEngine::default().quote(&rules, &ctx).unwrap();
/// assert_eq!(breakdown.final_total(), Decimal::from(650));
/// ```
#[derive(Debug, Clone)]
pub struct PricingEngine {
    registry: FieldRegistry,
    config: EngineConfig,
}

impl Default for PricingEngine {
    /// The delivery field catalogue with the default configuration.
    fn default() -> Self {
        Self::new(FieldRegistry::delivery(), EngineConfig::default())
    }
}

impl PricingEngine {
    /// Create an engine over an explicit registry.
    ///
    /// `config.fields` is ignored here; use [`from_config`](Self::from_config)
    /// to build the registry from configuration.
    #[must_use]
    pub fn new(registry: FieldRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Create an engine whose registry is the delivery catalogue extended by
    /// the config's `[[fields]]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured fields are invalid.
    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        let registry = config.registry()?;
        Ok(Self { registry, config })
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide whether one condition holds for the context.
    ///
    /// Unlike rule evaluation, a missing field is always returned as
    /// [`EvalError::MissingField`] regardless of the configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if the field is unknown or missing, the context
    /// value has the wrong type, or the operator does not suit the value.
    pub fn matches(&self, condition: &Condition, ctx: &OrderContext) -> Result<bool, EvalError> {
        crate::evaluate::matches(condition, ctx, &self.registry)
    }

    /// Decide whether a rule is triggered for the context.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if the rule is malformed or the context cannot be
    /// compared against it.
    pub fn evaluate_rule(&self, rule: &Rule, ctx: &OrderContext) -> Result<RuleOutcome, EvalError> {
        crate::evaluate::evaluate_rule(rule, ctx, &self.registry, self.config.missing_field)
    }

    /// Rule-save validation for one rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_rule(&self, rule: &Rule) -> Result<(), ValidationError> {
        crate::validate::validate_rule(&self.registry, rule)
    }

    /// Rule-save validation for a rule set, including duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_rules(&self, rules: &[Rule]) -> Result<(), ValidationError> {
        crate::validate::validate_rules(&self.registry, rules)
    }

    /// Price an order.
    ///
    /// `rules` is used as given: the engine neither filters by rule type nor
    /// re-fetches anything, so pass one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::NoBaseFare`] when `require_base_fare` is set and
    /// no triggered rule has a positive base amount, and
    /// [`QuoteError::Overflow`] if the arithmetic leaves the decimal range.
    pub fn quote(&self, rules: &[Rule], ctx: &OrderContext) -> Result<PriceBreakdown, QuoteError> {
        debug!(rules = rules.len(), fields = ctx.len(), "quoting order");

        let mut ordered: Vec<&Rule> = rules.iter().filter(|r| r.is_active).collect();
        ordered.sort_by_key(|r| r.priority);

        let mut triggered: Vec<(&Rule, Vec<TriggeredAdjustment>)> = Vec::new();
        let mut skipped = Vec::new();

        for rule in ordered {
            match self.evaluate_rule(rule, ctx) {
                Ok(RuleOutcome::Triggered(adjustments)) => {
                    debug!(
                        rule_id = %rule.id,
                        adjustments = adjustments.len(),
                        "rule triggered"
                    );
                    triggered.push((rule, adjustments));
                }
                Ok(RuleOutcome::NotTriggered) => {}
                Err(error) => {
                    warn!(rule_id = %rule.id, %error, "skipping rule");
                    skipped.push(SkippedRule {
                        rule_id: rule.id.clone(),
                        error,
                    });
                }
            }
        }

        let base_rule = triggered
            .iter()
            .map(|(rule, _)| *rule)
            .find(|rule| rule.base_amount > Decimal::ZERO);
        if base_rule.is_none() && self.config.require_base_fare {
            return Err(QuoteError::NoBaseFare);
        }
        let base_amount = base_rule.map_or(Decimal::ZERO, |rule| rule.base_amount);

        let mut running_total = base_amount;
        let mut applied = Vec::new();
        for (rule, adjustments) in &triggered {
            for t in adjustments {
                let overflow = || QuoteError::Overflow {
                    rule_id: rule.id.clone(),
                };
                let delta = t.adjustment.delta(running_total).ok_or_else(overflow)?;
                running_total = running_total.checked_add(delta).ok_or_else(overflow)?;
                applied.push(AppliedAdjustment {
                    rule_id: rule.id.clone(),
                    condition_index: t.condition_index,
                    adjustment: t.adjustment,
                    delta,
                    running_total,
                });
            }
        }

        let final_total = self.settle(running_total)?;
        debug!(
            base = %base_amount,
            subtotal = %running_total,
            total = %final_total,
            skipped = skipped.len(),
            "quote complete"
        );

        Ok(PriceBreakdown::new(
            base_amount,
            base_rule.map(|rule| rule.id.clone()),
            applied,
            skipped,
            running_total,
            final_total,
        ))
    }

    /// Price a JSON quote request and return the compact JSON response shape.
    ///
    /// # Errors
    ///
    /// Returns [`FareplanError`](crate::FareplanError) if the request is not
    /// valid JSON or the quote fails.
    pub fn quote_json(&self, request: &str) -> Result<QuoteResponse, crate::FareplanError> {
        let request: QuoteRequest = serde_json::from_str(request)?;
        let breakdown = self.quote(&request.rules, &request.context)?;
        Ok(QuoteResponse::from(&breakdown))
    }

    /// Parse a JSON array of rules as the admin UI produces them, and validate
    /// them for saving.
    ///
    /// # Errors
    ///
    /// Returns [`FareplanError`](crate::FareplanError) on malformed JSON or
    /// the first validation failure.
    pub fn load_rules_json(&self, rules: &str) -> Result<Vec<Rule>, crate::FareplanError> {
        let rules: Vec<Rule> = serde_json::from_str(rules)?;
        self.validate_rules(&rules)?;
        Ok(rules)
    }

    /// Floor at zero, then round half-up to the minor unit.
    fn settle(&self, subtotal: Decimal) -> Result<Decimal, QuoteError> {
        let minor_units = self.config.minor_units;
        let mut total = subtotal
            .max(Decimal::ZERO)
            .round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero);
        total.rescale(minor_units);
        // `rescale` leaves the scale short when the mantissa has no room.
        if total.scale() != minor_units {
            return Err(QuoteError::UnrepresentableTotal { total, minor_units });
        }
        Ok(total)
    }
}
