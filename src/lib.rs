//! Deterministic pricing-rule evaluation for last-mile delivery quotes.
//!
//! Operators author [`Rule`]s: a base fare plus conditions over order fields
//! (distance, weight, demand, zone, customer tier) that each carry a fixed or
//! percentage adjustment. [`PricingEngine::quote`] evaluates a rule snapshot
//! against an [`OrderContext`] and returns a [`PriceBreakdown`] explaining
//! every step from base fare to final total.

mod config;
mod engine;
mod error;
mod evaluate;
#[cfg(feature = "quote-cache")]
mod fingerprint;
mod types;
mod validate;

pub use config::{ConfigError, EngineConfig, FieldDef, FieldKindName, MissingFieldPolicy};
pub use engine::PricingEngine;
pub use error::FareplanError;
#[cfg(feature = "quote-cache")]
pub use fingerprint::{FingerprintError, QuoteKey};
pub use types::{
    Adjustment, AppliedAdjustment, AppliedDelta, Condition, ConditionValue, EvalError, FieldExpr,
    FieldKind, FieldRegistry, FieldSpec, FieldValue, Operator, OrderContext, Predicate,
    PriceBreakdown, QuoteError, QuoteRequest, QuoteResponse, Rule, RuleBuilder, RuleOutcome,
    RuleType, SkippedRule, TriggeredAdjustment, ValidationError, field,
};
