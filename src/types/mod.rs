mod breakdown;
mod condition;
mod context;
mod error;
mod field_registry;
mod outcome;
mod quote;
mod rule;
mod value;

pub use breakdown::{AppliedAdjustment, PriceBreakdown, SkippedRule};
pub use condition::{Adjustment, Condition, FieldExpr, Operator, Predicate, field};
pub use context::OrderContext;
pub use error::{EvalError, QuoteError, ValidationError};
pub use field_registry::{FieldKind, FieldRegistry, FieldSpec};
pub use outcome::{RuleOutcome, TriggeredAdjustment};
pub use quote::{AppliedDelta, QuoteRequest, QuoteResponse};
pub use rule::{Rule, RuleBuilder, RuleType};
pub use value::{ConditionValue, FieldValue};
