use super::condition::Adjustment;

/// One adjustment a triggered rule contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggeredAdjustment {
    pub condition_index: usize,
    pub adjustment: Adjustment,
}

/// Result of matching one rule against an order context.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum RuleOutcome {
    NotTriggered,
    /// Every condition matched. Adjustments are in declaration order; a rule
    /// with no conditions triggers with an empty list.
    Triggered(Vec<TriggeredAdjustment>),
}

impl RuleOutcome {
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        matches!(self, RuleOutcome::Triggered(_))
    }

    /// The adjustments to apply; empty when not triggered.
    #[must_use]
    pub fn adjustments(&self) -> &[TriggeredAdjustment] {
        match self {
            RuleOutcome::Triggered(adjustments) => adjustments,
            RuleOutcome::NotTriggered => &[],
        }
    }
}
