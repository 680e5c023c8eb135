use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::condition::{Adjustment, Condition};

/// The pricing dimension a rule belongs to.
///
/// The engine composes rules of any type; the type only decides which
/// built-in fields a rule's conditions may use (see [`RuleType::fields`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Distance,
    Weight,
    Time,
    Surge,
    Zone,
    CustomerTier,
}

impl RuleType {
    pub const ALL: [RuleType; 6] = [
        RuleType::Distance,
        RuleType::Weight,
        RuleType::Time,
        RuleType::Surge,
        RuleType::Zone,
        RuleType::CustomerTier,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Distance => "distance",
            RuleType::Weight => "weight",
            RuleType::Time => "time",
            RuleType::Surge => "surge",
            RuleType::Zone => "zone",
            RuleType::CustomerTier => "customer_tier",
        }
    }

    /// Built-in fields that conditions of this rule type work with.
    #[must_use]
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            RuleType::Distance => &["distance_km", "distance_miles"],
            RuleType::Weight => &["weight_kg", "weight_lbs"],
            RuleType::Time => &["time_of_day", "delivery_urgency", "day_of_week"],
            RuleType::Surge => &["demand_level", "order_volume", "courier_availability"],
            RuleType::Zone => &["delivery_zone", "area_type", "city"],
            RuleType::CustomerTier => &["customer_tier", "order_frequency", "loyalty_level"],
        }
    }

    /// The rule type whose catalogue lists `field`, if any.
    #[must_use]
    pub fn owning(field: &str) -> Option<RuleType> {
        Self::ALL
            .into_iter()
            .find(|t| t.fields().contains(&field))
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// A named pricing policy: a base amount plus ordered conditions.
///
/// A rule is triggered when it is active and every condition matches; each
/// condition's adjustment then applies in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_amount: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Lower values are evaluated first; equal priorities keep input order.
    #[serde(default)]
    pub priority: u32,
}

impl Rule {
    /// Start building a rule. The name defaults to the id.
    #[must_use]
    pub fn builder(id: &str, rule_type: RuleType) -> RuleBuilder {
        RuleBuilder {
            rule: Rule {
                id: id.to_owned(),
                name: id.to_owned(),
                rule_type,
                description: None,
                base_amount: Decimal::ZERO,
                is_active: true,
                conditions: Vec::new(),
                priority: 0,
            },
        }
    }

    /// Adjustments in declaration order, paired with their condition index.
    pub fn adjustments(&self) -> impl Iterator<Item = (usize, Adjustment)> + '_ {
        self.conditions.iter().map(|c| c.then).enumerate()
    }
}

/// Builder returned by [`Rule::builder`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.rule.name = name.to_owned();
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.rule.description = Some(description.to_owned());
        self
    }

    #[must_use]
    pub fn base_amount(mut self, amount: impl Into<Decimal>) -> Self {
        self.rule.base_amount = amount.into();
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: u32) -> Self {
        self.rule.priority = priority;
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.rule.is_active = is_active;
        self
    }

    /// Append a condition. Conditions are ANDed in the order they are added.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.rule.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn build(self) -> Rule {
        self.rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    #[test]
    fn builder_defaults() {
        let rule = Rule::builder("base_fare", RuleType::Distance).build();
        assert_eq!(rule.name, "base_fare");
        assert!(rule.is_active);
        assert_eq!(rule.base_amount, Decimal::ZERO);
        assert!(rule.conditions.is_empty());
        assert_eq!(rule.priority, 0);
    }

    #[test]
    fn builder_collects_conditions_in_order() {
        let rule = Rule::builder("surge", RuleType::Surge)
            .name("Peak surge")
            .when(field("demand_level").eq("high").then_fixed(150_i64))
            .when(field("order_volume").gt(100_i64).then_percentage(5_i64))
            .priority(3)
            .active(false)
            .build();
        assert_eq!(rule.name, "Peak surge");
        assert_eq!(rule.conditions.len(), 2);
        assert_eq!(rule.conditions[0].field, "demand_level");
        assert_eq!(rule.conditions[1].field, "order_volume");
        assert_eq!(rule.priority, 3);
        assert!(!rule.is_active);
    }

    #[test]
    fn adjustments_are_indexed() {
        let rule = Rule::builder("r", RuleType::Weight)
            .when(field("weight_kg").gt(5_i64).then_fixed(50_i64))
            .when(field("weight_kg").gt(10_i64).then_fixed(75_i64))
            .build();
        let adjs: Vec<(usize, Adjustment)> = rule.adjustments().collect();
        assert_eq!(
            adjs,
            vec![
                (0, Adjustment::Fixed(Decimal::from(50))),
                (1, Adjustment::Fixed(Decimal::from(75))),
            ]
        );
    }

    #[test]
    fn rule_type_catalogue() {
        assert_eq!(RuleType::owning("demand_level"), Some(RuleType::Surge));
        assert_eq!(RuleType::owning("delivery_zone"), Some(RuleType::Zone));
        assert_eq!(RuleType::owning("parcel_class"), None);
        assert!(RuleType::Distance.fields().contains(&"distance_km"));
    }

    #[test]
    fn rule_from_admin_json() {
        let json = r#"{
            "id": "r1",
            "name": "Base fare",
            "type": "distance",
            "base_amount": 500,
            "is_active": true,
            "conditions": []
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.rule_type, RuleType::Distance);
        assert_eq!(rule.base_amount, Decimal::from(500));
        assert_eq!(rule.description, None);
        assert_eq!(rule.priority, 0);
    }

    #[test]
    fn rule_json_defaults() {
        let json = r#"{"id": "r", "name": "n", "type": "customer_tier", "base_amount": 0}"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert!(rule.is_active);
        assert!(rule.conditions.is_empty());
        assert_eq!(rule.rule_type, RuleType::CustomerTier);
    }
}
