use fareplan::{
    Adjustment, ConditionValue, FareplanError, FieldValue, Operator, OrderContext, PricingEngine,
    QuoteRequest, Rule, RuleType, ValidationError,
};
use rust_decimal::Decimal;

/// A rule exactly as the admin form submits it.
const SURGE_RULE: &str = r#"{
    "id": "peak_surge",
    "name": "Peak hour surge",
    "type": "surge",
    "description": "Weekday evening rush",
    "base_amount": 0,
    "is_active": true,
    "conditions": [
        {"field": "demand_level", "operator": "in", "value": ["high", "very_high"],
         "then": {"type": "percentage", "value": 25}},
        {"field": "courier_availability", "operator": "lt", "value": 30,
         "then": {"type": "fixed", "value": 100}}
    ]
}"#;

#[test]
fn parses_admin_rule_shape() {
    let rule: Rule = serde_json::from_str(SURGE_RULE).unwrap();
    assert_eq!(rule.id, "peak_surge");
    assert_eq!(rule.rule_type, RuleType::Surge);
    assert_eq!(rule.description.as_deref(), Some("Weekday evening rush"));
    assert!(rule.is_active);
    assert_eq!(rule.priority, 0);
    assert_eq!(rule.conditions.len(), 2);

    let first = &rule.conditions[0];
    assert_eq!(first.operator, Operator::In);
    assert_eq!(
        first.value,
        ConditionValue::List(vec!["high".into(), "very_high".into()])
    );
    assert_eq!(first.then, Adjustment::Percentage(Decimal::from(25)));

    let second = &rule.conditions[1];
    assert_eq!(second.value, ConditionValue::Scalar(FieldValue::from(30_i64)));
    assert_eq!(second.then, Adjustment::Fixed(Decimal::from(100)));
}

#[test]
fn optional_keys_take_defaults() {
    let rule: Rule = serde_json::from_str(
        r#"{"id": "b", "name": "Base", "type": "distance", "base_amount": 450}"#,
    )
    .unwrap();
    assert!(rule.is_active);
    assert!(rule.conditions.is_empty());
    assert_eq!(rule.description, None);
}

#[test]
fn base_amount_accepts_string_decimals() {
    let rule: Rule = serde_json::from_str(
        r#"{"id": "b", "name": "Base", "type": "distance", "base_amount": "499.99"}"#,
    )
    .unwrap();
    assert_eq!(rule.base_amount, "499.99".parse::<Decimal>().unwrap());
}

#[test]
fn unknown_rule_type_is_rejected() {
    let err = serde_json::from_str::<Rule>(
        r#"{"id": "b", "name": "Base", "type": "weather", "base_amount": 0}"#,
    );
    assert!(err.is_err());
}

#[test]
fn context_keeps_numbers_and_strings_apart() {
    let ctx: OrderContext =
        serde_json::from_str(r#"{"distance_km": 12.5, "city": "Lagos", "order_volume": "40"}"#)
            .unwrap();
    assert_eq!(
        ctx.get("distance_km"),
        Some(&FieldValue::Number("12.5".parse().unwrap()))
    );
    assert_eq!(ctx.get("city"), Some(&FieldValue::from("Lagos")));
    assert_eq!(ctx.get("order_volume"), Some(&FieldValue::from("40")));
}

#[test]
fn quote_request_end_to_end() {
    let request = format!(
        r#"{{
            "rules": [
                {{"id": "base_fare", "name": "Base", "type": "distance", "base_amount": 800}},
                {SURGE_RULE}
            ],
            "context": {{"demand_level": "very_high", "courier_availability": 18}}
        }}"#
    );
    let response = PricingEngine::default().quote_json(&request).unwrap();

    // 800 + 25% = 1000, +100 = 1100
    assert_eq!(response.base_amount, Decimal::from(800));
    assert_eq!(response.applied.len(), 2);
    assert_eq!(response.applied[0].delta, Decimal::from(200));
    assert_eq!(response.applied[1].condition_index, 1);
    assert_eq!(response.final_total, Decimal::from(1100));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["final_total"], "1100.00");
    assert_eq!(json["applied"][0]["rule_id"], "peak_surge");
}

#[test]
fn request_round_trips_through_the_typed_shape() {
    let request = format!(r#"{{"rules": [{SURGE_RULE}], "context": {{"demand_level": "high"}}}}"#);
    let parsed: QuoteRequest = serde_json::from_str(&request).unwrap();
    let again: QuoteRequest =
        serde_json::from_str(&serde_json::to_string(&parsed).unwrap()).unwrap();
    assert_eq!(parsed, again);
}

#[test]
fn quote_request_without_context() {
    let response = PricingEngine::default()
        .quote_json(r#"{"rules": [{"id": "b", "name": "Base", "type": "distance", "base_amount": 300}]}"#)
        .unwrap();
    assert_eq!(response.final_total, Decimal::from(300));
}

#[test]
fn breakdown_serializes_skipped_errors() {
    let request = r#"{
        "rules": [
            {"id": "odd", "name": "Odd", "type": "zone", "base_amount": 0,
             "conditions": [{"field": "planet", "operator": "eq", "value": "mars",
                             "then": {"type": "fixed", "value": 10}}]}
        ],
        "context": {}
    }"#;
    let parsed: QuoteRequest = serde_json::from_str(request).unwrap();
    let b = PricingEngine::default()
        .quote(&parsed.rules, &parsed.context)
        .unwrap();
    let json = serde_json::to_value(&b).unwrap();
    assert_eq!(json["skipped"][0]["rule_id"], "odd");
    assert_eq!(json["skipped"][0]["error"]["kind"], "field_unknown");
    assert_eq!(json["skipped"][0]["error"]["field"], "planet");
}

#[test]
fn load_rules_json_reports_the_first_invalid_rule() {
    let rules = r#"[
        {"id": "a", "name": "Base", "type": "distance", "base_amount": 500},
        {"id": "a", "name": "Again", "type": "distance", "base_amount": 600}
    ]"#;
    let err = PricingEngine::default().load_rules_json(rules).unwrap_err();
    assert!(matches!(
        err,
        FareplanError::Validation(ValidationError::DuplicateRuleId { ref id }) if id == "a"
    ));
}

#[test]
fn load_rules_json_rejects_negative_adjustments() {
    let rules = r#"[
        {"id": "d", "name": "Discount", "type": "customer_tier", "base_amount": 0,
         "conditions": [{"field": "customer_tier", "operator": "eq", "value": "enterprise",
                         "then": {"type": "fixed", "value": -50}}]}
    ]"#;
    let err = PricingEngine::default().load_rules_json(rules).unwrap_err();
    assert!(matches!(
        err,
        FareplanError::Validation(ValidationError::NegativeAdjustment { .. })
    ));
}

#[test]
fn context_numbers_keep_full_precision() {
    let ctx: OrderContext = serde_json::from_str(r#"{"distance_km": 10.0000000000000001}"#).unwrap();
    let rule = Rule::builder("long_haul", RuleType::Distance)
        .when(fareplan::field("distance_km").gt(10_i64).then_fixed(50_i64))
        .build();
    let outcome = PricingEngine::default().evaluate_rule(&rule, &ctx).unwrap();
    assert!(outcome.is_triggered());
}

#[test]
fn high_precision_request_replays_unchanged() {
    let request = r#"{
        "rules": [
            {"id": "far", "name": "Far", "type": "distance", "base_amount": "100",
             "conditions": [{"field": "distance_km", "operator": "gte", "value": 12345678.123456789,
                             "then": {"type": "fixed", "value": 1}}]}
        ],
        "context": {"distance_km": 12345678.123456789}
    }"#;
    let parsed: QuoteRequest = serde_json::from_str(request).unwrap();
    assert_eq!(
        parsed.context.get("distance_km"),
        Some(&FieldValue::Number("12345678.123456789".parse().unwrap()))
    );

    let saved = serde_json::to_string(&parsed).unwrap();
    assert!(saved.contains("12345678.123456789"));
    let back: QuoteRequest = serde_json::from_str(&saved).unwrap();
    assert_eq!(back, parsed);

    let engine = PricingEngine::default();
    assert_eq!(
        engine.quote(&back.rules, &back.context).unwrap(),
        engine.quote(&parsed.rules, &parsed.context).unwrap()
    );
}

#[test]
fn quote_json_reports_skipped_rules() {
    let request = r#"{
        "rules": [
            {"id": "base_fare", "name": "Base", "type": "distance", "base_amount": 500},
            {"id": "odd", "name": "Odd", "type": "zone", "base_amount": 0,
             "conditions": [{"field": "planet", "operator": "eq", "value": "mars",
                             "then": {"type": "fixed", "value": 10}}]}
        ],
        "context": {}
    }"#;
    let response = PricingEngine::default().quote_json(request).unwrap();
    assert_eq!(response.final_total, Decimal::from(500));
    assert_eq!(response.skipped.len(), 1);
    assert_eq!(response.skipped[0].rule_id, "odd");

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["skipped"][0]["error"]["kind"], "field_unknown");
}

#[test]
fn clean_quote_json_omits_skipped() {
    let response = PricingEngine::default()
        .quote_json(r#"{"rules": [{"id": "b", "name": "Base", "type": "distance", "base_amount": 300}]}"#)
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("skipped").is_none());
}
