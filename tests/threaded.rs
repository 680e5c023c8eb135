use std::sync::Arc;
use std::thread;

use fareplan::{field, OrderContext, PricingEngine, Rule, RuleType};
use rust_decimal::Decimal;

fn rules() -> Vec<Rule> {
    vec![
        Rule::builder("base_fare", RuleType::Distance)
            .base_amount(500_i64)
            .build(),
        Rule::builder("surge", RuleType::Surge)
            .when(field("demand_level").eq("high").then_fixed(150_i64))
            .build(),
        Rule::builder("ikoyi", RuleType::Zone)
            .when(field("delivery_zone").eq("Ikoyi").then_percentage(20_i64))
            .build(),
    ]
}

#[test]
fn quote_across_threads() {
    let engine = Arc::new(PricingEngine::default());
    let rules = Arc::new(rules());

    let contexts = vec![
        // Thread 1: surge only -> 650
        OrderContext::new()
            .set("demand_level", "high")
            .set("delivery_zone", "Yaba"),
        // Thread 2: zone only -> 600
        OrderContext::new()
            .set("demand_level", "low")
            .set("delivery_zone", "Ikoyi"),
        // Thread 3: both -> (500 + 150) * 1.2 = 780
        OrderContext::new()
            .set("demand_level", "high")
            .set("delivery_zone", "Ikoyi"),
        // Thread 4: neither -> 500
        OrderContext::new(),
    ];

    let handles: Vec<_> = contexts
        .into_iter()
        .map(|ctx| {
            let engine = Arc::clone(&engine);
            let rules = Arc::clone(&rules);
            thread::spawn(move || engine.quote(&rules, &ctx).unwrap().final_total())
        })
        .collect();

    let results: Vec<Decimal> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], Decimal::from(650));
    assert_eq!(results[1], Decimal::from(600));
    assert_eq!(results[2], Decimal::from(780));
    assert_eq!(results[3], Decimal::from(500));
}

#[test]
fn concurrent_quotes_agree() {
    let engine = Arc::new(PricingEngine::default());
    let rules = Arc::new(rules());
    let ctx = Arc::new(
        OrderContext::new()
            .set("demand_level", "high")
            .set("delivery_zone", "Ikoyi"),
    );
    let expected = engine.quote(&rules, &ctx).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let rules = Arc::clone(&rules);
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                (0..100)
                    .map(|_| engine.quote(&rules, &ctx).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for breakdown in handle.join().unwrap() {
            assert_eq!(breakdown, expected);
        }
    }
}

#[test]
fn engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PricingEngine>();
    assert_send_sync::<Rule>();
    assert_send_sync::<OrderContext>();
    assert_send_sync::<fareplan::PriceBreakdown>();
}
