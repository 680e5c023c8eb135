//! Price one order against a small rule catalogue and print the breakdown.
//!
//! Run with `RUST_LOG=fareplan=debug cargo run --example quote` to see the
//! engine's trace.

use fareplan::{field, OrderContext, PricingEngine, Rule, RuleType};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let rules = vec![
        Rule::builder("base_fare", RuleType::Distance)
            .name("Standard base fare")
            .base_amount(500_i64)
            .build(),
        Rule::builder("long_distance", RuleType::Distance)
            .name("Long distance")
            .when(field("distance_km").gt(10_i64).then_fixed(200_i64))
            .build(),
        Rule::builder("peak_surge", RuleType::Surge)
            .name("Peak surge")
            .when(field("demand_level").one_of(["high", "very_high"]).then_percentage(20_i64))
            .build(),
        Rule::builder("island_zone", RuleType::Zone)
            .name("Island premium")
            .when(field("delivery_zone").one_of(["Ikoyi", "Victoria Island"]).then_fixed(150_i64))
            .build(),
        Rule::builder("express", RuleType::Time)
            .name("Express delivery")
            .when(field("delivery_urgency").eq("express").then_percentage(10_i64))
            .build(),
    ];

    let engine = PricingEngine::default();
    if let Err(err) = engine.validate_rules(&rules) {
        eprintln!("invalid rule catalogue: {err}");
        std::process::exit(1);
    }

    let ctx = OrderContext::new()
        .set("distance_km", 14_i64)
        .set("demand_level", "high")
        .set("delivery_zone", "Ikoyi")
        .set("delivery_urgency", "standard");

    match engine.quote(&rules, &ctx) {
        Ok(breakdown) => {
            println!("{breakdown}");
            for step in breakdown.applied() {
                println!(
                    "  {:<14} #{} {:>8} -> {}",
                    step.rule_id, step.condition_index, step.delta, step.running_total
                );
            }
            println!("final total: {}", breakdown.final_total());
        }
        Err(err) => {
            eprintln!("quote failed: {err}");
            std::process::exit(1);
        }
    }
}
