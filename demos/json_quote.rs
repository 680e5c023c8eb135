//! Read a quote request from a file (or stdin) and print the JSON response.
//!
//! ```text
//! cargo run --example json_quote -- request.json [engine.toml]
//! ```

use std::io::Read;

use fareplan::{EngineConfig, FareplanError, PricingEngine};
use tracing_subscriber::EnvFilter;

fn run() -> Result<String, FareplanError> {
    let mut args = std::env::args().skip(1);

    let request = match args.next() {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = match args.next() {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = PricingEngine::from_config(config)?;

    let response = engine.quote_json(&request)?;
    Ok(serde_json::to_string_pretty(&response)?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
