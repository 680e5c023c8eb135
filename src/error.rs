use thiserror::Error;

use crate::config::ConfigError;
use crate::{QuoteError, ValidationError};

/// Unified error type covering configuration, validation, quoting, JSON and I/O.
///
/// Returned by [`PricingEngine::quote_json()`](crate::PricingEngine::quote_json)
/// and [`PricingEngine::load_rules_json()`](crate::PricingEngine::load_rules_json).
#[derive(Debug, Error)]
pub enum FareplanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "quote-cache")]
    #[error(transparent)]
    Fingerprint(#[from] crate::fingerprint::FingerprintError),
}
