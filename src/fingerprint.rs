//! Content-addressed keys for caching quotes.
//!
//! A quote is a pure function of the rule snapshot, the order context and
//! the engine configuration. [`QuoteKey`] digests the first two with BLAKE3
//! over their bincode encoding, so a caller holding one engine can memoize
//! `quote` results keyed by `QuoteKey`.
//!
//! Numbers are encoded as normalized decimals, so `2.5` and `2.50` produce
//! the same key. Rule order is significant and is part of the key.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{OrderContext, Rule};

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("failed to encode quote input: {0}")]
    Encode(#[from] bincode::error::EncodeError),
}

/// Identity of one quote input: the rule snapshot and the order context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    rules: blake3::Hash,
    context: blake3::Hash,
}

impl QuoteKey {
    /// # Errors
    ///
    /// Returns [`FingerprintError`] if the inputs cannot be encoded.
    pub fn new(rules: &[Rule], ctx: &OrderContext) -> Result<Self, FingerprintError> {
        Ok(Self {
            rules: digest(rules)?,
            context: digest(ctx)?,
        })
    }

    /// Digest of the rule snapshot alone. Useful to detect a rule change
    /// that should invalidate every cached quote.
    #[must_use]
    pub fn rules_digest(&self) -> &blake3::Hash {
        &self.rules
    }

    #[must_use]
    pub fn context_digest(&self) -> &blake3::Hash {
        &self.context
    }
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rules.to_hex(), self.context.to_hex())
    }
}

fn digest<T: Serialize + ?Sized>(value: &T) -> Result<blake3::Hash, FingerprintError> {
    let bytes = bincode::serde::encode_to_vec(value, bincode::config::standard())?;
    Ok(blake3::hash(&bytes))
}
