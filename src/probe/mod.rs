//! Connectivity probes against individual cluster hosts
//!
//! A probe is a single bounded attempt to establish connectivity against one
//! candidate host. Probes return data, not errors: a host that is down is an
//! expected outcome the caller moves past.

use std::fmt;

pub(crate) mod broker;
mod resolver;

pub use broker::BrokerProber;
pub use resolver::{ResolverHit, ResolverProber};

// ─────────────────────────────────────────────────────────────────
// Probe Outcome
// ─────────────────────────────────────────────────────────────────

/// Outcome of a single broker probe attempt
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The broker accepted the connection and the queue was bound.
    /// A message may have been waiting on the exchange.
    Connected { message: Option<MessagePayload> },

    /// The probe failed; the reason is kept for logging
    Failed { reason: String },
}

impl ProbeOutcome {
    /// Whether the probe reached a working broker
    pub fn is_connected(&self) -> bool {
        matches!(self, ProbeOutcome::Connected { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Message Payload
// ─────────────────────────────────────────────────────────────────

/// A message body captured from the exchange
///
/// Bodies are expected to be JSON but nothing enforces that on the publisher
/// side, so decoding falls back to raw text instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    /// Body decoded as JSON
    Json(serde_json::Value),

    /// Body was not valid JSON; kept as (lossy UTF-8) text
    Raw(String),
}

impl MessagePayload {
    /// Decode a message body, falling back to raw text. Never fails.
    pub fn decode(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => MessagePayload::Json(value),
            Err(_) => MessagePayload::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Whether the payload decoded as JSON
    pub fn is_json(&self) -> bool {
        matches!(self, MessagePayload::Json(_))
    }
}

impl fmt::Display for MessagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePayload::Json(value) => {
                let pretty =
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                write!(f, "{}", pretty)
            }
            MessagePayload::Raw(text) => write!(f, "{}", text),
        }
    }
}
