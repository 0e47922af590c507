//! Strongly-typed identifiers for verdant

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Unique identifier for a recorded transaction.
///
/// Rendered as `txn_<unix-millis>`, which is also the persisted form. Minting
/// bumps a process-wide high-water mark, so two transactions created within
/// the same millisecond still get distinct IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnId(String);

/// Highest millisecond value handed out so far in this process.
static LAST_TXN_MILLIS: AtomicI64 = AtomicI64::new(0);

impl TxnId {
    /// Mint a fresh ID for a transaction occurring at `at`.
    pub fn generate(at: DateTime<Local>) -> Self {
        let millis = at.timestamp_millis();
        let mut last = LAST_TXN_MILLIS.load(Ordering::Relaxed);
        loop {
            let candidate = millis.max(last + 1);
            match LAST_TXN_MILLIS.compare_exchange(
                last,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Self(format!("txn_{candidate}")),
                Err(observed) => last = observed,
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TxnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalized login identity: the key a session's durable slot is stored
/// under. Construction trims whitespace and lowercases, so `" Alice "` and
/// `"alice"` address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IdentityKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IdentityKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
