use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;

use crate::domain::types::OtpRecord;

/// Typed reasons a `verify` can fail. The caller decides whether to re-issue;
/// the ledger never retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpFailure {
    NotFound,
    Expired,
    AlreadyConsumed,
    Mismatch,
}

fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999).to_string()
}

/// In-memory one-time-password ledger keyed by an opaque identity string
/// (an email address, or an assignment key).
///
/// At most one record exists per key: issuing supersedes any prior record,
/// consumed or not. Consumed records are kept until their expiry so
/// `is_verified_recently` can gate signup on a past verification.
pub struct OtpLedger {
    records: Mutex<HashMap<String, OtpRecord>>,
}

impl OtpLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Generate and store a fresh 6-digit code for `key`, replacing any prior
    /// record. Returns the code for delivery; the ledger itself never sends
    /// anything.
    pub fn issue(&self, key: &str, ttl: Duration) -> String {
        self.issue_at(key, ttl, Utc::now())
    }

    /// Timestamp-parameterized variant of [`issue`](Self::issue).
    pub fn issue_at(&self, key: &str, ttl: Duration, now: DateTime<Utc>) -> String {
        let code = generate_code();
        let mut records = self.records.lock().unwrap();
        // Opportunistic hygiene, same as the periodic sweep.
        records.retain(|_, r| r.expires_at > now);
        records.insert(
            key.to_owned(),
            OtpRecord {
                code: code.clone(),
                expires_at: now + ttl,
                consumed_at: None,
            },
        );
        code
    }

    /// Check `supplied` against the record for `key` and consume it on
    /// success. Comparison is exact string match after whitespace trim.
    pub fn verify(&self, key: &str, supplied: &str) -> Result<(), OtpFailure> {
        self.verify_at(key, supplied, Utc::now())
    }

    /// Timestamp-parameterized variant of [`verify`](Self::verify).
    pub fn verify_at(
        &self,
        key: &str,
        supplied: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpFailure> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(key).ok_or(OtpFailure::NotFound)?;
        if now > record.expires_at {
            records.remove(key);
            return Err(OtpFailure::Expired);
        }
        if record.consumed_at.is_some() {
            return Err(OtpFailure::AlreadyConsumed);
        }
        if record.code != supplied.trim() {
            return Err(OtpFailure::Mismatch);
        }
        record.consumed_at = Some(now);
        Ok(())
    }

    /// Drop every record past its expiry, consumed or not. Consumed records
    /// are useless once expired: `is_verified_recently` already reports false
    /// for them. Correctness never depends on this running; `verify` re-checks
    /// expiry itself.
    pub fn purge_expired(&self) {
        self.purge_expired_at(Utc::now());
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) {
        self.records
            .lock()
            .unwrap()
            .retain(|_, r| r.expires_at > now);
    }

    /// True only while the most recent record for `key` is consumed and still
    /// inside its original validity window. Verified status lapses when the
    /// code would have expired.
    pub fn is_verified_recently(&self, key: &str) -> bool {
        self.is_verified_recently_at(key, Utc::now())
    }

    pub fn is_verified_recently_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.records
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|r| r.consumed_at.is_some() && r.expires_at >= now)
    }
}

impl Default for OtpLedger {
    fn default() -> Self {
        Self::new()
    }
}
