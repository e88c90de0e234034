//! Pending OAuth `state` tokens.
//!
//! Tokens are single-use and expire after [`OAUTH_STATE_TTL`]. Expired
//! entries are pruned whenever a token is issued or redeemed, so abandoned
//! flows do not accumulate.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// How long an issued state stays redeemable.
pub const OAUTH_STATE_TTL: TimeDelta = TimeDelta::minutes(10);

/// Issued, not yet redeemed OAuth states keyed by token.
pub struct OAuthStateStore {
    clock: Arc<dyn Clock + Send + Sync>,
    ttl: TimeDelta,
    issued: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl OAuthStateStore {
    /// Creates an empty store timed by `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock + Send + Sync>, ttl: TimeDelta) -> Self {
        Self {
            clock,
            ttl,
            issued: Mutex::default(),
        }
    }

    /// Issues a fresh token.
    #[must_use]
    pub fn issue(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = self.clock.utc();
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut issued, now);
        issued.insert(token.clone(), now);
        token
    }

    /// Consumes `token`, returning whether it was issued and has not expired.
    #[must_use]
    pub fn redeem(&self, token: &str) -> bool {
        let now = self.clock.utc();
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut issued, now);
        issued.remove(token).is_some()
    }

    /// Number of tokens still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn prune(&self, issued: &mut HashMap<String, DateTime<Utc>>, now: DateTime<Utc>) {
        issued.retain(|_, issued_at| now.signed_duration_since(*issued_at) < self.ttl);
    }
}
