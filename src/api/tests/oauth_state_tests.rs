//! Unit tests for OAuth state expiry.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::{fixture, rstest};

use super::ManualClock;
use crate::api::{OAUTH_STATE_TTL, OAuthStateStore};

#[fixture]
fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new())
}

fn store(clock: &Arc<ManualClock>) -> OAuthStateStore {
    OAuthStateStore::new(Arc::clone(clock) as Arc<_>, OAUTH_STATE_TTL)
}

#[rstest]
fn fresh_state_is_redeemed_once(clock: Arc<ManualClock>) {
    let states = store(&clock);
    let token = states.issue();

    assert!(states.redeem(&token));
    assert!(!states.redeem(&token));
    assert_eq!(states.pending(), 0);
}

#[rstest]
fn expired_state_is_refused(clock: Arc<ManualClock>) {
    let states = store(&clock);
    let token = states.issue();

    clock.advance(OAUTH_STATE_TTL);

    assert!(!states.redeem(&token));
}

#[rstest]
fn abandoned_states_are_pruned_on_issue(clock: Arc<ManualClock>) {
    let states = store(&clock);
    let abandoned: Vec<String> = (0..50).map(|_| states.issue()).collect();
    assert_eq!(states.pending(), abandoned.len());

    clock.advance(OAUTH_STATE_TTL + TimeDelta::seconds(1));
    let survivor = states.issue();

    assert_eq!(states.pending(), 1);
    assert!(states.redeem(&survivor));
}

#[rstest]
fn unexpired_states_survive_pruning(clock: Arc<ManualClock>) {
    let states = store(&clock);
    let older = states.issue();
    clock.advance(TimeDelta::minutes(9));
    let newer = states.issue();

    clock.advance(TimeDelta::minutes(2));

    assert!(!states.redeem(&older));
    assert!(states.redeem(&newer));
}
