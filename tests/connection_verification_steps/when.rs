//! When steps for verification scenarios.

use super::world::{VerificationWorld, run_async};
use rstest_bdd_macros::when;
use supabridge::verification::ConnectionVerifier;

#[when("the connection is verified")]
fn connection_is_verified(world: &mut VerificationWorld) {
    let verification = run_async(ConnectionVerifier::verify(&world.api));
    world.verification = Some(verification);
}
