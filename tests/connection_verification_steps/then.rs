//! Then steps for verification scenarios.

use super::world::VerificationWorld;
use eyre::eyre;
use rstest_bdd_macros::then;
use supabridge::verification::Verification;

fn outcome(world: &VerificationWorld) -> Result<&Verification, eyre::Report> {
    world
        .verification
        .as_ref()
        .ok_or_else(|| eyre!("connection was not verified in this scenario"))
}

#[then(r#"the connection is verified by the "{probe}" probe"#)]
fn verified_by(world: &VerificationWorld, probe: String) -> Result<(), eyre::Report> {
    match outcome(world)? {
        Verification::Verified { probe: accepted } => {
            let name = serde_json::to_value(accepted)?;
            if name.as_str() == Some(probe.as_str()) {
                Ok(())
            } else {
                Err(eyre!("verified by {name}, expected {probe}"))
            }
        }
        Verification::Unverified { reason } => Err(eyre!("unexpectedly unverified: {reason}")),
    }
}

#[then(r#"the connection is unverified with a reason mentioning "{text}""#)]
fn unverified_mentioning(world: &VerificationWorld, text: String) -> Result<(), eyre::Report> {
    match outcome(world)? {
        Verification::Unverified { reason } if reason.contains(&text) => Ok(()),
        other => Err(eyre!("expected an unverified outcome mentioning {text}, got {other:?}")),
    }
}
