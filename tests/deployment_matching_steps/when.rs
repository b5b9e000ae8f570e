//! When steps for deployment matching scenarios.

use super::world::{MatchingWorld, run_async};
use fleetscope::deployment::domain::RequestContext;
use fleetscope::scope::domain::UserProfile;
use rstest_bdd_macros::when;

#[when("the deployment is saved")]
fn deployment_is_saved(world: &mut MatchingWorld) -> Result<(), eyre::Report> {
    let request = world
        .pending_request
        .take()
        .ok_or_else(|| eyre::eyre!("no deployment has been described"))?;
    let admin = UserProfile::new("admin")?.with_view_all(true);
    let context = RequestContext::for_user(&admin);
    let outcome = run_async(world.deployments.save(request, &admin, &context));
    world.last_outcome = Some(outcome);
    Ok(())
}
