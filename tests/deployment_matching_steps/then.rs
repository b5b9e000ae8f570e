//! Then steps for deployment matching scenarios.

use super::world::{MatchingWorld, run_async};
use chrono::Utc;
use fleetscope::scope::domain::{ScopeSnapshot, UserId, Visibility};
use rstest_bdd_macros::then;

fn targets(world: &MatchingWorld, name: &str) -> Result<bool, eyre::Report> {
    let deployment = &world.saved()?.deployment;
    let snapshot = ScopeSnapshot::new(UserId::new(), Visibility::All, Visibility::All, Utc::now());
    let matching = run_async(world.deployments.matching_computers(deployment, &snapshot))?;
    Ok(matching.iter().any(|computer| computer.name() == name))
}

fn reaches(world: &MatchingWorld, name: &str, date: &str) -> Result<bool, eyre::Report> {
    let deployment = world.saved()?.deployment.id();
    let computer = world.computer(name)?.id();
    let today = MatchingWorld::date(date)?;
    Ok(run_async(world.rollout.has_reached(computer, deployment, today))?)
}

#[then(r#"the deployment targets "{name}""#)]
fn deployment_targets(world: &MatchingWorld, name: String) -> Result<(), eyre::Report> {
    eyre::ensure!(targets(world, &name)?, "expected the deployment to target {name}");
    Ok(())
}

#[then(r#"the deployment does not target "{name}""#)]
fn deployment_does_not_target(world: &MatchingWorld, name: String) -> Result<(), eyre::Report> {
    eyre::ensure!(!targets(world, &name)?, "expected the deployment to skip {name}");
    Ok(())
}

#[then("repository metadata is regenerated")]
fn metadata_regenerated(world: &MatchingWorld) -> Result<(), eyre::Report> {
    let outcome = world.saved()?;
    eyre::ensure!(
        outcome.metadata.is_regenerated(),
        "expected regenerated metadata, got {:?}",
        outcome.metadata
    );
    eyre::ensure!(
        world
            .metadata
            .published(world.project, outcome.deployment.name())
            .is_some(),
        "expected a published manifest for {}",
        outcome.deployment.name()
    );
    Ok(())
}

#[then("the save succeeds with a metadata warning")]
fn save_succeeds_with_warning(world: &MatchingWorld) -> Result<(), eyre::Report> {
    let outcome = world.saved()?;
    eyre::ensure!(outcome.metadata.is_failed(), "expected failed metadata, got {:?}", outcome.metadata);
    eyre::ensure!(
        outcome
            .warnings
            .iter()
            .any(|warning| warning.contains("was not regenerated")),
        "expected a metadata warning, got {:?}",
        outcome.warnings
    );
    Ok(())
}

#[then(r#"the deployment "{name}" is stored"#)]
fn deployment_is_stored(world: &MatchingWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.saved()?.deployment.id();
    let stored = run_async(world.deployments.find(id))?;
    eyre::ensure!(stored.name() == name, "expected {name}, found {}", stored.name());
    Ok(())
}

#[then(r#"the deployment reaches "{name}" on "{date}""#)]
fn deployment_reaches(world: &MatchingWorld, name: String, date: String) -> Result<(), eyre::Report> {
    eyre::ensure!(reaches(world, &name, &date)?, "expected {name} to be reached on {date}");
    Ok(())
}

#[then(r#"the deployment does not reach "{name}" on "{date}""#)]
fn deployment_does_not_reach(world: &MatchingWorld, name: String, date: String) -> Result<(), eyre::Report> {
    eyre::ensure!(!reaches(world, &name, &date)?, "expected {name} to wait past {date}");
    Ok(())
}
