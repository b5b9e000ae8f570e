//! Given steps for deployment matching scenarios.

use super::world::{MatchingWorld, run_async};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use fleetscope::deployment::services::SaveDeploymentRequest;
use fleetscope::inventory::{
    domain::{Attribute, Computer},
    ports::InventoryRepository,
};
use fleetscope::schedule::domain::{Schedule, ScheduleDelay};
use rstest_bdd_macros::given;

#[given(r#"a computer "{name}" with attribute "{attribute}""#)]
fn computer_with_attribute(
    world: &mut MatchingWorld,
    name: String,
    attribute: String,
) -> Result<(), eyre::Report> {
    let carried = world.attribute(&attribute)?;
    let computer = Computer::new(name.as_str(), world.project)?.with_sync_attributes([carried.id()]);
    let identity = Attribute::for_computer(computer.id(), computer.name());
    run_async(world.inventory.store_computer(&computer, &identity))?;
    world.computers.insert(name, computer);
    Ok(())
}

#[given(r#"the computer "{name}" also carries "{attribute}""#)]
fn computer_also_carries(
    world: &mut MatchingWorld,
    name: String,
    attribute: String,
) -> Result<(), eyre::Report> {
    let carried = world.attribute(&attribute)?;
    let mut computer = world.computer(&name)?.clone();
    computer.reconcile_sync_attributes(&BTreeSet::from([carried.id()]), &BTreeSet::new());
    run_async(world.inventory.update_computer(&computer))?;
    world.computers.insert(name, computer);
    Ok(())
}

#[given(r#"a deployment "{name}" including "{attribute}""#)]
fn deployment_including(
    world: &mut MatchingWorld,
    name: String,
    attribute: String,
) -> Result<(), eyre::Report> {
    let included = world.attribute(&attribute)?;
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or_else(|| eyre::eyre!("invalid start date"))?;
    world.pending_request = Some(
        SaveDeploymentRequest::new(name, world.project, start).with_included([included.id()]),
    );
    Ok(())
}

#[given(r#"the deployment excludes "{attribute}""#)]
fn deployment_excludes(world: &mut MatchingWorld, attribute: String) -> Result<(), eyre::Report> {
    let excluded = world.attribute(&attribute)?;
    let request = world
        .pending_request
        .take()
        .ok_or_else(|| eyre::eyre!("no deployment has been described"))?;
    world.pending_request = Some(request.with_excluded([excluded.id()]));
    Ok(())
}

#[given("the metadata builder fails {count:usize} times")]
fn metadata_builder_fails(world: &mut MatchingWorld, count: usize) {
    world.metadata.fail_next(count);
}

#[given(r#"a schedule starting with the "{attribute}" tier for {days:u32} business days"#)]
fn pilot_schedule(world: &mut MatchingWorld, attribute: String, days: u32) -> Result<(), eyre::Report> {
    let pilot = world.attribute(&attribute)?;
    let schedule = Schedule::new(format!("{attribute} first"))?.with_delays([
        ScheduleDelay::new(0, days).with_attributes([pilot.id()]),
        ScheduleDelay::new(days, days.saturating_mul(5)),
    ]);
    let saved = run_async(world.rollout.save_schedule(schedule))?;
    let request = world
        .pending_request
        .take()
        .ok_or_else(|| eyre::eyre!("no deployment has been described"))?;
    world.pending_request = Some(request.with_schedule(saved.id()));
    Ok(())
}
