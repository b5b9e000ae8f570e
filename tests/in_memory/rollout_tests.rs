//! Staged schedules over a registered fleet.

use super::helpers::{Fleet, fleet};
use chrono::{NaiveDate, Utc};
use fleetscope::deployment::{domain::RequestContext, services::SaveDeploymentRequest};
use fleetscope::schedule::domain::{Schedule, ScheduleDelay};
use fleetscope::scope::domain::{ScopeSnapshot, UserProfile, Visibility};
use rstest::rstest;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pilot_group_goes_first(fleet: Fleet) -> Result<(), eyre::Report> {
    let pilot = fleet.attribute("GRP", "pilot").await?;
    let pilot_pc = fleet.computer("pilot-01", &[pilot.id()]).await?;
    let office_pc = fleet.computer("office-01", &[]).await?;
    let schedule = fleet
        .rollout
        .save_schedule(
            Schedule::new("pilot first")?.with_delays([
                ScheduleDelay::new(0, 3).with_attributes([pilot.id()]),
                ScheduleDelay::new(3, 10),
            ]),
        )
        .await?;
    let admin = UserProfile::new("admin")?;
    let outcome = fleet
        .deployments
        .save(
            SaveDeploymentRequest::new("office-suite", fleet.project, date(1, 1))
                .with_schedule(schedule.id()),
            &admin,
            &RequestContext::for_user(&admin),
        )
        .await?;
    let deployment = outcome.deployment;

    let pilot_day_two = fleet
        .rollout
        .has_reached(pilot_pc.id(), deployment.id(), date(1, 2))
        .await?;
    let office_day_two = fleet
        .rollout
        .has_reached(office_pc.id(), deployment.id(), date(1, 2))
        .await?;
    let office_day_four = fleet
        .rollout
        .has_reached(office_pc.id(), deployment.id(), date(1, 4))
        .await?;

    eyre::ensure!(pilot_day_two, "pilot computer should be reached on day two");
    eyre::ensure!(!office_day_two, "office computer should wait for its tier");
    eyre::ensure!(office_day_four, "office computer should be reached once its tier opens");

    let snapshot = ScopeSnapshot::new(admin.id(), Visibility::All, Visibility::All, Utc::now());
    let summaries = fleet
        .rollout
        .computers_per_tier(&deployment, &snapshot, date(1, 2))
        .await?;
    let counts: Vec<u64> = summaries.iter().map(|summary| summary.computers).collect();
    assert_eq!(counts, [1, 1]);
    Ok(())
}
