//! Domain-bound deployments seen through a user's snapshot.

use super::helpers::{Fleet, fleet};
use chrono::NaiveDate;
use fleetscope::deployment::{domain::RequestContext, services::SaveDeploymentRequest};
use fleetscope::event::domain::EventKind;
use fleetscope::inventory::domain::AttributeFilter;
use fleetscope::scope::domain::{Domain, UserProfile};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn domain_user_sees_only_domain_computers(fleet: Fleet) -> Result<(), eyre::Report> {
    let lab = fleet.attribute("LOC", "lab").await?;
    let lab_pc = fleet.computer("lab-01", &[lab.id()]).await?;
    fleet.computer("office-01", &[]).await?;
    let labs = fleet
        .scopes
        .save_domain(Domain::new("LABS")?.with_filter(AttributeFilter::new().including([lab.id()])))
        .await?;
    let technician = fleet
        .scopes
        .save_user(UserProfile::new("technician")?.with_domains([labs.id()]))
        .await?;
    let snapshot = fleet
        .scopes
        .set_preferences(technician.id(), Some(labs.id()), None)
        .await?;
    let mut profile = technician;
    profile.set_preferences(Some(labs.id()), None);

    let outcome = fleet
        .deployments
        .save(
            SaveDeploymentRequest::new(
                "firefox",
                fleet.project,
                NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            )
            .with_domain(labs.id()),
            &profile,
            &RequestContext::for_user(&profile),
        )
        .await?;
    let targeted = fleet
        .deployments
        .matching_computers(&outcome.deployment, &snapshot)
        .await?;

    assert_eq!(outcome.deployment.name(), "labs_firefox");
    let names: Vec<&str> = targeted.iter().map(|computer| computer.name()).collect();
    assert_eq!(names, [lab_pc.name()]);
    assert_eq!(
        fleet
            .events
            .unchecked_count(EventKind::Notification, snapshot.computers())
            .await?,
        1
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn errors_on_hidden_computers_are_not_counted(fleet: Fleet) -> Result<(), eyre::Report> {
    let lab = fleet.attribute("LOC", "lab").await?;
    let lab_pc = fleet.computer("lab-01", &[lab.id()]).await?;
    let office_pc = fleet.computer("office-01", &[]).await?;
    let labs = fleet
        .scopes
        .save_domain(Domain::new("LABS")?.with_filter(AttributeFilter::new().including([lab.id()])))
        .await?;
    let technician = fleet
        .scopes
        .save_user(UserProfile::new("technician")?.with_domains([labs.id()]))
        .await?;
    for computer in [&lab_pc, &office_pc] {
        fleet
            .events
            .create_error(computer.id(), fleet.project, "apt-get update failed")
            .await?;
    }

    let visible = fleet.scopes.visible_computers(technician.id()).await?;

    assert_eq!(fleet.events.unchecked_count(EventKind::Error, &visible).await?, 1);
    Ok(())
}
