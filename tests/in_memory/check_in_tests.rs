//! Attribute set membership feeding deployment delivery.

use std::collections::BTreeSet;

use super::helpers::{Fleet, fleet};
use chrono::NaiveDate;
use fleetscope::deployment::{domain::RequestContext, services::SaveDeploymentRequest};
use fleetscope::inventory::{domain::AttributeFilter, ports::InventoryRepository};
use fleetscope::scope::domain::UserProfile;
use rstest::rstest;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).expect("valid date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_membership_delivers_deployments(fleet: Fleet) -> Result<(), eyre::Report> {
    let linux = fleet.attribute("PLT", "Linux").await?;
    let classroom = fleet.attribute("NET", "10.1.0.0/24").await?;
    let classrooms = fleet
        .inventory
        .create_attribute_set(
            "Classrooms",
            &AttributeFilter::new().including([linux.id(), classroom.id()]),
        )
        .await?;
    let student = fleet.computer("student-01", &[linux.id(), classroom.id()]).await?;
    let office = fleet.computer("office-01", &[linux.id()]).await?;
    let admin = UserProfile::new("admin")?;
    fleet
        .deployments
        .save(
            SaveDeploymentRequest::new("classroom-tools", fleet.project, start())
                .with_included([classrooms.attribute()]),
            &admin,
            &RequestContext::for_user(&admin),
        )
        .await?;

    let joined = fleet.inventory.refresh_set_attributes(student.id()).await?;
    let skipped = fleet.inventory.refresh_set_attributes(office.id()).await?;

    eyre::ensure!(joined.has_attribute(classrooms.attribute()), "student should join the set");
    eyre::ensure!(!skipped.has_attribute(classrooms.attribute()), "office computer should stay out");
    let delivered = fleet.rollout.deployments_for_computer(student.id(), start()).await?;
    let names: Vec<&str> = delivered.iter().map(|deployment| deployment.name()).collect();
    assert_eq!(names, ["classroom-tools"]);
    assert!(
        fleet
            .rollout
            .deployments_for_computer(office.id(), start())
            .await?
            .is_empty()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leaving_a_set_drops_its_attribute(fleet: Fleet) -> Result<(), eyre::Report> {
    let linux = fleet.attribute("PLT", "Linux").await?;
    let legacy = fleet.attribute("OS", "legacy").await?;
    let modern = fleet
        .inventory
        .create_attribute_set(
            "Modern",
            &AttributeFilter::new().including([linux.id()]).excluding([legacy.id()]),
        )
        .await?;
    let pc = fleet.computer("pc-01", &[linux.id()]).await?;
    let mut member = fleet.inventory.refresh_set_attributes(pc.id()).await?;
    eyre::ensure!(member.has_attribute(modern.attribute()), "computer should join the set");

    member.reconcile_sync_attributes(&BTreeSet::from([legacy.id()]), &BTreeSet::new());
    fleet.store.update_computer(&member).await?;
    let refreshed = fleet.inventory.refresh_set_attributes(pc.id()).await?;

    eyre::ensure!(
        !refreshed.has_attribute(modern.attribute()),
        "excluded attribute should remove the computer from the set"
    );
    eyre::ensure!(refreshed.has_attribute(legacy.id()), "check-in attributes stay");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn metadata_is_published_per_deployment(fleet: Fleet) -> Result<(), eyre::Report> {
    let admin = UserProfile::new("admin")?;
    let context = RequestContext::for_user(&admin);
    for name in ["firefox", "thunderbird"] {
        fleet
            .deployments
            .save(
                SaveDeploymentRequest::new(name, fleet.project, start()),
                &admin,
                &context,
            )
            .await?;
    }

    assert_eq!(fleet.metadata.published_count(), 2);
    Ok(())
}
