//! Tests for pure visibility resolution.

use crate::inventory::domain::{AttributeFilter, AttributeId, Computer, ComputerId, ProjectId};
use crate::scope::domain::{Domain, Scope, UserProfile, Visibility, resolve_visibility};
use rstest::{fixture, rstest};
use std::collections::BTreeSet;

struct Fleet {
    project: ProjectId,
    lab: AttributeId,
    office: AttributeId,
    lab_pc: Computer,
    office_pc: Computer,
    spare_pc: Computer,
}

impl Fleet {
    fn computers(&self) -> Vec<Computer> {
        vec![self.lab_pc.clone(), self.office_pc.clone(), self.spare_pc.clone()]
    }
}

#[fixture]
fn fleet() -> Fleet {
    let project = ProjectId::new();
    let lab = AttributeId::new();
    let office = AttributeId::new();
    let lab_pc = Computer::new("lab-01", project)
        .expect("valid computer")
        .with_sync_attributes([lab]);
    let office_pc = Computer::new("office-01", project)
        .expect("valid computer")
        .with_sync_attributes([office]);
    let spare_pc = Computer::new("spare-01", project).expect("valid computer");
    Fleet {
        project,
        lab,
        office,
        lab_pc,
        office_pc,
        spare_pc,
    }
}

fn restricted(ids: &[ComputerId]) -> Visibility<ComputerId> {
    Visibility::Restricted(ids.iter().copied().collect())
}

#[rstest]
fn privileged_user_without_preferences_sees_everything(fleet: Fleet) {
    let admin = UserProfile::new("admin").expect("valid user").with_view_all(true);

    let (computers, projects) = resolve_visibility(&admin, &[], &[], &fleet.computers());

    assert_eq!(computers, Visibility::All);
    assert_eq!(projects, Visibility::All);
}

#[rstest]
fn domain_user_sees_admitted_computers(fleet: Fleet) {
    let labs = Domain::new("LABS")
        .expect("valid domain")
        .with_filter(AttributeFilter::new().including([fleet.lab]));
    let user = UserProfile::new("technician")
        .expect("valid user")
        .with_domains([labs.id()]);

    let (computers, projects) = resolve_visibility(&user, &[labs], &[], &fleet.computers());

    assert_eq!(computers, restricted(&[fleet.lab_pc.id()]));
    assert_eq!(projects, Visibility::Restricted(BTreeSet::from([fleet.project])));
}

#[rstest]
fn domain_preference_narrows_to_one_domain(fleet: Fleet) {
    let labs = Domain::new("LABS")
        .expect("valid domain")
        .with_filter(AttributeFilter::new().including([fleet.lab]));
    let offices = Domain::new("OFFICES")
        .expect("valid domain")
        .with_filter(AttributeFilter::new().including([fleet.office]));
    let mut user = UserProfile::new("technician")
        .expect("valid user")
        .with_domains([labs.id(), offices.id()]);
    let domains = vec![labs.clone(), offices];

    let (both, _) = resolve_visibility(&user, &domains, &[], &fleet.computers());
    user.set_preferences(Some(labs.id()), None);
    let (preferred, _) = resolve_visibility(&user, &domains, &[], &fleet.computers());

    assert_eq!(both, restricted(&[fleet.lab_pc.id(), fleet.office_pc.id()]));
    assert_eq!(preferred, restricted(&[fleet.lab_pc.id()]));
}

#[rstest]
fn scope_preference_intersects_visible_set(fleet: Fleet) {
    let admin = UserProfile::new("admin").expect("valid user").with_view_all(true);
    let scope = Scope::new("office only", admin.id())
        .expect("valid scope")
        .with_filter(AttributeFilter::new().including([fleet.office]));
    let mut user = admin;
    user.set_preferences(None, Some(scope.id()));

    let (computers, _) = resolve_visibility(&user, &[], &[scope], &fleet.computers());

    assert_eq!(computers, restricted(&[fleet.office_pc.id()]));
}

#[rstest]
fn missing_preferred_scope_hides_everything(fleet: Fleet) {
    let mut user = UserProfile::new("admin").expect("valid user").with_view_all(true);
    let orphan = Scope::new("gone", user.id()).expect("valid scope");
    user.set_preferences(None, Some(orphan.id()));

    let (computers, _) = resolve_visibility(&user, &[], &[], &fleet.computers());

    assert_eq!(computers, Visibility::default());
}

#[rstest]
fn unprivileged_user_without_domains_sees_unbound_scopes(fleet: Fleet) {
    let user = UserProfile::new("helpdesk").expect("valid user");
    let scope = Scope::new("spares", user.id())
        .expect("valid scope")
        .with_filter(AttributeFilter::new().excluding([fleet.lab, fleet.office]));

    let (computers, _) = resolve_visibility(&user, &[], &[scope], &fleet.computers());

    assert_eq!(computers, restricted(&[fleet.spare_pc.id()]));
}

#[rstest]
fn privileged_visibility_covers_unprivileged(fleet: Fleet) {
    let labs = Domain::new("LABS")
        .expect("valid domain")
        .with_filter(AttributeFilter::new().including([fleet.lab]));
    let admin = UserProfile::new("admin").expect("valid user").with_view_all(true);
    let user = UserProfile::new("technician")
        .expect("valid user")
        .with_domains([labs.id()]);
    let domains = vec![labs];

    let (privileged, _) = resolve_visibility(&admin, &domains, &[], &fleet.computers());
    let (unprivileged, _) = resolve_visibility(&user, &domains, &[], &fleet.computers());

    assert!(privileged.covers(&unprivileged));
    assert!(!unprivileged.covers(&privileged));
}

#[rstest]
#[case("LABS", true)]
#[case("Labs North", false)]
#[case("", false)]
fn domain_names_must_be_single_words(#[case] name: &str, #[case] valid: bool) {
    assert_eq!(Domain::new(name).is_ok(), valid);
}
