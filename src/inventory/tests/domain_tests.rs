//! Tests for attributes, computers, and attribute filters.

use crate::inventory::domain::{
    Attribute, AttributeFilter, AttributeId, AttributeKind, Computer, ComputerStatus,
    InventoryDomainError, ProjectId, PropertyPrefix,
};
use crate::validation::ValidationError;
use rstest::{fixture, rstest};
use std::collections::BTreeSet;

#[fixture]
fn project() -> ProjectId {
    ProjectId::new()
}

#[rstest]
#[case("", false)]
#[case("PLT", true)]
#[case("  CID ", true)]
#[case("TWO WORDS", false)]
fn property_prefix_rejects_blank_and_spaced_values(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(PropertyPrefix::new(raw).is_ok(), valid);
}

#[rstest]
fn attribute_value_is_trimmed() {
    let property = PropertyPrefix::new("PLT").expect("valid prefix");
    let attribute = Attribute::new(property, "  Linux ", AttributeKind::Sync).expect("valid attribute");
    assert_eq!(attribute.value(), "Linux");
    assert_eq!(attribute.to_string(), "PLT-Linux");
}

#[rstest]
fn blank_attribute_value_is_rejected() {
    let property = PropertyPrefix::new("PLT").expect("valid prefix");
    let result = Attribute::new(property, "   ", AttributeKind::Tag);
    assert_eq!(result, Err(InventoryDomainError::EmptyAttributeValue));
}

#[rstest]
#[case(ComputerStatus::Intended, true, true)]
#[case(ComputerStatus::Reserved, true, true)]
#[case(ComputerStatus::Unknown, true, true)]
#[case(ComputerStatus::Available, false, true)]
#[case(ComputerStatus::InRepair, false, true)]
#[case(ComputerStatus::Pending, false, false)]
#[case(ComputerStatus::Unsubscribed, false, false)]
fn status_classification(
    #[case] status: ComputerStatus,
    #[case] productive: bool,
    #[case] active: bool,
) {
    assert_eq!(status.is_productive(), productive);
    assert_eq!(status.is_active(), active);
}

#[rstest]
#[case("in-repair", ComputerStatus::InRepair)]
#[case("In Repair", ComputerStatus::InRepair)]
#[case("AVAILABLE", ComputerStatus::Available)]
fn status_parses_loose_spellings(#[case] raw: &str, #[case] expected: ComputerStatus) {
    assert_eq!(ComputerStatus::try_from(raw), Ok(expected));
}

#[rstest]
fn attributes_unite_sync_attributes_and_tags(project: ProjectId) {
    let sync = AttributeId::new();
    let tag = AttributeId::new();
    let computer = Computer::new("pc-01", project)
        .expect("valid computer")
        .with_sync_attributes([sync])
        .with_tags([tag]);

    assert_eq!(computer.attributes(), BTreeSet::from([sync, tag]));
    assert!(computer.has_attribute(tag));
}

#[rstest]
fn available_computer_cannot_receive_tags(project: ProjectId) {
    let mut computer = Computer::new("pc-01", project)
        .expect("valid computer")
        .with_status(ComputerStatus::Available);

    let result = computer.replace_tags(BTreeSet::from([AttributeId::new()]));

    assert_eq!(result, Err(ValidationError::TagsOnAvailableComputer));
    assert!(computer.tags().is_empty());
}

#[rstest]
fn tagged_computer_cannot_become_available(project: ProjectId) {
    let mut computer = Computer::new("pc-01", project)
        .expect("valid computer")
        .with_tags([AttributeId::new()]);

    assert_eq!(
        computer.change_status(ComputerStatus::Available),
        Err(ValidationError::TagsOnAvailableComputer)
    );
    assert_eq!(computer.status(), ComputerStatus::Intended);
}

#[rstest]
fn reconcile_reports_whether_anything_changed(project: ProjectId) {
    let kept = AttributeId::new();
    let mut computer = Computer::new("pc-01", project)
        .expect("valid computer")
        .with_sync_attributes([kept]);

    assert!(!computer.reconcile_sync_attributes(&BTreeSet::from([kept]), &BTreeSet::new()));
    assert!(computer.reconcile_sync_attributes(&BTreeSet::new(), &BTreeSet::from([kept])));
    assert!(computer.sync_attributes().is_empty());
}

#[rstest]
fn exclusion_wins_over_inclusion(project: ProjectId) {
    let a = AttributeId::new();
    let b = AttributeId::new();
    let computer = Computer::new("pc-01", project)
        .expect("valid computer")
        .with_sync_attributes([a, b]);
    let filter = AttributeFilter::new().including([a]).excluding([b]);

    assert!(!filter.admits(&computer));
}

#[rstest]
fn empty_filter_admits_every_computer(project: ProjectId) {
    let computer = Computer::new("pc-01", project).expect("valid computer");
    assert!(AttributeFilter::new().admits(&computer));
}

#[rstest]
fn project_restriction_is_honoured(project: ProjectId) {
    let computer = Computer::new("pc-01", project).expect("valid computer");
    let elsewhere = AttributeFilter::new().within_projects([ProjectId::new()]);
    let here = AttributeFilter::new().within_projects([project]);

    assert!(!elsewhere.admits(&computer));
    assert!(here.admits(&computer));
}

#[rstest]
#[case::empty_object("{}")]
#[case::partial_object(r#"{"excluded": []}"#)]
fn missing_filter_fields_default_to_wildcards(#[case] stored: &str) {
    let filter: AttributeFilter = serde_json::from_str(stored).expect("filter should deserialize");
    assert_eq!(filter, AttributeFilter::new());
}
