//! Service orchestration tests for the attribute store.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::inventory::{
    adapters::memory::InMemoryInventoryRepository,
    domain::{
        Attribute, AttributeFilter, AttributeId, AttributeKind, Computer, ComputerId,
        ComputerStatus, ProjectId, PropertyPrefix,
    },
    ports::{InventoryRepository, InventoryRepositoryError},
    services::{AttributeStoreService, InventoryServiceError},
};
use crate::scope::domain::Visibility;
use crate::validation::ValidationError;
use rstest::{fixture, rstest};

type TestService = AttributeStoreService<InMemoryInventoryRepository>;

#[fixture]
fn service() -> TestService {
    AttributeStoreService::new(Arc::new(InMemoryInventoryRepository::new()))
}

async fn attribute(service: &TestService, property: &str, value: &str, kind: AttributeKind) -> Attribute {
    let prefix = PropertyPrefix::new(property).expect("valid prefix");
    let created = Attribute::new(prefix, value, kind).expect("valid attribute");
    service
        .create_attribute(created)
        .await
        .expect("attribute creation should succeed")
}

async fn computer(service: &TestService, name: &str, sync: &[AttributeId]) -> Computer {
    let created = Computer::new(name, ProjectId::new())
        .expect("valid computer")
        .with_sync_attributes(sync.iter().copied());
    service
        .register_computer(created)
        .await
        .expect("computer registration should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_returns_sync_attributes_and_tags(service: TestService) {
    let linux = attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let lab = attribute(&service, "ROOM", "lab", AttributeKind::Tag).await;
    let pc = computer(&service, "pc-01", &[linux.id()]).await;
    service
        .assign_tags(pc.id(), BTreeSet::from([lab.id()]))
        .await
        .expect("tagging should succeed");

    let resolved = service.resolve(pc.id()).await.expect("resolve should succeed");
    let ids: BTreeSet<AttributeId> = resolved.iter().map(Attribute::id).collect();

    assert_eq!(ids, BTreeSet::from([linux.id(), lab.id()]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_unknown_computer_is_not_found(service: TestService) {
    let missing = ComputerId::new();
    let result = service.resolve(missing).await;
    assert!(matches!(result, Err(InventoryServiceError::ComputerNotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn total_computers_respects_visibility(service: TestService) {
    let linux = attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let first = computer(&service, "pc-01", &[linux.id()]).await;
    computer(&service, "pc-02", &[linux.id()]).await;

    let everyone = service
        .total_computers(linux.id(), &Visibility::All)
        .await
        .expect("count should succeed");
    let restricted = service
        .total_computers(linux.id(), &Visibility::Restricted(BTreeSet::from([first.id()])))
        .await
        .expect("count should succeed");
    let nobody = service
        .total_computers(linux.id(), &Visibility::default())
        .await
        .expect("count should succeed");

    assert_eq!((everyone, restricted, nobody), (2, 1, 0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn total_computers_of_unknown_attribute_is_zero(service: TestService) {
    computer(&service, "pc-01", &[]).await;
    let total = service
        .total_computers(AttributeId::new(), &Visibility::All)
        .await
        .expect("count should succeed");
    assert_eq!(total, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn total_computers_by_attribute_reports_zero_rows(service: TestService) {
    let linux = attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let windows = attribute(&service, "PLT", "Windows", AttributeKind::Sync).await;
    computer(&service, "pc-01", &[linux.id()]).await;

    let property = PropertyPrefix::new("PLT").expect("valid prefix");
    let counts = service
        .total_computers_by_attribute(&property, &Visibility::All)
        .await
        .expect("count should succeed");

    assert_eq!(counts.get(&linux.id()), Some(&1));
    assert_eq!(counts.get(&windows.id()), Some(&0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inflicted_computers_report_tag_as_sync_attribute(service: TestService) {
    let printer = attribute(&service, "DEV", "printer", AttributeKind::Tag).await;
    let inflicted = computer(&service, "pc-01", &[printer.id()]).await;
    let tagged = computer(&service, "pc-02", &[printer.id()]).await;
    service
        .assign_tags(tagged.id(), BTreeSet::from([printer.id()]))
        .await
        .expect("tagging should succeed");

    let found = service
        .inflicted_computers(printer.id())
        .await
        .expect("lookup should succeed");

    let ids: Vec<ComputerId> = found.iter().map(Computer::id).collect();
    assert_eq!(ids, vec![inflicted.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_tags_rejects_sync_attributes(service: TestService) {
    let linux = attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let pc = computer(&service, "pc-01", &[]).await;

    let result = service.assign_tags(pc.id(), BTreeSet::from([linux.id()])).await;

    let Err(InventoryServiceError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert!(errors.contains(&ValidationError::NotATag(linux.id())));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_tags_rejects_available_computers(service: TestService) {
    let lab = attribute(&service, "ROOM", "lab", AttributeKind::Tag).await;
    let pc = computer(&service, "pc-01", &[]).await;
    service
        .change_status(pc.id(), ComputerStatus::Available)
        .await
        .expect("status change should succeed");

    let result = service.assign_tags(pc.id(), BTreeSet::from([lab.id()])).await;

    let Err(InventoryServiceError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert!(errors.contains(&ValidationError::TagsOnAvailableComputer));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_attribute_key_is_rejected(service: TestService) {
    attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let prefix = PropertyPrefix::new("PLT").expect("valid prefix");
    let duplicate = Attribute::new(prefix, "Linux", AttributeKind::Sync).expect("valid attribute");

    let result = service.create_attribute(duplicate).await;

    assert!(matches!(
        result,
        Err(InventoryServiceError::Repository(
            InventoryRepositoryError::DuplicateAttribute { .. }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identity_clash_leaves_no_computer_behind(service: TestService) {
    let first = computer(&service, "pc-01", &[]).await;
    let second = Computer::new("pc-02", ProjectId::new()).expect("valid computer");
    let clashing = Attribute::for_computer(first.id(), second.name());

    let result = service
        .repository()
        .store_computer(&second, &clashing)
        .await;

    assert!(matches!(
        result,
        Err(InventoryRepositoryError::DuplicateAttribute { .. })
    ));
    let stored = service
        .repository()
        .find_computer(second.id())
        .await
        .expect("lookup should succeed");
    assert!(stored.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reregistering_a_computer_keeps_a_single_identity(service: TestService) {
    let pc = computer(&service, "pc-01", &[]).await;

    let result = service.register_computer(pc.clone()).await;

    assert!(matches!(
        result,
        Err(InventoryServiceError::Repository(
            InventoryRepositoryError::DuplicateComputer(id)
        )) if id == pc.id()
    ));
    let identities = service
        .repository()
        .list_attributes()
        .await
        .expect("listing should succeed")
        .into_iter()
        .filter(|attribute| attribute.identifies() == Some(pc.id()))
        .count();
    assert_eq!(identities, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn taken_set_name_leaves_no_set_behind(service: TestService) {
    service
        .create_attribute_set("linux", &AttributeFilter::new())
        .await
        .expect("set creation should succeed");

    let result = service
        .create_attribute_set("linux", &AttributeFilter::new())
        .await;

    assert!(matches!(
        result,
        Err(InventoryServiceError::Repository(
            InventoryRepositoryError::DuplicateAttribute { .. }
        ))
    ));
    let sets = service
        .repository()
        .list_attribute_sets()
        .await
        .expect("listing should succeed");
    assert_eq!(sets.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inactive_computer_attribute_is_reported(service: TestService) {
    let pc = computer(&service, "pc-01", &[]).await;
    service
        .change_status(pc.id(), ComputerStatus::Unsubscribed)
        .await
        .expect("status change should succeed");
    let identity = service
        .repository()
        .list_attributes()
        .await
        .expect("listing should succeed")
        .into_iter()
        .find(|attribute| attribute.identifies() == Some(pc.id()))
        .expect("identity attribute exists");

    let errors = service
        .validate_references(&BTreeSet::from([identity.id()]))
        .await
        .expect("validation should run");

    assert_eq!(
        errors,
        vec![ValidationError::InactiveComputerAttribute {
            attribute: identity.id(),
            computer: pc.id(),
        }]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn circular_attribute_set_is_rejected(service: TestService) {
    let base = service
        .create_attribute_set("base", &AttributeFilter::new())
        .await
        .expect("set creation should succeed");
    let derived = service
        .create_attribute_set("derived", &AttributeFilter::new().including([base.attribute()]))
        .await
        .expect("set creation should succeed");

    let edited = base.with_filter(&AttributeFilter::new().including([derived.attribute()]));
    let result = service.save_attribute_set(edited).await;

    let Err(InventoryServiceError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert!(matches!(
        errors.errors().first(),
        Some(ValidationError::CircularAttributeSet { name, .. }) if name == "base"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_set_attributes_follows_dependencies(service: TestService) {
    let linux = attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let base = service
        .create_attribute_set("linux", &AttributeFilter::new().including([linux.id()]))
        .await
        .expect("set creation should succeed");
    let derived = service
        .create_attribute_set("linux-derived", &AttributeFilter::new().including([base.attribute()]))
        .await
        .expect("set creation should succeed");
    let member = computer(&service, "pc-01", &[linux.id()]).await;
    let outsider = computer(&service, "pc-02", &[]).await;

    let refreshed = service
        .refresh_set_attributes(member.id())
        .await
        .expect("refresh should succeed");
    let untouched = service
        .refresh_set_attributes(outsider.id())
        .await
        .expect("refresh should succeed");

    assert!(refreshed.has_attribute(base.attribute()));
    assert!(refreshed.has_attribute(derived.attribute()));
    assert!(!untouched.has_attribute(base.attribute()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_set_attributes_drops_stale_memberships(service: TestService) {
    let linux = attribute(&service, "PLT", "Linux", AttributeKind::Sync).await;
    let set = service
        .create_attribute_set("linux", &AttributeFilter::new().including([linux.id()]))
        .await
        .expect("set creation should succeed");
    let pc = computer(&service, "pc-01", &[linux.id()]).await;
    service
        .refresh_set_attributes(pc.id())
        .await
        .expect("refresh should succeed");

    let mut moved = service
        .repository()
        .find_computer(pc.id())
        .await
        .expect("lookup should succeed")
        .expect("computer exists");
    moved.reconcile_sync_attributes(&BTreeSet::new(), &BTreeSet::from([linux.id()]));
    service
        .repository()
        .update_computer(&moved)
        .await
        .expect("update should succeed");

    let refreshed = service
        .refresh_set_attributes(pc.id())
        .await
        .expect("refresh should succeed");

    assert!(!refreshed.has_attribute(set.attribute()));
}
