//! In-memory inventory repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::inventory::{
    domain::{
        Attribute, AttributeId, AttributeSet, AttributeSetId, Computer, ComputerId, ProjectId,
        PropertyPrefix,
    },
    ports::{InventoryRepository, InventoryRepositoryError, InventoryRepositoryResult},
};

/// Thread-safe in-memory inventory repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryRepository {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    attributes: HashMap<AttributeId, Attribute>,
    attribute_keys: HashMap<(PropertyPrefix, String), AttributeId>,
    computers: HashMap<ComputerId, Computer>,
    attribute_sets: HashMap<AttributeSetId, AttributeSet>,
}

impl InMemoryInventoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> InventoryRepositoryError {
    InventoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryInventoryState {
    fn insert_attribute(&mut self, attribute: &Attribute) -> InventoryRepositoryResult<()> {
        let key = (attribute.property().clone(), attribute.value().to_owned());
        if self.attribute_keys.contains_key(&key) {
            return Err(InventoryRepositoryError::DuplicateAttribute {
                property: attribute.property().to_string(),
                value: attribute.value().to_owned(),
            });
        }
        self.attribute_keys.insert(key, attribute.id());
        self.attributes.insert(attribute.id(), attribute.clone());
        Ok(())
    }
}

fn restricted<'a>(
    computers: &'a HashMap<ComputerId, Computer>,
    within: Option<&'a BTreeSet<ComputerId>>,
) -> impl Iterator<Item = &'a Computer> + 'a {
    computers
        .values()
        .filter(move |computer| within.is_none_or(|ids| ids.contains(&computer.id())))
}

fn sorted_by_name(mut computers: Vec<Computer>) -> Vec<Computer> {
    computers.sort_by(|left, right| left.name().cmp(right.name()));
    computers
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn store_attribute(&self, attribute: &Attribute) -> InventoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert_attribute(attribute)
    }

    async fn find_attributes(
        &self,
        ids: &BTreeSet<AttributeId>,
    ) -> InventoryRepositoryResult<Vec<Attribute>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.attributes.get(id).cloned())
            .collect())
    }

    async fn list_attributes(&self) -> InventoryRepositoryResult<Vec<Attribute>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut attributes: Vec<Attribute> = state.attributes.values().cloned().collect();
        attributes.sort_by(|left, right| {
            left.property()
                .cmp(right.property())
                .then_with(|| left.value().cmp(right.value()))
        });
        Ok(attributes)
    }

    async fn store_computer(
        &self,
        computer: &Computer,
        identity: &Attribute,
    ) -> InventoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.computers.contains_key(&computer.id()) {
            return Err(InventoryRepositoryError::DuplicateComputer(computer.id()));
        }
        state.insert_attribute(identity)?;
        state.computers.insert(computer.id(), computer.clone());
        Ok(())
    }

    async fn update_computer(&self, computer: &Computer) -> InventoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .computers
            .get_mut(&computer.id())
            .ok_or(InventoryRepositoryError::ComputerNotFound(computer.id()))?;
        *slot = computer.clone();
        Ok(())
    }

    async fn find_computer(&self, id: ComputerId) -> InventoryRepositoryResult<Option<Computer>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.computers.get(&id).cloned())
    }

    async fn list_computers(
        &self,
        project: Option<ProjectId>,
    ) -> InventoryRepositoryResult<Vec<Computer>> {
        let state = self.state.read().map_err(lock_error)?;
        let computers = state
            .computers
            .values()
            .filter(|computer| project.is_none_or(|wanted| computer.project() == wanted))
            .cloned()
            .collect();
        Ok(sorted_by_name(computers))
    }

    async fn count_computers_with_attribute(
        &self,
        attribute: AttributeId,
        within: Option<&BTreeSet<ComputerId>>,
    ) -> InventoryRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = restricted(&state.computers, within)
            .filter(|computer| computer.sync_attributes().contains(&attribute))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn count_computers_by_attribute(
        &self,
        property: &PropertyPrefix,
        within: Option<&BTreeSet<ComputerId>>,
    ) -> InventoryRepositoryResult<BTreeMap<AttributeId, u64>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut counts: BTreeMap<AttributeId, u64> = state
            .attributes
            .values()
            .filter(|attribute| attribute.property() == property)
            .map(|attribute| (attribute.id(), 0))
            .collect();
        for computer in restricted(&state.computers, within) {
            for attribute in computer.sync_attributes() {
                if let Some(count) = counts.get_mut(attribute) {
                    *count += 1;
                }
            }
        }
        Ok(counts)
    }

    async fn store_attribute_set(
        &self,
        set: &AttributeSet,
        representative: &Attribute,
    ) -> InventoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert_attribute(representative)?;
        state.attribute_sets.insert(set.id(), set.clone());
        Ok(())
    }

    async fn save_attribute_set(&self, set: &AttributeSet) -> InventoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.attribute_sets.insert(set.id(), set.clone());
        Ok(())
    }

    async fn list_attribute_sets(&self) -> InventoryRepositoryResult<Vec<AttributeSet>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut sets: Vec<AttributeSet> = state.attribute_sets.values().cloned().collect();
        sets.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(sets)
    }
}
