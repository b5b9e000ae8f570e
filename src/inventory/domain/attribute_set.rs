//! Attribute sets: named filters that computers join as a derived attribute.
//!
//! Each set is represented by its own `SET` attribute, so a set may refer to
//! other sets through their representative attributes. The relation must
//! stay acyclic: [`find_cycle`] walks it before an edit is committed, and
//! [`evaluation_order`] evaluates dependencies before dependents.

use super::{Attribute, AttributeFilter, AttributeId, AttributeSetId, InventoryDomainError};
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named attribute filter with a representative attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    id: AttributeSetId,
    name: String,
    description: Option<String>,
    enabled: bool,
    attribute: AttributeId,
    filter: AttributeFilter,
}

/// Parameter object for reconstructing a persisted attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttributeSetData {
    /// Persisted identifier.
    pub id: AttributeSetId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Whether the set is evaluated.
    pub enabled: bool,
    /// Representative `SET` attribute.
    pub attribute: AttributeId,
    /// Included and excluded attributes.
    pub filter: AttributeFilter,
}

impl AttributeSet {
    /// Creates an enabled set represented by `attribute`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::EmptyAttributeSetName`] when the name
    /// is blank.
    pub fn new(name: impl Into<String>, attribute: &Attribute) -> Result<Self, InventoryDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InventoryDomainError::EmptyAttributeSetName);
        }
        Ok(Self {
            id: AttributeSetId::new(),
            name: trimmed.to_owned(),
            description: None,
            enabled: true,
            attribute: attribute.id(),
            filter: AttributeFilter::new(),
        })
    }

    /// Reconstructs a set from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttributeSetData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            enabled: data.enabled,
            attribute: data.attribute,
            filter: data.filter,
        }
    }

    /// Sets the filter; any project restriction is ignored.
    #[must_use]
    pub fn with_filter(mut self, filter: &AttributeFilter) -> Self {
        self.filter = AttributeFilter::new()
            .including(filter.included().iter().copied())
            .excluding(filter.excluded().iter().copied());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enables or disables evaluation.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the set identifier.
    #[must_use]
    pub const fn id(&self) -> AttributeSetId {
        self.id
    }

    /// Returns the set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` when the set is evaluated at check-in.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the representative attribute.
    #[must_use]
    pub const fn attribute(&self) -> AttributeId {
        self.attribute
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> &AttributeFilter {
        &self.filter
    }

    /// Returns `true` when an enabled set admits `attributes`.
    #[must_use]
    pub fn admits(&self, attributes: &BTreeSet<AttributeId>) -> bool {
        self.enabled && self.filter.admits_attributes(attributes)
    }
}

/// Returns `dependent -> dependencies` edges between sets.
fn dependency_edges(
    sets: &BTreeMap<AttributeSetId, &AttributeSet>,
) -> BTreeMap<AttributeSetId, BTreeSet<AttributeSetId>> {
    let by_attribute: BTreeMap<AttributeId, AttributeSetId> = sets
        .values()
        .map(|set| (set.attribute(), set.id()))
        .collect();
    sets.values()
        .map(|set| {
            let dependencies = set
                .filter()
                .referenced_attributes()
                .iter()
                .filter_map(|attribute| by_attribute.get(attribute).copied())
                .collect();
            (set.id(), dependencies)
        })
        .collect()
}

/// Returns the names along a cycle through `candidate`, if saving it over
/// `existing` would create one.
///
/// An entry of `existing` with the candidate's identifier is replaced by the
/// candidate.
#[must_use]
pub fn find_cycle(candidate: &AttributeSet, existing: &[AttributeSet]) -> Option<Vec<String>> {
    let mut sets: BTreeMap<AttributeSetId, &AttributeSet> =
        existing.iter().map(|set| (set.id(), set)).collect();
    sets.insert(candidate.id(), candidate);
    let edges = dependency_edges(&sets);

    let mut visited = BTreeSet::new();
    let mut path = vec![candidate.id()];
    if !reaches(candidate.id(), candidate.id(), &edges, &mut visited, &mut path) {
        return None;
    }
    Some(
        path.iter()
            .filter_map(|id| sets.get(id).map(|set| set.name().to_owned()))
            .collect(),
    )
}

fn reaches(
    from: AttributeSetId,
    target: AttributeSetId,
    edges: &BTreeMap<AttributeSetId, BTreeSet<AttributeSetId>>,
    visited: &mut BTreeSet<AttributeSetId>,
    path: &mut Vec<AttributeSetId>,
) -> bool {
    let Some(neighbours) = edges.get(&from) else {
        return false;
    };
    for &next in neighbours {
        if next == target {
            path.push(next);
            return true;
        }
        if !visited.insert(next) {
            continue;
        }
        path.push(next);
        if reaches(next, target, edges, visited, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Orders sets so every set comes after the sets it refers to.
///
/// # Errors
///
/// Returns [`ValidationError::CircularAttributeSet`] naming the sets left
/// unordered when the relation contains a cycle.
pub fn evaluation_order(sets: &[AttributeSet]) -> Result<Vec<&AttributeSet>, ValidationError> {
    let by_id: BTreeMap<AttributeSetId, &AttributeSet> =
        sets.iter().map(|set| (set.id(), set)).collect();
    let mut pending = dependency_edges(&by_id);
    let mut ordered = Vec::with_capacity(by_id.len());

    while !pending.is_empty() {
        let ready: Vec<AttributeSetId> = pending
            .iter()
            .filter(|(_, dependencies)| dependencies.iter().all(|id| !pending.contains_key(id)))
            .map(|(id, _)| *id)
            .collect();
        if ready.is_empty() {
            let names: Vec<String> = pending
                .keys()
                .filter_map(|id| by_id.get(id).map(|set| set.name().to_owned()))
                .collect();
            return Err(ValidationError::CircularAttributeSet {
                name: names.first().cloned().unwrap_or_default(),
                path: names,
            });
        }
        for id in ready {
            pending.remove(&id);
            if let Some(set) = by_id.get(&id) {
                ordered.push(*set);
            }
        }
    }
    Ok(ordered)
}
