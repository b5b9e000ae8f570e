//! Pure scope resolution over an inventory snapshot.

use super::{Domain, DomainId, Scope, UserProfile, Visibility};
use crate::inventory::domain::{Computer, ComputerId, ProjectId};
use std::collections::{BTreeMap, BTreeSet};

/// Computes the computers and projects visible to `user`.
///
/// View-all users see everything. Otherwise the base set is the union of
/// the computers admitted by the applicable domains (the domain preference
/// when set, else every assigned domain) and by the user's scopes bound to
/// those domains. Without applicable domains a privileged user starts from
/// the whole fleet and an unprivileged one from the union of their unbound
/// scopes. A scope preference intersects the base set with the scope's
/// filter and, when bound, its domain's filter.
#[must_use]
pub fn resolve_visibility(
    user: &UserProfile,
    domains: &[Domain],
    scopes: &[Scope],
    computers: &[Computer],
) -> (Visibility<ComputerId>, Visibility<ProjectId>) {
    if user.is_view_all() {
        return (Visibility::All, Visibility::All);
    }

    let by_id: BTreeMap<DomainId, &Domain> =
        domains.iter().map(|domain| (domain.id(), domain)).collect();
    let applicable: Vec<&Domain> = user.domain_preference().map_or_else(
        || {
            user.domains()
                .iter()
                .filter_map(|id| by_id.get(id).copied())
                .collect()
        },
        |preferred| by_id.get(&preferred).copied().into_iter().collect(),
    );
    let applicable_ids: BTreeSet<DomainId> = applicable.iter().map(|domain| domain.id()).collect();
    let owned: Vec<&Scope> = scopes.iter().filter(|scope| scope.owner() == user.id()).collect();

    let admitted_by_domains = |computer: &Computer| {
        applicable.iter().any(|domain| domain.admits(computer))
            || owned.iter().any(|scope| {
                scope.domain().is_some_and(|bound| applicable_ids.contains(&bound))
                    && scope_admits(scope, &by_id, computer)
            })
    };
    let admitted_by_unbound_scopes = |computer: &Computer| {
        owned
            .iter()
            .any(|scope| scope.domain().is_none() && scope.admits(computer))
    };

    let base: Vec<&Computer> = if !applicable.is_empty() {
        computers
            .iter()
            .filter(|&computer| admitted_by_domains(computer))
            .collect()
    } else if user.has_view_all_privilege() {
        computers.iter().collect()
    } else {
        computers
            .iter()
            .filter(|&computer| admitted_by_unbound_scopes(computer))
            .collect()
    };

    // A preferred scope that no longer exists hides everything.
    let preferred_scope = user
        .scope_preference()
        .map(|preferred| scopes.iter().find(|scope| scope.id() == preferred));
    let visible: Vec<&Computer> = base
        .into_iter()
        .filter(|&computer| {
            preferred_scope.is_none_or(|found| {
                found.is_some_and(|scope| scope_admits(scope, &by_id, computer))
            })
        })
        .collect();

    let computer_ids = visible.iter().map(|computer| computer.id()).collect();
    let project_ids = visible.iter().map(|computer| computer.project()).collect();
    (
        Visibility::Restricted(computer_ids),
        Visibility::Restricted(project_ids),
    )
}

fn scope_admits(scope: &Scope, domains: &BTreeMap<DomainId, &Domain>, computer: &Computer) -> bool {
    if !scope.admits(computer) {
        return false;
    }
    scope
        .domain()
        .is_none_or(|bound| domains.get(&bound).is_some_and(|domain| domain.admits(computer)))
}
