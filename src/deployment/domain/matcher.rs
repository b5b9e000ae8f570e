//! Deployment-to-computer matching.

use super::Deployment;
use crate::inventory::domain::Computer;
use crate::scope::domain::Domain;

/// Returns `true` when `deployment` targets `computer`.
///
/// The computer must run the deployment's project, carry every included
/// attribute, and carry none of the excluded ones; exclusion wins over
/// inclusion and an empty inclusion list admits every computer. A
/// deployment bound to a domain additionally requires `domain` to admit the
/// computer; when the bound domain is not supplied, nothing matches.
#[must_use]
pub fn matches(deployment: &Deployment, computer: &Computer, domain: Option<&Domain>) -> bool {
    if computer.project() != deployment.project() {
        return false;
    }
    if !deployment.filter().admits_attributes(&computer.attributes()) {
        return false;
    }
    deployment.domain().is_none_or(|bound| {
        domain.is_some_and(|found| found.id() == bound && found.admits(computer))
    })
}
