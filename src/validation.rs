//! Structured validation failures raised before persistence.
//!
//! Every mutating operation validates its input in full and reports all
//! failures at once. A non-empty [`ValidationErrors`] list always blocks the
//! write; nothing is partially saved.

use crate::{
    deployment::domain::PackageId,
    inventory::domain::{AttributeId, ComputerId, ProjectId},
    scope::domain::{DomainId, ScopeId},
};
use thiserror::Error;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Saving the attribute set would make it depend on itself.
    #[error("attribute set '{name}' would depend on itself through: {}", .path.join(" -> "))]
    CircularAttributeSet {
        /// Name of the attribute set being saved.
        name: String,
        /// Set names along the detected cycle.
        path: Vec<String>,
    },

    /// The attribute identifies a computer that is no longer active.
    #[error("attribute {attribute} identifies inactive computer {computer}")]
    InactiveComputerAttribute {
        /// The offending attribute.
        attribute: AttributeId,
        /// The inactive computer it identifies.
        computer: ComputerId,
    },

    /// A referenced attribute does not exist.
    #[error("unknown attribute {0}")]
    UnknownAttribute(AttributeId),

    /// A referenced package does not exist.
    #[error("unknown package {0}")]
    UnknownPackage(PackageId),

    /// A package belongs to a different project than its deployment.
    #[error("package {package} does not belong to project {project}")]
    PackageProjectMismatch {
        /// The offending package.
        package: PackageId,
        /// The deployment project.
        project: ProjectId,
    },

    /// The user works under a domain preference, so a domain is mandatory.
    #[error("a domain is required while working under domain '{domain}'")]
    DomainRequired {
        /// Name of the user's preferred domain.
        domain: String,
    },

    /// A name is empty or contains forbidden characters.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The domain is not among the domains assigned to the user.
    #[error("domain {0} is not assigned to the user")]
    DomainNotAssigned(DomainId),

    /// A referenced domain does not exist.
    #[error("unknown domain {0}")]
    UnknownDomain(DomainId),

    /// The scope does not belong to the user.
    #[error("scope {0} does not belong to the user")]
    ScopeNotOwned(ScopeId),

    /// Computers in `available` status cannot carry tags.
    #[error("status available can not have tags")]
    TagsOnAvailableComputer,

    /// The attribute is not a server-assigned tag.
    #[error("attribute {0} is not a tag")]
    NotATag(AttributeId),

    /// A schedule tier lasts zero days.
    #[error("schedule delay {delay} must last at least one day")]
    EmptyDelayDuration {
        /// The tier's delay.
        delay: u32,
    },

    /// Two schedule tiers start at the same delay.
    #[error("schedule has more than one tier starting at delay {0}")]
    DuplicateDelay(u32),

    /// Two schedule tiers overlap for a common set of computers.
    #[error("schedule tiers starting at delays {first} and {second} overlap")]
    OverlappingDelays {
        /// Delay of the earlier tier.
        first: u32,
        /// Delay of the later tier.
        second: u32,
    },
}

/// Non-empty list of validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", format_errors(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Returns `Ok(())` when `errors` is empty, otherwise the wrapped list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when at least one failure was collected.
    pub fn check(errors: Vec<ValidationError>) -> Result<(), Self> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(Self(errors))
    }

    /// Wraps a single failure.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    /// Returns the individual failures.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns one human-readable message per failure.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Returns `true` when `error` is among the failures.
    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}
