//! Identifier types for the deployment bounded context.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a deployment.
    DeploymentId
}

uuid_identifier! {
    /// Unique identifier for a package.
    PackageId
}
