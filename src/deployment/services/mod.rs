//! Application services for deployments.

mod outcome;
mod request;
mod save;

pub use outcome::{DeploymentSaveOutcome, MetadataStatus};
pub use request::SaveDeploymentRequest;
pub use save::{DeploymentService, DeploymentServiceError, DeploymentServiceResult};
