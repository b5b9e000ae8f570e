//! Domain model for computers, attributes, and attribute sets.

mod attribute;
mod attribute_set;
mod computer;
mod error;
mod filter;
mod ids;

pub use attribute::{Attribute, AttributeKind, PersistedAttributeData, PropertyPrefix};
pub use attribute_set::{AttributeSet, PersistedAttributeSetData, evaluation_order, find_cycle};
pub use computer::{Computer, ComputerStatus, PersistedComputerData};
pub use error::{InventoryDomainError, ParseAttributeKindError, ParseComputerStatusError};
pub use filter::AttributeFilter;
pub use ids::{AttributeId, AttributeSetId, ComputerId, ProjectId};
