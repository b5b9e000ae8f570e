//! Request metadata supplied by the web boundary.

use crate::scope::domain::{UserId, UserProfile};
use serde::{Deserialize, Serialize};

/// Identity of the administrator performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    user: UserId,
    username: String,
}

impl RequestContext {
    /// Creates a request context.
    #[must_use]
    pub fn new(user: UserId, username: impl Into<String>) -> Self {
        Self {
            user,
            username: username.into(),
        }
    }

    /// Creates a request context for `profile`.
    #[must_use]
    pub fn for_user(profile: &UserProfile) -> Self {
        Self::new(profile.id(), profile.username())
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the requesting username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}
