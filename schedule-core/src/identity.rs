//! Who the current session belongs to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier scoping a user's events and tags (a phone number in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId::new(id)
    }
}

/// Supplies the signed-in user. `None` means no scoping is possible.
pub trait IdentityProvider {
    fn current_user_id(&self) -> Option<UserId>;
}

/// A fixed identity, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Option<UserId>);

impl StaticIdentity {
    pub fn signed_in(id: impl Into<String>) -> Self {
        StaticIdentity(Some(UserId::new(id)))
    }

    pub fn anonymous() -> Self {
        StaticIdentity(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.0.clone()
    }
}
