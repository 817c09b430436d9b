use serde::{Deserialize, Serialize};
use shared_models::auth::{Identity, Role};

/// Durable storage key for the bearer token.
pub const TOKEN_KEY: &str = "authToken";
/// Durable storage key for the serialized identity.
pub const IDENTITY_KEY: &str = "authUser";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub identity: Identity,
    pub token: String,
}

/// The client's authenticated state.
///
/// Identity and token live in a single optional pair so that one can never be
/// present without the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity, token: String) -> Self {
        Self {
            credentials: Some(Credentials { identity, token }),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.credentials.as_ref().map(|c| &c.identity)
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}
