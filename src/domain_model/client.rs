use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct ClientId(pub uuid::Uuid);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(ClientId)
    }
}

/// A registered OAuth application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub uid: String,
    /// Stored form of the secret; see `SecretHasher`.
    pub secret: String,
    pub name: String,
    pub confidential: bool,
}

/// Client credentials presented with a request. Public clients send none.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub uid: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(uid: impl Into<String>, secret: impl Into<String>) -> Self {
        Credentials {
            uid: uid.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("uid", &self.uid)
            .field("secret", &"<redacted>")
            .finish()
    }
}
