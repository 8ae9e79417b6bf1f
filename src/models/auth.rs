use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

/// User identifier issued by the auth endpoints
///
/// The backend may issue numeric or string ids; the client only ever stores
/// and displays them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(id) => UserId(id.to_string()),
            Raw::Text(id) => UserId(id),
        })
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request body for POST /auth/signup and POST /auth/login
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful signup/login response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthGrant {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    /// Only reported by login
    #[serde(default)]
    pub has_embedding: Option<bool>,
}

/// Authenticated session for the lifetime of a page
///
/// Passed explicitly to every authenticated call. The serialized form is the
/// persisted key set: `token`, `user_id`, `username`, `has_embedding`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_embedding: Option<bool>,
}

impl From<AuthGrant> for Session {
    fn from(grant: AuthGrant) -> Self {
        Self {
            token: grant.token,
            user_id: grant.user_id,
            username: grant.username,
            has_embedding: grant.has_embedding,
        }
    }
}

impl Session {
    /// Value of the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
