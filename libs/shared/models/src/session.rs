use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted session object written at login time and read once by the
/// application bootstrap. Mirrors what the backend returns alongside the
/// auth token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Therapist,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Therapist => write!(f, "therapist"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Login contract: POST credentials, receive `{token, user}`. The login
/// flow itself lives outside this engine; this is the trust boundary it
/// hands us.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}
