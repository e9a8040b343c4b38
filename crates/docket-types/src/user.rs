//! user accounts and the two-role access model.
//!
//! docket has exactly two roles: administrators may mutate records,
//! viewers may only read them. Roles are a closed enum persisted as a
//! string column, never a bare integer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// error returned when parsing an unknown role string.
#[derive(Debug, Error)]
#[error("unknown role: {0} (expected \"administrator\" or \"viewer\")")]
pub struct RoleError(pub String);

/// the two fixed access roles.
///
/// administrators may create, update and delete records and manage users.
/// viewers may only read records and view attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// full read/write access, including user management.
    Administrator,
    /// read-only access.
    Viewer,
}

impl Role {
    /// string form as persisted in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Role::Administrator),
            "viewer" => Ok(Role::Viewer),
            other => Err(RoleError(other.to_string())),
        }
    }
}

/// a docket user account.
///
/// the password is stored as an argon2id PHC string and is never
/// serialized into api responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// unique identifier.
    pub id: UserId,

    /// login name, unique across all users.
    pub username: String,

    /// argon2id hash of the password.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// access role.
    pub role: Role,

    /// when the user was created.
    pub created_at: DateTime<Utc>,

    /// when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// create a new user with the given username, password hash and role.
    pub fn new(id: UserId, username: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// partial update for a user: only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    /// new username.
    pub username: Option<String>,
    /// new password hash. set by the service layer after hashing,
    /// never taken from transport input.
    #[serde(skip)]
    pub password_hash: Option<String>,
    /// new role.
    pub role: Option<Role>,
}

impl UserPatch {
    /// true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password_hash.is_none() && self.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Administrator, Role::Viewer] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!("superadmin".parse::<Role>().is_err());
        assert!("1".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            UserId(1),
            "alina".to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string(),
            Role::Viewer,
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"alina\""));
        assert!(json.contains("\"role\":\"viewer\""));
    }

    #[test]
    fn test_user_patch_empty() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            role: Some(Role::Administrator),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
