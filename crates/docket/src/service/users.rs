//! user management and authentication.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use tracing::{info, warn};

use docket_db::{Database, DocketDb};
use docket_types::{Role, User, UserId, UserPatch};

use super::{require_non_blank, Result, ServiceError};

/// input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// login name, unique.
    pub username: String,
    /// cleartext password; hashed before storage, never stored as-is.
    pub password: String,
    /// role; defaults to viewer when absent.
    pub role: Option<Role>,
}

/// input for updating a user. only present fields change.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// new username.
    pub username: Option<String>,
    /// new cleartext password, hashed before storage.
    pub password: Option<String>,
    /// new role.
    pub role: Option<Role>,
}

/// hash a password with argon2id using a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// verify a password against a stored argon2id hash.
fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash failed to parse");
            false
        }
    }
}

/// create a new user. the username must not be in use.
pub async fn create_user(db: &DocketDb, req: CreateUser) -> Result<User> {
    require_non_blank("username", &req.username)?;
    require_non_blank("password", &req.password)?;

    let password_hash = hash_password(&req.password)?;
    let role = req.role.unwrap_or(Role::Viewer);
    let user = User::new(UserId(0), req.username.clone(), password_hash, role);

    let created = match db.create_user(&user).await {
        Ok(created) => created,
        Err(docket_db::Error::AlreadyExists(_)) => {
            return Err(ServiceError::UsernameTaken(req.username));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = created.id.0, username = %created.username, role = %created.role, "user created");
    Ok(created)
}

/// get a user by id.
pub async fn get_user(db: &DocketDb, id: UserId) -> Result<User> {
    db.get_user(id)
        .await?
        .ok_or(ServiceError::NotFound("user"))
}

/// list all users.
pub async fn list_users(db: &DocketDb) -> Result<Vec<User>> {
    Ok(db.list_users().await?)
}

/// apply a partial update to a user, hashing a new password if given.
pub async fn update_user(db: &DocketDb, id: UserId, req: UpdateUser) -> Result<User> {
    // fetch first: updates on unknown ids are NotFound, not silent no-ops
    let current = db
        .get_user(id)
        .await?
        .ok_or(ServiceError::NotFound("user"))?;

    if let Some(ref username) = req.username {
        require_non_blank("username", username)?;
        if username != &current.username {
            if let Some(existing) = db.get_user_by_username(username).await? {
                if existing.id != id {
                    return Err(ServiceError::UsernameTaken(username.clone()));
                }
            }
        }
    }
    if let Some(ref password) = req.password {
        require_non_blank("password", password)?;
    }

    let patch = UserPatch {
        username: req.username,
        password_hash: match req.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        },
        role: req.role,
    };
    db.update_user(id, &patch).await?;

    db.get_user(id)
        .await?
        .ok_or(ServiceError::NotFound("user"))
}

/// delete a user permanently.
pub async fn delete_user(db: &DocketDb, id: UserId) -> Result<()> {
    if db.get_user(id).await?.is_none() {
        return Err(ServiceError::NotFound("user"));
    }
    db.delete_user(id).await?;
    info!(user_id = id.0, "user deleted");
    Ok(())
}

/// authenticate a username/password pair.
///
/// returns `None` for both an unknown username and a wrong password:
/// callers must not be able to enumerate usernames from the response.
pub async fn authenticate(db: &DocketDb, username: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = db.get_user_by_username(username).await? else {
        return Ok(None);
    };
    if verify_password(&user.password_hash, password) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn test_verify_tolerates_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let db = DocketDb::new_in_memory().await.unwrap();

        let created = create_user(
            &db,
            CreateUser {
                username: "admin".to_string(),
                password: "s3cret".to_string(),
                role: Some(Role::Administrator),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.role, Role::Administrator);

        // correct credentials
        let user = authenticate(&db, "admin", "s3cret").await.unwrap();
        assert!(user.is_some());

        // wrong password and unknown username are indistinguishable
        assert!(authenticate(&db, "admin", "wrong").await.unwrap().is_none());
        assert!(authenticate(&db, "ghost", "s3cret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let db = DocketDb::new_in_memory().await.unwrap();

        let req = CreateUser {
            username: "sari".to_string(),
            password: "pw".to_string(),
            role: None,
        };
        create_user(&db, req.clone()).await.unwrap();

        let result = create_user(&db, req).await;
        assert!(matches!(result, Err(ServiceError::UsernameTaken(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let db = DocketDb::new_in_memory().await.unwrap();

        let result = create_user(
            &db,
            CreateUser {
                username: "".to_string(),
                password: "pw".to_string(),
                role: None,
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let db = DocketDb::new_in_memory().await.unwrap();

        let created = create_user(
            &db,
            CreateUser {
                username: "budi".to_string(),
                password: "old".to_string(),
                role: None,
            },
        )
        .await
        .unwrap();

        update_user(
            &db,
            created.id,
            UpdateUser {
                password: Some("new".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(authenticate(&db, "budi", "old").await.unwrap().is_none());
        assert!(authenticate(&db, "budi", "new").await.unwrap().is_some());
    }
}
