//! user management and authentication endpoints.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use docket_types::{Role, User, UserId};

use crate::service::users as users_service;
use crate::session::SessionUser;
use crate::AppState;

use super::auth::{SessionContext, ADMIN_ONLY, SESSION_COOKIE};
use super::ApiError;

/// user representation in api responses. never carries the hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            username: user.username,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// response wrapper for the list endpoint.
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}

/// request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// response for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
}

/// request body for updating a user.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// response for the logout endpoint.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {}

/// response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {}

/// create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(profile))
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

/// register a new user.
///
/// `POST /api/users/register` (administrator only)
async fn register(
    ctx: SessionContext,
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let user = users_service::create_user(
        &state.db,
        users_service::CreateUser {
            username: req.username,
            password: req.password,
            role: req.role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// log in with username and password, creating a session.
///
/// `POST /api/users/login` (public)
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // one rejection path for unknown username and wrong password
    let user = users_service::authenticate(&state.db, &req.username, &req.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid username or password"))?;

    let token = state
        .sessions
        .create(SessionUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        })
        .await;

    info!(user_id = user.id.0, username = %user.username, "login");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        state.sessions.ttl_secs()
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            user: UserResponse::from(user),
        }),
    )
        .into_response())
}

/// log out, destroying the session server-side.
///
/// `POST /api/users/logout`
async fn logout(ctx: SessionContext, State(state): State<AppState>) -> Response {
    state.sessions.destroy(&ctx.token).await;
    info!(user_id = ctx.user.id.0, "logout");

    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    ([(SET_COOKIE, cookie)], Json(LogoutResponse {})).into_response()
}

/// get the current session's user.
///
/// `GET /api/users/profile`
async fn profile(ctx: SessionContext) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": ctx.user.id.0,
        "username": ctx.user.username,
        "role": ctx.user.role,
    }))
}

/// list all users.
///
/// `GET /api/users` (administrator only)
async fn list_users(
    ctx: SessionContext,
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let users = users_service::list_users(&state.db).await?;
    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// get a user by id.
///
/// `GET /api/users/{id}` (administrator only)
async fn get_user(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let user = users_service::get_user(&state.db, UserId(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// update a user. only supplied fields change.
///
/// `PUT /api/users/{id}` (administrator only)
async fn update_user(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let user = users_service::update_user(
        &state.db,
        UserId(id),
        users_service::UpdateUser {
            username: req.username,
            password: req.password,
            role: req.role,
        },
    )
    .await?;

    Ok(Json(UserResponse::from(user)))
}

/// delete a user.
///
/// `DELETE /api/users/{id}` (administrator only)
async fn delete_user(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    users_service::delete_user(&state.db, UserId(id)).await?;
    Ok(Json(DeleteUserResponse {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_omits_hash() {
        let user = User {
            id: UserId(7),
            username: "sari".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string(),
            role: Role::Administrator,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("\"username\":\"sari\""));
        assert!(json.contains("\"role\":\"administrator\""));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_register_request_role_optional() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username": "a", "password": "b"}"#).unwrap();
        assert!(req.role.is_none());

        let req: RegisterRequest =
            serde_json::from_str(r#"{"username": "a", "password": "b", "role": "viewer"}"#)
                .unwrap();
        assert_eq!(req.role, Some(Role::Viewer));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let result: Result<RegisterRequest, _> =
            serde_json::from_str(r#"{"username": "a", "password": "b", "role": "root"}"#);
        assert!(result.is_err());
    }
}
