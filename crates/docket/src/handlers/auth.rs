//! session authentication for gated endpoints
//!
//! every gated handler takes a [`SessionContext`] extractor, which
//! reads the session cookie and resolves it against the server-side
//! session store. Role checks are explicit per route via
//! [`SessionContext::require_role`].

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, StatusCode},
};
use docket_types::Role;

use crate::session::SessionUser;
use crate::AppState;

use super::ApiError;

/// name of the session cookie.
pub const SESSION_COOKIE: &str = "docket_session";

/// roles allowed on mutating operations.
pub const ADMIN_ONLY: &[Role] = &[Role::Administrator];

/// context for authenticated requests
///
/// extracted from the session cookie; holding one proves the request
/// carries a live authenticated session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// the session token, used for logout.
    pub token: String,
    /// the authenticated user.
    pub user: SessionUser,
}

impl SessionContext {
    /// require the session's role to be in the allowed set.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.user.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "you do not have permission to access this resource",
            ))
        }
    }
}

/// error type for session authentication failures
#[derive(Debug)]
pub enum AuthError {
    /// no session cookie on the request
    MissingSession,
    /// cookie present but unknown or expired server-side
    InvalidSession,
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSession | Self::InvalidSession => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> &str {
        // one message for both cases: a stale cookie is simply
        // unauthenticated
        "unauthorized: please log in"
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = self.message().to_string();
        (status, message).into_response()
    }
}

/// extract a named cookie value from a Cookie header
fn cookie_value<'a>(header_value: &'a str, name: &str) -> Option<&'a str> {
    header_value.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name { Some(value) } else { None }
    })
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // a request may carry multiple Cookie headers
        let token = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| cookie_value(value, SESSION_COOKIE))
            .ok_or(AuthError::MissingSession)?
            .to_string();

        let user = state
            .sessions
            .get(&token)
            .await
            .ok_or(AuthError::InvalidSession)?;

        Ok(SessionContext { token, user })
    }
}
