//! api error handling for http handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::attachments::AttachmentError;
use crate::service::ServiceError;

/// api error type for handler responses
#[derive(Debug)]
pub enum ApiError {
    /// bad or missing input (400)
    BadRequest(String),
    /// no authenticated session (401)
    Unauthorized(String),
    /// authenticated but not allowed (403)
    Forbidden(String),
    /// record or file not found (404)
    NotFound(String),
    /// duplicate username (409)
    Conflict(String),
    /// attachment over the size bound (413)
    PayloadTooLarge(String),
    /// attachment is not a pdf (415)
    UnsupportedMediaType(String),
    /// internal server error (500); detail goes to the log, the
    /// response carries a generic message only
    Internal(String),
}

impl ApiError {
    /// create bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// create unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// create forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// create not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// create conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// create internal server error from any error type
    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self::Internal(e.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            // never leak internal detail to the client
            ApiError::Internal(detail) => {
                error!(%detail, "internal error");
                "internal server error".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::UnsupportedMediaType(msg) => msg,
        };
        (status, message).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::ParentNotFound(entity) => {
                ApiError::NotFound(format!("{} not found", entity))
            }
            ServiceError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            ServiceError::UsernameTaken(username) => {
                ApiError::Conflict(format!("username '{}' is already taken", username))
            }
            ServiceError::Attachment(err) => err.into(),
            ServiceError::Db(err) => ApiError::Internal(err.to_string()),
            ServiceError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<AttachmentError> for ApiError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::InvalidContentType(_) => {
                ApiError::UnsupportedMediaType(err.to_string())
            }
            AttachmentError::TooLarge(_) => ApiError::PayloadTooLarge(err.to_string()),
            AttachmentError::InvalidName(_) => ApiError::BadRequest(err.to_string()),
            AttachmentError::OutsideRoot(_) => ApiError::Forbidden("access denied".to_string()),
            AttachmentError::NotFound(_) => ApiError::NotFound("file not found".to_string()),
            AttachmentError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let err: ApiError = ServiceError::ParentNotFound("report").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = ServiceError::UsernameTaken("sari".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = ServiceError::Validation("title is required".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_attachment_error_mapping() {
        let err: ApiError = AttachmentError::InvalidContentType("text/plain".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err: ApiError = AttachmentError::TooLarge(11_000_000).into();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let err: ApiError = AttachmentError::OutsideRoot("../x".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
