//! record services: validation, parent-existence checks and attachment
//! lifecycle, composed in front of the record store.
//!
//! every mutating operation validates its input and verifies referenced
//! parents before any write; a rejected request leaves no partial
//! state behind.

pub mod assets;
pub mod orders;
pub mod proceedings;
pub mod reports;
pub mod users;

use thiserror::Error;

use crate::attachments::AttachmentError;

/// errors from record service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// bad or missing input.
    #[error("{0}")]
    Validation(String),

    /// a referenced parent record does not exist.
    #[error("{0} not found")]
    ParentNotFound(&'static str),

    /// the addressed record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// username already in use.
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    /// attachment storage rejection or fault.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// underlying store fault.
    #[error(transparent)]
    Db(#[from] docket_db::Error),

    /// unclassified internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// reject blank required fields before any write.
fn require_non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ServiceError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("title", "Order A").is_ok());
        assert!(matches!(
            require_non_blank("title", ""),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            require_non_blank("title", "   "),
            Err(ServiceError::Validation(_))
        ));
    }
}
