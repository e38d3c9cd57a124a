use thiserror::Error;

use crate::forms::{FieldErrors, FormError};
use crate::repository::errors::RepositoryError;

/// Outcome taxonomy shared by every service and mapped onto the response
/// envelope by the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("invalid value: {0}")]
    TypeConstraint(String),

    #[error("rate limited by upstream service")]
    RateLimited,

    #[error("upstream service unavailable: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    /// Validation failure reported against a single field.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ServiceError::Validation(errors)
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Validation(err.field_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_onto_taxonomy() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConstraintViolation("unique".into())),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("down".into())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn invalid_builds_single_field_map() {
        match ServiceError::invalid("q", "too short") {
            ServiceError::Validation(errors) => {
                assert_eq!(errors.get("q"), Some(&vec!["too short".to_string()]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
