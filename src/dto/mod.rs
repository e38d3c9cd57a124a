//! Response shapes shared by every API route.

use actix_web::http::StatusCode;
use serde::Serialize;

use crate::forms::FieldErrors;
use crate::services::ServiceError;

pub mod organization;

/// Outcome tag carried by every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Success,
    Unauthorized,
    Forbidden,
    ValidationError,
    NotFound,
    Conflict,
    Error,
}

/// Tagged envelope returned by reads and mutations alike.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse<T> {
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<FieldErrors>,
}

impl<T> ActionResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ActionStatus::Success,
            message: None,
            data: Some(data),
            validation_errors: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ActionResponse<()> {
    /// Builds the failure envelope and its HTTP status.
    ///
    /// Internal and upstream details are logged, never returned to the caller.
    pub fn from_error(err: &ServiceError) -> (StatusCode, Self) {
        let (code, status, message, validation_errors) = match err {
            ServiceError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ActionStatus::Unauthorized,
                "Authentication required".to_string(),
                None,
            ),
            ServiceError::Forbidden => (
                StatusCode::FORBIDDEN,
                ActionStatus::Forbidden,
                "You do not have access to this resource".to_string(),
                None,
            ),
            ServiceError::NotFound => (
                StatusCode::NOT_FOUND,
                ActionStatus::NotFound,
                "Resource not found".to_string(),
                None,
            ),
            ServiceError::Conflict(message) => (
                StatusCode::CONFLICT,
                ActionStatus::Conflict,
                message.clone(),
                None,
            ),
            ServiceError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ActionStatus::ValidationError,
                "Invalid input".to_string(),
                Some(errors.clone()),
            ),
            ServiceError::TypeConstraint(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ActionStatus::ValidationError,
                message.clone(),
                None,
            ),
            ServiceError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ActionStatus::Error,
                "Too many requests, try again later".to_string(),
                None,
            ),
            ServiceError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                ActionStatus::Error,
                "Upstream service unavailable".to_string(),
                None,
            ),
            ServiceError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ActionStatus::Error,
                "Something went wrong".to_string(),
                None,
            ),
        };

        (
            code,
            Self {
                status,
                message: Some(message),
                data: None,
                validation_errors,
            },
        )
    }
}

/// Result of a deletion.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: usize,
}

/// Number of cached responses dropped by a refresh.
#[derive(Debug, Serialize)]
pub struct Refreshed {
    pub invalidated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_omits_empty_fields() {
        let body = serde_json::to_value(ActionResponse::success(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"status": "SUCCESS", "data": {"id": 1}}));
    }

    #[test]
    fn validation_errors_are_camel_cased() {
        let err = ServiceError::invalid("name", "required");
        let (code, envelope) = ActionResponse::from_error(&err);
        let body = serde_json::to_value(envelope).unwrap();

        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "VALIDATION_ERROR");
        assert_eq!(body["validationErrors"]["name"], json!(["required"]));
    }

    #[test]
    fn internal_details_are_hidden() {
        let (code, envelope) =
            ActionResponse::from_error(&ServiceError::Internal("disk I/O error".into()));
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.status, ActionStatus::Error);
        assert_eq!(envelope.message.as_deref(), Some("Something went wrong"));
    }

    #[test]
    fn statuses_map_to_http_codes() {
        let cases = [
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::conflict("taken"), StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            assert_eq!(ActionResponse::from_error(&err).0, expected);
        }
    }
}
