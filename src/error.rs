// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::IntoResponse,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::filter::FilterError;
use crate::store::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages.
/// Every variant renders as `{ success: false, message, error }`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError {
        message: String,
        error: String,
    },

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError { message, .. } => message,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Diagnostic detail; the underlying failure for store errors
    pub fn detail(&self) -> &str {
        match self {
            ApiError::InternalServerError { error, .. } => error,
            _ => self.error_code(),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError { .. } => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "message": self.message(),
            "error": self.detail(),
        });

        if let ApiError::ValidationError { field_errors: Some(field_errors), .. } = self {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Map a store failure into a response, with `message` describing the
    /// operation that failed. A duplicate email is a client error; anything
    /// else is logged and reported as a 500.
    pub fn store(message: impl Into<String>, err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => {
                let mut field_errors = HashMap::new();
                field_errors.insert("email".to_string(), format!("{} is already in use", email));
                ApiError::validation_error("Lead already exists with this email", Some(field_errors))
            }
            other => {
                let message = message.into();
                tracing::error!("{}: {}", message, other);
                ApiError::InternalServerError { message, error: other.to_string() }
            }
        }
    }
}

// Convert other error types to ApiError
impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(err.param().to_string(), err.to_string());
        ApiError::validation_error("Invalid search parameters", Some(field_errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", err.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid query string: {}", err.body_text()))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_carry_operation_message_and_detail() {
        let err = ApiError::store("Failed to fetch lead", StoreError::InvalidId("abc".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to fetch lead");
        assert_eq!(body["error"], "Invalid lead id: abc");
    }

    #[test]
    fn duplicate_email_is_a_validation_error() {
        let err = ApiError::store("Failed to add lead", StoreError::DuplicateEmail("a@b.c".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Lead already exists with this email");
        assert!(err.to_json()["field_errors"]["email"].is_string());
    }

    #[test]
    fn filter_errors_name_the_parameter() {
        let err: ApiError = FilterError::InvalidNumber { param: "score_gt", value: "x".into() }.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.to_json();
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["score_gt"], "Invalid number for 'score_gt': x");
    }

    #[test]
    fn query_rejections_render_as_json() {
        use axum::extract::Query;
        use axum::http::Uri;

        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            q: Option<String>,
        }

        let uri: Uri = "/leads/search?q=a&q=b".parse().unwrap();
        let rejection = Query::<Params>::try_from_uri(&uri).unwrap_err();
        let err: ApiError = rejection.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid query string"));
    }
}
