use axum::{
    Json,
    extract::{
        Request,
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::authorization::AuthError;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::RatingScoreError;
use crate::infrastructure::auth::{PasswordError, TokenIssueError};

/// HTTP-facing error; every domain error converts into one of these
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Authorization failed: {message}")]
    Authorization { message: String },

    #[error("Validation failed: {errors:?}")]
    Validation { errors: HashMap<String, String> },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// A second rating of the same movie by the same user
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    /// Rolled-back compound write; the message names the operation
    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    /// Server wiring defect, never caused by the caller
    #[error("Server misconfigured: {message}")]
    Misconfigured { message: String },

    #[error("Service temporarily unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Operation deadline exceeded: {message}")]
    Timeout { message: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Database { .. }
            | AppError::Internal { .. }
            | AppError::Misconfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Get the error type for logging and the response body
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "authentication",
            AppError::Authorization { .. } => "authorization",
            AppError::Validation { .. } => "validation",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Database { .. } => "database",
            AppError::Internal { .. } => "internal",
            AppError::Misconfigured { .. } => "misconfigured",
            AppError::ServiceUnavailable { .. } => "service_unavailable",
            AppError::Timeout { .. } => "timeout",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(
            self,
            AppError::Database { .. }
                | AppError::Internal { .. }
                | AppError::Misconfigured { .. }
                | AppError::ServiceUnavailable { .. }
        )
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation { errors: HashMap::from([(field.to_string(), message.into())]) }
    }

    /// Create error response with proper structure
    pub fn to_error_response(&self, request_id: Option<&str>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                id: Uuid::new_v4().to_string(),
                error_type: self.error_type().to_string(),
                message: self.to_string(),
                details: self.get_details(),
                request_id: request_id.map(String::from),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    fn get_details(&self) -> Option<Value> {
        match self {
            AppError::Validation { errors } => Some(json!({ "validation_errors": errors })),
            AppError::NotFound { resource } => Some(json!({ "resource": resource })),
            _ => None,
        }
    }
}

/// Structured error response
#[derive(serde::Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize, Debug, Clone)]
pub struct ErrorDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response(None);

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application warning: {}",
                self
            );
        }

        let mut response = (status, Json(error_response.clone())).into_response();
        response.extensions_mut().insert(error_response);
        response
    }
}

/// Stamps the caller's request id into structured error bodies
///
/// Handlers render errors without knowing the request id; this layer
/// re-renders any `ErrorResponse` it finds on the way out.
pub async fn error_context_middleware(request: Request, next: Next) -> Response {
    let request_id = extract_request_id(&request);
    let response = next.run(request).await;

    match request_id {
        Some(request_id) => with_request_id(response, &request_id),
        None => response,
    }
}

fn extract_request_id(request: &Request) -> Option<String> {
    request.headers().get("x-request-id").and_then(|v| v.to_str().ok()).map(String::from)
}

fn with_request_id(response: Response, request_id: &str) -> Response {
    let Some(mut error_response) = response.extensions().get::<ErrorResponse>().cloned() else {
        return response;
    };
    error_response.error.request_id = Some(request_id.to_string());

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    let body = Json(error_response).into_response().into_body();
    Response::from_parts(parts, body)
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_wiring_defect() {
            return AppError::Misconfigured { message: err.to_string() };
        }
        match err {
            AuthError::Forbidden => AppError::Authorization { message: err.to_string() },
            _ => AppError::Authentication { message: err.to_string() },
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { resource } => AppError::NotFound { resource },
            RepositoryError::AlreadyRated { .. } => AppError::Conflict { message: err.to_string() },
            RepositoryError::AggregateWriteFailed { .. } => {
                AppError::Database { message: err.to_string() }
            }
            RepositoryError::Unavailable { message } => AppError::ServiceUnavailable { message },
        }
    }
}

impl From<RatingScoreError> for AppError {
    fn from(err: RatingScoreError) -> Self {
        AppError::validation("rating", err.to_string())
    }
}

impl From<TokenIssueError> for AppError {
    fn from(err: TokenIssueError) -> Self {
        AppError::Internal { message: err.to_string() }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal { message: err.to_string() }
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}
