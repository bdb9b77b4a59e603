//! Response types and helpers for HTTP endpoints.

use clubhouse_model::FieldErrors;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::service::ServiceError;

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Boundary errors, each mapped to one status code.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Request Timeout")]
    Timeout,
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound { .. } => HttpError::NotFound(e.to_string()),
            ServiceError::InvalidArgument(msg) => HttpError::BadRequest(msg),
            ServiceError::Validation(fields) => HttpError::Validation(fields),
            ServiceError::Internal(inner) => HttpError::Internal(inner.to_string()),
        }
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::BadRequest(_) | HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::Timeout => StatusCode::REQUEST_TIMEOUT,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the error response. Internal details are logged, not returned.
    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status();
        match self {
            HttpError::Validation(fields) => json_or_internal(status, &fields),
            HttpError::Internal(detail) => {
                tracing::error!(%detail, "Request failed");
                error_response(status, "Internal server error")
            }
            other => error_response(status, &other.to_string()),
        }
    }
}

/// Serialize `body` as the JSON payload of a `status` response.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Bytes>, HttpError> {
    let bytes = serde_json::to_vec(body)
        .map_err(|e| HttpError::Internal(format!("Failed to serialize response: {e}")))?;
    Ok(with_json(status, Bytes::from(bytes)))
}

pub fn empty_response(status: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}

pub fn error_response(status: StatusCode, message: &str) -> Response<Bytes> {
    json_or_internal(status, &ErrorBody { error: message })
}

fn json_or_internal<T: Serialize>(status: StatusCode, body: &T) -> Response<Bytes> {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_json(status, Bytes::from(bytes)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error body");
            with_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(br#"{"error":"Internal server error"}"#),
            )
        }
    }
}

fn with_json(status: StatusCode, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
