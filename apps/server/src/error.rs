use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stockcache_core::errors::Error as CoreError;
use stockcache_translation::TranslationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Translation(#[from] TranslationError),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            retry_after: None,
            details: None,
        }
    }

    fn with_details(error: &str, details: String) -> Self {
        Self {
            details: Some(details),
            ..Self::message(error)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Core(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, ErrorBody::message(e.to_string()))
            }
            ApiError::Core(CoreError::Validation(_) | CoreError::UnsupportedType(_)) => {
                (StatusCode::BAD_REQUEST, ErrorBody::message(self.to_string()))
            }
            ApiError::Core(CoreError::RateLimitExceeded { retry_after_secs }) => {
                let body = ErrorBody {
                    retry_after: Some(*retry_after_secs),
                    ..ErrorBody::message("Rate limit exceeded. Please try again later.")
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
                return response;
            }
            ApiError::Core(CoreError::Upstream(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::with_details("Failed to fetch data", e.to_string()),
            ),
            ApiError::Translation(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, ErrorBody::message(e.to_string()))
            }
            _ => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::with_details("Internal server error", self.to_string()),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
