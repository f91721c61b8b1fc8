//! Tarot carousel — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carousel_core::error::CarouselError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `CarouselError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub CarouselError);

impl From<CarouselError> for ApiError {
    fn from(err: CarouselError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            CarouselError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            CarouselError::Ignored(_) => (StatusCode::CONFLICT, "interaction_ignored"),
            CarouselError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            CarouselError::Serialization(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
            CarouselError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    fn status_of(err: CarouselError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_session_not_found_maps_to_404() {
        assert_eq!(
            status_of(CarouselError::SessionNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_and_serialization_map_to_400() {
        assert_eq!(
            status_of(CarouselError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CarouselError::Serialization("not yaml".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_configuration_maps_to_500() {
        assert_eq!(
            status_of(CarouselError::Configuration("deck size".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_ignored_maps_to_409() {
        assert_eq!(
            status_of(CarouselError::Ignored("locked".into())),
            StatusCode::CONFLICT
        );
    }
}
