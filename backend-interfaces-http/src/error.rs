use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use backend_application::AppError;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        let message = value.to_string();
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::Conflict => HttpError::Conflict(message),
            AppError::ToolUnavailable => HttpError::Unavailable(message),
            AppError::SourceNotFound(_) => HttpError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_errors_map_to_status_codes() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Conflict, StatusCode::CONFLICT),
            (AppError::ToolUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::SourceNotFound("/data/source".to_string()),
                StatusCode::NOT_FOUND,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status(), expected);
        }
    }

    #[test]
    fn message_survives_conversion() {
        let err = HttpError::from(AppError::SourceNotFound("/data/source".to_string()));
        assert_eq!(err.to_string(), "Source not found: /data/source");
    }
}
