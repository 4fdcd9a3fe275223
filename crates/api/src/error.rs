use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Boundary error type: domain not-found conditions carry a hint describing
/// the query that failed; backend failures are logged and captured but reach
/// the caller as an opaque 500.
#[derive(Debug)]
pub enum ApiError {
    NotFound { error: String, hint: String },
    BadRequest(String),
    Unavailable,
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn not_found(error: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::NotFound {
            error: error.into(),
            hint: hint.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "backend call failed");
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound { error, hint } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error,
                    hint: Some(hint),
                },
            ),
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, ErrorBody { error, hint: None }),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: "signals backend unavailable".to_string(),
                    hint: None,
                },
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal error".to_string(),
                    hint: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
