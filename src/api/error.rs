//! Mapping of [`Error`] onto HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Realm announced on 401 responses.
pub const AUTH_REALM: &str = r#"Basic realm="innovation-points", charset="UTF-8""#;

impl Error {
    /// The HTTP status this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::AuthFailure => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied { .. } | Self::SelfDeletionDenied => StatusCode::FORBIDDEN,
            Self::RecordNotFound { .. } | Self::UserNotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateUsername { .. } => StatusCode::CONFLICT,
            Self::Config { .. }
            | Self::PasswordHash { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
        }
        response
    }
}
