//! Unified error handling with Sentry integration.
//!
//! Same taxonomy as the storefront, with the merchant console's login page
//! as the redirect target for identity failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use copperleaf_core::api::ApiError;

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Commerce API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No token in the session, or the token has no merchant role.
    #[error("Not signed in: {0}")]
    MissingIdentity(String),

    /// Form validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    fn is_server_fault(&self) -> bool {
        match self {
            Self::Internal(_) | Self::Session(_) => true,
            Self::Api(api) => api.status().is_none_or(|s| s >= 500),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        if let Self::Api(api) = &self
            && api.is_unauthorized()
        {
            return Redirect::to("/login?notice=session-expired").into_response();
        }

        match self {
            Self::MissingIdentity(_) => {
                Redirect::to("/login?notice=sign-in-required").into_response()
            }
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("Not found: {what}")).into_response()
            }
            Self::Api(api) => {
                let status = api
                    .status()
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "The commerce API is temporarily unavailable").into_response()
            }
            Self::Session(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identity_redirects_to_admin_login() {
        let response = AppError::MissingIdentity("no token".to_string()).into_response();
        assert!(response.status().is_redirection());
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("/login?notice=sign-in-required")
        );
    }

    #[test]
    fn unauthorized_api_error_redirects() {
        let err = AppError::Api(ApiError::Status {
            status: 401,
            message: "expired".to_string(),
        });
        assert!(err.into_response().status().is_redirection());
    }
}
