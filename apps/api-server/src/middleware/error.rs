//! Error handling - RFC 7807 compliant responses.

use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use keystone_core::GateError;
use keystone_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The calling client exceeded its allowance.
    #[error("Rate limited for {}s", .0.as_secs())]
    RateLimited(Duration),

    /// Our upstream quota is exhausted.
    #[error("Upstream rate limited")]
    UpstreamRateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Header carrying the requests left in the caller's window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";
/// Header carrying the seconds until the caller's window closes.
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Whole seconds to advertise for a wait, rounded up and never less than one.
pub fn ceil_secs(wait: &Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) | AppError::UpstreamRateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::RateLimited(retry_after) => {
                let secs = ceil_secs(retry_after);
                builder
                    .insert_header(("Retry-After", secs.to_string()))
                    .insert_header((RATE_LIMIT_REMAINING_HEADER, "0"))
                    .insert_header((RATE_LIMIT_RESET_HEADER, secs.to_string()));
                ErrorResponse::too_many_requests(format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    secs
                ))
                .with_retry_after(secs)
            }
            AppError::UpstreamRateLimited => ErrorResponse::too_many_requests(
                "The listing provider is busy. Please try again shortly.",
            ),
            AppError::Upstream(detail) => {
                tracing::error!("Upstream error: {}", detail);
                ErrorResponse::bad_gateway("The listing provider could not be reached.")
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        builder.json(error)
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::RateLimited { retry_after } => AppError::RateLimited(retry_after),
            GateError::UpstreamRateLimited => AppError::UpstreamRateLimited,
            GateError::Upstream(cause) => AppError::Upstream(cause.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
