use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the record service. Client-detectable failures carry
/// their own message; everything else collapses into Internal, whose public
/// body is a fixed per-endpoint string while the cause goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    // `cause` is not a #[source]: anyhow::Error does not implement
    // std::error::Error. It is logged, never serialized to the client.
    #[error("{public}")]
    Internal {
        public: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    /// Wrap a storage/infrastructure failure under a fixed public message.
    /// Shaped for `map_err`: `.map_err(ApiError::internal("Failed to ..."))`.
    pub fn internal(public: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |cause| ApiError::Internal { public, cause }
    }

    /// Map a `spawn_blocking` join failure.
    pub fn join(public: &'static str) -> impl FnOnce(tokio::task::JoinError) -> ApiError {
        move |e| ApiError::Internal {
            public,
            cause: anyhow::anyhow!("spawn_blocking join error: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { public, cause } => {
                error!("{}: {:#}", public, cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
