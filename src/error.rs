use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::io;

/// Boxed error carried through from the network layer without rewrapping.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of the single outbound call made for an intercepted request.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("{0}")]
    Timeout(BoxError),

    #[error("{0}")]
    Upstream(BoxError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Forwarding failed: {0}")]
    Forward(#[from] ForwardError),

    #[error("Cannot resolve an absolute target for request URI '{0}'")]
    UnresolvableTarget(String),

    #[error("Invalid upstream URL '{0}'")]
    InvalidUpstream(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Forward(ForwardError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Forward(ForwardError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            AppError::UnresolvableTarget(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidUpstream(_) | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Forward(ForwardError::Timeout(_)) => "upstream_timeout",
            AppError::Forward(ForwardError::Upstream(_)) => "upstream_error",
            AppError::UnresolvableTarget(_) => "unresolvable_target",
            AppError::InvalidUpstream(_) => "invalid_upstream",
            AppError::IoError(_) => "io",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Forwarding failures carry the network layer's own messages verbatim.
        let message = match &self {
            AppError::Forward(ForwardError::Timeout(e) | ForwardError::Upstream(e)) => {
                error_chain(e.as_ref())
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "type": self.kind(),
            }
        }));

        (self.status(), body).into_response()
    }
}

/// `err` followed by each of its sources, `: `-separated.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
