use axum::{
    body::Body,
    extract::{Request, State},
    http::Response,
};
use std::sync::Arc;

use crate::{error::AppError, interceptor::Interceptor};

/// Catch-all handler: every request the server accepts goes through here.
pub async fn intercept_request(
    State(interceptor): State<Arc<Interceptor>>,
    request: Request,
) -> Result<Response<Body>, AppError> {
    interceptor.intercept(request).await
}
