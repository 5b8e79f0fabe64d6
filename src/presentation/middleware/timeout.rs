use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tracing::warn;

use super::error::AppError;

/// Bound every request by the operation deadline
///
/// On expiry the handler future is dropped, which cancels in-flight queries
/// and rolls back any open transaction.
pub async fn deadline_middleware(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tokio::time::timeout(deadline, next.run(request)).await.map_err(|_| {
        warn!(%method, %path, ?deadline, "Request exceeded deadline");
        AppError::Timeout {
            message: format!("{method} {path} exceeded the {}ms operation deadline", deadline.as_millis()),
        }
    })
}
