use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use coursebook_auth::{authenticate, AuthError};

use crate::app::errors::{ApiError, InternalFault};
use crate::app::AppState;
use crate::context::CurrentUser;

/// Require HTTP Basic credentials and attach the [`CurrentUser`].
///
/// Every credential rejection gets the same 401. Only the failure kind is
/// logged, never the header.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| reject(AuthError::Malformed))?),
        None => None,
    };

    let principal = match authenticate(&*state.store, header).await {
        Ok(principal) => principal,
        Err(e) if e.is_rejection() => return Err(reject(e)),
        Err(e) => return Err(e.into()),
    };

    req.extensions_mut().insert(CurrentUser::new(principal));
    Ok(next.run(req).await)
}

fn reject(err: AuthError) -> ApiError {
    tracing::warn!(kind = err.kind(), "authentication failed");
    ApiError::from(err)
}

/// One log line per request, plus the cause of any 500 when enabled.
pub async fn trace_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let latency_ms = started.elapsed().as_millis() as u64;
    tracing::info!(%method, %path, status = response.status().as_u16(), latency_ms, "request");

    if state.log_internal_errors {
        if let Some(InternalFault(cause)) = response.extensions().get::<InternalFault>() {
            tracing::error!(%method, %path, error = %cause, "internal server error");
        }
    }

    response
}
