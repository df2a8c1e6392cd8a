//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use coursebook_infra::{InMemoryStore, Store};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// State shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub log_internal_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, log_internal_errors: bool) -> Self {
        Self {
            store,
            log_internal_errors,
        }
    }

    /// Fresh in-memory state, as used by tests and by the binary when no
    /// database is configured.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), false)
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    // Protected routes: require Basic auth.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::trace_requests,
        )))
        .with_state(state)
}
