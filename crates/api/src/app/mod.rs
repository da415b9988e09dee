//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: in-memory mock data and the operations over it
//! - `seed.rs`: the canned records
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: query-string DTOs and body decoding
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use careboard_core::{Clock, SystemClock};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod seed;
pub mod services;

/// Build the full HTTP router on the wall clock (entrypoint used by `main.rs`).
pub fn build_app() -> Router {
    build_app_with_clock(Arc::new(SystemClock))
}

/// Build the router with an explicit clock; every fabricated timestamp comes
/// from it.
pub fn build_app_with_clock(clock: Arc<dyn Clock>) -> Router {
    let services = Arc::new(services::build_services(clock));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(Extension(services)),
        )
}
