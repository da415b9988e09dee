use axum::{Router, routing::get};

pub mod agents;
pub mod alerts;
pub mod personas;
pub mod processes;
pub mod system;
pub mod workflows;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/agents", agents::router())
        .nest("/alerts", alerts::router())
        .nest("/workflows", workflows::router())
        .route("/personas", get(personas::list_personas))
        .route("/processes", get(processes::list_processes))
}
