use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_agents))
        .route("/:id", get(get_agent))
}

pub async fn list_agents(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    (StatusCode::OK, Json(services.agents_list())).into_response()
}

pub async fn get_agent(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.agent_get(&id) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
