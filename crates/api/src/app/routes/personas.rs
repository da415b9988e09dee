use std::sync::Arc;

use axum::{Json, extract::Extension};

use careboard_core::Persona;

use crate::app::services::AppServices;

pub async fn list_personas(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<Persona>> {
    Json(services.personas_list())
}
