use std::sync::Arc;

use axum::{Json, extract::Extension};

use careboard_core::BusinessProcess;

use crate::app::services::AppServices;

pub async fn list_processes(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<BusinessProcess>> {
    Json(services.processes_list())
}
