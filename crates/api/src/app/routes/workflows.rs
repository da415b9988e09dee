use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use careboard_core::TriggerDischargeRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/discharge-summary/trigger", post(trigger_discharge_summary))
}

pub async fn trigger_discharge_summary(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let req: TriggerDischargeRequest = match dto::decode_body(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting discharge workflow trigger");
            return errors::mutation_failure("Failed to trigger workflow");
        }
    };

    (StatusCode::OK, Json(services.trigger_discharge(req))).into_response()
}
