use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use careboard_core::TriggerAlertRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_alerts))
        .route("/trigger", post(trigger_alert))
}

pub async fn list_alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::AlertsQuery>,
) -> axum::response::Response {
    // `?type=` with an empty value means no filter.
    let filter = query.alert_type.as_deref().filter(|t| !t.is_empty());
    let alerts = services.alerts_list(filter);
    (StatusCode::OK, Json(alerts)).into_response()
}

pub async fn trigger_alert(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let req: TriggerAlertRequest = match dto::decode_body(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting alert trigger");
            return errors::mutation_failure("Failed to trigger alert");
        }
    };

    (StatusCode::OK, Json(services.trigger_alert(req))).into_response()
}
