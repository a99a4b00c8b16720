use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use conrod_core::ProductionId;
use conrod_production::NewProduction;

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_production).post(assemble_production))
        .route("/plan", get(plan_assembly))
        .route("/:id", patch(update_production).delete(delete_production))
}

pub async fn list_production(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_production().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn plan_assembly(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(query): ApiQuery<dto::PlanQuery>,
) -> axum::response::Response {
    match services
        .ledger
        .plan_assembly(query.conrod_id, query.quantity)
        .await
    {
        Ok(plan) => Json(plan).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn assemble_production(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewProduction>,
) -> axum::response::Response {
    match services.ledger.assemble_production(body).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Manual correction. The ledger stores what it is given, so the floor is
/// enforced here.
pub async fn update_production(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateProductionRequest>,
) -> axum::response::Response {
    let id: ProductionId = match errors::parse_id(&id, "production record") {
        Ok(v) => v,
        Err(res) => return res,
    };
    if body.quantity < 0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "quantity must not be negative",
        );
    }

    match services
        .ledger
        .update_production(id, body.quantity, body.size)
        .await
    {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_production(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductionId = match errors::parse_id(&id, "production record") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.delete_production(id).await {
        Ok(id) => Json(serde_json::json!({ "id": id })).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
