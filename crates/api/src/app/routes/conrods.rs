use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use conrod_catalog::NewConrod;
use conrod_core::ConrodId;

use crate::app::errors;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_conrods).post(create_conrod))
        .route("/import", post(import_conrods))
        .route("/:id", patch(update_conrod).delete(delete_conrod))
}

pub async fn list_conrods(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_conrods().await {
        Ok(conrods) => Json(conrods).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_conrod(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewConrod>,
) -> axum::response::Response {
    match services.ledger.create_conrod(body).await {
        Ok(conrod) => (StatusCode::CREATED, Json(conrod)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Rows are imported in order; failed rows are reported, not fatal.
pub async fn import_conrods(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(rows): ApiJson<Vec<NewConrod>>,
) -> axum::response::Response {
    let report = services.ledger.import_conrods(rows).await;
    let status = if report.failed.is_empty() {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    };
    (status, Json(report)).into_response()
}

pub async fn update_conrod(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<NewConrod>,
) -> axum::response::Response {
    let id: ConrodId = match errors::parse_id(&id, "conrod") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.update_conrod(id, body).await {
        Ok(conrod) => Json(conrod).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_conrod(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ConrodId = match errors::parse_id(&id, "conrod") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.delete_conrod(id).await {
        Ok(id) => Json(serde_json::json!({ "id": id })).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
