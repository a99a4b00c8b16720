use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use conrod_core::BillId;
use conrod_invoicing::NewBill;

use crate::app::errors;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_bills).post(create_bill))
        .route("/:id", delete(delete_bill))
}

pub async fn list_bills(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_bills().await {
        Ok(bills) => Json(bills).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_bill(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewBill>,
) -> axum::response::Response {
    match services.ledger.create_bill(body).await {
        Ok(bill) => (StatusCode::CREATED, Json(bill)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Answers `{ deletedBillId, updatedProductionRecord }`; the record is
/// `null` when the batch no longer exists.
pub async fn delete_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BillId = match errors::parse_id(&id, "bill") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.delete_bill(id).await {
        Ok(deleted) => Json(deleted).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
