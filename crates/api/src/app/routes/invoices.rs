use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use conrod_invoicing::InvoiceDraft;

use crate::app::errors;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_invoices).post(create_invoice))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_invoices().await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Each line is billed independently. 201 when every line landed, 207 with
/// the per-line failures otherwise.
pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<InvoiceDraft>,
) -> axum::response::Response {
    let outcome = match services.ledger.create_invoice(body).await {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let status = if outcome.is_complete() {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    };
    (status, Json(outcome)).into_response()
}
