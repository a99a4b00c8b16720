use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use conrod_core::CustomerId;
use conrod_parties::NewCustomer;

use crate::app::errors;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", delete(delete_customer))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_customers().await {
        Ok(customers) => Json(customers).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewCustomer>,
) -> axum::response::Response {
    match services.ledger.create_customer(body).await {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match errors::parse_id(&id, "customer") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.delete_customer(id).await {
        Ok(id) => Json(serde_json::json!({ "id": id })).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
