use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use conrod_core::ProductId;
use conrod_products::NewProduct;

use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", patch(update_product).delete(delete_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_products().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// 201 for a new row, 200 when an existing row of the same name and type
/// was topped up.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewProduct>,
) -> axum::response::Response {
    let intake = match services.ledger.create_product(body).await {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let status = if intake.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(intake.into_product())).into_response()
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id, "product") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.update_product_quantity(id, body.quantity).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id, "product") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.delete_product(id).await {
        Ok(id) => Json(serde_json::json!({ "id": id })).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
