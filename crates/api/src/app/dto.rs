//! Request bodies and query strings that are not domain drafts.
//!
//! Create endpoints take the domain drafts (`NewProduct`, `NewConrod`, ...)
//! directly; these types cover the partial updates and query parameters.

use serde::Deserialize;

use conrod_core::ConrodId;

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductionRequest {
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub conrod_id: ConrodId,
    pub quantity: i64,
}
