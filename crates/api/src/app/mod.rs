//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the shared ledger
//! - `routes/`: HTTP routes + handlers (one file per collection)
//! - `dto.rs`: request bodies that are not domain drafts
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: body/query extractors that answer with those responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use conrod_infra::{LedgerConfig, StoreResult};

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &LedgerConfig) -> StoreResult<Router> {
    let services = services::build_services(config).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-built services. Tests use this to share one ledger
/// between the server and direct assertions.
pub fn router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
