use axum::Router;

pub mod bills;
pub mod conrods;
pub mod customers;
pub mod invoices;
pub mod production;
pub mod products;
pub mod system;

/// Router for all ledger endpoints (nested under `/api`).
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/conrods", conrods::router())
        .nest("/production", production::router())
        .nest("/customers", customers::router())
        .nest("/bills", bills::router())
        .nest("/invoices", invoices::router())
}
