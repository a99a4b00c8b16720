//! HTTP API for the conrod inventory ledger: routing, request mapping and
//! error responses.

pub mod app;
