//! Parties domain module.
//!
//! Customers are the billing parties bills may point at. Pure domain logic
//! (no IO, no HTTP, no storage).

pub mod customer;

pub use customer::{Customer, NewCustomer};
