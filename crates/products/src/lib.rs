//! Products domain module.
//!
//! Raw-material and finished-goods stock rows (pins, ball bearings, conrods),
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{
    deduct_floored, find_duplicate, normalize_name, NewProduct, Product, ProductDimensions,
    ProductType,
};
