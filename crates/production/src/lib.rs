//! Production domain module.
//!
//! Batches of assembled conrods, the component resolver that joins catalog
//! recipes to stock rows by name, and the availability check that gates
//! assembly. Pure domain logic (no IO, no HTTP, no storage).

pub mod plan;
pub mod record;
pub mod resolver;

pub use plan::{AssemblyPlan, ComponentCheck, Shortfall};
pub use record::{normalize_size, NewProduction, ProductionRecord};
pub use resolver::{find_finished_conrod, resolve_component, ComponentRole};
