//! Conrod catalog: the recipes that say which pin and ball bearing make up
//! each conrod type, plus the serial-number rule for new entries.

pub mod conrod;
pub mod serial;

pub use conrod::{ConrodDefinition, ConrodDimensions, NewConrod};
pub use serial::next_serial;
