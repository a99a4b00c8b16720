//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. The ledger's dimension sets (pin diameter, conrod
//! centre distance, ...) are value objects: they are stored as one serialized
//! blob next to the owning row and replaced wholesale on edit.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (two dimension sets with the same numbers are equal)
/// - **Entity**: has identity (two products with the same id are the same row)
///
/// The trait requires `Clone + PartialEq + Debug`; value objects are cheap to copy
/// and compared field by field.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
