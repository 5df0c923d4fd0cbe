//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attribute values are the same value. To "modify" one, build a
/// new one. `Money { amount: 100.00, currency: USD }` is a value object; an
/// `Order` (same id across state changes) is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
