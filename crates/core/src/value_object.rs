//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. In this
/// workspace that covers permission grants, permission sets and verdicts: two
/// verdicts produced from the same inputs must compare equal, which is what
/// makes evaluation observably idempotent.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
