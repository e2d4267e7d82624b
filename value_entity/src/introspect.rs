use crate::FieldSet;

/// Produces the field list of a type. Usually generated by `#[derive(ValueEntity)]`, which
/// lists the public fields in declaration order.
///
/// Implementations must return the same fields in the same order on every call and must not
/// touch the per-type cache.
pub trait Introspect: Sized + Send + Sync + 'static {
    fn describe() -> FieldSet<Self>;
}
