use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::{FieldEquality, FieldSet, SynthesisError};

pub struct ComposedComparator<T> {
    compare: Arc<dyn Fn(&T, &T) -> bool + Send + Sync>,
}

impl<T> ComposedComparator<T> {
    #[inline]
    pub fn call(&self, left: &T, right: &T) -> bool {
        (self.compare)(left, right)
    }
}

impl<T> Clone for ComposedComparator<T> {
    fn clone(&self) -> Self {
        Self { compare: Arc::clone(&self.compare) }
    }
}

impl<T> fmt::Debug for ComposedComparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComposedComparator")
    }
}

/// Builds the conjunction of one equality term per field, in field order. Fails if a field's
/// type has no equality operation.
pub fn synthesize_comparator<T: 'static>(
    fields: &FieldSet<T>,
) -> Result<ComposedComparator<T>, SynthesisError> {
    let mut terms: Vec<FieldEquality<T>> = Vec::with_capacity(fields.len());

    for descriptor in fields {
        let equal = descriptor.equality()?;

        if descriptor.is_value_kind() {
            trace!("compare {}: direct", descriptor.name());
            terms.push(equal);
            continue;
        }

        // (left absent && right absent) || (left present && left == right)
        trace!("compare {}: null-safe", descriptor.name());
        let present = descriptor.presence();
        terms.push(Box::new(move |left: &T, right: &T| {
            let left_present = present(left);
            (!left_present && !present(right)) || (left_present && equal(left, right))
        }));
    }

    Ok(ComposedComparator {
        compare: Arc::new(move |left: &T, right: &T| terms.iter().all(|term| term(left, right))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErasedEq, FieldType};

    struct Address {
        street: Option<String>,
        building: Option<String>,
    }

    fn address(street: Option<&str>, building: Option<&str>) -> Address {
        Address {
            street: street.map(str::to_string),
            building: building.map(str::to_string),
        }
    }

    fn address_comparator() -> ComposedComparator<Address> {
        let fields = FieldSet::builder()
            .field("street", |address: &Address| &address.street)
            .field("building", |address: &Address| &address.building)
            .build();
        synthesize_comparator(&fields).unwrap()
    }

    #[test]
    fn both_absent_is_equal() {
        let compare = address_comparator();
        assert!(compare.call(&address(None, None), &address(None, None)));
    }

    #[test]
    fn one_absent_is_unequal_either_way() {
        let compare = address_comparator();
        let left = address(Some("A"), None);
        let right = address(None, None);
        assert!(!compare.call(&left, &right));
        assert!(!compare.call(&right, &left));
        assert!(!compare.call(&address(Some("A"), None), &address(None, Some("Y"))));
    }

    #[test]
    fn present_values_are_compared() {
        let compare = address_comparator();
        assert!(compare.call(&address(Some("A"), Some("B")), &address(Some("A"), Some("B"))));
        assert!(!compare.call(&address(Some("A"), Some("B")), &address(Some("A"), Some("C"))));
    }

    #[test]
    fn zero_fields_are_always_equal() {
        struct Empty(u8);
        let compare = synthesize_comparator(&FieldSet::<Empty>::empty()).unwrap();
        assert!(compare.call(&Empty(1), &Empty(2)));
    }

    struct Opaque;

    impl FieldType for Opaque {
        fn field_hash(&self) -> u64 {
            0
        }
    }

    crate::value_kind_field!(Opaque);

    struct Holder {
        opaque: Opaque,
    }

    #[test]
    fn missing_equality_fails_synthesis() {
        let fields = FieldSet::builder()
            .field("opaque", |holder: &Holder| &holder.opaque)
            .build();
        let err = synthesize_comparator(&fields).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::MissingEquality {
                entity: std::any::type_name::<Holder>(),
                field: "opaque",
                field_type: std::any::type_name::<Opaque>(),
            }
        );
    }

    struct Counted(u32);

    impl FieldType for Counted {
        fn erased_eq() -> Option<ErasedEq> {
            fn eq(left: &dyn std::any::Any, right: &dyn std::any::Any) -> bool {
                match (left.downcast_ref::<Counted>(), right.downcast_ref::<Counted>()) {
                    (Some(left), Some(right)) => left.0 == right.0,
                    _ => false,
                }
            }
            Some(eq as ErasedEq)
        }

        fn field_hash(&self) -> u64 {
            self.0 as u64
        }
    }

    crate::value_kind_field!(Counted);

    #[test]
    fn erased_equality_is_used_when_no_typed_one_exists() {
        let fields = FieldSet::builder()
            .field("count", |counted: &(Counted,)| &counted.0)
            .build();
        let compare = synthesize_comparator(&fields).unwrap();
        assert!(compare.call(&(Counted(3),), &(Counted(3),)));
        assert!(!compare.call(&(Counted(3),), &(Counted(4),)));
    }
}
