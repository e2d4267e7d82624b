use crate::{combine, FieldDescriptor, FieldSet, Introspect, SynthesisError, SEED};

/// Walks the field list through the type-erased view on every call. Must give the same answers
/// as the cached functions.
#[derive(Debug)]
pub struct NaiveEngine<T> {
    descriptors: FieldSet<T>,
}

impl<T: Introspect> NaiveEngine<T> {
    pub fn new() -> Result<Self, SynthesisError> {
        Self::from_descriptors(T::describe())
    }
}

impl<T: 'static> NaiveEngine<T> {
    /// Fails for the same field lists that synthesis fails for.
    pub fn from_descriptors(descriptors: FieldSet<T>) -> Result<Self, SynthesisError> {
        for descriptor in &descriptors {
            descriptor.equality()?;
        }
        Ok(Self { descriptors })
    }

    pub fn descriptors(&self) -> &FieldSet<T> {
        &self.descriptors
    }

    pub fn equals(&self, left: &T, right: &T) -> bool {
        self.descriptors
            .iter()
            .all(|descriptor| field_equals(descriptor, left, right))
    }

    pub fn equals_opt(&self, left: &T, right: Option<&T>) -> bool {
        right.is_some_and(|right| self.equals(left, right))
    }

    pub fn hash(&self, instance: &T) -> u64 {
        self.descriptors
            .iter()
            .fold(SEED, |acc, descriptor| combine(acc, field_hash(descriptor, instance)))
    }
}

fn field_equals<T: 'static>(descriptor: &FieldDescriptor<T>, left: &T, right: &T) -> bool {
    match (descriptor.read(left), descriptor.read(right)) {
        (Some(left), Some(right)) => left.dyn_eq(right),
        // Only reference-kind fields can be absent.
        (None, None) => true,
        _ => false,
    }
}

fn field_hash<T: 'static>(descriptor: &FieldDescriptor<T>, instance: &T) -> u64 {
    descriptor.read(instance).map_or(0, |value| value.dyn_hash())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{synthesize_comparator, synthesize_hasher, ErasedEq, FieldType};
    use std::any::Any;

    struct Reading {
        sensor: String,
        value: f64,
        note: Option<String>,
    }

    impl Introspect for Reading {
        fn describe() -> FieldSet<Self> {
            FieldSet::builder()
                .field("sensor", |reading: &Reading| &reading.sensor)
                .field("value", |reading: &Reading| &reading.value)
                .field("note", |reading: &Reading| &reading.note)
                .build()
        }
    }

    fn reading(sensor: &str, value: f64, note: Option<&str>) -> Reading {
        Reading {
            sensor: sensor.to_string(),
            value,
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn agrees_with_synthesized_functions() {
        let naive = NaiveEngine::<Reading>::new().unwrap();
        let fields = Reading::describe();
        let compare = synthesize_comparator(&fields).unwrap();
        let hash = synthesize_hasher(&fields);

        let samples = [
            reading("a", 1.0, None),
            reading("a", 1.0, Some("n")),
            reading("a", -0.0, None),
            reading("a", 0.0, None),
            reading("b", f64::NAN, Some("n")),
            reading("b", f64::NAN, Some("n")),
        ];

        for left in &samples {
            assert_eq!(naive.hash(left), hash.call(left));
            for right in &samples {
                assert_eq!(naive.equals(left, right), compare.call(left, right));
            }
        }
    }

    #[test]
    fn absent_other_is_unequal() {
        let naive = NaiveEngine::<Reading>::new().unwrap();
        let sample = reading("a", 1.0, None);
        assert!(!naive.equals_opt(&sample, None));
        assert!(naive.equals_opt(&sample, Some(&reading("a", 1.0, None))));
    }

    // Only reachable through the type-erased equality.
    struct Tag(&'static str);

    impl FieldType for Tag {
        fn erased_eq() -> Option<ErasedEq> {
            fn eq(left: &dyn Any, right: &dyn Any) -> bool {
                match (left.downcast_ref::<Tag>(), right.downcast_ref::<Tag>()) {
                    (Some(left), Some(right)) => left.0.eq_ignore_ascii_case(right.0),
                    _ => false,
                }
            }
            Some(eq as ErasedEq)
        }

        fn field_hash(&self) -> u64 {
            self.0.to_ascii_lowercase().field_hash()
        }
    }

    crate::value_kind_field!(Tag);

    struct Labelled {
        primary: Tag,
        secondary: Option<Tag>,
    }

    impl Introspect for Labelled {
        fn describe() -> FieldSet<Self> {
            FieldSet::builder()
                .field("primary", |labelled: &Labelled| &labelled.primary)
                .field("secondary", |labelled: &Labelled| &labelled.secondary)
                .build()
        }
    }

    #[test]
    fn agrees_on_erased_only_fields() {
        let naive = NaiveEngine::<Labelled>::new().unwrap();
        let fields = Labelled::describe();
        let compare = synthesize_comparator(&fields).unwrap();
        let hash = synthesize_hasher(&fields);

        let labelled = |primary: &'static str, secondary: Option<&'static str>| Labelled {
            primary: Tag(primary),
            secondary: secondary.map(Tag),
        };
        let samples = [
            labelled("a", None),
            labelled("A", None),
            labelled("b", None),
            labelled("a", Some("x")),
            labelled("a", Some("X")),
            labelled("a", Some("y")),
        ];

        for left in &samples {
            assert_eq!(naive.hash(left), hash.call(left));
            for right in &samples {
                assert_eq!(naive.equals(left, right), compare.call(left, right));
            }
        }
        assert!(naive.equals(&samples[0], &samples[1]));
        assert!(naive.equals(&samples[3], &samples[4]));
        assert!(!naive.equals(&samples[0], &samples[3]));
        assert!(!naive.equals(&samples[3], &samples[5]));
    }
}
