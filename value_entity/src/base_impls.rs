use std::hash::{Hash, Hasher};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rustc_hash::FxHasher;

use crate::{combine, resolve_equality, BoundEq, Field, FieldKind, FieldType, TypedEq, SEED};

pub(crate) fn fx_hash<H: Hash + ?Sized>(value: &H) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

macro_rules! trivial_field_type {
    ($($t:ty),+) => {
        $(impl FieldType for $t {
            fn typed_eq() -> Option<TypedEq<Self>> { Some(<$t as PartialEq>::eq as TypedEq<Self>) }

            fn field_hash(&self) -> u64 { fx_hash(self) }
        })+

        crate::value_kind_field!($($t),+);
    }
}

trivial_field_type!(bool, char, i128, i64, i32, i16, i8, isize, u128, u64, u32, u16, u8, usize,
    String, &'static str, Uuid, DateTime<Utc>, NaiveDate, NaiveDateTime);

// NaN equals NaN and -0.0 hashes like 0.0, so floats stay reflexive and hash-consistent.
macro_rules! float_field_type {
    ($($t:ty),+) => {
        $(impl FieldType for $t {
            fn typed_eq() -> Option<TypedEq<Self>> {
                fn eq(left: &$t, right: &$t) -> bool {
                    left == right || (left.is_nan() && right.is_nan())
                }
                Some(eq as TypedEq<Self>)
            }

            fn field_hash(&self) -> u64 {
                let canonical = if self.is_nan() {
                    <$t>::NAN
                } else if *self == 0.0 {
                    0.0
                } else {
                    *self
                };
                fx_hash(&canonical.to_bits())
            }
        })+

        crate::value_kind_field!($($t),+);
    }
}

float_field_type!(f64, f32);

fn elements_eq<F>(left: &[F], right: &[F], equal: impl Fn(&F, &F) -> bool) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(left, right)| equal(left, right))
}

// The fn-pointer forms serve the type-erased path, which resolves on every call.
#[allow(clippy::ptr_arg)]
fn vec_eq<F: FieldType>(left: &Vec<F>, right: &Vec<F>) -> bool {
    resolve_equality::<F>().is_some_and(|equality| elements_eq(left, right, |l, r| equality.eq(l, r)))
}

impl<F: FieldType> FieldType for Vec<F> {
    fn typed_eq() -> Option<TypedEq<Self>> {
        resolve_equality::<F>()?;
        Some(vec_eq::<F> as TypedEq<Self>)
    }

    fn bound_eq() -> Option<BoundEq<Self>> {
        let equal = F::bound_eq()?;
        Some(Box::new(move |left: &Vec<F>, right: &Vec<F>| elements_eq(left, right, &equal)))
    }

    fn field_hash(&self) -> u64 {
        self.iter().fold(SEED, |acc, item| combine(acc, item.field_hash()))
    }
}

impl<F: FieldType> Field for Vec<F> {
    type Data = Self;
    const KIND: FieldKind = FieldKind::Value;

    fn present(&self) -> Option<&Self> {
        Some(self)
    }
}

#[allow(clippy::borrowed_box)]
fn box_eq<F: FieldType>(left: &Box<F>, right: &Box<F>) -> bool {
    resolve_equality::<F>().is_some_and(|equality| equality.eq(left, right))
}

impl<F: FieldType> FieldType for Box<F> {
    fn typed_eq() -> Option<TypedEq<Self>> {
        resolve_equality::<F>()?;
        Some(box_eq::<F> as TypedEq<Self>)
    }

    fn bound_eq() -> Option<BoundEq<Self>> {
        let equal = F::bound_eq()?;
        Some(Box::new(move |left: &Box<F>, right: &Box<F>| equal(&**left, &**right)))
    }

    fn field_hash(&self) -> u64 {
        (**self).field_hash()
    }
}

impl<F: FieldType> Field for Box<F> {
    type Data = Self;
    const KIND: FieldKind = FieldKind::Value;

    fn present(&self) -> Option<&Self> {
        Some(self)
    }
}
