mod base_impls;
pub mod cache;
mod comparator;
mod descriptor;
mod entity;
mod error;
mod field;
mod hasher;
mod introspect;
mod naive;

pub use cache::CacheEntry;
pub use comparator::{synthesize_comparator, ComposedComparator};
pub use descriptor::{
    FieldDescriptor, FieldEquality, FieldHasher, FieldKind, FieldPresence, FieldSet,
    FieldSetBuilder,
};
pub use entity::ValueEntity;
pub use error::SynthesisError;
pub use field::{
    resolve_equality, BoundEq, Equality, ErasedEq, Field, FieldData, FieldType, FieldValue,
    TypedEq,
};
pub use hasher::{combine, synthesize_hasher, ComposedHasher, MULT, SEED};
pub use introspect::Introspect;
pub use naive::NaiveEngine;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}
