use std::any::{type_name, Any};
use std::fmt;

use crate::FieldKind;

pub type TypedEq<F> = fn(&F, &F) -> bool;

/// Equality between two type-erased values. Must return false when the operands are not
/// of the same type.
pub type ErasedEq = fn(&dyn Any, &dyn Any) -> bool;

pub type BoundEq<F> = Box<dyn Fn(&F, &F) -> bool + Send + Sync>;

/// A type supplies at least one of [`FieldType::typed_eq`] and [`FieldType::erased_eq`]. When
/// both exist the typed one is used. A type that supplies neither fails synthesis on first use
/// of any value entity that contains it.
pub trait FieldType: Any + Send + Sync + Sized {
    fn typed_eq() -> Option<TypedEq<Self>> {
        None
    }

    fn erased_eq() -> Option<ErasedEq> {
        None
    }

    /// The equality composed functions call, resolved when they are built. Containers
    /// override this to resolve their element equality up front.
    fn bound_eq() -> Option<BoundEq<Self>> {
        let equality = resolve_equality::<Self>()?;
        Some(Box::new(move |left: &Self, right: &Self| equality.eq(left, right)))
    }

    /// Values that compare equal must hash equal.
    fn field_hash(&self) -> u64;
}

pub enum Equality<F> {
    Typed(TypedEq<F>),
    Erased(ErasedEq),
}

impl<F: FieldType> Equality<F> {
    #[inline]
    pub fn eq(&self, left: &F, right: &F) -> bool {
        match *self {
            Equality::Typed(eq) => eq(left, right),
            Equality::Erased(eq) => eq(left, right),
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Equality::Typed(_))
    }
}

impl<F> Clone for Equality<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for Equality<F> {}

impl<F> fmt::Debug for Equality<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Equality::Typed(_) => write!(f, "Typed({})", type_name::<F>()),
            Equality::Erased(_) => write!(f, "Erased"),
        }
    }
}

/// Picks the same-type equality for `F` if it has one, otherwise its type-erased equality.
pub fn resolve_equality<F: FieldType>() -> Option<Equality<F>> {
    F::typed_eq()
        .map(Equality::Typed)
        .or_else(|| F::erased_eq().map(Equality::Erased))
}

/// A declared field type. `Option<F>` is reference-kind, with `None` as the absent value.
/// Everything else is value-kind and always present.
pub trait Field: Send + Sync + 'static {
    type Data: FieldType;
    const KIND: FieldKind;

    fn present(&self) -> Option<&Self::Data>;
}

impl<F: FieldType> Field for Option<F> {
    type Data = F;
    const KIND: FieldKind = FieldKind::Reference;

    fn present(&self) -> Option<&F> {
        self.as_ref()
    }
}

/// Implements [`Field`] as value-kind for types that are their own field data.
#[macro_export]
macro_rules! value_kind_field {
    ($($t:ty),+ $(,)?) => {
        $(impl $crate::Field for $t {
            type Data = Self;
            const KIND: $crate::FieldKind = $crate::FieldKind::Value;

            fn present(&self) -> Option<&Self> { Some(self) }
        })+
    }
}

pub trait FieldData: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn data_type_name(&self) -> &'static str;

    /// Looks up the equality operation of this value's type and applies it. The lookup
    /// happens on every call.
    fn dyn_eq(&self, other: &dyn FieldData) -> bool;

    fn dyn_hash(&self) -> u64;
}

impl<F: FieldType> FieldData for F {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn data_type_name(&self) -> &'static str {
        type_name::<F>()
    }

    fn dyn_eq(&self, other: &dyn FieldData) -> bool {
        match resolve_equality::<F>() {
            Some(Equality::Typed(eq)) => other
                .as_any()
                .downcast_ref::<F>()
                .is_some_and(|other| eq(self, other)),
            Some(Equality::Erased(eq)) => eq(self.as_any(), other.as_any()),
            None => false,
        }
    }

    fn dyn_hash(&self) -> u64 {
        self.field_hash()
    }
}

impl fmt::Debug for dyn FieldData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldData<{}>", self.data_type_name())
    }
}

pub type FieldValue<'a> = Option<&'a dyn FieldData>;
