use std::any::type_name;
use std::fmt;
use std::slice;

use crate::field::{Field, FieldData, FieldType, FieldValue};
use crate::SynthesisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Value,
    /// `Option<_>`; absent values are compared and hashed through a null-guard.
    Reference,
}

impl FieldKind {
    pub fn is_value_kind(self) -> bool {
        matches!(self, FieldKind::Value)
    }
}

/// Compares one field of two instances. False when the right-hand field is absent.
pub type FieldEquality<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Hashes one field of an instance. Absent fields hash to 0.
pub type FieldHasher<T> = Box<dyn Fn(&T) -> u64 + Send + Sync>;

pub type FieldPresence<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

// Monomorphized over the declared field type, so everything built from it calls the field's
// own operations directly.
trait Accessor<T>: Send + Sync {
    fn read<'a>(&self, instance: &'a T) -> FieldValue<'a>;

    fn presence(&self) -> FieldPresence<T>;

    fn equality(&self) -> Option<FieldEquality<T>>;

    fn hasher(&self) -> FieldHasher<T>;
}

struct Projection<T, D> {
    get: fn(&T) -> &D,
}

impl<T: 'static, D: Field> Accessor<T> for Projection<T, D> {
    fn read<'a>(&self, instance: &'a T) -> FieldValue<'a> {
        (self.get)(instance)
            .present()
            .map(|data| data as &dyn FieldData)
    }

    fn presence(&self) -> FieldPresence<T> {
        let get = self.get;
        Box::new(move |instance: &T| get(instance).present().is_some())
    }

    fn equality(&self) -> Option<FieldEquality<T>> {
        let get = self.get;
        let equal = <D::Data as FieldType>::bound_eq()?;
        Some(Box::new(move |left: &T, right: &T| {
            match (get(left).present(), get(right).present()) {
                (Some(left), Some(right)) => equal(left, right),
                _ => false,
            }
        }))
    }

    fn hasher(&self) -> FieldHasher<T> {
        let get = self.get;
        Box::new(move |instance: &T| {
            get(instance)
                .present()
                .map_or(0, <D::Data as FieldType>::field_hash)
        })
    }
}

pub struct FieldDescriptor<T> {
    name: &'static str,
    kind: FieldKind,
    field_type: &'static str,
    access: Box<dyn Accessor<T>>,
}

impl<T: 'static> FieldDescriptor<T> {
    pub fn new<D: Field>(name: &'static str, get: fn(&T) -> &D) -> Self {
        Self {
            name,
            kind: D::KIND,
            field_type: type_name::<D::Data>(),
            access: Box::new(Projection { get }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_value_kind(&self) -> bool {
        self.kind.is_value_kind()
    }

    /// Type name of the field's data, with any `Option` removed.
    pub fn field_type(&self) -> &'static str {
        self.field_type
    }

    pub fn read<'a>(&self, instance: &'a T) -> FieldValue<'a> {
        self.access.read(instance)
    }

    pub fn is_present(&self, instance: &T) -> bool {
        self.access.read(instance).is_some()
    }

    pub fn presence(&self) -> FieldPresence<T> {
        self.access.presence()
    }

    pub fn equality(&self) -> Result<FieldEquality<T>, SynthesisError> {
        self.access.equality().ok_or_else(|| self.missing_equality())
    }

    pub fn hasher(&self) -> FieldHasher<T> {
        self.access.hasher()
    }

    pub(crate) fn missing_equality(&self) -> SynthesisError {
        SynthesisError::MissingEquality {
            entity: type_name::<T>(),
            field: self.name,
            field_type: self.field_type,
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("field_type", &self.field_type)
            .finish()
    }
}

/// The ordered field list of a value entity. Immutable once built.
pub struct FieldSet<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> FieldSet<T> {
    pub fn builder() -> FieldSetBuilder<T> {
        FieldSetBuilder { fields: Vec::new() }
    }

    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, FieldDescriptor<T>> {
        self.fields.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldDescriptor::name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl<'a, T> IntoIterator for &'a FieldSet<T> {
    type Item = &'a FieldDescriptor<T>;
    type IntoIter = slice::Iter<'a, FieldDescriptor<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<T> fmt::Debug for FieldSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

pub struct FieldSetBuilder<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> FieldSetBuilder<T> {
    pub fn field<D: Field>(mut self, name: &'static str, get: fn(&T) -> &D) -> Self {
        self.fields.push(FieldDescriptor::new(name, get));
        self
    }

    pub fn build(self) -> FieldSet<T> {
        FieldSet { fields: self.fields }
    }
}
