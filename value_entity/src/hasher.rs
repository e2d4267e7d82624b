use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::{FieldHasher, FieldSet};

/// Starting value of every composed hash. A value entity with no fields hashes to this.
pub const SEED: u64 = 17;

pub const MULT: u64 = 31;

/// One step of the composed hash: `acc * MULT + field_hash`, wrapping on overflow.
#[inline]
pub const fn combine(acc: u64, field_hash: u64) -> u64 {
    acc.wrapping_mul(MULT).wrapping_add(field_hash)
}

pub struct ComposedHasher<T> {
    hash: Arc<dyn Fn(&T) -> u64 + Send + Sync>,
}

impl<T> ComposedHasher<T> {
    #[inline]
    pub fn call(&self, instance: &T) -> u64 {
        (self.hash)(instance)
    }
}

impl<T> Clone for ComposedHasher<T> {
    fn clone(&self) -> Self {
        Self { hash: Arc::clone(&self.hash) }
    }
}

impl<T> fmt::Debug for ComposedHasher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComposedHasher")
    }
}

pub fn synthesize_hasher<T: 'static>(fields: &FieldSet<T>) -> ComposedHasher<T> {
    let terms: Vec<FieldHasher<T>> = fields
        .iter()
        .map(|descriptor| {
            let hash = descriptor.hasher();
            let term: FieldHasher<T> = if descriptor.is_value_kind() {
                trace!("hash {}: direct", descriptor.name());
                hash
            } else {
                trace!("hash {}: absent contributes 0", descriptor.name());
                let present = descriptor.presence();
                Box::new(move |instance: &T| if present(instance) { hash(instance) } else { 0 })
            };
            term
        })
        .collect();

    ComposedHasher {
        hash: Arc::new(move |instance: &T| {
            terms
                .iter()
                .fold(SEED, |acc, term| combine(acc, term(instance)))
        }),
    }
}
