use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, error};
use once_cell::sync::Lazy;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::{
    synthesize_comparator, synthesize_hasher, ComposedComparator, ComposedHasher, FieldSet,
    Introspect, SynthesisError,
};

type Registry = DashMap<TypeId, Stored, FxBuildHasher>;

type Stored = &'static (dyn Any + Send + Sync);

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

// Entries are never removed, so a thread can keep what it has seen and skip the shard lock.
thread_local! {
    static SEEN: RefCell<FxHashMap<TypeId, Stored>> = RefCell::new(FxHashMap::default());
}

pub struct CacheEntry<T> {
    descriptors: FieldSet<T>,
    comparator: ComposedComparator<T>,
    hasher: ComposedHasher<T>,
}

impl<T> fmt::Debug for CacheEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("entity", &type_name::<T>())
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

impl<T: Introspect> CacheEntry<T> {
    fn build() -> Result<Self, SynthesisError> {
        let descriptors = T::describe();
        let comparator = synthesize_comparator(&descriptors)?;
        let hasher = synthesize_hasher(&descriptors);

        debug!(
            "Synthesized value entity functions for {} ({} fields)",
            type_name::<T>(),
            descriptors.len()
        );

        Ok(Self {
            descriptors,
            comparator,
            hasher,
        })
    }

    pub fn descriptors(&self) -> &FieldSet<T> {
        &self.descriptors
    }

    pub fn comparator(&self) -> &ComposedComparator<T> {
        &self.comparator
    }

    pub fn hasher(&self) -> &ComposedHasher<T> {
        &self.hasher
    }

    #[inline]
    pub fn equals(&self, left: &T, right: &T) -> bool {
        self.comparator.call(left, right)
    }

    #[inline]
    pub fn hash(&self, instance: &T) -> u64 {
        self.hasher.call(instance)
    }
}

fn downcast<T: Introspect>(stored: Stored) -> &'static CacheEntry<T> {
    match stored.downcast_ref::<CacheEntry<T>>() {
        Some(entry) => entry,
        None => unreachable!("cache slot for {} holds another type's entry", type_name::<T>()),
    }
}

/// Returns the entry for `T`, building it if this is the first use of `T`.
///
/// The build runs while holding the registry's write lock for `T`'s shard, so concurrent first
/// uses wait for one build instead of racing. A failed build stores nothing.
pub fn try_entry<T: Introspect>() -> Result<&'static CacheEntry<T>, SynthesisError> {
    let type_id = TypeId::of::<T>();

    if let Some(stored) = SEEN.with(|seen| seen.borrow().get(&type_id).copied()) {
        return Ok(downcast(stored));
    }

    let stored = match REGISTRY.get(&type_id) {
        Some(stored) => *stored,
        None => match REGISTRY.entry(type_id) {
            Entry::Occupied(occupied) => *occupied.get(),
            Entry::Vacant(vacant) => {
                let built: &'static CacheEntry<T> = Box::leak(Box::new(CacheEntry::<T>::build()?));
                *vacant.insert(built as Stored)
            }
        },
    };

    SEEN.with(|seen| seen.borrow_mut().insert(type_id, stored));
    Ok(downcast(stored))
}

/// A type whose functions cannot be synthesized is a fatal error.
pub fn entry<T: Introspect>() -> &'static CacheEntry<T> {
    match try_entry::<T>() {
        Ok(entry) => entry,
        Err(err) => {
            error!("{err}");
            panic!("Cannot compare or hash {}: {err}", type_name::<T>())
        }
    }
}

pub fn is_cached<T: Introspect>() -> bool {
    REGISTRY.contains_key(&TypeId::of::<T>())
}

pub fn cached_type_count() -> usize {
    REGISTRY.len()
}
