use std::any::Any;

use crate::cache::{self, CacheEntry};
use crate::Introspect;

/// Every method is provided. `#[derive(ValueEntity)]` implements this together with
/// [`Introspect`], and forwards `PartialEq`, `Eq` and `Hash` to it.
pub trait ValueEntity: Introspect {
    /// Generic types land here and use the cache's per-thread memo. The derive overrides this
    /// for non-generic types with a static memo.
    fn cache_entry() -> &'static CacheEntry<Self> {
        cache::entry::<Self>()
    }

    fn value_eq(&self, other: &Self) -> bool {
        Self::cache_entry().equals(self, other)
    }

    /// An absent `other` is never equal.
    fn value_eq_opt(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|other| self.value_eq(other))
    }

    /// False unless `other` is exactly `Self`, whatever its fields hold.
    fn value_eq_any(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.value_eq(other))
    }

    fn value_hash(&self) -> u64 {
        Self::cache_entry().hash(self)
    }
}
