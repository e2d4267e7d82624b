//! The name types the benchmark compares: one derived, one written by hand.

use std::hash::{Hash, Hasher};

use value_entity::{combine, FieldType, SEED};
use value_entity_derive::ValueEntity;

#[derive(Debug, Clone, ValueEntity)]
pub struct PersonName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonName {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
        }
    }
}

/// The same shape as [`PersonName`] with equality and hashing written out by hand. Produces
/// the same hashes as the derived type.
#[derive(Debug, Clone)]
pub struct PersonNameHandCoded {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonNameHandCoded {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
        }
    }

    pub fn hand_hash(&self) -> u64 {
        let first = self.first_name.as_ref().map_or(0, FieldType::field_hash);
        let last = self.last_name.as_ref().map_or(0, FieldType::field_hash);
        combine(combine(SEED, first), last)
    }
}

impl PartialEq for PersonNameHandCoded {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name && self.last_name == other.last_name
    }
}

impl Eq for PersonNameHandCoded {}

impl Hash for PersonNameHandCoded {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hand_hash());
    }
}

/// The benchmark's input: `count` names whose parts repeat every ten entries.
pub fn sample_names(count: usize) -> impl Iterator<Item = (String, String)> {
    (1..=count).map(|i| ("f".repeat(i % 10), "s".repeat(i % 10)))
}
