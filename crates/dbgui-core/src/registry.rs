#![forbid(unsafe_code)]

//! Key-ordered entry collection backing every widget bucket.
//!
//! Entries are kept sorted by their key using plain `str` ordering
//! (case-sensitive, by code point). Keys are unique: upserting an existing
//! key swaps the entry in place and hands the previous one back to the
//! caller, which is responsible for disposing of it.

/// An entry that can live in a [`SortedRegistry`].
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Index at which `key` must be inserted to keep `items` sorted: the first
/// position whose key is not less than `key`.
///
/// Binary search, `O(log n)`.
pub fn sorted_insert_index<T>(items: &[T], key: &str, key_of: impl Fn(&T) -> &str) -> usize {
    items.partition_point(|item| key_of(item) < key)
}

/// Structural change produced by one registry operation.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryChange<E> {
    /// A new key was inserted at `index`.
    Inserted { index: usize },
    /// An existing key at `index` now holds the new entry.
    Replaced { index: usize, previous: E },
    /// The key at `index` was removed.
    Removed { index: usize, previous: E },
    /// Removal of an absent key.
    Unchanged,
}

impl<E> RegistryChange<E> {
    /// The entry that left the registry, if any.
    pub fn into_previous(self) -> Option<E> {
        match self {
            Self::Replaced { previous, .. } | Self::Removed { previous, .. } => Some(previous),
            Self::Inserted { .. } | Self::Unchanged => None,
        }
    }
}

/// Sorted, key-unique collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedRegistry<E> {
    entries: Vec<E>,
}

impl<E> Default for SortedRegistry<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Keyed> SortedRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Ok(index)` if `key` is present, `Err(insert_index)` otherwise.
    pub fn position(&self, key: &str) -> Result<usize, usize> {
        let index = sorted_insert_index(&self.entries, key, Keyed::key);
        match self.entries.get(index) {
            Some(entry) if entry.key() == key => Ok(index),
            _ => Err(index),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&E> {
        self.position(key).ok().map(|index| &self.entries[index])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut E> {
        match self.position(key) {
            Ok(index) => Some(&mut self.entries[index]),
            Err(_) => None,
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_ok()
    }

    /// Entry at `index` in key order.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut E> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(Keyed::key)
    }

    /// Insert `entry`, or replace the entry that has the same key while
    /// keeping its position.
    pub fn upsert(&mut self, entry: E) -> RegistryChange<E> {
        match self.position(entry.key()) {
            Ok(index) => {
                let previous = std::mem::replace(&mut self.entries[index], entry);
                RegistryChange::Replaced { index, previous }
            }
            Err(index) => {
                self.entries.insert(index, entry);
                RegistryChange::Inserted { index }
            }
        }
    }

    /// Remove the entry for `key`; absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> RegistryChange<E> {
        match self.position(key) {
            Ok(index) => RegistryChange::Removed {
                index,
                previous: self.entries.remove(index),
            },
            Err(_) => RegistryChange::Unchanged,
        }
    }

    /// Remove every entry, returning them in key order.
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.entries.drain(..)
    }
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}
