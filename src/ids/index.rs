use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Serialize};

/// A stable mapping between entity ids and dense slots.
///
/// Slots are handed out in insertion order and never change, so they can be used to
/// index the rows of the model's factor matrices.
///
/// Serialized as the ordered list of ids; the reverse map is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<T>",
    into = "Vec<T>",
    bound(serialize = "T: Clone + Serialize", deserialize = "T: Eq + Hash + Clone + Deserialize<'de>")
)]
pub struct IdIndex<T: Eq + Hash + Clone> {
    ids: Vec<T>,
    slots: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> Default for IdIndex<T> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> IdIndex<T> {
    /// Creates a new empty `IdIndex`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an id if it's not present yet.
    ///
    /// # Arguments
    /// * `id` - The id to insert.
    ///
    /// # Returns
    /// The slot of the id and whether it was newly inserted.
    pub fn insert(&mut self, id: T) -> (usize, bool) {
        if let Some(&slot) = self.slots.get(&id) {
            return (slot, false);
        }

        let slot = self.ids.len();
        self.slots.insert(id.clone(), slot);
        self.ids.push(id);
        (slot, true)
    }

    /// Returns the slot of the given id, if it was ever inserted.
    pub fn slot(&self, id: &T) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Returns the id stored at the given slot.
    pub fn id(&self, slot: usize) -> Option<&T> {
        self.ids.get(slot)
    }

    pub fn contains(&self, id: &T) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates the ids in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ids.iter()
    }
}

impl<T: Eq + Hash + Clone> From<Vec<T>> for IdIndex<T> {
    fn from(value: Vec<T>) -> Self {
        let mut index = Self::new();
        for id in value {
            index.insert(id);
        }
        index
    }
}

impl<T: Eq + Hash + Clone> From<IdIndex<T>> for Vec<T> {
    fn from(value: IdIndex<T>) -> Self {
        value.ids
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for IdIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut index = Self::new();
        for id in iter {
            index.insert(id);
        }
        index
    }
}
