//! Arena storage for controller state records.
//!
//! Widgets hold a [`StateId`] rather than a reference to their state, so a
//! record survives widget rebuilds and a rebuilt widget can re-bind the same
//! handle. Handles are generational: once a slot is freed and reused, every
//! handle issued for the old occupant stops resolving.
//!
//! Records live in a dense `Vec` with a sparse index on top, so removal is a
//! swap-remove and iteration stays contiguous.

use crate::error::{Error, Result};

/// Stable handle to a record in a [`StateArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StateId {
    index: u32,
    generation: u32,
}

impl StateId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

struct Slot {
    /// Generation of the current (or most recent) occupant
    generation: u32,
    /// Position in the dense array, `None` while the slot is free
    dense_index: Option<usize>,
}

struct Entry<T> {
    value: T,
    /// Back-pointer to the sparse slot (for swap-remove fixup)
    sparse_index: u32,
}

/// Generational arena of state records.
pub struct StateArena<T> {
    dense: Vec<Entry<T>>,
    sparse: Vec<Slot>,
    free_indices: Vec<u32>,
}

impl<T> StateArena<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    /// Store a record and return its handle.
    pub fn insert(&mut self, value: T) -> StateId {
        let dense_index = self.dense.len();
        let (index, generation) = match self.free_indices.pop() {
            Some(index) => {
                let slot = &mut self.sparse[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.dense_index = Some(dense_index);
                (index, slot.generation)
            }
            None => {
                let index = self.sparse.len() as u32;
                self.sparse.push(Slot {
                    generation: 0,
                    dense_index: Some(dense_index),
                });
                (index, 0)
            }
        };

        self.dense.push(Entry {
            value,
            sparse_index: index,
        });
        StateId { index, generation }
    }

    /// Remove a record, returning it if the handle was live.
    pub fn remove(&mut self, id: StateId) -> Option<T> {
        let dense_index = self.dense_index(id)?;
        let removed = self.dense.swap_remove(dense_index);

        // Fix up the entry that was moved into the hole
        if let Some(moved) = self.dense.get(dense_index) {
            self.sparse[moved.sparse_index as usize].dense_index = Some(dense_index);
        }

        self.sparse[id.index as usize].dense_index = None;
        self.free_indices.push(id.index);
        Some(removed.value)
    }

    fn dense_index(&self, id: StateId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.dense_index)
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.dense_index(id).is_some()
    }

    pub fn get(&self, id: StateId) -> Option<&T> {
        self.dense_index(id).map(|i| &self.dense[i].value)
    }

    pub fn get_mut(&mut self, id: StateId) -> Option<&mut T> {
        let i = self.dense_index(id)?;
        Some(&mut self.dense[i].value)
    }

    /// Like [`get`](Self::get), but reports a stale handle as an error.
    pub fn try_get(&self, id: StateId) -> Result<&T> {
        self.get(id).ok_or(Error::StaleHandle(id))
    }

    /// Like [`get_mut`](Self::get_mut), but reports a stale handle as an error.
    pub fn try_get_mut(&mut self, id: StateId) -> Result<&mut T> {
        match self.dense_index(id) {
            Some(i) => Ok(&mut self.dense[i].value),
            None => {
                log::warn!("state handle {:?} is stale", id);
                Err(Error::StaleHandle(id))
            }
        }
    }

    /// Re-bind a widget to its state.
    ///
    /// Returns `existing` when it still resolves; otherwise stores `init()`
    /// and returns the new handle.
    pub fn bind(&mut self, existing: Option<StateId>, init: impl FnOnce() -> T) -> StateId {
        match existing {
            Some(id) if self.contains(id) => id,
            _ => self.insert(init()),
        }
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterate over every live record, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &T)> {
        self.dense.iter().map(move |entry| {
            let id = StateId {
                index: entry.sparse_index,
                generation: self.sparse[entry.sparse_index as usize].generation,
            };
            (id, &entry.value)
        })
    }
}

impl<T> Default for StateArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut arena = StateArena::new();
        let id = arena.insert("a".to_string());
        assert_eq!(arena.get(id).map(String::as_str), Some("a"));
        assert_eq!(arena.remove(id).as_deref(), Some("a"));
        assert!(!arena.contains(id));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_generational_index() {
        let mut arena = StateArena::new();
        let id1 = arena.insert(1);
        arena.remove(id1);

        let id2 = arena.insert(2);
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
        assert!(arena.get(id1).is_none());
        assert_eq!(arena.get(id2), Some(&2));

        arena.remove(id2);
        let id3 = arena.insert(3);
        assert_ne!(id3.generation(), id2.generation());
        assert!(!arena.contains(id2));
    }

    #[test]
    fn test_swap_remove_keeps_other_handles_valid() {
        let mut arena = StateArena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        let c = arena.insert('c');

        arena.remove(a);
        assert_eq!(arena.get(b), Some(&'b'));
        assert_eq!(arena.get(c), Some(&'c'));
        assert_eq!(arena.len(), 2);

        let ids: Vec<StateId> = arena.iter().map(|(id, _)| id).collect();
        assert!(ids.contains(&b) && ids.contains(&c));
    }

    #[test]
    fn test_stale_handle_error() {
        let mut arena = StateArena::new();
        let id = arena.insert(0u8);
        arena.remove(id);
        assert_eq!(arena.try_get_mut(id), Err(Error::StaleHandle(id)));
        assert!(arena.try_get(id).is_err());
    }

    #[test]
    fn test_bind_reuses_live_handle() {
        let mut arena = StateArena::new();
        let id = arena.bind(None, || 5);
        assert_eq!(arena.bind(Some(id), || 99), id);
        assert_eq!(arena.get(id), Some(&5));

        arena.remove(id);
        let rebound = arena.bind(Some(id), || 7);
        assert_ne!(rebound, id);
        assert_eq!(arena.get(rebound), Some(&7));
    }
}
