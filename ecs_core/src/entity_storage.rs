//! The specialized storage that hands out and recycles [`Entity`] values
//! themselves, rather than component payloads.
//!
//! `packed[0..length)` are live; `packed[length..]` is a tail of freed
//! slots whose version has already been bumped, waiting to be handed back
//! out by [`EntityStorage::create`]. That tail is never shrunk.

use log::warn;

use crate::entity::{Entity, INDEX_MASK};
use crate::sparse_set::SparseSet;

#[derive(Default)]
pub struct EntityStorage {
    set: SparseSet,
    length: usize,
}

impl EntityStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently-live entities.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Size of the full packed array, live and recycled slots combined.
    pub fn base_size(&self) -> usize {
        self.set.len()
    }

    /// Hand out a live entity: a recycled slot if the free tail is
    /// non-empty, otherwise a fresh index at version 0.
    pub fn create(&mut self) -> Entity {
        if self.length < self.base_size() {
            let entity = self.set.packed()[self.length];
            self.length += 1;
            entity
        } else {
            let index = self.base_size() as u32;
            if index + 1 >= INDEX_MASK {
                warn!("entity index space nearly exhausted: {} of {} in use", index, INDEX_MASK);
            }
            assert!(index < INDEX_MASK, "entity index space exhausted");
            let entity = Entity::from_raw_parts(index, 0);
            self.set.insert(entity);
            self.length += 1;
            entity
        }
    }

    /// Authoritative liveness check: `entity`'s slot must be within the
    /// live region and match both index and version exactly.
    pub fn alive(&self, entity: Entity) -> bool {
        match self.set.index_of(entity) {
            Some(pos) => pos < self.length && self.set.packed()[pos] == entity,
            None => false,
        }
    }

    /// Retire `entity`, which must be [`EntityStorage::alive`]: swap it to
    /// the tail of the live region, bump its version in place, and shrink
    /// `length`.
    pub fn destroy(&mut self, entity: Entity) {
        assert!(self.alive(entity), "entity not found");
        let last = self.set.packed()[self.length - 1];
        self.set.swap(entity, last);
        let pos = self.length - 1;
        let bumped = self.set.packed()[pos].bump_version();
        self.set.packed_mut()[pos] = bumped;
        self.length -= 1;
    }

    pub fn clear(&mut self) {
        self.set.clear();
        self.length = 0;
    }

    /// Live entities, in reverse of their current packed order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Entity> + '_ {
        self.set.packed()[..self.length].iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_lifecycle_creates_destroys_and_recycles_correctly() {
        // Given a fresh entity storage
        let mut storage = EntityStorage::new();

        // When creating two entities
        let e0 = storage.create();
        let e1 = storage.create();

        // Then they get sequential indices at version 0
        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), 1);
        assert_eq!(e0.version(), 0);
        assert_eq!(e1.version(), 0);

        // When destroying e0
        storage.destroy(e0);

        // Then e0 is dead and e1 remains alive
        assert!(!storage.alive(e0));
        assert!(storage.alive(e1));

        // And the next create recycles e0's index at a bumped version
        let recycled = storage.create();
        assert_eq!(recycled.index(), 0);
        assert_eq!(recycled.version(), 1);
    }

    #[test]
    fn two_successive_creates_sharing_a_slot_get_distinct_versions() {
        let mut storage = EntityStorage::new();
        let e0 = storage.create();
        storage.destroy(e0);
        let reused_once = storage.create();
        storage.destroy(reused_once);
        let reused_twice = storage.create();

        assert_ne!(reused_once.version(), reused_twice.version());
        assert_ne!(reused_twice.version(), crate::entity::VERSION_MASK);
    }

    #[test]
    fn destroying_a_non_tail_entity_keeps_others_alive() {
        let mut storage = EntityStorage::new();
        let e0 = storage.create();
        let e1 = storage.create();
        let e2 = storage.create();

        storage.destroy(e1);

        assert!(storage.alive(e0));
        assert!(!storage.alive(e1));
        assert!(storage.alive(e2));
        assert_eq!(storage.len(), 2);
    }

    #[test]
    #[should_panic(expected = "entity not found")]
    fn destroying_a_dead_entity_panics() {
        let mut storage = EntityStorage::new();
        let e0 = storage.create();
        storage.destroy(e0);
        storage.destroy(e0);
    }
}
