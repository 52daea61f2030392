//! The dense/sparse pair at the heart of every pool: a `packed` array of
//! live entities and a paged `sparse` array mapping an entity's index to
//! its position in `packed`.
//!
//! Pages are allocated lazily and never released, even once every entity
//! in that page has been removed - a page that's been touched once stays
//! allocated for the lifetime of the set.

use crate::config::{NPOS, PAGE_SIZE};
use crate::entity::Entity;

type Page = Box<[u32; PAGE_SIZE]>;

fn new_page() -> Page {
    Box::new([NPOS; PAGE_SIZE])
}

fn page_of(index: u32) -> usize {
    (index as usize) / PAGE_SIZE
}

fn offset_of(index: u32) -> usize {
    (index as usize) % PAGE_SIZE
}

/// Dense/sparse membership index over [`Entity`] values, with swap-and-pop
/// removal and reverse-order iteration.
#[derive(Default)]
pub struct SparseSet {
    packed: Vec<Entity>,
    sparse: Vec<Option<Page>>,
}

impl SparseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities currently tracked.
    pub fn len(&self) -> usize {
        self.packed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packed.is_empty()
    }

    /// The dense array, in insertion order (not iteration order).
    pub fn packed(&self) -> &[Entity] {
        &self.packed
    }

    /// Whether `entity`'s index is present. Matches on the index field
    /// only, not the version - version-aware liveness is the entity
    /// storage's job (see `EntityStorage::alive`), not a plain sparse
    /// set's.
    pub fn contains(&self, entity: Entity) -> bool {
        self.index_of(entity).is_some()
    }

    /// The dense-array position of `entity`'s index, if present.
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        let page = self.sparse.get(page_of(entity.index()))?.as_ref()?;
        let pos = page[offset_of(entity.index())];
        if pos != NPOS && self.packed[pos as usize].index() == entity.index() {
            Some(pos as usize)
        } else {
            None
        }
    }

    /// Insert `entity`, which must not already be present.
    pub fn insert(&mut self, entity: Entity) {
        assert!(!entity.is_null(), "invalid entity");
        assert!(!self.contains(entity), "entity already exists");
        self.packed.push(entity);
        let pos = (self.packed.len() - 1) as u32;
        self.assure_page(page_of(entity.index()))[offset_of(entity.index())] = pos;
    }

    /// Remove `entity`, which must be present, via swap-and-pop with the
    /// last packed element.
    pub fn remove(&mut self, entity: Entity) {
        let pos = self.index_of(entity).expect("entity not found");
        let last = *self.packed.last().unwrap();
        self.packed[pos] = last;
        self.set_sparse(last, pos as u32);
        self.set_sparse(entity, NPOS);
        self.packed.pop();
    }

    /// Swap the packed positions of two present entities, updating both
    /// sparse slots to match. Used by entity storage to shuffle a freed
    /// slot to the tail without disturbing anyone else's position.
    pub fn swap(&mut self, lhs: Entity, rhs: Entity) {
        let lhs_pos = self.index_of(lhs).expect("entity not found");
        let rhs_pos = self.index_of(rhs).expect("entity not found");
        self.packed.swap(lhs_pos, rhs_pos);
        self.set_sparse(self.packed[lhs_pos], lhs_pos as u32);
        self.set_sparse(self.packed[rhs_pos], rhs_pos as u32);
    }

    pub fn clear(&mut self) {
        self.packed.clear();
        self.sparse.clear();
    }

    /// Mutable access to the packed array for entity storage's in-place
    /// version bump, which changes a slot's version but never its index,
    /// so the sparse mapping (keyed only by index) needs no update.
    pub(crate) fn packed_mut(&mut self) -> &mut [Entity] {
        &mut self.packed
    }

    /// Iterate in reverse of insertion order, matching the contract every
    /// pool and view in this crate follows.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Entity> + '_ {
        self.packed.iter().rev().copied()
    }

    fn assure_page(&mut self, page: usize) -> &mut Page {
        if page >= self.sparse.len() {
            self.sparse.resize_with(page + 1, || None);
        }
        self.sparse[page].get_or_insert_with(new_page)
    }

    fn set_sparse(&mut self, entity: Entity, pos: u32) {
        let page = self.assure_page(page_of(entity.index()));
        page[offset_of(entity.index())] = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(index: u32, version: u32) -> Entity {
        Entity::from_raw_parts(index, version)
    }

    #[test]
    fn insert_then_contains() {
        let mut set = SparseSet::new();
        set.insert(e(3, 0));
        assert!(set.contains(e(3, 0)));
        assert!(!set.contains(e(4, 0)));
    }

    #[test]
    fn contains_matches_on_index_regardless_of_version() {
        let mut set = SparseSet::new();
        set.insert(e(3, 0));
        assert!(set.contains(e(3, 1)));
    }

    #[test]
    fn remove_swaps_with_the_last_element() {
        let mut set = SparseSet::new();
        set.insert(e(1, 0));
        set.insert(e(2, 0));
        set.insert(e(3, 0));

        set.remove(e(1, 0));

        assert!(!set.contains(e(1, 0)));
        assert!(set.contains(e(2, 0)));
        assert!(set.contains(e(3, 0)));
        assert_eq!(set.len(), 2);
        // Given is_full index of 1 (entity 1) was removed
        // Then entity 3 (previously last) moved into its slot
        assert_eq!(set.packed()[0], e(3, 0));
    }

    #[test]
    fn iteration_is_reverse_of_insertion_order() {
        let mut set = SparseSet::new();
        set.insert(e(1, 0));
        set.insert(e(2, 0));
        set.insert(e(3, 0));

        let order: Vec<_> = set.iter().map(|ent| ent.index()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn pages_span_the_configured_page_size() {
        let mut set = SparseSet::new();
        let far_index = (PAGE_SIZE * 3 + 7) as u32;
        set.insert(e(far_index, 0));
        assert!(set.contains(e(far_index, 0)));
    }

    #[test]
    #[should_panic(expected = "entity already exists")]
    fn inserting_twice_panics() {
        let mut set = SparseSet::new();
        set.insert(e(1, 0));
        set.insert(e(1, 0));
    }

    #[test]
    #[should_panic(expected = "entity not found")]
    fn removing_absent_entity_panics() {
        let mut set = SparseSet::new();
        set.remove(e(1, 0));
    }
}
