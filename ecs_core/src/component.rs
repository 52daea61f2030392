//! Component type identity: a stable, process-wide integer per `TypeId`.
//!
//! Adapted from a thread-safe component type registry: `DashMap` gives
//! lock-free reads on the common path, and the id counter is process-wide
//! (not per-[`crate::registry::Registry`]) because independent registries,
//! possibly on different threads, must still agree on the same integer for
//! the same Rust type.

use std::any::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use log::debug;

/// Marker trait for types that can be stored in a [`crate::registry::Registry`].
///
/// `#[derive(Component)]` (from `ecs_core_macros`) implements this for you;
/// it carries no required methods.
pub trait Component: 'static + Send + Sync {}

/// A stable integer identifying a component type, minted once per `TypeId`
/// by [`kind_of`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ComponentId(u32);

impl ComponentId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

struct KindRegistry {
    type_map: DashMap<TypeId, ComponentId>,
    next_id: AtomicU32,
}

impl KindRegistry {
    fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    fn kind_of<C: Component>(&self) -> ComponentId {
        let type_id = TypeId::of::<C>();
        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }
        *self
            .type_map
            .entry(type_id)
            .or_insert_with(|| {
                let id = ComponentId(self.next_id.fetch_add(1, Ordering::Relaxed));
                debug!("minted component id {} for {:?}", id.0, type_id);
                id
            })
            .value()
    }
}

static KINDS: OnceLock<KindRegistry> = OnceLock::new();

/// The stable [`ComponentId`] for `C`, minting one on first use.
///
/// This is process-wide: two [`crate::registry::Registry`] instances,
/// even on different threads, agree on the id for the same type.
pub fn kind_of<C: Component>() -> ComponentId {
    KINDS.get_or_init(KindRegistry::new).kind_of::<C>()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {}

    #[test]
    fn distinct_types_get_distinct_ids() {
        assert_ne!(kind_of::<Position>(), kind_of::<Velocity>());
    }

    #[test]
    fn the_same_type_always_gets_the_same_id() {
        assert_eq!(kind_of::<Position>(), kind_of::<Position>());
    }
}
