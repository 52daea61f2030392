//! Lazy iterables joining N component pools.
//!
//! View construction picks the smallest of the N pools (ties broken by
//! first occurrence), snapshots its entities, and filters that snapshot
//! against `contains` on the rest. Each arity gets its own monomorphized
//! implementation rather than attempting true variadic generics, covering
//! the two arities this crate actually needs.
//!
//! Snapshots are taken in this crate's standing reverse-of-insertion
//! iteration order (see `SparseSet`'s doc comment), so no extra reversal
//! is needed once the filtered list is built - filtering preserves order.

use crate::component::Component;
use crate::entity::Entity;
use crate::registry::Registry;

/// A one-shot snapshot over entities carrying both `A` and `B`.
pub struct View2<'r, A, B> {
    registry: &'r Registry,
    entities: std::vec::IntoIter<Entity>,
    _marker: std::marker::PhantomData<(A, B)>,
}

impl<'r, A: Component, B: Component> View2<'r, A, B> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        let len_a = registry.pool::<A>().map(|p| p.len()).unwrap_or(0);
        let len_b = registry.pool::<B>().map(|p| p.len()).unwrap_or(0);

        let entities: Vec<Entity> = if len_a <= len_b {
            registry
                .pool::<A>()
                .map(|p| p.entities().filter(|e| registry.has::<B>(*e)).collect())
                .unwrap_or_default()
        } else {
            registry
                .pool::<B>()
                .map(|p| p.entities().filter(|e| registry.has::<A>(*e)).collect())
                .unwrap_or_default()
        };

        Self {
            registry,
            entities: entities.into_iter(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'r, A: Component, B: Component> Iterator for View2<'r, A, B> {
    type Item = (Entity, &'r A, &'r B);

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.entities.next()?;
        let a = self.registry.get::<A>(entity)?;
        let b = self.registry.get::<B>(entity)?;
        Some((entity, a, b))
    }
}

/// A one-shot snapshot over entities carrying `A`, `B`, and `C`.
pub struct View3<'r, A, B, C> {
    registry: &'r Registry,
    entities: std::vec::IntoIter<Entity>,
    _marker: std::marker::PhantomData<(A, B, C)>,
}

impl<'r, A: Component, B: Component, C: Component> View3<'r, A, B, C> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        let len_a = registry.pool::<A>().map(|p| p.len()).unwrap_or(0);
        let len_b = registry.pool::<B>().map(|p| p.len()).unwrap_or(0);
        let len_c = registry.pool::<C>().map(|p| p.len()).unwrap_or(0);

        let entities: Vec<Entity> = if len_a <= len_b && len_a <= len_c {
            registry
                .pool::<A>()
                .map(|p| {
                    p.entities()
                        .filter(|e| registry.has::<B>(*e) && registry.has::<C>(*e))
                        .collect()
                })
                .unwrap_or_default()
        } else if len_b <= len_c {
            registry
                .pool::<B>()
                .map(|p| {
                    p.entities()
                        .filter(|e| registry.has::<A>(*e) && registry.has::<C>(*e))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            registry
                .pool::<C>()
                .map(|p| {
                    p.entities()
                        .filter(|e| registry.has::<A>(*e) && registry.has::<B>(*e))
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            registry,
            entities: entities.into_iter(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'r, A: Component, B: Component, C: Component> Iterator for View3<'r, A, B, C> {
    type Item = (Entity, &'r A, &'r B, &'r C);

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.entities.next()?;
        let a = self.registry.get::<A>(entity)?;
        let b = self.registry.get::<B>(entity)?;
        let c = self.registry.get::<C>(entity)?;
        Some((entity, a, b, c))
    }
}
