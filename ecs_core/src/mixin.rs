//! Decorates a storage with construct/update/destruction signals.
//!
//! `emplace`/`patch`/`remove` forward to the wrapped storage, then fire the
//! matching `Sigh`: `on_construct` after insertion, `on_update` after
//! mutation, `on_destruction` before removal.
//!
//! Component signals need two arguments (`Entity`, `&mut C`), one more
//! than `crate::signal::Sigh<T>` carries, so this module defines its own
//! small delegate/sink pair for that shape rather than generalizing the
//! public one.

use std::any::Any;

use crate::entity::Entity;
use crate::entity_storage::EntityStorage;
use crate::signal::{Connection, Sigh, Sink};
use crate::storage::Storage;

#[derive(Clone, Copy, PartialEq, Eq)]
struct PayloadKey {
    instance: usize,
    function: usize,
}

struct PayloadSigh<C> {
    delegates: Vec<(PayloadKey, Box<dyn FnMut(Entity, &mut C)>)>,
}

impl<C> Default for PayloadSigh<C> {
    fn default() -> Self {
        Self {
            delegates: Vec::new(),
        }
    }
}

impl<C> PayloadSigh<C> {
    fn new() -> Self {
        Self::default()
    }

    fn trigger(&mut self, entity: Entity, payload: &mut C) {
        let mut pos = self.delegates.len();
        while pos > 0 {
            pos -= 1;
            if pos >= self.delegates.len() {
                continue;
            }
            let call: *mut (dyn FnMut(Entity, &mut C)) = &mut *self.delegates[pos].1;
            // SAFETY: mirrors `Sigh::trigger` - index-based so a
            // reentrant disconnect doesn't alias a live iterator.
            unsafe { (*call)(entity, payload) };
        }
    }

    fn insert(&mut self, key: PayloadKey, call: Box<dyn FnMut(Entity, &mut C)>) {
        self.delegates.push((key, call));
    }

    fn remove(&mut self, key: PayloadKey) {
        let mut i = self.delegates.len();
        while i > 0 {
            i -= 1;
            if self.delegates[i].0 == key {
                self.delegates.remove(i);
            }
        }
    }

    fn remove_by_instance(&mut self, instance: usize) {
        let mut i = self.delegates.len();
        while i > 0 {
            i -= 1;
            if self.delegates[i].0.instance == instance {
                self.delegates.remove(i);
            }
        }
    }
}

/// A [`Sink`]-equivalent over the two-argument component signal shape.
pub struct PayloadSink<'s, C> {
    sigh: &'s mut PayloadSigh<C>,
}

impl<'s, C> PayloadSink<'s, C> {
    fn new(sigh: &'s mut PayloadSigh<C>) -> Self {
        Self { sigh }
    }

    pub fn connect(&mut self, handler: fn(Entity, &mut C)) -> Connection {
        let key = PayloadKey {
            instance: 0,
            function: handler as usize,
        };
        self.sigh.remove(key);
        self.sigh.insert(key, Box::new(move |e, c| handler(e, c)));
        self.make_connection(key)
    }

    pub fn connect_with<P: 'static>(
        &mut self,
        handler: fn(&mut P, Entity, &mut C),
        payload: &mut P,
    ) -> Connection {
        let payload_ptr: *mut P = payload;
        let key = PayloadKey {
            instance: payload_ptr as usize,
            function: handler as usize,
        };
        self.sigh.remove(key);
        self.sigh.insert(
            key,
            Box::new(move |e, c| {
                // SAFETY: caller keeps `payload` alive while connected,
                // same contract as `signal::Sink::connect_with`.
                let payload = unsafe { &mut *payload_ptr };
                handler(payload, e, c)
            }),
        );
        self.make_connection(key)
    }

    pub fn disconnect(&mut self, handler: fn(Entity, &mut C)) {
        self.sigh.remove(PayloadKey {
            instance: 0,
            function: handler as usize,
        });
    }

    pub fn disconnect_payload<P>(&mut self, payload: &P) {
        self.sigh.remove_by_instance(payload as *const P as usize);
    }

    pub fn disconnect_all(&mut self) {
        self.sigh.delegates.clear();
    }

    fn make_connection(&mut self, key: PayloadKey) -> Connection {
        let sigh: *mut PayloadSigh<C> = self.sigh;
        Connection::new(Box::new(move || unsafe { (*sigh).remove(key) }))
    }
}

/// Trait object-safe surface the [`crate::registry::Registry`] uses once
/// it has downcast a pool to a concrete [`ComponentMixin`].
pub trait ErasedPool {
    fn contains(&self, entity: Entity) -> bool;
    fn remove_erased(&mut self, entity: Entity);
    fn len(&self) -> usize;
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A [`Storage<C>`] decorated with construct/update/destruction signals.
pub struct ComponentMixin<C> {
    storage: Storage<C>,
    on_construct: PayloadSigh<C>,
    on_update: PayloadSigh<C>,
    on_destruction: PayloadSigh<C>,
}

impl<C> Default for ComponentMixin<C> {
    fn default() -> Self {
        Self {
            storage: Storage::new(),
            on_construct: PayloadSigh::new(),
            on_update: PayloadSigh::new(),
            on_destruction: PayloadSigh::new(),
        }
    }
}

impl<C> ComponentMixin<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.storage.contains(entity)
    }

    pub fn entities(&self) -> impl DoubleEndedIterator<Item = Entity> + '_ {
        self.storage.entities()
    }

    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.storage.get(entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.storage.get_mut(entity)
    }

    /// Inserts `value`, then fires `on_construct` with the freshly
    /// inserted payload.
    pub fn emplace(&mut self, entity: Entity, value: C) -> &mut C {
        self.storage.emplace(entity, value);
        let payload = self.storage.get_mut(entity).expect("just inserted");
        self.on_construct.trigger(entity, payload);
        self.storage.get_mut(entity).expect("just inserted")
    }

    /// Applies `f` to `entity`'s payload, then fires `on_update`.
    pub fn patch(&mut self, entity: Entity, f: impl FnOnce(&mut C)) {
        let payload = self.storage.get_mut(entity).expect("entity not found");
        f(payload);
        let payload = self.storage.get_mut(entity).expect("entity not found");
        self.on_update.trigger(entity, payload);
    }

    /// Fires `on_destruction` with the still-present payload, then removes
    /// it.
    pub fn remove(&mut self, entity: Entity) -> C {
        {
            let payload = self.storage.get_mut(entity).expect("entity not found");
            self.on_destruction.trigger(entity, payload);
        }
        self.storage.remove(entity)
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }

    pub fn on_construct(&mut self) -> PayloadSink<'_, C> {
        PayloadSink::new(&mut self.on_construct)
    }

    pub fn on_update(&mut self) -> PayloadSink<'_, C> {
        PayloadSink::new(&mut self.on_update)
    }

    pub fn on_destruction(&mut self) -> PayloadSink<'_, C> {
        PayloadSink::new(&mut self.on_destruction)
    }
}

impl<C: 'static> ErasedPool for ComponentMixin<C> {
    fn contains(&self, entity: Entity) -> bool {
        ComponentMixin::contains(self, entity)
    }

    fn remove_erased(&mut self, entity: Entity) {
        ComponentMixin::remove(self, entity);
    }

    fn len(&self) -> usize {
        ComponentMixin::len(self)
    }

    fn clear(&mut self) {
        ComponentMixin::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The entity allocator, decorated the same way: `on_construct` after
/// `create`, `on_destruction` before `destroy`. No `on_update` - entity
/// ids have no payload to mutate.
#[derive(Default)]
pub struct EntityMixin {
    storage: EntityStorage,
    on_construct: Sigh<Entity>,
    on_destruction: Sigh<Entity>,
}

impl EntityMixin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn alive(&self, entity: Entity) -> bool {
        self.storage.alive(entity)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Entity> + '_ {
        self.storage.iter()
    }

    pub fn create(&mut self) -> Entity {
        let mut entity = self.storage.create();
        self.on_construct.trigger(&mut entity);
        entity
    }

    pub fn destroy(&mut self, entity: Entity) {
        let mut doomed = entity;
        self.on_destruction.trigger(&mut doomed);
        self.storage.destroy(entity);
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }

    pub fn on_construct(&mut self) -> Sink<'_, Entity> {
        Sink::new(&mut self.on_construct)
    }

    pub fn on_destruction(&mut self) -> Sink<'_, Entity> {
        Sink::new(&mut self.on_destruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    fn e(index: u32) -> Entity {
        Entity::from_raw_parts(index, 0)
    }

    #[test]
    fn emplace_fires_on_construct_after_insertion() {
        let mut mixin: ComponentMixin<Position> = ComponentMixin::new();
        let mut seen: Option<f32> = None;
        mixin
            .on_construct()
            .connect_with(|seen: &mut Option<f32>, _e, p: &mut Position| *seen = Some(p.x), &mut seen);

        mixin.emplace(e(1), Position { x: 1.0, y: 2.0 });
        assert_eq!(seen, Some(1.0));
    }

    #[test]
    fn patch_fires_on_update_with_the_mutated_value() {
        let mut mixin: ComponentMixin<Position> = ComponentMixin::new();
        mixin.emplace(e(1), Position { x: 0.0, y: 0.0 });

        let mut seen_x = 0.0f32;
        mixin
            .on_update()
            .connect_with(|seen: &mut f32, _e, p: &mut Position| *seen = p.x, &mut seen_x);

        mixin.patch(e(1), |p| p.x = 9.0);
        assert_eq!(seen_x, 9.0);
    }

    #[test]
    fn remove_fires_on_destruction_while_the_payload_still_exists() {
        let mut mixin: ComponentMixin<Position> = ComponentMixin::new();
        mixin.emplace(e(1), Position { x: 5.0, y: 5.0 });

        let mut still_there = false;
        mixin.on_destruction().connect_with(
            |still_there: &mut bool, entity, _p: &mut Position| {
                *still_there = entity == e(1);
            },
            &mut still_there,
        );

        mixin.remove(e(1));
        assert!(still_there);
        assert!(!mixin.contains(e(1)));
    }

    #[test]
    fn entity_mixin_fires_construct_and_destruction_around_the_entity_only() {
        let mut mixin = EntityMixin::new();
        let mut created = None;
        mixin
            .on_construct()
            .connect_with(|seen: &mut Option<Entity>, e: &mut Entity| *seen = Some(*e), &mut created);

        let entity = mixin.create();
        assert_eq!(created, Some(entity));

        let mut destroyed = None;
        mixin
            .on_destruction()
            .connect_with(|seen: &mut Option<Entity>, e: &mut Entity| *seen = Some(*e), &mut destroyed);

        mixin.destroy(entity);
        assert_eq!(destroyed, Some(entity));
        assert!(!mixin.alive(entity));
    }
}
