//! Owns the entity allocator, one storage per component kind, and the
//! event dispatcher; routes every typed request to the right pool.
//!
//! Pools live in a vector indexed by the stable per-type integer from
//! [`crate::component::kind_of`], lazily sized and populated on first use
//! in [`Registry::pool_mut`].

use log::trace;

use crate::component::{self, Component, ComponentId};
use crate::dispatcher::Dispatcher;
use crate::entity::Entity;
use crate::mixin::{ComponentMixin, EntityMixin, ErasedPool, PayloadSink};
use crate::signal::{Event, Sink};
use crate::view::{View2, View3};

#[derive(Default)]
pub struct Registry {
    entities: EntityMixin,
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    dispatcher: Dispatcher,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Entity {
        self.entities.create()
    }

    pub fn alive(&self, entity: Entity) -> bool {
        self.entities.alive(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities currently alive, in reverse of creation order.
    pub fn entities(&self) -> impl DoubleEndedIterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Removes `entity` from every pool that still holds it (firing each
    /// pool's `on_destruction`), then retires the id itself.
    pub fn destroy(&mut self, entity: Entity) {
        assert!(self.alive(entity), "entity not found");
        trace!("destroying {:?}", entity);
        for slot in self.pools.iter_mut().flatten() {
            if slot.contains(entity) {
                slot.remove_erased(entity);
            }
        }
        self.entities.destroy(entity);
    }

    pub fn emplace<C: Component>(&mut self, entity: Entity, value: C) -> &mut C {
        self.pool_mut::<C>().emplace(entity, value)
    }

    pub fn patch<C: Component>(&mut self, entity: Entity, f: impl FnOnce(&mut C)) {
        self.pool_mut::<C>().patch(entity, f)
    }

    pub fn replace<C: Component>(&mut self, entity: Entity, value: C) {
        self.patch::<C>(entity, move |slot| *slot = value);
    }

    pub fn remove<C: Component>(&mut self, entity: Entity) -> C {
        self.pool_mut::<C>().remove(entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.pool::<C>().is_some_and(|pool| pool.contains(entity))
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.pool::<C>()?.get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.pool_mut_existing::<C>()?.get_mut(entity)
    }

    pub fn view2<A: Component, B: Component>(&self) -> View2<'_, A, B> {
        View2::new(self)
    }

    pub fn view3<A: Component, B: Component, C: Component>(&self) -> View3<'_, A, B, C> {
        View3::new(self)
    }

    pub fn on_construct<C: Component>(&mut self) -> PayloadSink<'_, C> {
        self.pool_mut::<C>().on_construct()
    }

    pub fn on_update<C: Component>(&mut self) -> PayloadSink<'_, C> {
        self.pool_mut::<C>().on_update()
    }

    pub fn on_destruction<C: Component>(&mut self) -> PayloadSink<'_, C> {
        self.pool_mut::<C>().on_destruction()
    }

    pub fn on_entity_construct(&mut self) -> Sink<'_, Entity> {
        self.entities.on_construct()
    }

    pub fn on_entity_destruction(&mut self) -> Sink<'_, Entity> {
        self.entities.on_destruction()
    }

    pub fn trigger<E: Event>(&mut self, event: E) {
        self.dispatcher.trigger(event);
    }

    pub fn enqueue<E: Event>(&mut self, event: E) {
        self.dispatcher.enqueue(event);
    }

    pub fn update(&mut self) {
        self.dispatcher.update();
    }

    /// Drains only `E`'s deferred queue, leaving every other event kind's
    /// queue untouched.
    pub fn update_one<E: Event>(&mut self) {
        self.dispatcher.update_one::<E>();
    }

    /// Discards every event kind's queued-but-undelivered events without
    /// triggering their subscribers.
    pub fn clear_events(&mut self) {
        self.dispatcher.clear();
    }

    /// Discards only `E`'s queued-but-undelivered events.
    pub fn clear_events_one<E: Event>(&mut self) {
        self.dispatcher.clear_one::<E>();
    }

    pub fn on_event<E: Event>(&mut self) -> Sink<'_, E> {
        self.dispatcher.sink::<E>()
    }

    /// Clears entity storage and every component pool. Component pools'
    /// `on_destruction` is not fired on a bulk clear, only `remove` fires
    /// it.
    pub fn clear(&mut self) {
        for slot in self.pools.iter_mut().flatten() {
            slot.clear();
        }
        self.entities.clear();
    }

    pub(crate) fn pool<C: Component>(&self) -> Option<&ComponentMixin<C>> {
        let id = component::kind_of::<C>();
        self.pools
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentMixin<C>>()
    }

    fn pool_mut_existing<C: Component>(&mut self) -> Option<&mut ComponentMixin<C>> {
        let id = component::kind_of::<C>();
        self.pools
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentMixin<C>>()
    }

    /// Lazily sizes the pool vector and constructs `C`'s storage on first
    /// use.
    fn pool_mut<C: Component>(&mut self) -> &mut ComponentMixin<C> {
        let id: ComponentId = component::kind_of::<C>();
        if id.index() >= self.pools.len() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        self.pools[id.index()]
            .get_or_insert_with(|| Box::new(ComponentMixin::<C>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentMixin<C>>()
            .expect("component pool type mismatch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    struct Point {
        x: f32,
        y: f32,
    }
    impl Component for Point {}

    struct Marker;
    impl Component for Marker {}

    struct Other;
    impl Component for Other {}

    #[derive(Clone, Copy)]
    struct Tick;
    impl Event for Tick {}

    #[test]
    fn emplace_then_get_roundtrips_and_has_reports_membership() {
        let mut registry = Registry::new();
        let e = registry.create();
        let other = registry.create();

        registry.emplace(e, Point { x: 1.0, y: 3.0 });

        assert_eq!(registry.get::<Point>(e), Some(&Point { x: 1.0, y: 3.0 }));
        assert!(registry.has::<Point>(e));
        assert!(!registry.has::<Point>(other));
    }

    #[test]
    fn destroy_removes_an_entity_from_every_pool_it_was_in() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.emplace(e, Point { x: 0.0, y: 0.0 });
        registry.emplace(e, Marker);

        registry.destroy(e);

        assert!(!registry.alive(e));
        assert!(!registry.has::<Point>(e));
        assert!(!registry.has::<Marker>(e));
    }

    #[test]
    fn view2_yields_exactly_the_entities_with_both_components() {
        let mut registry = Registry::new();
        let e1 = registry.create();
        let e2 = registry.create();
        let e3 = registry.create();
        let e4 = registry.create();

        registry.emplace(e1, Point { x: 0.0, y: 0.0 });
        registry.emplace(e1, Marker);

        registry.emplace(e2, Point { x: 1.0, y: 1.0 });
        registry.emplace(e2, Marker);
        registry.emplace(e2, Other);

        registry.emplace(e3, Point { x: 2.0, y: 2.0 });

        let _ = e4;

        let mut seen: Vec<Entity> = registry.view2::<Point, Marker>().map(|(e, ..)| e).collect();
        seen.sort_by_key(|e| e.index());
        assert_eq!(seen, vec![e1, e2]);
    }

    #[test]
    fn view2_is_empty_when_one_pool_never_existed() {
        let mut registry = Registry::new();
        let e1 = registry.create();
        registry.emplace(e1, Point { x: 0.0, y: 0.0 });

        assert_eq!(registry.view2::<Point, Other>().count(), 0);
    }

    #[test]
    fn dispatcher_operations_are_reachable_through_the_registry() {
        let mut registry = Registry::new();
        let mut count = 0i32;
        registry
            .on_event::<Tick>()
            .connect_with(|count: &mut i32, _: &mut Tick| *count += 1, &mut count);

        registry.trigger(Tick);
        registry.enqueue(Tick);
        registry.update();

        assert_eq!(count, 2);
    }

    #[test]
    fn update_one_and_clear_events_are_reachable_through_the_registry() {
        let mut registry = Registry::new();
        let mut count = 0i32;
        registry
            .on_event::<Tick>()
            .connect_with(|count: &mut i32, _: &mut Tick| *count += 1, &mut count);

        registry.enqueue(Tick);
        registry.update_one::<Tick>();
        assert_eq!(count, 1);

        registry.enqueue(Tick);
        registry.clear_events_one::<Tick>();
        registry.update();
        assert_eq!(count, 1);

        registry.enqueue(Tick);
        registry.clear_events();
        registry.update();
        assert_eq!(count, 1);
    }
}
