//! A sparse-set entity-component-system core: entity allocation with
//! version recycling, typed component storage, a signal/observer
//! subsystem, an event dispatcher, and views over N component pools.
//!
//! `extern crate self as ecs_core` lets `#[derive(Component)]` and
//! `#[derive(Event)]` (from `ecs_core_macros`) emit `::ecs_core::...`
//! paths that resolve the same way whether the derive is used inside this
//! crate's own tests or by a downstream consumer.
extern crate self as ecs_core;

mod component;
mod config;
mod dispatcher;
mod entity;
mod entity_storage;
mod mixin;
mod registry;
mod signal;
mod sparse_set;
mod storage;
mod view;

pub use component::{kind_of, Component, ComponentId};
pub use config::{NPOS, PAGE_SIZE};
pub use dispatcher::Dispatcher;
pub use entity::{Entity, INDEX_BITS, INDEX_MASK, VERSION_BITS, VERSION_MASK};
pub use mixin::{ComponentMixin, EntityMixin, PayloadSink};
pub use registry::Registry;
pub use signal::{Connection, Event, Sigh, Sink};
pub use view::{View2, View3};

// `Component`/`Event` here are the derive macros; the trait of the same
// name above lives in the type namespace, so both names resolve fine
// from a single `use ecs_core::Component;` at a call site.
pub use ecs_core_macros::{Component, Event};
