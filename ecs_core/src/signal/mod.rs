//! Delegates, signal handlers, subscription sinks, and release tokens.
//!
//! Used standalone (connect a plain handler to a `Sigh<T>` and trigger it)
//! and internally, powering `Mixin`'s construct/update/destruction
//! notifications and `Dispatcher`'s per-event-kind channels.
//!
//! A fully generic `Delegate<Args...>` bound to an arbitrary argument list
//! would need every argument shape to share one lifetime parameter across
//! the whole type, which doesn't compose with the borrow checker. Instead
//! this module fixes the delegate shape at one argument (`&mut T`), and
//! `Mixin` defines its own two-argument variant for the `(Entity, &mut C)`
//! case.

mod connection;
mod delegate;
mod sigh;
mod sink;

pub use connection::Connection;
pub use sigh::Sigh;
pub use sink::Sink;

/// Marker trait for types that can flow through a [`crate::dispatcher::Dispatcher`].
///
/// `#[derive(Event)]` implements this for you; it carries no required
/// methods.
pub trait Event: 'static {}
