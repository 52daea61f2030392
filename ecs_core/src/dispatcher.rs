//! One signal handler and one FIFO queue per event kind, addressed by
//! `TypeId`.
//!
//! `trigger` fires synchronously, `enqueue` defers an event until a later
//! drain, and `update`/`update_one` drain the deferred queues. Draining
//! uses `VecDeque::pop_front`, which is O(1) in Rust, so every drain runs
//! in strict FIFO order: events are delivered in the order they were
//! enqueued.

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::signal::{Event, Sigh, Sink};

struct Channel<E> {
    sigh: Sigh<E>,
    queue: VecDeque<E>,
}

impl<E> Default for Channel<E> {
    fn default() -> Self {
        Self {
            sigh: Sigh::new(),
            queue: VecDeque::new(),
        }
    }
}

impl<E> Channel<E> {
    fn drain(&mut self) {
        while let Some(mut event) = self.queue.pop_front() {
            self.sigh.trigger(&mut event);
        }
    }

    fn clear_queue(&mut self) {
        self.queue.clear();
    }
}

trait ErasedChannel: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn drain(&mut self);
    fn clear_queue(&mut self);
}

impl<E: Event> ErasedChannel for Channel<E> {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn drain(&mut self) {
        Channel::drain(self);
    }

    fn clear_queue(&mut self) {
        Channel::clear_queue(self);
    }
}

/// Per-event-kind signal handler plus deferred queue, multiplexed by
/// `TypeId`.
#[derive(Default)]
pub struct Dispatcher {
    channels: HashMap<TypeId, Box<dyn ErasedChannel>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`Sink`] over `E`'s signal handler, for subscribing/unsubscribing.
    pub fn sink<E: Event>(&mut self) -> Sink<'_, E> {
        Sink::new(&mut self.channel_mut::<E>().sigh)
    }

    /// Fires `event` synchronously through every current subscriber,
    /// most-recently-connected first.
    pub fn trigger<E: Event>(&mut self, mut event: E) {
        self.channel_mut::<E>().sigh.trigger(&mut event);
    }

    /// Defers `event` until the next [`Dispatcher::update`] or
    /// [`Dispatcher::update_one`].
    pub fn enqueue<E: Event>(&mut self, event: E) {
        self.channel_mut::<E>().queue.push_back(event);
    }

    /// Drains every event kind's queue, in the order each kind's events
    /// were enqueued.
    pub fn update(&mut self) {
        for channel in self.channels.values_mut() {
            channel.drain();
        }
    }

    /// Drains only `E`'s queue, leaving every other event kind's queue
    /// untouched.
    pub fn update_one<E: Event>(&mut self) {
        self.channel_mut::<E>().drain();
    }

    /// Discards every event kind's queued-but-undelivered events without
    /// triggering their subscribers.
    pub fn clear(&mut self) {
        for channel in self.channels.values_mut() {
            channel.clear_queue();
        }
    }

    /// Discards only `E`'s queued-but-undelivered events.
    pub fn clear_one<E: Event>(&mut self) {
        self.channel_mut::<E>().clear_queue();
    }

    fn channel_mut<E: Event>(&mut self) -> &mut Channel<E> {
        self.channels
            .entry(TypeId::of::<E>())
            .or_insert_with(|| {
                trace!("opening dispatcher channel for {}", std::any::type_name::<E>());
                Box::new(Channel::<E>::default())
            })
            .as_any_mut()
            .downcast_mut::<Channel<E>>()
            .expect("event channel type mismatch")
    }
}
