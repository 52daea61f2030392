//! Mediates subscribe/unsubscribe against a [`Sigh`]; the only thing
//! allowed to rearrange its delegates.

use super::connection::Connection;
use super::delegate::{Delegate, DelegateKey};
use super::sigh::Sigh;

/// A transient handle over a `Sigh`. Borrow one fresh each time you need
/// to connect or disconnect - it holds only a reference, never owns the
/// signal handler.
pub struct Sink<'s, T> {
    sigh: &'s mut Sigh<T>,
}

impl<'s, T> Sink<'s, T> {
    pub fn new(sigh: &'s mut Sigh<T>) -> Self {
        Self { sigh }
    }

    /// Subscribes a free function. Connecting the same function twice
    /// first disconnects the earlier subscription, so the signal handler's
    /// size is unaffected by the duplicate.
    pub fn connect(&mut self, handler: fn(&mut T)) -> Connection {
        let key = DelegateKey::free(handler as usize);
        self.sigh.remove(key);
        self.sigh
            .insert(Delegate::new(key, Box::new(move |value| handler(value))));
        self.make_connection(key)
    }

    /// Subscribes `handler` bound to `payload`, identified by the pair of
    /// `payload`'s address and the function pointer. The caller must keep
    /// `payload` alive for as long as the connection stays live.
    pub fn connect_with<P: 'static>(
        &mut self,
        handler: fn(&mut P, &mut T),
        payload: &mut P,
    ) -> Connection {
        let payload_ptr: *mut P = payload;
        let key = DelegateKey::bound(payload_ptr as *const (), handler as usize);
        self.sigh.remove(key);
        self.sigh.insert(Delegate::new(
            key,
            Box::new(move |value| {
                // SAFETY: `payload` outlives this delegate per the
                // contract documented above.
                let payload = unsafe { &mut *payload_ptr };
                handler(payload, value)
            }),
        ));
        self.make_connection(key)
    }

    pub fn disconnect(&mut self, handler: fn(&mut T)) {
        self.sigh.remove(DelegateKey::free(handler as usize));
    }

    pub fn disconnect_with<P>(&mut self, handler: fn(&mut P, &mut T), payload: &P) {
        self.sigh.remove(DelegateKey::bound(
            payload as *const P as *const (),
            handler as usize,
        ));
    }

    /// Disconnects every delegate bound to `payload`, regardless of which
    /// function it was paired with.
    pub fn disconnect_payload<P>(&mut self, payload: &P) {
        self.sigh.remove_by_instance(payload as *const P as usize);
    }

    pub fn disconnect_all(&mut self) {
        self.sigh.clear();
    }

    fn make_connection(&mut self, key: DelegateKey) -> Connection {
        let sigh: *mut Sigh<T> = self.sigh;
        Connection::new(Box::new(move || {
            // SAFETY: see `Connection`'s own doc comment.
            unsafe { (*sigh).remove(key) };
        }))
    }
}
