//! Release tokens for a single signal subscription.

/// Returned by `Sink::connect`/`connect_with`. Firing [`Connection::release`]
/// disconnects the subscription it was issued for, at most once. Dropping a
/// `Connection` without releasing leaves the subscription active - there is
/// no auto-disconnect on drop.
///
/// Releasing a connection after its originating `Sigh` has been dropped is
/// a use-after-free the host must prevent.
pub struct Connection {
    release: Option<Box<dyn FnOnce()>>,
}

impl Connection {
    pub(crate) fn new(release: Box<dyn FnOnce()>) -> Self {
        Self {
            release: Some(release),
        }
    }

    /// Whether this connection still has a live subscription to release.
    pub fn is_connected(&self) -> bool {
        self.release.is_some()
    }

    /// Disconnects the subscription. A second call is a no-op.
    pub fn release(&mut self) {
        if let Some(disconnect) = self.release.take() {
            disconnect();
        }
    }
}
