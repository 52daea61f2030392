//! Ordered multicast notifier.

use super::delegate::{Delegate, DelegateKey};

/// Stores an ordered sequence of delegates. Only a [`super::sink::Sink`]
/// may add or remove entries; everyone else only gets `trigger` and the
/// size queries.
#[derive(Default)]
pub struct Sigh<T> {
    delegates: Vec<Delegate<T>>,
}

impl<T> Sigh<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.delegates.len()
    }

    pub fn empty(&self) -> bool {
        self.delegates.is_empty()
    }

    pub fn clear(&mut self) {
        self.delegates.clear();
    }

    /// Calls every subscriber with `value`, most-recently-connected first.
    ///
    /// Walks by index rather than holding a `&mut` iterator across each
    /// call, because a handler may itself disconnect (its own or another)
    /// delegate mid-trigger via a [`super::connection::Connection`],
    /// mutating `self.delegates` reentrantly. Tail-first removal (see
    /// `Sigh::remove`) means any such mutation only ever touches slots
    /// already visited, so an in-flight index stays meaningful.
    pub fn trigger(&mut self, value: &mut T) {
        let mut pos = self.delegates.len();
        while pos > 0 {
            pos -= 1;
            if pos >= self.delegates.len() {
                continue;
            }
            let delegate: *mut Delegate<T> = &mut self.delegates[pos];
            // SAFETY: see the method doc comment above.
            unsafe { (*delegate).invoke(value) };
        }
    }

    pub(crate) fn insert(&mut self, delegate: Delegate<T>) {
        self.delegates.push(delegate);
    }

    /// Removes every delegate matching `key`. Scans from the tail so a
    /// disconnect issued by a handler mid-`trigger` (whose traversal is
    /// also tail-to-head, see `trigger`) never skips a not-yet-invoked
    /// delegate.
    pub(crate) fn remove(&mut self, key: DelegateKey) {
        let mut i = self.delegates.len();
        while i > 0 {
            i -= 1;
            if self.delegates[i].key == key {
                self.delegates.remove(i);
            }
        }
    }

    pub(crate) fn remove_by_instance(&mut self, instance: usize) {
        let mut i = self.delegates.len();
        while i > 0 {
            i -= 1;
            if self.delegates[i].key.instance == instance {
                self.delegates.remove(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegate(key: usize, log_entry: i32) -> Delegate<Vec<i32>> {
        Delegate::new(DelegateKey::free(key), Box::new(move |log| log.push(log_entry)))
    }

    #[test]
    fn trigger_visits_delegates_in_reverse_insertion_order() {
        let mut sigh = Sigh::new();
        sigh.insert(delegate(1, 1));
        sigh.insert(delegate(2, 2));
        sigh.insert(delegate(3, 3));

        let mut log = Vec::new();
        sigh.trigger(&mut log);

        assert_eq!(log, vec![3, 2, 1]);
    }

    #[test]
    fn remove_drops_every_delegate_with_a_matching_key() {
        let mut sigh = Sigh::new();
        sigh.insert(delegate(1, 1));
        sigh.insert(delegate(2, 2));

        sigh.remove(DelegateKey::free(1));

        assert_eq!(sigh.size(), 1);
        let mut log = Vec::new();
        sigh.trigger(&mut log);
        assert_eq!(log, vec![2]);
    }
}
