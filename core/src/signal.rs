//! "Render needed" notifications from the core to its presentation layer.
//!
//! Everything runs on one thread, so subscribers are `Rc` closures.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The task sequence changed (applied mutation or load).
    Tasks,
    /// The current filter changed.
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

pub type Listener = Rc<dyn Fn(Change)>;

#[derive(Default)]
pub struct Signal {
    next_id: u64,
    listeners: Vec<(Subscription, Listener)>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((subscription, listener));
        subscription
    }

    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    pub fn emit(&self, change: Change) {
        for (_, listener) in &self.listeners {
            listener(change);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_emit_reaches_every_listener_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new();

        let a = {
            let seen = Rc::clone(&seen);
            signal.subscribe(Rc::new(move |c: Change| seen.borrow_mut().push(("a", c))))
        };
        {
            let seen = Rc::clone(&seen);
            signal.subscribe(Rc::new(move |c: Change| seen.borrow_mut().push(("b", c))));
        }

        signal.emit(Change::Tasks);
        assert!(signal.unsubscribe(a));
        assert!(!signal.unsubscribe(a));
        signal.emit(Change::Filter);

        assert_eq!(
            *seen.borrow(),
            vec![("a", Change::Tasks), ("b", Change::Tasks), ("b", Change::Filter)]
        );
    }
}
