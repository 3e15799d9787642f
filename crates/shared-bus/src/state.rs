//! # Observable State
//!
//! `StateCell<T>` is a `tokio::sync::watch` channel that always has a value
//! and never closes while the cell is alive. Services own their cells and
//! hand out receivers; readers never block writers.

use tokio::sync::watch;

/// A value that can be read synchronously and observed for changes.
#[derive(Debug)]
pub struct StateCell<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Replace the value and wake every observer.
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Mutate the value in place. Observers are woken only if `f` returns true.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        self.sender.send_if_modified(f)
    }

    /// Observe future changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Read the value through a closure without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
