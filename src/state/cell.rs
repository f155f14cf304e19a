//! Observable state cells.
//!
//! A [`StateCell`] is one named process-wide value with a subscriber
//! list. `set` always overwrites, even when the value is unchanged,
//! and then invokes every subscriber synchronously in registration
//! order. The subscriber list is snapshotted before the round starts,
//! so a subscriber added from inside a callback first hears about the
//! NEXT change, and callbacks may freely re-enter the cell.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Handle returned by [`StateCell::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

type Callback<V> = Arc<dyn Fn(&V) + Send + Sync>;

struct Observer<V> {
    id: ObserverId,
    callback: Callback<V>,
}

struct CellInner<V> {
    value: V,
    observers: Vec<Observer<V>>,
}

/// A named observable value.
pub struct StateCell<V> {
    name: &'static str,
    inner: Mutex<CellInner<V>>,
}

impl<V: Clone> StateCell<V> {
    pub fn new(name: &'static str, initial: V) -> Self {
        Self {
            name,
            inner: Mutex::new(CellInner {
                value: initial,
                observers: Vec::new(),
            }),
        }
    }

    /// The cell's name, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value.
    pub fn get(&self) -> V {
        self.inner.lock().unwrap().value.clone()
    }

    /// Overwrite the value and notify every subscriber, in registration
    /// order. Runs the callbacks after releasing the lock, so callbacks
    /// may call back into this cell.
    pub fn set(&self, value: V) {
        let (snapshot, current) = {
            let mut inner = self.inner.lock().unwrap();
            inner.value = value;
            let snapshot: Vec<Callback<V>> = inner
                .observers
                .iter()
                .map(|observer| observer.callback.clone())
                .collect();
            (snapshot, inner.value.clone())
        };

        tracing::trace!(cell = self.name, observers = snapshot.len(), "state cell updated");
        for callback in snapshot {
            callback(&current);
        }
    }

    /// Register a callback invoked on every subsequent `set`.
    pub fn subscribe(&self, callback: impl Fn(&V) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId(Uuid::new_v4());
        let mut inner = self.inner.lock().unwrap();
        inner.observers.push(Observer {
            id,
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove a subscriber. Returns `false` when the id is unknown,
    /// which makes double-unsubscribe harmless.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.observers.len();
        inner.observers.retain(|observer| observer.id != id);
        inner.observers.len() < before
    }

    /// Number of registered subscribers.
    pub fn observer_count(&self) -> usize {
        self.inner.lock().unwrap().observers.len()
    }
}

impl<V: Clone + std::fmt::Debug> std::fmt::Debug for StateCell<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("name", &self.name)
            .field("value", &self.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}
