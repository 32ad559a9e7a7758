//! Push-style notification streams.
//!
//! An [`Observable`] owns a list of callbacks and invokes each of them, in
//! registration order, every time a value is published. It is used for XR
//! session state transitions, where the host pushes changes to the app.

use std::fmt;

/// Identifier returned by [`Observable::add`], used to detach an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// A list of observers notified on each published value.
pub struct Observable<T> {
    observers: Vec<(ObserverId, Callback<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    /// Creates an observable with no observers.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers an observer and returns its id.
    pub fn add(&mut self, callback: impl FnMut(&T) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(callback)));
        id
    }

    /// Detaches an observer. Returns false if the id was not registered.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Invokes every observer with `value`.
    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.observers {
            callback(value);
        }
    }

    /// Returns the number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Detaches all observers.
    pub fn clear(&mut self) {
        self.observers.clear();
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observers.len())
            .finish()
    }
}
