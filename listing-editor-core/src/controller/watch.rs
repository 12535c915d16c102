//! Typed subscription channel.
//!
//! Push notifications from a controller to whoever orchestrates it. Every
//! subscription yields a [`Subscription`] handle; dropping or unsubscribing it
//! detaches the callback, so a disposed section can never call back into a live
//! orchestrator.

use std::sync::{Arc, Mutex, Weak};

use crate::utils::sync::lock;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Multi-subscriber channel for value changes
pub struct WatchChannel<T> {
    subscribers: Arc<Mutex<Subscribers<T>>>,
}

impl<T: Clone + Send + 'static> WatchChannel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback; it stays attached until the returned handle is released
    pub fn subscribe(&self, callback: impl Fn(T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut subs = lock(&self.subscribers);
            let id = subs.next_id;
            subs.next_id += 1;
            subs.entries.push((id, Arc::new(callback)));
            id
        };

        let weak: Weak<Mutex<Subscribers<T>>> = Arc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = weak.upgrade() {
                lock(&subscribers).entries.retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// Deliver `value` to every current subscriber.
    ///
    /// Callbacks run outside the lock, so they may subscribe or unsubscribe.
    pub fn emit(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.subscribers)
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(value.clone());
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).entries.len()
    }
}

impl<T: Clone + Send + 'static> Default for WatchChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that detaches a callback when released
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Detach now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
