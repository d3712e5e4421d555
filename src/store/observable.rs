//! Publish/subscribe primitive shared by every domain store.
//!
//! [`Observable`] owns a store's field set together with its subscriber
//! list. Notifications carry no payload; subscribers re-read the state.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// State of type `S` plus the callbacks to notify when it changes.
///
/// The state lock is never held while callbacks run, so subscribers may
/// read the store (or publish again) from inside a notification.
pub struct Observable<S> {
    state: RwLock<S>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    next_id: AtomicU64,
}

impl<S> Observable<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register `callback` for every future publish. It is not invoked now.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(existing, _)| *existing != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Notify every current subscriber in registration order.
    ///
    /// The list is snapshotted first: subscriptions added or removed by a
    /// callback take effect from the next publish. A panicking callback is
    /// logged and the remaining subscribers are still notified.
    pub fn publish(&self) {
        let snapshot: Vec<Callback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                tracing::warn!("Store subscriber panicked during publish");
            }
        }
    }

    /// Read the state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.state.read())
    }

    /// Mutate the state, then publish.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut *self.state.write());
        self.publish();
        result
    }

    /// Mutate the state without notifying anyone.
    pub fn update_silently<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.state.write())
    }
}

impl<S: Clone> Observable<S> {
    pub fn snapshot(&self) -> S {
        self.state.read().clone()
    }
}

impl<S: Default> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Capability shared by domain stores: subscription plus state snapshots.
pub trait Store {
    type State: Clone;

    fn observable(&self) -> &Observable<Self::State>;

    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observable().subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.observable().unsubscribe(id)
    }

    fn publish(&self) {
        self.observable().publish()
    }

    /// A copy of the store's current fields.
    fn state(&self) -> Self::State {
        self.observable().snapshot()
    }
}
