//! Local shopping cart with write-through persistence.
//!
//! The cart is an ordered list of denormalized [`CartLineItem`] snapshots.
//! Every mutation rewrites the whole list to the backing store under the
//! `cartItems` key and then notifies subscribers synchronously with the new
//! snapshot. Persistence is best-effort: a failed write is logged and the
//! in-memory list stays authoritative for the rest of the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use itx_store_core::CartLineItem;

use crate::storage::KeyValueStore;

/// Storage key for the persisted cart snapshot. Deliberately outside the
/// `itx-cache:` namespace - the cart is state, not a cached response.
pub const CART_KEY: &str = "cartItems";

/// Handle returned by [`CartStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&[CartLineItem]) + Send + Sync>;

/// Observable, persisted cart.
///
/// Mutations are serialized behind a mutex so append and removal stay atomic
/// even if a host application mutates from several threads. The derived
/// count is always read from the live list, never stored.
pub struct CartStore<S> {
    store: S,
    items: Mutex<Vec<CartLineItem>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart, loading any persisted snapshot.
    ///
    /// An absent or unreadable snapshot yields an empty cart; this never
    /// fails.
    pub fn new(store: S) -> Self {
        let items = store
            .get(CART_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(err) => {
                    warn!(error = %err, "ignoring unreadable persisted cart");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            store,
            items: Mutex::new(items),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Append an item. Duplicates are allowed; the same product variant may
    /// be added any number of times.
    pub fn add_item(&self, item: CartLineItem) {
        let snapshot = {
            let mut items = self.lock_items();
            items.push(item);
            items.clone()
        };
        self.persist(&snapshot);
        self.notify(&snapshot);
    }

    /// Remove the item at `index`. Out-of-range indices are ignored.
    pub fn remove_item(&self, index: usize) {
        let snapshot = {
            let mut items = self.lock_items();
            if index >= items.len() {
                debug!(index, len = items.len(), "ignoring out-of-range cart removal");
                return;
            }
            items.remove(index);
            items.clone()
        };
        self.persist(&snapshot);
        self.notify(&snapshot);
    }

    /// Empty the cart.
    pub fn clear(&self) {
        let snapshot = {
            let mut items = self.lock_items();
            items.clear();
            items.clone()
        };
        self.persist(&snapshot);
        self.notify(&snapshot);
    }

    /// Snapshot of the current items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock_items().clone()
    }

    /// Number of items, derived from the live list.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lock_items().len()
    }

    /// Register a listener invoked synchronously after every mutation with
    /// the post-mutation snapshot.
    pub fn subscribe(&self, listener: impl Fn(&[CartLineItem]) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn persist(&self, items: &[CartLineItem]) {
        match serde_json::to_string(items) {
            Ok(json) => {
                if let Err(err) = self.store.set(CART_KEY, &json) {
                    warn!(error = %err, "failed to persist cart; in-memory state remains authoritative");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode cart"),
        }
    }

    fn notify(&self, items: &[CartLineItem]) {
        for (_, listener) in self.lock_listeners().iter() {
            listener(items);
        }
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<CartLineItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::storage::MemoryStore;

    fn item(id: &str) -> CartLineItem {
        CartLineItem {
            id: id.into(),
            brand: "Google".into(),
            model: "Pixel 8".into(),
            price: Some("750".parse().unwrap()),
            img_url: String::new(),
            color_name: "Obsidian".into(),
            storage_name: "128 GB".into(),
        }
    }

    #[test]
    fn append_remove_and_derived_count() {
        let cart = CartStore::new(MemoryStore::new());
        assert_eq!(cart.count(), 0);

        cart.add_item(item("x"));
        cart.add_item(item("y"));
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.items().iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), ["x", "y"]);

        cart.remove_item(0);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.items().first().map(|i| i.id.clone()), Some("y".into()));

        cart.clear();
        assert_eq!(cart.count(), 0);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn out_of_range_removal_is_a_no_op() {
        let cart = CartStore::new(MemoryStore::new());
        cart.add_item(item("x"));
        cart.remove_item(5);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn duplicates_are_distinct_entries() {
        let cart = CartStore::new(MemoryStore::new());
        cart.add_item(item("x"));
        cart.add_item(item("x"));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn persists_and_reloads() {
        let store = MemoryStore::new();
        let cart = CartStore::new(store.clone());
        cart.add_item(item("x"));
        cart.add_item(item("y"));

        // A fresh store instance over the same backing storage sees the same
        // ordered items.
        let reloaded = CartStore::new(store);
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn unreadable_snapshot_falls_back_to_empty() {
        let store = MemoryStore::new();
        store.set(CART_KEY, "[{broken").unwrap();
        let cart = CartStore::new(store);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn listeners_observe_mutations() {
        let cart = CartStore::new(MemoryStore::new());
        let seen = Arc::new(AtomicUsize::new(0));

        let observed = Arc::clone(&seen);
        let id = cart.subscribe(move |items| {
            observed.store(items.len(), Ordering::SeqCst);
        });

        cart.add_item(item("x"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        cart.add_item(item("y"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        assert!(cart.unsubscribe(id));
        cart.clear();
        // No notification after unsubscribe.
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(!cart.unsubscribe(id));
    }

    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), crate::storage::StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn remove(&self, key: &str) {
            self.0.remove(key);
        }
    }

    #[test]
    fn persistence_failure_is_swallowed() {
        let cart = CartStore::new(ReadOnlyStore(MemoryStore::new()));
        cart.add_item(item("x"));
        // The write failed, but the in-memory cart is still the truth.
        assert_eq!(cart.count(), 1);
    }
}
