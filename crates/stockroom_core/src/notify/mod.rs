//! Identifier-keyed change notification.
//!
//! # Responsibility
//! - Let observers register interest in a resource identifier.
//! - Fan a "this identifier may have changed" signal out to every covered
//!   subscription, synchronously, with no payload.
//!
//! # Invariants
//! - A collection subscription also covers item identifiers directly under
//!   that collection.
//! - Delivery completes before the publishing call returns; order across
//!   subscribers is unspecified.
//! - Subscriptions leak nothing: `unsubscribe` removes the callback.

use crate::route::{parse_key_segment, ResourceId};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
pub type SubscriptionId = u64;

type ChangeCallback = Arc<dyn Fn(&ResourceId) + Send + Sync>;

struct Subscription {
    resource: ResourceId,
    callback: ChangeCallback,
}

#[derive(Default)]
struct NotifierInner {
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_id: SubscriptionId,
}

/// Registry of identifier-keyed observers.
///
/// Observers receive only the changed identifier and are expected to
/// re-query through the engine for the new state.
#[derive(Default)]
pub struct ChangeNotifier {
    inner: Mutex<NotifierInner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for changes covered by `resource`.
    ///
    /// A collection identifier covers itself and every item under it; an
    /// item identifier covers only itself.
    pub fn subscribe(
        &self,
        resource: ResourceId,
        callback: impl Fn(&ResourceId) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.lock().expect("notifier lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscriptions.insert(
            id,
            Subscription {
                resource,
                callback: Arc::new(callback),
            },
        );
        id
    }

    /// Removes one subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().expect("notifier lock poisoned");
        inner.subscriptions.remove(&id).is_some()
    }

    /// Returns the number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        let inner = self.inner.lock().expect("notifier lock poisoned");
        inner.subscriptions.len()
    }

    /// Signals that data under `changed` may have changed.
    ///
    /// Returns the number of subscriptions informed. Callbacks run after
    /// the registry lock is released, so a subscriber may subscribe or
    /// unsubscribe from inside its callback.
    pub fn publish(&self, changed: &ResourceId) -> usize {
        let covered: Vec<ChangeCallback> = {
            let inner = self.inner.lock().expect("notifier lock poisoned");
            inner
                .subscriptions
                .values()
                .filter(|subscription| covers(&subscription.resource, changed))
                .map(|subscription| Arc::clone(&subscription.callback))
                .collect()
        };

        for callback in &covered {
            callback(changed);
        }

        debug!(
            "event=change_publish module=notify status=ok id={changed} delivered={}",
            covered.len()
        );
        covered.len()
    }
}

/// Whether a subscription to `subscribed` must be informed about a change
/// at `changed`.
fn covers(subscribed: &ResourceId, changed: &ResourceId) -> bool {
    if subscribed.authority() != changed.authority() {
        return false;
    }
    if subscribed.segments() == changed.segments() {
        return true;
    }

    // Collection subscriptions also cover one-key-deeper item changes: a
    // changed row changes the collection's result set too.
    let sub = subscribed.segments();
    let chg = changed.segments();
    chg.len() == sub.len() + 1
        && chg[..sub.len()] == sub[..]
        && parse_key_segment(&chg[chg.len() - 1]).is_some()
}
