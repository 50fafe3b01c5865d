//! One-shot unregistration guard
//!
//! The gateway owns removal of a subscription; the registry only holds
//! the delivery handle. Disconnect can be detected by more than one
//! signal (client gone, server shutdown, write error), so unregistration
//! goes through an atomic one-shot flag: it runs exactly once no matter
//! how many signals fire.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::registry::{ChannelKey, ChannelRegistry};

/// Exclusive owner of one subscription's removal
pub struct SubscriptionGuard {
    registry: Arc<ChannelRegistry>,
    key: ChannelKey,
    id: u64,
    released: AtomicBool,
}

impl SubscriptionGuard {
    /// Create a guard for a registered subscription
    pub fn new(registry: Arc<ChannelRegistry>, key: ChannelKey, id: u64) -> Self {
        Self {
            registry,
            key,
            id,
            released: AtomicBool::new(false),
        }
    }

    /// Subscription id held by this guard
    pub fn subscription_id(&self) -> u64 {
        self.id
    }

    /// Channel the subscription belongs to
    pub fn channel(&self) -> ChannelKey {
        self.key
    }

    /// Unregister the subscription now
    ///
    /// Returns `true` the first time, `false` on every later call.
    pub async fn release(&self) -> bool {
        if self.released.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.registry.unregister(self.key, self.id).await
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }

        // Drop runs on the runtime when the transport closes; the actual
        // removal needs the async registry lock, so hand it off. Outside
        // a runtime the registry is being torn down with the process.
        let registry = Arc::clone(&self.registry);
        let key = self.key;
        let id = self.id;

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                registry.unregister(key, id).await;
            });
        }
    }
}
