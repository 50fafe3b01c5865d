//! Channel registry implementation
//!
//! The central registry that maps channel keys to live subscribers and
//! fans published frames out to them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};

use crate::event::SseFrame;

use super::config::RegistryConfig;
use super::error::RegistryError;
use super::key::ChannelKey;

/// Delivery handle for one subscriber
pub type Subscriber = mpsc::Sender<SseFrame>;

/// Membership state guarded by the registry lock
///
/// The total is maintained alongside the map so the capacity check and
/// the insert are atomic under one write lock.
#[derive(Default)]
struct Channels {
    map: HashMap<ChannelKey, HashMap<u64, Subscriber>>,
    total: usize,
}

/// Central registry for all live subscriptions
///
/// Thread-safe via `RwLock`; the lock is the sole synchronization point
/// and is never held across a delivery attempt. `publish` snapshots the
/// subscriber set under a read lock and sends with the lock released, so
/// a slow or failing subscriber cannot stall `register`/`unregister` for
/// other sessions.
pub struct ChannelRegistry {
    channels: RwLock<Channels>,
    next_subscription_id: AtomicU64,
    config: RegistryConfig,
}

impl ChannelRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            channels: RwLock::new(Channels::default()),
            next_subscription_id: AtomicU64::new(1),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a subscriber under a channel key
    ///
    /// Returns the subscription id used for later unregistration, or
    /// `CapacityExceeded` when the system-wide cap is reached.
    pub async fn register(
        &self,
        key: ChannelKey,
        subscriber: Subscriber,
    ) -> Result<u64, RegistryError> {
        let mut channels = self.channels.write().await;

        if channels.total >= self.config.max_subscribers {
            tracing::warn!(
                channel = %key,
                limit = self.config.max_subscribers,
                "Subscriber rejected: capacity exceeded"
            );
            return Err(RegistryError::CapacityExceeded {
                limit: self.config.max_subscribers,
            });
        }

        let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        channels.map.entry(key).or_default().insert(id, subscriber);
        channels.total += 1;

        tracing::debug!(
            channel = %key,
            subscription_id = id,
            total = channels.total,
            "Subscriber registered"
        );

        Ok(id)
    }

    /// Remove a subscriber from a channel
    ///
    /// Idempotent: unregistering an id that is already gone is a no-op.
    /// Returns whether a subscription was actually removed.
    pub async fn unregister(&self, key: ChannelKey, id: u64) -> bool {
        let mut channels = self.channels.write().await;
        Self::remove_locked(&mut channels, key, id)
    }

    /// Fan a frame out to every subscriber of a channel
    ///
    /// Delivery is best-effort: subscribers whose buffers are full or
    /// whose receivers are gone are pruned, and neither failure affects
    /// the caller or other subscribers. Publishing to a channel with no
    /// subscribers delivers to nobody and is not an error.
    ///
    /// Returns the number of subscribers the frame was handed to.
    pub async fn publish(&self, key: ChannelKey, frame: SseFrame) -> usize {
        // Snapshot under the read lock, deliver with the lock released.
        let snapshot: Vec<(u64, Subscriber)> = {
            let channels = self.channels.read().await;
            match channels.map.get(&key) {
                Some(subs) => subs.iter().map(|(id, tx)| (*id, tx.clone())).collect(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        let mut failed = Vec::new();

        for (id, tx) in snapshot {
            match tx.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        channel = %key,
                        subscription_id = id,
                        error = %e,
                        "Dropping unresponsive subscriber"
                    );
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut channels = self.channels.write().await;
            for id in failed {
                Self::remove_locked(&mut channels, key, id);
            }
        }

        delivered
    }

    /// Total number of registered subscribers across all channels
    pub async fn subscriber_count(&self) -> usize {
        self.channels.read().await.total
    }

    /// Number of channels with at least one subscriber
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.map.len()
    }

    /// Number of subscribers on one channel
    pub async fn channel_subscribers(&self, key: ChannelKey) -> usize {
        let channels = self.channels.read().await;
        channels.map.get(&key).map_or(0, HashMap::len)
    }

    /// Snapshot of registry membership for introspection
    pub async fn stats(&self) -> RegistryStats {
        let channels = self.channels.read().await;
        RegistryStats {
            subscribers: channels.total,
            channels: channels.map.len(),
            max_subscribers: self.config.max_subscribers,
        }
    }

    fn remove_locked(channels: &mut Channels, key: ChannelKey, id: u64) -> bool {
        let Some(subs) = channels.map.get_mut(&key) else {
            return false;
        };

        if subs.remove(&id).is_none() {
            return false;
        }
        if subs.is_empty() {
            channels.map.remove(&key);
        }
        channels.total -= 1;

        tracing::debug!(
            channel = %key,
            subscription_id = id,
            total = channels.total,
            "Subscriber removed"
        );

        true
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Membership snapshot for introspection and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Registered subscribers across all channels
    pub subscribers: usize,
    /// Channels with at least one subscriber
    pub channels: usize,
    /// Configured system-wide cap
    pub max_subscribers: usize,
}
