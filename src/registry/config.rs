//! Registry configuration

/// Configuration for the channel registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum concurrent subscribers across all channels
    ///
    /// Bounds registry memory in a long-running process. Connections past
    /// the cap are rejected; existing subscribers are never evicted.
    pub max_subscribers: usize,

    /// Per-subscriber delivery buffer, in frames
    ///
    /// A subscriber whose buffer is full when an event arrives is treated
    /// as failed and pruned.
    pub delivery_buffer: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_subscribers: 1000,
            delivery_buffer: 64,
        }
    }
}

impl RegistryConfig {
    /// Set the system-wide subscriber cap
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.max_subscribers = max;
        self
    }

    /// Set the per-subscriber delivery buffer size (minimum 1)
    pub fn delivery_buffer(mut self, frames: usize) -> Self {
        self.delivery_buffer = frames.max(1);
        self
    }
}
