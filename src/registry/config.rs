//! Registry configuration

use std::time::Duration;

/// Default interval between finished-set cleanup passes
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest cleanup interval; `tokio::time::interval` panics on zero
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_millis(1);

/// Streamer registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum streamers per tournament (0 = unlimited)
    pub max_streamers: usize,

    /// Maximum sets queued on a single streamer (0 = unlimited)
    pub max_queue_len: usize,

    /// Interval of the background cleanup task
    pub cleanup_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_streamers: 0,
            max_queue_len: 0,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl RegistryConfig {
    /// Set maximum streamers
    pub fn max_streamers(mut self, max: usize) -> Self {
        self.max_streamers = max;
        self
    }

    /// Set maximum queue length per streamer
    pub fn max_queue_len(mut self, max: usize) -> Self {
        self.max_queue_len = max;
        self
    }

    /// Set cleanup interval, clamped to [`MIN_CLEANUP_INTERVAL`]
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval.max(MIN_CLEANUP_INTERVAL);
        self
    }

    /// Check if the registry can hold another streamer
    pub(crate) fn allows_streamer(&self, current: usize) -> bool {
        self.max_streamers == 0 || current < self.max_streamers
    }

    /// Check if a queue of `current` sets can take another one
    pub(crate) fn allows_queue_len(&self, current: usize) -> bool {
        self.max_queue_len == 0 || current < self.max_queue_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.max_streamers, 0);
        assert_eq!(config.max_queue_len, 0);
        assert_eq!(config.cleanup_interval, DEFAULT_CLEANUP_INTERVAL);
        assert!(config.allows_streamer(10_000));
        assert!(config.allows_queue_len(10_000));
    }

    #[test]
    fn test_builder_limits() {
        let config = RegistryConfig::default().max_streamers(2).max_queue_len(3);

        assert!(config.allows_streamer(1));
        assert!(!config.allows_streamer(2));
        assert!(config.allows_queue_len(2));
        assert!(!config.allows_queue_len(3));
    }

    #[test]
    fn test_builder_cleanup_interval_clamped() {
        let config = RegistryConfig::default().cleanup_interval(Duration::ZERO);
        assert_eq!(config.cleanup_interval, MIN_CLEANUP_INTERVAL);

        let config = RegistryConfig::default().cleanup_interval(Duration::from_secs(5));
        assert_eq!(config.cleanup_interval, Duration::from_secs(5));
    }
}
