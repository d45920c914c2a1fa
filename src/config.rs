use std::time::Duration;

/// Configuration for a [`SessionStore`](crate::SessionStore), fixed at
/// construction.
///
/// # Example
///
/// ```rust
/// use session_store::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_default_ttl(Duration::from_secs(120))
///     .with_sweep_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// TTL applied to entries stored without a per-call override.
    ///
    /// `None` (the default) means entries never expire. It also disables the
    /// background sweep task and forbids per-call TTL overrides.
    pub default_ttl: Option<Duration>,

    /// Interval between background sweep runs (default: 60 seconds).
    ///
    /// Only relevant when a default TTL is configured; without one no
    /// sweep task is started.
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_ttl: None,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL applied to entries stored without an override.
    ///
    /// Configuring a default TTL also enables the background sweep task and
    /// permits per-call TTL overrides via
    /// [`set_item_with_ttl`](crate::SessionStore::set_item_with_ttl).
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets the interval between background sweep runs
    ///
    /// # Example
    ///
    /// ```rust
    /// use session_store::StoreConfig;
    /// use std::time::Duration;
    ///
    /// // Sweep expired entries every 30 seconds
    /// let config = StoreConfig::default()
    ///     .with_default_ttl(Duration::from_secs(120))
    ///     .with_sweep_interval(Duration::from_secs(30));
    /// ```
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_custom_sweep_interval() {
        let config = StoreConfig::default().with_sweep_interval(Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = StoreConfig::new()
            .with_default_ttl(Duration::from_secs(120))
            .with_sweep_interval(Duration::from_secs(15));
        assert_eq!(config.default_ttl, Some(Duration::from_secs(120)));
        assert_eq!(config.sweep_interval, Duration::from_secs(15));
    }
}
