//! Compile-time capacities and runtime configuration.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use serde::Serialize;

// Layer 3: Internal
// (none)

/// Maximum number of simultaneously registered agents (system services
/// included).
pub const MAX_AGENTS: usize = 16;

/// Mailbox depth per agent.
pub const MAX_QUEUE_SIZE: usize = 64;

/// Maximum bytes per stored message, header included.
pub const MAX_MESSAGE_SIZE: usize = 128;

/// Maximum states per agent state machine.
pub const MAX_STATES: usize = 16;

/// Maximum pending software timers per agent.
pub const MAX_TIMERS: usize = 8;

/// Default per-cycle dispatch quota for `process_all_messages`.
pub const DEFAULT_DISPATCH_QUOTA: usize = MAX_AGENTS * MAX_QUEUE_SIZE;

/// Default capacity of the error record ring.
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 32;

/// Default watchdog timeout in milliseconds.
pub const DEFAULT_WATCHDOG_TIMEOUT_MS: u32 = 1_000;

/// Default tolerance for future-dated message timestamps in milliseconds.
pub const DEFAULT_STALE_TOLERANCE_MS: u32 = 1_000;

/// Runtime configuration for an [`Environment`](crate::system::Environment).
///
/// Capacities are compile-time constants; this structure carries the
/// remaining tunables. Defaults are usable as-is.
///
/// # Examples
///
/// ```rust
/// use agentsys_rt::config::RuntimeConfig;
///
/// let config = RuntimeConfig::builder()
///     .with_dispatch_quota(256)
///     .with_error_log_capacity(16)
///     .build()
///     .unwrap();
/// assert_eq!(config.dispatch_quota, 256);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    /// Upper bound on messages dispatched by one `process_all_messages`
    /// cycle. Prevents livelock when handlers keep producing messages.
    pub dispatch_quota: usize,

    /// Capacity of the bounded error record ring (newest overwrites
    /// oldest).
    pub error_log_capacity: usize,

    /// Watchdog timeout applied when an agent is enrolled without an
    /// explicit timeout.
    pub default_watchdog_timeout_ms: u32,

    /// How far in the future a message timestamp may lie before the
    /// mailbox rejects the message as invalid.
    pub stale_tolerance_ms: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dispatch_quota: DEFAULT_DISPATCH_QUOTA,
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
            default_watchdog_timeout_ms: DEFAULT_WATCHDOG_TIMEOUT_MS,
            stale_tolerance_ms: DEFAULT_STALE_TOLERANCE_MS,
        }
    }
}

impl RuntimeConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.dispatch_quota == 0 {
            return Err("dispatch_quota must be > 0".to_string());
        }
        if self.error_log_capacity == 0 {
            return Err("error_log_capacity must be > 0".to_string());
        }
        if self.default_watchdog_timeout_ms == 0 {
            return Err("default_watchdog_timeout_ms must be > 0".to_string());
        }
        Ok(())
    }
}

/// Builder for [`RuntimeConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    /// Set the per-cycle dispatch quota.
    pub fn with_dispatch_quota(mut self, quota: usize) -> Self {
        self.config.dispatch_quota = quota;
        self
    }

    /// Set the error record ring capacity.
    pub fn with_error_log_capacity(mut self, capacity: usize) -> Self {
        self.config.error_log_capacity = capacity;
        self
    }

    /// Set the default watchdog timeout in milliseconds.
    pub fn with_watchdog_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.config.default_watchdog_timeout_ms = timeout_ms;
        self
    }

    /// Set the future-timestamp tolerance in milliseconds.
    pub fn with_stale_tolerance_ms(mut self, tolerance_ms: u32) -> Self {
        self.config.stale_tolerance_ms = tolerance_ms;
        self
    }

    /// Build the configuration, validating all values.
    pub fn build(self) -> Result<RuntimeConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
