//! Delegate configuration.

use serde::Deserialize;

/// Logging settings for a [`DefaultDelegate`](crate::DefaultDelegate).
///
/// None of these change which callbacks run or in what order.
///
/// Deserializes with every field optional, so a host can embed it in its
/// own configuration file:
///
/// ```
/// use fsm_delegate::DelegateConfig;
///
/// let config = DelegateConfig::default()
///     .with_name("orders")
///     .log_args(true);
/// assert_eq!(config.name, "orders");
/// assert!(config.trace_phases);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Label attached to every log event.
    pub name: String,
    /// Emit a debug event before each callback.
    pub trace_phases: bool,
    /// Include the argument count in phase events.
    pub log_args: bool,
    /// Emit a warning when an action fails.
    pub log_failures: bool,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            trace_phases: true,
            log_args: false,
            log_failures: true,
        }
    }
}

impl DelegateConfig {
    /// Sets the label attached to log events.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables the per-callback debug events.
    pub fn trace_phases(mut self, enabled: bool) -> Self {
        self.trace_phases = enabled;
        self
    }

    /// Enables or disables the argument count in phase events.
    pub fn log_args(mut self, enabled: bool) -> Self {
        self.log_args = enabled;
        self
    }

    /// Enables or disables the warning on a failed action.
    pub fn log_failures(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }
}
