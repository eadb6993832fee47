//! Orchestrator tuning knobs.

use std::time::Duration;

/// Configuration for [`crate::app::AppCore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Minimum gap between accepted submit-class intents. Zero disables
    /// throttling (useful in tests).
    pub submit_throttle: Duration,
    /// Quiet window a bound text input waits for before forwarding the
    /// settled value.
    pub debounce_window: Duration,
    /// Capacity of the navigation and toast broadcast channels. Slow
    /// subscribers lose the oldest events first.
    pub ui_event_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            submit_throttle: Duration::from_millis(300),
            debounce_window: Duration::from_millis(250),
            ui_event_capacity: 16,
        }
    }
}

impl AppConfig {
    /// Set the submit throttle gap.
    pub fn with_submit_throttle(mut self, gap: Duration) -> Self {
        self.submit_throttle = gap;
        self
    }

    /// Set the text-input debounce window.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// Set the UI event channel capacity.
    pub fn with_ui_event_capacity(mut self, capacity: usize) -> Self {
        self.ui_event_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let config = AppConfig::default()
            .with_submit_throttle(Duration::ZERO)
            .with_debounce_window(Duration::from_millis(10))
            .with_ui_event_capacity(4);
        assert_eq!(config.submit_throttle, Duration::ZERO);
        assert_eq!(config.debounce_window, Duration::from_millis(10));
        assert_eq!(config.ui_event_capacity, 4);
    }
}
