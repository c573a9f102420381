// Worker configuration

use super::constants::DEFAULT_TIMER_PERIOD;
use crate::error::{Result, WorkerError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-worker settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Sleep between two timer ticks
    pub timer_period: Duration,
    /// Spawn the timer generator at all
    pub timer_enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            timer_period: DEFAULT_TIMER_PERIOD,
            timer_enabled: true,
        }
    }
}

impl WorkerConfig {
    pub fn with_timer_period(mut self, period: Duration) -> Self {
        self.timer_period = period;
        self
    }

    pub fn without_timer(mut self) -> Self {
        self.timer_enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timer_enabled && self.timer_period.is_zero() {
            return Err(WorkerError::Config(
                "timer period must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Timer period, or None when the timer is disabled
    pub(crate) fn active_timer_period(&self) -> Option<Duration> {
        self.timer_enabled.then_some(self.timer_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.timer_period, Duration::from_millis(250));
        assert!(config.timer_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = WorkerConfig::default().with_timer_period(Duration::ZERO);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("greater than zero"));
    }

    #[test]
    fn test_zero_period_allowed_without_timer() {
        let config = WorkerConfig::default()
            .with_timer_period(Duration::ZERO)
            .without_timer();
        assert!(config.validate().is_ok());
        assert_eq!(config.active_timer_period(), None);
    }
}
