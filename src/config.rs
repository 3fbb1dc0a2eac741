//! Counter configuration
//!
//! Read by the web shell from the mount element's `data-config` attribute.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_STEP;
use crate::error::CounterError;

/// What `reset()` does with an initial value that lies outside the bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResetBehavior {
    /// Reset always returns to the initial value, even when it is out of bounds
    #[default]
    IgnoreBounds,
    /// Reset returns to the initial value clamped into `[min, max]`
    ClampToBounds,
}

impl ResetBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetBehavior::IgnoreBounds => "ignore_bounds",
            ResetBehavior::ClampToBounds => "clamp_to_bounds",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ignore_bounds" | "ignore" => Some(ResetBehavior::IgnoreBounds),
            "clamp_to_bounds" | "clamp" => Some(ResetBehavior::ClampToBounds),
            _ => None,
        }
    }
}

/// Counter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Value the counter starts at (when nothing is stored) and resets to
    pub initial_value: i64,
    /// Inclusive lower bound (`None` = unbounded)
    pub min: Option<i64>,
    /// Inclusive upper bound (`None` = unbounded)
    pub max: Option<i64>,
    /// Magnitude applied per increment/decrement (must be > 0)
    pub step: i64,
    /// Reset target handling
    pub reset: ResetBehavior,
    /// Whether the committed value is written to the persistent store
    pub persist: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            initial_value: 0,
            min: None,
            max: None,
            step: DEFAULT_STEP,
            reset: ResetBehavior::IgnoreBounds,
            persist: true,
        }
    }
}

impl CounterConfig {
    pub fn with_initial_value(mut self, value: i64) -> Self {
        self.initial_value = value;
        self
    }

    pub fn with_bounds(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn with_reset(mut self, reset: ResetBehavior) -> Self {
        self.reset = reset;
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Parse a JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self, CounterError> {
        let config: CounterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make the counter stuck or non-monotonic
    pub fn validate(&self) -> Result<(), CounterError> {
        if self.step <= 0 {
            return Err(CounterError::invalid(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(CounterError::invalid(format!(
                    "min ({min}) is greater than max ({max})"
                )));
            }
        }
        Ok(())
    }

    /// Clamp a value into `[min, max]`
    pub fn clamp(&self, value: i64) -> i64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }

    /// The value `reset()` returns to
    pub fn reset_target(&self) -> i64 {
        match self.reset {
            ResetBehavior::IgnoreBounds => self.initial_value,
            ResetBehavior::ClampToBounds => self.clamp(self.initial_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CounterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step, 1);
        assert_eq!(config.min, None);
        assert_eq!(config.max, None);
    }

    #[test]
    fn test_rejects_non_positive_step() {
        for step in [0, -1, i64::MIN] {
            let config = CounterConfig::default().with_step(step);
            assert!(matches!(
                config.validate(),
                Err(CounterError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config = CounterConfig::default().with_bounds(Some(10), Some(0));
        assert!(matches!(
            config.validate(),
            Err(CounterError::InvalidConfiguration { .. })
        ));

        // Equal bounds pin the counter but are legal
        let config = CounterConfig::default().with_bounds(Some(3), Some(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = CounterConfig::from_json(r#"{"max": 10, "step": 2}"#).unwrap();
        assert_eq!(config.max, Some(10));
        assert_eq!(config.step, 2);
        assert_eq!(config.min, None);
        assert_eq!(config.initial_value, 0);
        assert!(config.persist);
        assert_eq!(config.reset, ResetBehavior::IgnoreBounds);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            CounterConfig::from_json("{not json"),
            Err(CounterError::ConfigParse(_))
        ));
        assert!(matches!(
            CounterConfig::from_json(r#"{"step": 0}"#),
            Err(CounterError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_reset_target() {
        let config = CounterConfig::default()
            .with_bounds(Some(0), Some(10))
            .with_initial_value(50);
        assert_eq!(config.reset_target(), 50);

        let config = config.with_reset(ResetBehavior::ClampToBounds);
        assert_eq!(config.reset_target(), 10);
    }

    #[test]
    fn test_reset_behavior_from_str() {
        assert_eq!(ResetBehavior::from_str("Clamp"), Some(ResetBehavior::ClampToBounds));
        assert_eq!(
            ResetBehavior::from_str(ResetBehavior::IgnoreBounds.as_str()),
            Some(ResetBehavior::IgnoreBounds)
        );
        assert_eq!(ResetBehavior::from_str("sometimes"), None);
    }
}
