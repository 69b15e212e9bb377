use crate::errors::InvalidInput;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a `ProfileSession`. Missing fields take their default values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Number of evenly spaced samples taken along the path for every layer.
    pub num_points: usize,

    /// Minimum time between two polling redraws, in milliseconds.
    pub refresh_interval_ms: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            num_points: 50,
            refresh_interval_ms: 500,
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_points < 2 {
            return Err(InvalidInput::TooFewSamples(self.num_points).into());
        }
        if self.refresh_interval_ms == 0 {
            return Err(InvalidInput::ZeroInterval.into());
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
