use crate::error::{GenerationError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options understood by every backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Sampling temperature, 0.0..=2.0
    pub temperature: f32,

    /// Nucleus-sampling threshold, (0.0, 1.0]
    pub top_p: f32,

    /// Token budget per file
    pub max_tokens: u32,

    /// Pause between delivered fragments, for smoother rendering
    pub fragment_delay_ms: u64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: 2048,
            fragment_delay_ms: 0,
        }
    }
}

impl GenerationOptions {
    /// Validate options
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GenerationError::InvalidOptions(format!(
                "temperature ({}) must be within 0.0..=2.0",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(GenerationError::InvalidOptions(format!(
                "top_p ({}) must be within (0.0, 1.0]",
                self.top_p
            )));
        }
        if self.max_tokens == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_tokens must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fragment_delay(&self) -> Duration {
        Duration::from_millis(self.fragment_delay_ms)
    }
}
