//! Reveal animation timing.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, fs};

pub const TIMING_CONFIG_PATH_ENV: &str = "VP_TIMING_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    /// Shuffle frame interval (default: 80)
    pub shuffle_tick_ms: u64,
    /// Shuffle phase length before the first commit (default: 1500)
    pub shuffle_duration_ms: u64,
    /// Delay between slot commits (default: 1000)
    pub reveal_interval_ms: u64,
    /// Reroll flicker frame interval (default: 80)
    pub reroll_tick_ms: u64,
    /// Flicker frames shown before a reroll commits (default: 8)
    pub reroll_flicker_ticks: u32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            shuffle_tick_ms: 80,
            shuffle_duration_ms: 1500,
            reveal_interval_ms: 1000,
            reroll_tick_ms: 80,
            reroll_flicker_ticks: 8,
        }
    }
}

impl RevealTiming {
    /// No shuffle phase and no delays; handy for scripted runs and tests.
    pub fn instant() -> Self {
        Self {
            shuffle_tick_ms: 1,
            shuffle_duration_ms: 0,
            reveal_interval_ms: 0,
            reroll_tick_ms: 1,
            reroll_flicker_ticks: 0,
        }
    }

    pub fn shuffle_tick(&self) -> Duration {
        Duration::from_millis(self.shuffle_tick_ms)
    }

    pub fn shuffle_duration(&self) -> Duration {
        Duration::from_millis(self.shuffle_duration_ms)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    pub fn reroll_tick(&self) -> Duration {
        Duration::from_millis(self.reroll_tick_ms)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let timing: Self = serde_json::from_str(json)?;
        timing.validate()?;
        Ok(timing)
    }

    /// Periodic timers must have a non-zero period.
    pub fn validate(&self) -> Result<()> {
        if self.shuffle_tick_ms == 0 {
            return Err(CoreError::InvalidParameter("shuffle_tick_ms must be > 0".to_string()));
        }
        if self.reroll_tick_ms == 0 {
            return Err(CoreError::InvalidParameter("reroll_tick_ms must be > 0".to_string()));
        }
        Ok(())
    }

    /// Load from the file named by `VP_TIMING_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(TIMING_CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let timing = Self::from_json(&content)?;
        log::info!("Loaded reveal timing from {}='{}'", TIMING_CONFIG_PATH_ENV, path);
        Ok(timing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = RevealTiming::default();
        assert_eq!(timing.shuffle_tick(), Duration::from_millis(80));
        assert_eq!(timing.shuffle_duration(), Duration::from_millis(1500));
        assert_eq!(timing.reveal_interval(), Duration::from_secs(1));
        assert!(timing.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let timing = RevealTiming::from_json(r#"{ "reveal_interval_ms": 400 }"#).unwrap();
        assert_eq!(timing.reveal_interval_ms, 400);
        assert_eq!(timing.shuffle_tick_ms, 80);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(RevealTiming::from_json(r#"{ "shuffle_tick_ms": 0 }"#).is_err());
        assert!(RevealTiming::from_json(r#"{ "reroll_tick_ms": 0 }"#).is_err());
    }
}
