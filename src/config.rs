//! Engine configuration.
//!
//! Every tunable the engine reads lives here and is passed in explicitly.
//! All fields have defaults, so a TOML file only needs the values it
//! overrides:
//!
//! ```toml
//! slack_epsilon = 1e-6
//! time_unit = "hours"
//!
//! [mood]
//! bad = -0.25
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Relative tolerance for zero-slack comparisons.
    /// Scaled by `max(1, project_duration)`.
    pub slack_epsilon: f64,
    /// Calendar length of one duration unit.
    pub time_unit: TimeUnit,
    /// Sentiment thresholds for averaged mood.
    pub mood: MoodThresholds,
    /// Confidence multipliers per sentiment.
    pub confidence: ConfidencePenalties,
    /// Monte Carlo parameters.
    pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slack_epsilon: 1e-9,
            time_unit: TimeUnit::Days,
            mood: MoodThresholds::default(),
            confidence: ConfidencePenalties::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Sets the slack tolerance.
    pub fn with_slack_epsilon(mut self, epsilon: f64) -> Self {
        self.slack_epsilon = epsilon;
        self
    }

    /// Sets the duration unit.
    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self
    }

    /// Sets the mood thresholds.
    pub fn with_mood_thresholds(mut self, mood: MoodThresholds) -> Self {
        self.mood = mood;
        self
    }
}

/// Averaged-mood thresholds.
///
/// `mean <= very_bad` is depressed, `very_bad < mean <= bad` is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodThresholds {
    pub bad: f64,
    pub very_bad: f64,
}

impl MoodThresholds {
    pub const BAD_MOOD: f64 = -0.5;
    pub const VERY_BAD_MOOD: f64 = -1.0;

    pub fn new(bad: f64, very_bad: f64) -> Self {
        Self { bad, very_bad }
    }
}

impl Default for MoodThresholds {
    fn default() -> Self {
        Self::new(Self::BAD_MOOD, Self::VERY_BAD_MOOD)
    }
}

/// Multipliers applied to on-time probability by sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePenalties {
    pub concerned: f64,
    pub depressed: f64,
}

impl Default for ConfidencePenalties {
    fn default() -> Self {
        Self {
            concerned: 0.9,
            depressed: 0.75,
        }
    }
}

/// Monte Carlo simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of sampled schedules.
    pub iterations: usize,
    /// RNG seed; equal seeds give equal reports.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self { iterations, seed }
    }
}

/// Calendar length of one duration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    /// Milliseconds in one unit.
    #[inline]
    pub fn millis(self) -> i64 {
        const HOUR: i64 = 3_600_000;
        match self {
            TimeUnit::Hours => HOUR,
            TimeUnit::Days => 24 * HOUR,
            TimeUnit::Weeks => 7 * 24 * HOUR,
        }
    }

    /// Converts a unit-free duration into a calendar duration.
    ///
    /// Returns `None` for negative, non-finite, or out-of-range values.
    pub fn to_duration(self, amount: f64) -> Option<Duration> {
        let ms = amount * self.millis() as f64;
        if !ms.is_finite() || ms < 0.0 || ms > i64::MAX as f64 {
            return None;
        }
        Duration::try_milliseconds(ms.round() as i64)
    }
}
