//! Team mood samples.
//!
//! Moods are reported on a five-point scale from -2 (very bad) to
//! 2 (very good). Only the averaged value is compared against the
//! configured thresholds.

use serde::{Deserialize, Serialize};

use super::Descriptor;
use crate::error::MoodError;

/// A single mood sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Mood {
    VeryBad,
    Bad,
    Neutral,
    Good,
    VeryGood,
}

impl Mood {
    /// Numeric value on the -2..=2 scale.
    #[inline]
    pub fn value(self) -> i64 {
        match self {
            Mood::VeryBad => -2,
            Mood::Bad => -1,
            Mood::Neutral => 0,
            Mood::Good => 1,
            Mood::VeryGood => 2,
        }
    }

    /// Name and description of this mood.
    pub fn descriptor(self) -> Descriptor {
        match self {
            Mood::VeryBad => Descriptor::new("Very bad", "The team is frustrated and struggling"),
            Mood::Bad => Descriptor::new("Bad", "The team is unhappy with how things are going"),
            Mood::Neutral => Descriptor::new("Neutral", "Nothing particularly good or bad"),
            Mood::Good => Descriptor::new("Good", "The team is positive about the work"),
            Mood::VeryGood => Descriptor::new("Very good", "The team is motivated and confident"),
        }
    }

    /// Converts a slice of raw integers, rejecting the first out-of-range value.
    pub fn from_values(values: &[i64]) -> Result<Vec<Mood>, MoodError> {
        values.iter().map(|&v| Mood::try_from(v)).collect()
    }
}

impl TryFrom<i64> for Mood {
    type Error = MoodError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(Mood::VeryBad),
            -1 => Ok(Mood::Bad),
            0 => Ok(Mood::Neutral),
            1 => Ok(Mood::Good),
            2 => Ok(Mood::VeryGood),
            other => Err(MoodError::InvalidMood(other)),
        }
    }
}

impl From<Mood> for i64 {
    fn from(mood: Mood) -> Self {
        mood.value()
    }
}
