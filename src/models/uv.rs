//! UV index reading and level classification

use serde::{Deserialize, Serialize};

/// Qualitative UV exposure level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
    Extreme,
}

impl UvLevel {
    /// Classify a UV index; bounds are inclusive on the upper side
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        if index <= 2.0 {
            Self::Low
        } else if index <= 5.0 {
            Self::Moderate
        } else if index <= 7.0 {
            Self::High
        } else if index <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }
}

/// Current UV conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvReading {
    pub index: f64,
    pub level: UvLevel,
    /// UV index under a cloudless sky
    pub clear_sky_index: f64,
}

impl UvReading {
    #[must_use]
    pub fn new(index: f64, clear_sky_index: f64) -> Self {
        Self {
            index,
            level: UvLevel::from_index(index),
            clear_sky_index,
        }
    }
}
