//! Pollen concentrations, keyed by French plant names on the wire

use serde::{Deserialize, Serialize};

/// Current pollen concentrations in grains/m³
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollenReading {
    #[serde(rename = "Aulne")]
    pub alder: f64,
    #[serde(rename = "Bouleau")]
    pub birch: f64,
    #[serde(rename = "Graminées")]
    pub grass: f64,
    #[serde(rename = "Armoise")]
    pub mugwort: f64,
    #[serde(rename = "Olivier")]
    pub olive: f64,
    #[serde(rename = "Ambroisie")]
    pub ragweed: f64,
}

impl PollenReading {
    /// Highest concentration across all six plants
    #[must_use]
    pub fn peak(&self) -> f64 {
        [
            self.alder,
            self.birch,
            self.grass,
            self.mugwort,
            self.olive,
            self.ragweed,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}
