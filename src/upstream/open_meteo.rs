//! `OpenMeteo` UV and pollen response structures

use crate::models::{PollenReading, UvReading};
use serde::Deserialize;

pub const UV_FIELDS: &str = "uv_index,uv_index_clear_sky";

pub const POLLEN_FIELDS: &str =
    "alder_pollen,birch_pollen,grass_pollen,mugwort_pollen,olive_pollen,ragweed_pollen";

/// Query for a `current=` request on either `OpenMeteo` host
pub fn query(lat: f64, lon: f64, fields: &str) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", lat.to_string()),
        ("longitude", lon.to_string()),
        ("current", fields.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
pub struct UvResponse {
    pub current: UvCurrent,
}

#[derive(Debug, Deserialize)]
pub struct UvCurrent {
    pub uv_index: f64,
    pub uv_index_clear_sky: f64,
}

impl From<UvResponse> for UvReading {
    fn from(response: UvResponse) -> Self {
        UvReading::new(response.current.uv_index, response.current.uv_index_clear_sky)
    }
}

/// Pollen values are `null` outside the European model domain or season
#[derive(Debug, Deserialize)]
pub struct PollenCurrent {
    pub alder_pollen: Option<f64>,
    pub birch_pollen: Option<f64>,
    pub grass_pollen: Option<f64>,
    pub mugwort_pollen: Option<f64>,
    pub olive_pollen: Option<f64>,
    pub ragweed_pollen: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PollenResponse {
    pub current: PollenCurrent,
}

impl From<PollenResponse> for PollenReading {
    fn from(response: PollenResponse) -> Self {
        let current = response.current;
        PollenReading {
            alder: current.alder_pollen.unwrap_or_default(),
            birch: current.birch_pollen.unwrap_or_default(),
            grass: current.grass_pollen.unwrap_or_default(),
            mugwort: current.mugwort_pollen.unwrap_or_default(),
            olive: current.olive_pollen.unwrap_or_default(),
            ragweed: current.ragweed_pollen.unwrap_or_default(),
        }
    }
}
