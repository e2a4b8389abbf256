//! OpenWeatherMap response structures and conversion into dashboard readings

use crate::models::forecast::Timestamped;
use crate::models::{ForecastEntry, Location, PollutionReading, WeatherReading, midday_entries};
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One entry of the direct geocoding response
#[derive(Debug, Deserialize)]
pub struct GeocodingMatch {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<GeocodingMatch> for Location {
    fn from(found: GeocodingMatch) -> Self {
        Location::new(found.lat, found.lon, found.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionResponse {
    pub list: Vec<AirPollutionSample>,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionSample {
    pub main: AqiMain,
    pub components: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct AqiMain {
    pub aqi: i64,
}

impl TryFrom<AirPollutionResponse> for PollutionReading {
    type Error = anyhow::Error;

    fn try_from(response: AirPollutionResponse) -> Result<Self> {
        let sample = response
            .list
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Air pollution response contained no samples"))?;

        Ok(PollutionReading::new(sample.main.aqi, sample.components))
    }
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub main: CurrentMain,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

impl TryFrom<CurrentWeatherResponse> for WeatherReading {
    type Error = anyhow::Error;

    fn try_from(response: CurrentWeatherResponse) -> Result<Self> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Current weather response contained no condition"))?;

        Ok(WeatherReading {
            temperature: response.main.temp,
            feels_like: response.main.feels_like,
            temp_min: response.main.temp_min,
            temp_max: response.main.temp_max,
            description: condition.description,
            icon: condition.icon,
            wind_speed: response.wind.speed,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub feels_like: f64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastItem {
    pub dt_txt: String,
    pub main: ForecastMain,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

impl Timestamped for ForecastItem {
    fn timestamp(&self) -> &str {
        &self.dt_txt
    }
}

impl TryFrom<ForecastItem> for ForecastEntry {
    type Error = anyhow::Error;

    fn try_from(item: ForecastItem) -> Result<Self> {
        let condition = item
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Forecast entry {} has no condition", item.dt_txt))?;

        Ok(ForecastEntry {
            date: item.dt_txt,
            temperature: item.main.temp,
            feels_like: item.main.feels_like,
            description: condition.description,
            icon: condition.icon,
            wind_speed: item.wind.speed,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastItem>,
}

impl ForecastResponse {
    /// Convert the midday samples only; a malformed midday sample fails the whole forecast
    pub fn into_midday_entries(self) -> Result<Vec<ForecastEntry>> {
        midday_entries(self.list)
            .map(ForecastEntry::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forecast_item(dt_txt: &str, temp: f64) -> serde_json::Value {
        json!({
            "dt": 1_714_564_800,
            "dt_txt": dt_txt,
            "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 60},
            "weather": [{"id": 800, "main": "Clear", "description": "ciel dégagé", "icon": "01d"}],
            "wind": {"speed": 4.2, "deg": 230}
        })
    }

    #[test]
    fn test_pollution_uses_first_sample() {
        let response: AirPollutionResponse = serde_json::from_value(json!({
            "coord": {"lon": 7.7521, "lat": 48.5734},
            "list": [
                {"main": {"aqi": 3}, "components": {"pm2_5": 21.4, "no2": 17.0}, "dt": 1},
                {"main": {"aqi": 5}, "components": {"pm2_5": 90.0}, "dt": 2}
            ]
        }))
        .unwrap();

        let reading = PollutionReading::try_from(response).unwrap();
        assert_eq!(reading.aqi_score, 3);
        assert_eq!(reading.recommendation, "acceptable, avoid intense effort");
        assert_eq!(reading.details.get("no2"), Some(&17.0));
    }

    #[test]
    fn test_empty_pollution_list_is_an_error() {
        let response: AirPollutionResponse = serde_json::from_value(json!({"list": []})).unwrap();
        assert!(PollutionReading::try_from(response).is_err());
    }

    #[test]
    fn test_current_weather_conversion() {
        let response: CurrentWeatherResponse = serde_json::from_value(json!({
            "main": {"temp": 21.3, "feels_like": 20.9, "temp_min": 19.0, "temp_max": 23.4, "pressure": 1016},
            "weather": [{"description": "peu nuageux", "icon": "02d"}],
            "wind": {"speed": 3.6},
            "name": "Strasbourg"
        }))
        .unwrap();

        let reading = WeatherReading::try_from(response).unwrap();
        assert_eq!(reading.temperature, 21.3);
        assert_eq!(reading.temp_max, 23.4);
        assert_eq!(reading.description, "peu nuageux");
        assert_eq!(reading.icon, "02d");
        assert_eq!(reading.wind_speed, 3.6);
    }

    #[test]
    fn test_current_weather_without_condition_fails() {
        let response: CurrentWeatherResponse = serde_json::from_value(json!({
            "main": {"temp": 1.0, "feels_like": 1.0, "temp_min": 1.0, "temp_max": 1.0},
            "weather": [],
            "wind": {"speed": 0.0}
        }))
        .unwrap();

        assert!(WeatherReading::try_from(response).is_err());
    }

    #[test]
    fn test_forecast_keeps_midday_samples() {
        let response: ForecastResponse = serde_json::from_value(json!({
            "list": [
                forecast_item("2024-05-01 09:00:00", 14.0),
                forecast_item("2024-05-01 12:00:00", 19.0),
                forecast_item("2024-05-02 12:00:00", 21.0),
                forecast_item("2024-05-02 18:00:00", 16.0)
            ]
        }))
        .unwrap();

        let entries = response.into_midday_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, "2024-05-01 12:00:00");
        assert_eq!(entries[0].feels_like, 18.0);
        assert_eq!(entries[1].temperature, 21.0);
        assert_eq!(entries[1].wind_speed, 4.2);
    }

    #[test]
    fn test_malformed_non_midday_sample_is_ignored() {
        let mut night = forecast_item("2024-05-01 03:00:00", 9.0);
        night["weather"] = json!([]);

        let response: ForecastResponse = serde_json::from_value(json!({
            "list": [night, forecast_item("2024-05-01 12:00:00", 19.0)]
        }))
        .unwrap();

        assert_eq!(response.into_midday_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_geocoding_match_into_location() {
        let found: Vec<GeocodingMatch> = serde_json::from_value(json!([
            {"name": "Lyon", "lat": 45.7578, "lon": 4.8320, "country": "FR"}
        ]))
        .unwrap();

        let location = Location::from(found.into_iter().next().unwrap());
        assert_eq!(location, Location::new(45.7578, 4.8320, "Lyon"));
    }
}
