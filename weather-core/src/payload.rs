//! Raw `forecast.json` payload as returned by WeatherAPI.com.
//!
//! Only the fields the normalizer reads are declared; everything else in the
//! provider's response is ignored by serde.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub location: PayloadLocation,
    pub current: PayloadCurrent,
    pub forecast: PayloadForecast,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadLocation {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadCondition {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadCurrent {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: PayloadCondition,
    pub humidity: u8,
    pub wind_kph: f64,
    /// Sent by the provider as `1` (day) or `0` (night).
    #[serde(deserialize_with = "flag_from_int", default = "daytime")]
    pub is_day: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadForecast {
    pub forecastday: Vec<PayloadForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadForecastDay {
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub day: PayloadDay,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub condition: PayloadCondition,
    pub daily_chance_of_rain: u8,
}

impl ForecastPayload {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

fn daytime() -> bool {
    true
}

fn flag_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u8::deserialize(deserializer)?;
    Ok(raw != 0)
}
