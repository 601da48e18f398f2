use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Symbolic weather condition used purely for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Clear,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Windy,
    Night,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Clear => "☀️",
            Icon::Cloudy => "☁️",
            Icon::Rain => "🌧️",
            Icon::Thunderstorm => "⛈️",
            Icon::Snow => "❄️",
            Icon::Fog => "🌫️",
            Icon::Windy => "💨",
            Icon::Night => "🌙",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub condition_text: String,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    /// Carried through from the provider; does not affect `icon`.
    pub is_day: bool,
    pub icon: Icon,
    pub city_name: String,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub calendar_date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub day_label: String,
    pub max_temp_c: i32,
    pub min_temp_c: i32,
    pub condition_text: String,
    pub icon: Icon,
    pub rain_chance_pct: u8,
}

/// Forecast days in provider (chronological) order.
pub type ForecastList = Vec<ForecastDay>;

/// Result of one successful query. Current conditions and the forecast are
/// only ever produced, replaced and discarded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: ForecastList,
}
