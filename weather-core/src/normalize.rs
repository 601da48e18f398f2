//! Pure mapping from the provider payload to display-ready structures.
//!
//! Nothing in here performs I/O or mutates its input. Temperatures are rounded
//! with [`f64::round`], i.e. to the nearest whole degree with ties away from
//! zero (20.5 -> 21, -20.5 -> -21).

use chrono::NaiveDate;

use crate::{
    error::LookupError,
    model::{CurrentConditions, ForecastDay, Icon, WeatherReport},
    payload::{ForecastPayload, PayloadForecastDay},
};

/// Keyword groups in priority order; the first group with a hit wins.
const ICON_KEYWORDS: &[(&[&str], Icon)] = &[
    (&["sunny", "clear"], Icon::Clear),
    (&["cloudy"], Icon::Cloudy),
    (&["rain", "drizzle"], Icon::Rain),
    (&["thunder", "storm"], Icon::Thunderstorm),
    (&["snow", "blizzard"], Icon::Snow),
    (&["mist", "fog"], Icon::Fog),
    (&["wind"], Icon::Windy),
    (&["night"], Icon::Night),
];

/// Classify free-text provider conditions into an [`Icon`].
///
/// Matching is a case-insensitive substring search over [`ICON_KEYWORDS`].
/// Text that matches nothing (e.g. "Overcast") falls back to [`Icon::Clear`].
///
/// `is_daytime` is accepted so callers can pass the provider's day/night flag,
/// but classification is currently text-only and ignores it.
pub fn classify_icon(condition_text: &str, _is_daytime: bool) -> Icon {
    let text = condition_text.to_lowercase();

    ICON_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(Icon::Clear)
}

/// Short English weekday ("Mon") for an ISO `YYYY-MM-DD` calendar date.
pub fn derive_day_label(iso_date: &str) -> Option<String> {
    parse_calendar_date(iso_date).map(|date| date.format("%a").to_string())
}

fn parse_calendar_date(iso_date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso_date.trim(), "%Y-%m-%d").ok()
}

fn whole_degrees(celsius: f64) -> i32 {
    celsius.round() as i32
}

pub fn normalize(payload: &ForecastPayload) -> Result<WeatherReport, LookupError> {
    let current = &payload.current;

    let current = CurrentConditions {
        temperature_c: whole_degrees(current.temp_c),
        feels_like_c: whole_degrees(current.feelslike_c),
        condition_text: current.condition.text.clone(),
        humidity_pct: current.humidity,
        wind_kph: current.wind_kph,
        is_day: current.is_day,
        icon: classify_icon(&current.condition.text, current.is_day),
        city_name: payload.location.name.clone(),
        country_name: payload.location.country.clone(),
    };

    let forecast = payload
        .forecast
        .forecastday
        .iter()
        .map(normalize_day)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherReport { current, forecast })
}

fn normalize_day(entry: &PayloadForecastDay) -> Result<ForecastDay, LookupError> {
    let (calendar_date, day_label) = parse_calendar_date(&entry.date)
        .zip(derive_day_label(&entry.date))
        .ok_or_else(|| {
            LookupError::MalformedPayload(format!("invalid forecast date '{}'", entry.date))
        })?;

    Ok(ForecastDay {
        calendar_date,
        day_label,
        max_temp_c: whole_degrees(entry.day.maxtemp_c),
        min_temp_c: whole_degrees(entry.day.mintemp_c),
        condition_text: entry.day.condition.text.clone(),
        icon: classify_icon(&entry.day.condition.text, true),
        rain_chance_pct: entry.day.daily_chance_of_rain,
    })
}
