//! Plain-text rendering of the query state.

use std::fmt::Write;
use weather_core::{DisplayMode, ForecastDay, QueryState, WeatherReport, error::VALIDATION_MESSAGE};

const FOOTER: &str = "Powered by WeatherAPI.com";

pub fn render_state(state: &QueryState) -> String {
    let body = match &state.mode {
        DisplayMode::Idle => [
            "🔍 Search for a city to see the weather",
            "   Try: London, Tokyo, New York...",
        ]
        .join("\n"),
        DisplayMode::Loading => "⏳ Fetching weather data...".to_string(),
        DisplayMode::Error(message) => format!("❌ {message}"),
        DisplayMode::Loaded(report) => render_report(report),
    };

    // The footer only accompanies settled states.
    if state.is_loading() { body } else { format!("{body}\n\n{FOOTER}") }
}

pub fn render_validation() -> String {
    format!("❌ {VALIDATION_MESSAGE}")
}

fn render_report(report: &WeatherReport) -> String {
    let current = &report.current;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}, {}", current.city_name, current.country_name);
    let _ = writeln!(
        out,
        "{}  {}°C  {}",
        current.icon.glyph(),
        current.temperature_c,
        current.condition_text
    );
    let _ = writeln!(out, "Feels like {}°C", current.feels_like_c);
    let _ = write!(
        out,
        "💧 Humidity {}%   💨 Wind {} km/h",
        current.humidity_pct, current.wind_kph
    );

    if !report.forecast.is_empty() {
        let _ = write!(out, "\n\n{}-Day Forecast", report.forecast.len());
        for day in &report.forecast {
            let _ = write!(out, "\n{}", render_day(day));
        }
    }

    out
}

fn render_day(day: &ForecastDay) -> String {
    let mut line = format!(
        "{:<4} {}  {:>3}°/{}°  {}",
        day.day_label,
        day.icon.glyph(),
        day.max_temp_c,
        day.min_temp_c,
        day.condition_text,
    );

    if day.rain_chance_pct > 0 {
        let _ = write!(line, "  🌧️ {}%", day.rain_chance_pct);
    }

    line
}
