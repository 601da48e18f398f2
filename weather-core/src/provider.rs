use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, error::LookupError, payload::ForecastPayload};

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

/// Forecast horizon requested on every query.
pub const FORECAST_DAYS: u8 = 5;

/// A source of combined current-conditions-and-forecast payloads.
///
/// One call is one outbound request; implementations never retry.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, city: &str, days: u8) -> Result<ForecastPayload, LookupError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<WeatherApiProvider> {
    let api_key = config.resolve_api_key()?;
    let provider = WeatherApiProvider::new(api_key);

    Ok(match config.weatherapi.base_url.as_deref() {
        Some(url) => provider.with_base_url(url),
        None => provider,
    })
}
