//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast provider abstraction and its WeatherAPI.com implementation
//! - Normalization of the provider payload into display-ready models
//! - The query controller that owns the display state
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use controller::{DisplayMode, QueryController, QueryState, ResponseOrdering, Trigger};
pub use error::{LookupError, QueryError};
pub use model::{CurrentConditions, ForecastDay, ForecastList, Icon, WeatherReport};
pub use normalize::{classify_icon, derive_day_label, normalize};
pub use provider::{ForecastSource, WeatherApiProvider};
