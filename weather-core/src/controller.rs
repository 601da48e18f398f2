//! Query Controller: owns the city input and the display mode, and runs the
//! request lifecycle for each submitted query.
//!
//! The display mode is a single tagged union ([`DisplayMode`]), so "loading",
//! "error", "loaded" and "idle" can never hold at the same time. Current
//! conditions and the forecast live together inside [`DisplayMode::Loaded`]
//! and are therefore replaced or cleared as one unit.
//!
//! # Overlapping queries
//!
//! A query is never cancelled. When two queries overlap, [`ResponseOrdering`]
//! decides which completion is allowed to write the state:
//!
//! - [`ResponseOrdering::LatestIssuedWins`] (default) tags every request with a
//!   sequence number and drops completions that are not the latest issued.
//! - [`ResponseOrdering::LastArrivalWins`] lets every completion write, so the
//!   response that arrives last wins regardless of issue order.

use serde::{Deserialize, Serialize};
use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    error::{LookupError, QueryError},
    model::WeatherReport,
    normalize::normalize,
    provider::{FORECAST_DAYS, ForecastSource},
};

/// The mutually exclusive display modes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayMode {
    /// No query has completed yet.
    #[default]
    Idle,
    Loading,
    Error(String),
    Loaded(WeatherReport),
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub city_text: String,
    pub mode: DisplayMode,
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self.mode, DisplayMode::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.mode {
            DisplayMode::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.mode {
            DisplayMode::Loaded(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Drop completions of requests superseded by a newer one.
    #[default]
    LatestIssuedWins,
    /// Every completion writes; the last one to arrive wins.
    LastArrivalWins,
}

/// The two ways a user can start a query. Both run the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit search action (button, subcommand).
    Action,
    /// Confirm keystroke while the city input has focus.
    Confirm,
}

#[derive(Debug)]
pub struct QueryController<S> {
    source: S,
    ordering: ResponseOrdering,
    state: Mutex<QueryState>,
    latest_request: AtomicU64,
}

impl<S: ForecastSource> QueryController<S> {
    pub fn new(source: S) -> Self {
        Self::with_ordering(source, ResponseOrdering::default())
    }

    pub fn with_ordering(source: S, ordering: ResponseOrdering) -> Self {
        Self {
            source,
            ordering,
            state: Mutex::new(QueryState::default()),
            latest_request: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        self.lock().clone()
    }

    pub fn update_city_text(&self, text: &str) {
        self.lock().city_text = text.to_string();
    }

    /// Run a query for the current city text.
    pub async fn submit(&self, trigger: Trigger) -> Result<WeatherReport, QueryError> {
        let city_text = self.lock().city_text.clone();
        tracing::debug!(?trigger, "Query triggered");
        self.submit_query(&city_text).await
    }

    /// Validate `city_text`, fetch its forecast and publish the outcome.
    ///
    /// Blank input returns [`QueryError::Validation`] without a request and
    /// without touching the state. Lookup failures are recorded as
    /// [`DisplayMode::Error`] and also returned.
    pub async fn submit_query(&self, city_text: &str) -> Result<WeatherReport, QueryError> {
        let city = city_text.trim();
        if city.is_empty() {
            tracing::debug!("Rejected blank city name");
            return Err(QueryError::Validation);
        }

        let request_id = {
            let mut state = self.lock();
            state.mode = DisplayMode::Loading;
            self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
        };

        tracing::debug!(city = %city, request_id, "Fetching forecast");

        let outcome = self
            .source
            .fetch_forecast(city, FORECAST_DAYS)
            .await
            .and_then(|payload| normalize(&payload));

        self.publish(request_id, city, outcome).map_err(QueryError::from)
    }

    fn publish(
        &self,
        request_id: u64,
        city: &str,
        outcome: Result<WeatherReport, LookupError>,
    ) -> Result<WeatherReport, LookupError> {
        let mut state = self.lock();

        if self.ordering == ResponseOrdering::LatestIssuedWins
            && request_id != self.latest_request.load(Ordering::SeqCst)
        {
            tracing::debug!(city = %city, request_id, "Discarding superseded response");
            return outcome;
        }

        state.mode = match &outcome {
            Ok(report) => {
                tracing::info!(
                    city = %report.current.city_name,
                    temp = report.current.temperature_c,
                    days = report.forecast.len(),
                    "Weather data fetched successfully"
                );
                DisplayMode::Loaded(report.clone())
            }
            Err(err) => {
                tracing::warn!(city = %city, error = %err, "Weather lookup failed");
                DisplayMode::Error(err.to_string())
            }
        };

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, QueryState> {
        // State is replaced wholesale on every write, so a poisoned guard
        // still holds a consistent value.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
