//! Error types surfaced by a city query.
//!
//! A query fails in exactly one of two ways: the input never leaves the
//! process ([`QueryError::Validation`]), or the lookup against the provider
//! fails ([`QueryError::Lookup`]). The display of a [`LookupError`] is the
//! message shown to the user.

use thiserror::Error;

/// Message shown for a missing city name.
pub const VALIDATION_MESSAGE: &str = "Please enter a city name";

/// Message shown for any non-success provider status.
pub const NOT_FOUND_MESSAGE: &str = "City not found";

/// Failure of the single provider request behind a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Provider answered with a non-2xx status. Unknown cities land here,
    /// and so does every other provider-side error code.
    #[error("City not found")]
    NotFound,

    /// Request could not be sent or its body could not be read.
    #[error("{0}")]
    Transport(String),

    /// Provider answered 2xx but the body is not a usable forecast.
    #[error("Malformed weather data: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        LookupError::Transport(format!("{:#}", anyhow::Error::from(err.without_url())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// City text was empty after trimming. No request was made.
    #[error("Please enter a city name")]
    Validation,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl QueryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Validation)
    }
}
