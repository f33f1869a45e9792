use crate::{
    config::Store,
    model::{WeatherQuery, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Everything that can go wrong while looking up the weather.
///
/// The dashboard shows dedicated messages for `NotFound` and
/// `MissingCredential`; the remaining variants all render as the generic
/// fetch error and only differ in what gets logged.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("no weather data for the requested city")]
    NotFound,

    #[error("no API key configured")]
    MissingCredential,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse weather payload: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for the queried city.
    ///
    /// Single best-effort attempt: no retry, no timeout, no caching.
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the weather provider from the stored credentials.
pub fn provider_from_store(store: &Store) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    let api_key = store.api_key().ok_or(WeatherError::MissingCredential)?;
    Ok(Arc::new(OpenWeatherProvider::new(api_key.to_owned())))
}
