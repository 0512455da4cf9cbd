use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::BackendError,
    model::{ChatReply, Coordinates, ForecastBundle, HourlyEntry, SearchHit, WeatherSnapshot},
};

pub mod http;

pub use http::HttpBackend;

/// Routes of the dashboard backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Weather,
    SearchLocation,
    Hourly,
    Forecast,
    Chatbot,
    CacheClear,
    Health,
}

impl Endpoint {
    /// Path relative to the backend base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Weather => "api/weather",
            Endpoint::SearchLocation => "api/search-location",
            Endpoint::Hourly => "api/hourly",
            Endpoint::Forecast => "api/forecast",
            Endpoint::Chatbot => "api/chatbot",
            Endpoint::CacheClear => "api/cache-clear",
            Endpoint::Health => "health",
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[
            Endpoint::Weather,
            Endpoint::SearchLocation,
            Endpoint::Hourly,
            Endpoint::Forecast,
            Endpoint::Chatbot,
            Endpoint::CacheClear,
            Endpoint::Health,
        ]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// The remote weather/chat service. Every call is a single independent
/// exchange; a failure in one never affects the others.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn fetch_current(&self, at: Coordinates) -> Result<WeatherSnapshot, BackendError>;

    /// An empty result list is a valid answer, not an error.
    async fn search_location(&self, query: &str) -> Result<Vec<SearchHit>, BackendError>;

    async fn fetch_hourly(&self, at: Coordinates) -> Result<Vec<HourlyEntry>, BackendError>;

    async fn fetch_forecast(&self, at: Coordinates) -> Result<ForecastBundle, BackendError>;

    async fn send_chat(
        &self,
        message: &str,
        context: &WeatherSnapshot,
    ) -> Result<ChatReply, BackendError>;

    /// `true` when the backend acknowledged the request with any 2xx.
    async fn clear_cache(&self) -> bool;

    async fn health(&self) -> Result<String, BackendError>;
}
