use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    error::BackendError,
    model::{
        ChatReply, ChatRequest, Coordinates, ForecastBundle, HourlyEntry, HourlyResponse,
        SearchHit, SearchRequest, SearchResponse, WeatherSnapshot,
    },
};

use super::{Endpoint, WeatherBackend};

/// [`WeatherBackend`] over HTTP. The base URL is fixed at construction, so the
/// same client serves a local backend or a hosted one.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Ok(Self { base: parse_base_url(base_url)?, http: Client::new() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, endpoint: Endpoint) -> Result<Url, BackendError> {
        self.base.join(endpoint.path()).map_err(|e| BackendError::InvalidBaseUrl {
            url: self.base.to_string(),
            reason: e.to_string(),
        })
    }

    async fn post<Req, Resp>(&self, endpoint: Endpoint, body: &Req) -> Result<Resp, BackendError>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned + Send,
    {
        let url = self.url(endpoint)?;
        tracing::debug!(%endpoint, "POST {url}");

        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;

        read_json(endpoint, res).await
    }
}

async fn read_json<Resp: DeserializeOwned>(
    endpoint: Endpoint,
    res: reqwest::Response,
) -> Result<Resp, BackendError> {
    let status = res.status();
    let body = res.text().await.map_err(|source| BackendError::Transport { endpoint, source })?;

    if !status.is_success() {
        let err = BackendError::Status {
            endpoint,
            status: status.as_u16(),
            body: truncate_body(&body),
        };
        tracing::warn!("{err}");
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|e| {
        let err = BackendError::Decode { endpoint, reason: e.to_string() };
        tracing::warn!("{err}");
        err
    })
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn fetch_current(&self, at: Coordinates) -> Result<WeatherSnapshot, BackendError> {
        self.post(Endpoint::Weather, &at).await
    }

    async fn search_location(&self, query: &str) -> Result<Vec<SearchHit>, BackendError> {
        let parsed: SearchResponse =
            self.post(Endpoint::SearchLocation, &SearchRequest { query }).await?;
        Ok(parsed.results)
    }

    async fn fetch_hourly(&self, at: Coordinates) -> Result<Vec<HourlyEntry>, BackendError> {
        let parsed: HourlyResponse = self.post(Endpoint::Hourly, &at).await?;
        Ok(parsed.hourly_forecast)
    }

    async fn fetch_forecast(&self, at: Coordinates) -> Result<ForecastBundle, BackendError> {
        self.post(Endpoint::Forecast, &at).await
    }

    async fn send_chat(
        &self,
        message: &str,
        context: &WeatherSnapshot,
    ) -> Result<ChatReply, BackendError> {
        self.post(Endpoint::Chatbot, &ChatRequest { message, weather_data: context }).await
    }

    async fn clear_cache(&self) -> bool {
        let endpoint = Endpoint::CacheClear;
        let url = match self.url(endpoint) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("{e}");
                return false;
            }
        };

        match self.http.post(url).json(&json!({})).send().await {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                tracing::warn!(%endpoint, status = res.status().as_u16(), "cache clear rejected");
                false
            }
            Err(e) => {
                tracing::warn!(%endpoint, "cache clear failed: {e}");
                false
            }
        }
    }

    async fn health(&self) -> Result<String, BackendError> {
        #[derive(serde::Deserialize)]
        struct Health {
            status: String,
        }

        let endpoint = Endpoint::Health;
        let url = self.url(endpoint)?;
        tracing::debug!(%endpoint, "GET {url}");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;

        let parsed: Health = read_json(endpoint, res).await?;
        Ok(parsed.status)
    }
}

/// Parses the backend origin. A trailing slash is added so that endpoint paths
/// join underneath any path prefix instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, BackendError> {
    let trimmed = raw.trim();
    let with_slash =
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{trimmed}/") };

    let url = Url::parse(&with_slash).map_err(|e| BackendError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
