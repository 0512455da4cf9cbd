use crate::backend::Endpoint;

/// Failure of a single backend exchange.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status { endpoint: Endpoint, status: u16, body: String },
    #[error("Failed to parse {endpoint} response: {reason}")]
    Decode { endpoint: Endpoint, reason: String },
    #[error("Invalid backend base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl BackendError {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            Self::InvalidBaseUrl { .. } => None,
        }
    }
}

/// Device positioning failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Location permission denied")]
    Denied,
    #[error("Location service unsupported")]
    Unsupported,
}

/// Failures the dashboard surfaces to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// Network failure or non-success status on a blocking fetch.
    #[error("{message}")]
    Transport { message: String, detail: String },
    #[error("No locations found for '{query}'")]
    EmptySearchResult { query: String },
    #[error("Location access denied")]
    GeolocationDenied,
    #[error("Geolocation not supported")]
    GeolocationUnsupported,
}

impl DashboardError {
    pub fn weather_fetch(err: &BackendError) -> Self {
        Self::Transport {
            message: "Failed to load weather data. Please try again.".into(),
            detail: err.to_string(),
        }
    }

    pub fn search_failed(err: &BackendError) -> Self {
        Self::Transport { message: "Search failed. Please try again.".into(), detail: err.to_string() }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Transport { message, .. } => message,
            Self::EmptySearchResult { .. } => "No locations found. Try another search.",
            Self::GeolocationDenied => "Location access denied. Please search manually.",
            Self::GeolocationUnsupported => "Geolocation not supported. Please search manually.",
        }
    }

    /// Blocking failures replace the whole main panel; the rest are shown inline.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::EmptySearchResult { .. })
    }
}

impl From<PositionError> for DashboardError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Denied => Self::GeolocationDenied,
            PositionError::Unsupported => Self::GeolocationUnsupported,
        }
    }
}
