//! Turning "where am I" into coordinates: either from the device position or
//! from a free-text place search resolved by the backend.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    backend::WeatherBackend,
    error::{DashboardError, PositionError},
    model::Coordinates,
};

/// The device positioning capability.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// A known position, e.g. the home coordinates from the config file.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

/// No positioning capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositioning;

#[async_trait]
impl PositionSource for NoPositioning {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Err(PositionError::Unsupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AcquireState {
    #[default]
    Idle,
    Requesting,
    Resolved(Coordinates),
    Denied,
    Unsupported,
}

#[derive(Debug, Default)]
pub struct LocationAcquirer {
    state: AcquireState,
}

impl LocationAcquirer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AcquireState {
        self.state
    }

    /// Asks the device for a fix. Denied and Unsupported end in the same
    /// user-visible state but are logged apart.
    pub async fn acquire(
        &mut self,
        source: &dyn PositionSource,
    ) -> Result<Coordinates, DashboardError> {
        self.state = AcquireState::Requesting;

        match source.current_position().await {
            Ok(at) => {
                tracing::info!(%at, "position resolved");
                self.state = AcquireState::Resolved(at);
                Ok(at)
            }
            Err(PositionError::Denied) => {
                tracing::warn!("geolocation denied by user");
                self.state = AcquireState::Denied;
                Err(DashboardError::GeolocationDenied)
            }
            Err(PositionError::Unsupported) => {
                tracing::warn!("geolocation capability unavailable");
                self.state = AcquireState::Unsupported;
                Err(DashboardError::GeolocationUnsupported)
            }
        }
    }

    /// Records a search hit as a resolved fix, same as a device position.
    pub fn resolved_by_search(&mut self, at: Coordinates) {
        self.state = AcquireState::Resolved(at);
    }
}

/// Resolves a free-text place query to the coordinates of the backend's first
/// hit. A blank query does nothing and returns `Ok(None)`.
pub async fn resolve_search(
    backend: &dyn WeatherBackend,
    query: &str,
) -> Result<Option<Coordinates>, DashboardError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }

    let hits = backend.search_location(query).await.map_err(|e| {
        tracing::warn!(query, "location search failed: {e}");
        DashboardError::search_failed(&e)
    })?;

    match hits.first() {
        Some(hit) => {
            tracing::info!(query, place = %hit.display_name, "search resolved");
            Ok(Some(hit.coordinates()))
        }
        None => {
            tracing::info!(query, "search returned no results");
            Err(DashboardError::EmptySearchResult { query: query.to_string() })
        }
    }
}
