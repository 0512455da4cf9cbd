//! Core library for the `weatherdash` weather dashboard.
//!
//! This crate defines:
//! - The backend client (weather, search, hourly, forecast, chatbot, cache)
//! - Location acquisition from a device position or a place search
//! - Persisted view preferences and backend configuration
//! - The application state, its transitions and the async driver
//! - Pure HTML rendering of that state
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod app;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod preferences;
pub mod render;
pub mod tab;

#[cfg(test)]
mod testing;

pub use app::{AppState, Dashboard, View};
pub use backend::{Endpoint, HttpBackend, WeatherBackend};
pub use chat::{ChatSession, ChatTurn, Sender};
pub use config::Config;
pub use error::{BackendError, DashboardError, PositionError};
pub use location::{FixedPosition, LocationAcquirer, NoPositioning, PositionSource};
pub use model::{Coordinates, WeatherSnapshot};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences, TemperatureUnit,
    Theme,
};
pub use tab::Tab;
