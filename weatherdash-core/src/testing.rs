//! In-memory backend used by unit tests.

use async_trait::async_trait;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    backend::{Endpoint, WeatherBackend},
    error::BackendError,
    model::{
        AirQuality, ChatReply, Coordinates, DailyForecastEntry, ForecastBundle, HourlyEntry,
        SearchHit, WeatherSnapshot, fixtures,
    },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub current: usize,
    pub search: usize,
    pub hourly: usize,
    pub forecast: usize,
    pub chat: usize,
    pub cache_clear: usize,
}

#[derive(Debug)]
pub struct MockBackend {
    snapshot: WeatherSnapshot,
    hits: Vec<SearchHit>,
    hourly: Vec<HourlyEntry>,
    forecast: ForecastBundle,
    fail_current: AtomicBool,
    fail_search: AtomicBool,
    fail_hourly: AtomicBool,
    fail_chat: bool,
    counts: Mutex<CallCounts>,
    last_chat: Mutex<Option<(String, WeatherSnapshot)>>,
    last_current: Mutex<Option<Coordinates>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            snapshot: fixtures::london(),
            hits: Vec::new(),
            hourly: (0..24)
                .map(|h| HourlyEntry {
                    hour: format!("{h:02}:00"),
                    condition: "Light rain".into(),
                    temperature_celsius: 10.0 + h as f64 / 2.0,
                    precipitation_chance: 40,
                })
                .collect(),
            forecast: ForecastBundle {
                forecast: vec![DailyForecastEntry {
                    day: "Monday".into(),
                    condition: "Thunderstorm".into(),
                    min_temp_c: 9.0,
                    max_temp_c: 21.0,
                    rain_chance: 80.0,
                }],
                air_quality: AirQuality::default(),
            },
            fail_current: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
            fail_hourly: AtomicBool::new(false),
            fail_chat: false,
            counts: Mutex::new(CallCounts::default()),
            last_chat: Mutex::new(None),
            last_current: Mutex::new(None),
        }
    }

    pub fn with_search_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    pub fn failing_search(self) -> Self {
        self.fail_search.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_chat(mut self) -> Self {
        self.fail_chat = true;
        self
    }

    pub fn set_fail_current(&self, fail: bool) {
        self.fail_current.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_hourly(&self, fail: bool) {
        self.fail_hourly.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallCounts {
        *self.counts.lock().expect("counts lock")
    }

    pub fn last_chat(&self) -> Option<(String, WeatherSnapshot)> {
        self.last_chat.lock().expect("chat lock").clone()
    }

    pub fn last_current(&self) -> Option<Coordinates> {
        *self.last_current.lock().expect("current lock")
    }

    fn bump(&self, f: impl FnOnce(&mut CallCounts)) {
        f(&mut self.counts.lock().expect("counts lock"));
    }
}

fn boom(endpoint: Endpoint) -> BackendError {
    BackendError::Status { endpoint, status: 500, body: "boom".into() }
}

pub fn hit(latitude: f64, longitude: f64, name: &str) -> SearchHit {
    SearchHit {
        latitude,
        longitude,
        display_name: name.into(),
        city: name.into(),
        country: String::new(),
    }
}

#[async_trait]
impl WeatherBackend for MockBackend {
    async fn fetch_current(&self, at: Coordinates) -> Result<WeatherSnapshot, BackendError> {
        self.bump(|c| c.current += 1);
        *self.last_current.lock().expect("current lock") = Some(at);
        if self.fail_current.load(Ordering::SeqCst) {
            return Err(boom(Endpoint::Weather));
        }
        let mut snapshot = self.snapshot.clone();
        snapshot.location.latitude = at.latitude;
        snapshot.location.longitude = at.longitude;
        Ok(snapshot)
    }

    async fn search_location(&self, _query: &str) -> Result<Vec<SearchHit>, BackendError> {
        self.bump(|c| c.search += 1);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(boom(Endpoint::SearchLocation));
        }
        Ok(self.hits.clone())
    }

    async fn fetch_hourly(&self, _at: Coordinates) -> Result<Vec<HourlyEntry>, BackendError> {
        self.bump(|c| c.hourly += 1);
        if self.fail_hourly.load(Ordering::SeqCst) {
            return Err(boom(Endpoint::Hourly));
        }
        Ok(self.hourly.clone())
    }

    async fn fetch_forecast(&self, _at: Coordinates) -> Result<ForecastBundle, BackendError> {
        self.bump(|c| c.forecast += 1);
        Ok(self.forecast.clone())
    }

    async fn send_chat(
        &self,
        message: &str,
        context: &WeatherSnapshot,
    ) -> Result<ChatReply, BackendError> {
        self.bump(|c| c.chat += 1);
        *self.last_chat.lock().expect("chat lock") = Some((message.to_string(), context.clone()));
        if self.fail_chat {
            return Err(boom(Endpoint::Chatbot));
        }
        Ok(ChatReply { response: format!("It is {} in {}", context.current_weather.condition, context.location.city) })
    }

    async fn clear_cache(&self) -> bool {
        self.bump(|c| c.cache_clear += 1);
        true
    }

    async fn health(&self) -> Result<String, BackendError> {
        Ok("healthy".into())
    }
}
