//! Application state and the driver that moves it forward.
//!
//! [`AppState`] is a plain value: every user action or network completion is a
//! transition that consumes the old value and returns the next one. Rendering
//! reads it and nothing else. [`Dashboard`] owns the collaborators (backend,
//! position source, preference store) and runs the async side of each action.

use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::{
    backend::WeatherBackend,
    chat::{APOLOGY, ChatSession},
    error::{BackendError, DashboardError},
    location::{LocationAcquirer, PositionSource, resolve_search},
    model::{Coordinates, ForecastBundle, HourlyEntry, WeatherSnapshot},
    preferences::{PreferenceStore, Preferences, TemperatureUnit},
    render,
    tab::{PanelKind, Tab},
};

pub const MSG_LOCATING: &str = "Getting your location...";
pub const MSG_FETCHING: &str = "Fetching weather data...";
pub const MSG_SEARCHING: &str = "Searching locations...";

/// What the main panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading(String),
    Ready,
    Failed(DashboardError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    Hourly(Vec<HourlyEntry>),
    Forecast(ForecastBundle),
    Failed,
}

/// A lazily fetched sub-panel of the hourly or forecast tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub token: u64,
    pub content: PanelContent,
}

/// A sub-panel fetch requested by a transition. `token` ties the eventual
/// result to the state that asked for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LazyFetch {
    pub kind: PanelKind,
    pub token: u64,
    pub at: Coordinates,
}

#[derive(Debug)]
pub enum PanelOutcome {
    Hourly(Result<Vec<HourlyEntry>, BackendError>),
    Forecast(Result<ForecastBundle, BackendError>),
}

impl PanelOutcome {
    fn kind(&self) -> PanelKind {
        match self {
            PanelOutcome::Hourly(_) => PanelKind::Hourly,
            PanelOutcome::Forecast(_) => PanelKind::Forecast,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub snapshot: Option<Arc<WeatherSnapshot>>,
    pub tab: Tab,
    pub prefs: Preferences,
    pub view: View,
    pub panel: Option<Panel>,
    /// Inline, non-blocking message shown above the main panel.
    pub notice: Option<String>,
    /// Bumped on every tab switch and snapshot load.
    pub generation: u64,
    /// Coordinates of the most recent base fetch attempt.
    pub last_target: Option<Coordinates>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl AppState {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            snapshot: None,
            tab: Tab::default(),
            prefs,
            view: View::Loading("Loading...".into()),
            panel: None,
            notice: None,
            generation: 0,
            last_target: None,
        }
    }

    pub fn loading(self, message: impl Into<String>) -> Self {
        Self { view: View::Loading(message.into()), notice: None, ..self }
    }

    pub fn fetch_started(self, at: Coordinates) -> Self {
        Self { last_target: Some(at), ..self.loading(MSG_FETCHING) }
    }

    /// Installs a new snapshot wholesale. If the active tab has a lazy panel,
    /// its fetch is requested again for the new location.
    pub fn snapshot_loaded(self, snapshot: WeatherSnapshot) -> (Self, Option<LazyFetch>) {
        let next = Self {
            snapshot: Some(Arc::new(snapshot)),
            view: View::Ready,
            notice: None,
            generation: self.generation + 1,
            ..self
        };
        next.open_panel()
    }

    /// Blocking errors take over the main panel; the held snapshot is kept so a
    /// later tab switch or refresh can show it again. Non-blocking errors set
    /// the inline notice and end any loading state.
    pub fn failed(self, err: DashboardError) -> Self {
        if err.is_blocking() {
            Self { view: View::Failed(err), notice: None, ..self }
        } else {
            let view = match &self.view {
                View::Loading(_) => View::Ready,
                other => other.clone(),
            };
            Self { notice: Some(err.user_message().to_string()), view, ..self }
        }
    }

    /// Changes the active tab. Entering hourly or forecast always requests a
    /// fresh fetch; nothing is requested while no snapshot is held.
    pub fn switch_tab(self, tab: Tab) -> (Self, Option<LazyFetch>) {
        let view = if self.snapshot.is_some() { View::Ready } else { self.view.clone() };
        let next = Self { tab, view, generation: self.generation + 1, ..self };
        next.open_panel()
    }

    /// Applies a finished sub-panel fetch, discarding it when the state has
    /// moved on since it was requested.
    pub fn panel_resolved(self, fetch: LazyFetch, outcome: PanelOutcome) -> Self {
        let fresh = matches!(
            &self.panel,
            Some(p) if p.token == fetch.token && p.kind == fetch.kind && p.kind == outcome.kind()
        );
        if !fresh {
            tracing::debug!(
                token = fetch.token,
                generation = self.generation,
                "discarding stale {:?} panel result",
                fetch.kind
            );
            return self;
        }

        let content = match outcome {
            PanelOutcome::Hourly(Ok(hours)) => PanelContent::Hourly(hours),
            PanelOutcome::Forecast(Ok(bundle)) => PanelContent::Forecast(bundle),
            PanelOutcome::Hourly(Err(e)) | PanelOutcome::Forecast(Err(e)) => {
                tracing::warn!("{:?} panel failed: {e}", fetch.kind);
                PanelContent::Failed
            }
        };

        let panel = self.panel.map(|p| Panel { content, ..p });
        Self { panel, ..self }
    }

    pub fn with_unit(self, unit: TemperatureUnit) -> Self {
        Self { prefs: self.prefs.with_unit(unit), ..self }
    }

    pub fn with_theme_toggled(self) -> Self {
        Self { prefs: self.prefs.toggle_theme(), ..self }
    }

    pub fn with_notice(self, notice: impl Into<String>) -> Self {
        Self { notice: Some(notice.into()), ..self }
    }

    fn open_panel(self) -> (Self, Option<LazyFetch>) {
        let target = self.snapshot.as_ref().map(|s| s.coordinates());

        match (self.tab.lazy_panel(), target) {
            (Some(kind), Some(at)) => {
                let token = self.generation;
                let panel = Panel { kind, token, content: PanelContent::Loading };
                (Self { panel: Some(panel), ..self }, Some(LazyFetch { kind, token, at }))
            }
            _ => (Self { panel: None, ..self }, None),
        }
    }
}

/// Drives [`AppState`] from user actions, one action at a time.
#[derive(Debug)]
pub struct Dashboard<B: WeatherBackend> {
    backend: B,
    position: Box<dyn PositionSource>,
    store: Box<dyn PreferenceStore>,
    acquirer: LocationAcquirer,
    state: AppState,
    chat: ChatSession,
    /// Query of a search that failed outright; retry runs it again.
    failed_search: Option<String>,
}

impl<B: WeatherBackend> Dashboard<B> {
    /// Reads preferences once; an unreadable store falls back to defaults.
    pub fn new(
        backend: B,
        position: Box<dyn PositionSource>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let prefs = store.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load preferences, using defaults: {e:#}");
            Preferences::default()
        });

        Self {
            backend,
            position,
            store,
            acquirer: LocationAcquirer::new(),
            state: AppState::new(prefs),
            chat: ChatSession::new(),
            failed_search: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn acquirer(&self) -> &LocationAcquirer {
        &self.acquirer
    }

    /// Initial load from the device position.
    pub async fn start(&mut self) {
        self.load_from_position().await;
    }

    pub async fn load_from_position(&mut self) {
        self.failed_search = None;
        self.update(|s| s.loading(MSG_LOCATING));

        match self.acquirer.acquire(self.position.as_ref()).await {
            Ok(at) => self.fetch(at).await,
            Err(e) => self.update(|s| s.failed(e)),
        }
    }

    /// Fetches the base snapshot for `at`. On failure the attempt is dropped
    /// and whatever snapshot was held before stays in place.
    pub async fn fetch(&mut self, at: Coordinates) {
        self.failed_search = None;
        self.update(|s| s.fetch_started(at));

        match self.backend.fetch_current(at).await {
            Ok(snapshot) => {
                tracing::info!(
                    city = %snapshot.location.city,
                    temp_c = snapshot.current_weather.temperature_celsius,
                    "weather loaded"
                );
                let (next, lazy) = self.take_state().snapshot_loaded(snapshot);
                self.state = next;
                if let Some(fetch) = lazy {
                    self.run_lazy(fetch).await;
                }
            }
            Err(e) => {
                tracing::warn!(%at, "weather fetch failed: {e}");
                self.update(|s| s.failed(DashboardError::weather_fetch(&e)));
            }
        }
    }

    /// Resolves a place name and loads its weather. Blank queries are ignored.
    pub async fn search(&mut self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        self.update(|s| s.with_notice(MSG_SEARCHING));

        match resolve_search(&self.backend, query).await {
            Ok(Some(at)) => {
                self.acquirer.resolved_by_search(at);
                self.fetch(at).await;
            }
            Ok(None) => {}
            Err(e) => {
                self.failed_search = Some(query.to_string());
                self.update(|s| s.failed(e));
            }
        }
    }

    /// Re-fetches the held snapshot's location, or starts over from the device
    /// position when nothing is held.
    pub async fn refresh(&mut self) {
        match self.state.snapshot.as_ref().map(|s| s.coordinates()) {
            Some(at) => self.fetch(at).await,
            None => self.load_from_position().await,
        }
    }

    /// The error view's retry action. A search that failed is run again;
    /// otherwise the last attempted fetch is repeated.
    pub async fn retry(&mut self) {
        if let Some(query) = self.failed_search.take() {
            return self.search(&query).await;
        }
        match self.state.last_target {
            Some(at) => self.fetch(at).await,
            None => self.load_from_position().await,
        }
    }

    pub async fn switch_tab(&mut self, tab: Tab) {
        if let Some(fetch) = self.begin_switch_tab(tab) {
            self.run_lazy(fetch).await;
        }
    }

    /// The synchronous half of a tab switch. The returned fetch, if any, can be
    /// run with [`Dashboard::fetch_panel`] and applied with
    /// [`Dashboard::complete_panel`].
    pub fn begin_switch_tab(&mut self, tab: Tab) -> Option<LazyFetch> {
        tracing::debug!(%tab, "switching tab");
        let (next, fetch) = self.take_state().switch_tab(tab);
        self.state = next;
        fetch
    }

    pub async fn fetch_panel(&self, fetch: LazyFetch) -> PanelOutcome {
        match fetch.kind {
            PanelKind::Hourly => PanelOutcome::Hourly(self.backend.fetch_hourly(fetch.at).await),
            PanelKind::Forecast => {
                PanelOutcome::Forecast(self.backend.fetch_forecast(fetch.at).await)
            }
        }
    }

    pub fn complete_panel(&mut self, fetch: LazyFetch, outcome: PanelOutcome) {
        self.update(|s| s.panel_resolved(fetch, outcome));
    }

    async fn run_lazy(&mut self, fetch: LazyFetch) {
        let outcome = self.fetch_panel(fetch).await;
        self.complete_panel(fetch, outcome);
    }

    /// Changes the display unit. The state is updated even if persisting fails.
    pub fn set_unit(&mut self, unit: TemperatureUnit) -> anyhow::Result<()> {
        self.update(|s| s.with_unit(unit));
        self.store.save(&self.state.prefs)
    }

    pub fn toggle_theme(&mut self) -> anyhow::Result<()> {
        self.update(|s| s.with_theme_toggled());
        self.store.save(&self.state.prefs)
    }

    /// Sends a chat message with the current snapshot as context. Returns
    /// `false` without touching the transcript when there is no snapshot, the
    /// message is blank, or a previous reply is still outstanding.
    pub async fn send_chat(&mut self, message: &str) -> bool {
        let Some(snapshot) = self.state.snapshot.clone() else {
            tracing::debug!("chat ignored: no weather loaded");
            return false;
        };
        let Some(pending) = self.chat.begin(message) else {
            return false;
        };

        let reply = match self.backend.send_chat(message.trim(), &snapshot).await {
            Ok(reply) => reply.response,
            Err(e) => {
                tracing::warn!("chat request failed: {e}");
                APOLOGY.to_string()
            }
        };
        self.chat.resolve(pending, reply);
        true
    }

    pub async fn clear_cache(&self) -> bool {
        let ok = self.backend.clear_cache().await;
        tracing::info!(ok, "cache clear requested");
        ok
    }

    pub async fn health(&self) -> Result<String, BackendError> {
        self.backend.health().await
    }

    pub fn render(&self, generated_at: DateTime<Local>) -> String {
        render::render_page(&self.state, &self.chat, generated_at)
    }

    fn take_state(&mut self) -> AppState {
        std::mem::take(&mut self.state)
    }

    fn update(&mut self, f: impl FnOnce(AppState) -> AppState) {
        let next = f(self.take_state());
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::{Sender, THINKING},
        location::{FixedPosition, NoPositioning},
        model::fixtures,
        preferences::{MemoryPreferenceStore, Theme},
        testing::{MockBackend, hit},
    };

    const LONDON: Coordinates = Coordinates { latitude: 51.5, longitude: -0.12 };

    fn dashboard(backend: MockBackend) -> Dashboard<MockBackend> {
        Dashboard::new(
            backend,
            Box::new(FixedPosition(LONDON)),
            Box::new(MemoryPreferenceStore::default()),
        )
    }

    async fn loaded(backend: MockBackend) -> Dashboard<MockBackend> {
        let mut dash = dashboard(backend);
        dash.start().await;
        assert_eq!(dash.state().view, View::Ready);
        dash
    }

    #[test]
    fn switch_tab_without_snapshot_requests_nothing() {
        let state = AppState::default();

        let (state, fetch) = state.switch_tab(Tab::Hourly);

        assert!(fetch.is_none());
        assert!(state.panel.is_none());
        assert_eq!(state.tab, Tab::Hourly);
    }

    #[test]
    fn stale_panel_results_are_discarded() {
        let (state, _) = AppState::default().snapshot_loaded(fixtures::london());
        let (state, hourly) = state.switch_tab(Tab::Hourly);
        let hourly = hourly.expect("hourly fetch requested");
        let (state, forecast) = state.switch_tab(Tab::Forecast);
        let forecast = forecast.expect("forecast fetch requested");

        let state = state.panel_resolved(hourly, PanelOutcome::Hourly(Ok(vec![])));
        assert_eq!(
            state.panel,
            Some(Panel { kind: PanelKind::Forecast, token: forecast.token, content: PanelContent::Loading })
        );

        let state =
            state.panel_resolved(forecast, PanelOutcome::Forecast(Ok(ForecastBundle::default())));
        assert!(matches!(
            state.panel,
            Some(Panel { content: PanelContent::Forecast(_), .. })
        ));
    }

    #[test]
    fn re_entering_same_tab_invalidates_previous_fetch() {
        let (state, _) = AppState::default().snapshot_loaded(fixtures::london());
        let (state, first) = state.switch_tab(Tab::Hourly);
        let (state, second) = state.switch_tab(Tab::Hourly);
        let (first, second) = (first.expect("first"), second.expect("second"));
        assert_ne!(first.token, second.token);

        let state = state.panel_resolved(first, PanelOutcome::Hourly(Ok(vec![])));
        assert_eq!(state.panel.as_ref().map(|p| &p.content), Some(&PanelContent::Loading));
    }

    #[test]
    fn empty_search_notice_keeps_failed_view() {
        let state = AppState::default().failed(DashboardError::GeolocationDenied);
        let state = state.failed(DashboardError::EmptySearchResult { query: "x".into() });

        assert_eq!(state.view, View::Failed(DashboardError::GeolocationDenied));
        assert_eq!(state.notice.as_deref(), Some("No locations found. Try another search."));
    }

    #[tokio::test]
    async fn start_loads_snapshot_from_position() {
        let dash = loaded(MockBackend::new()).await;

        let snapshot = dash.state().snapshot.as_ref().expect("snapshot held");
        assert_eq!(snapshot.coordinates(), LONDON);
        assert_eq!(dash.state().last_target, Some(LONDON));
        assert_eq!(dash.backend().calls().current, 1);
    }

    #[tokio::test]
    async fn unit_toggle_rerenders_without_fetching() {
        let mut dash = loaded(MockBackend::new()).await;

        let html = render::render_main(dash.state());
        assert!(html.contains("18°C"));

        dash.set_unit(TemperatureUnit::F).expect("save prefs");
        let html = render::render_main(dash.state());
        assert!(html.contains("64°F"));
        assert!(!html.contains("18°C"));

        dash.set_unit(TemperatureUnit::C).expect("save prefs");
        let snapshot = dash.state().snapshot.as_ref().expect("snapshot held");
        assert_eq!(snapshot.current_weather.temperature_celsius, 18.0);
        assert!(render::render_main(dash.state()).contains("18°C"));

        assert_eq!(dash.backend().calls().current, 1);
    }

    #[tokio::test]
    async fn hourly_is_fetched_on_every_entry() {
        let mut dash = loaded(MockBackend::new()).await;

        dash.switch_tab(Tab::Hourly).await;
        dash.switch_tab(Tab::Overview).await;
        dash.switch_tab(Tab::Hourly).await;

        let calls = dash.backend().calls();
        assert_eq!(calls.hourly, 2);
        assert_eq!(calls.current, 1);
        assert!(matches!(
            dash.state().panel,
            Some(Panel { content: PanelContent::Hourly(ref h), .. }) if h.len() == 24
        ));
    }

    #[tokio::test]
    async fn forecast_tab_fetches_forecast() {
        let mut dash = loaded(MockBackend::new()).await;

        dash.switch_tab(Tab::Forecast).await;
        dash.switch_tab(Tab::Details).await;

        let calls = dash.backend().calls();
        assert_eq!(calls.forecast, 1);
        assert_eq!(calls.hourly, 0);
        assert!(dash.state().panel.is_none());
    }

    #[tokio::test]
    async fn tab_switch_with_no_snapshot_never_fetches() {
        let mut dash = Dashboard::new(
            MockBackend::new(),
            Box::new(NoPositioning),
            Box::new(MemoryPreferenceStore::default()),
        );
        dash.start().await;

        for tab in Tab::all() {
            dash.switch_tab(*tab).await;
        }

        let calls = dash.backend().calls();
        assert_eq!(calls.hourly + calls.forecast + calls.current, 0);
        assert_eq!(dash.state().view, View::Failed(DashboardError::GeolocationUnsupported));
    }

    #[tokio::test]
    async fn hourly_failure_keeps_base_snapshot() {
        let backend = MockBackend::new();
        backend.set_fail_hourly(true);
        let mut dash = loaded(backend).await;

        dash.switch_tab(Tab::Hourly).await;

        assert_eq!(dash.state().view, View::Ready);
        assert!(dash.state().snapshot.is_some());
        assert_eq!(dash.state().panel.as_ref().map(|p| &p.content), Some(&PanelContent::Failed));
        assert!(render::render_main(dash.state()).contains("Failed to load hourly forecast"));
    }

    #[tokio::test]
    async fn loading_while_on_hourly_tab_fetches_panel() {
        let mut dash = loaded(MockBackend::new()).await;
        dash.switch_tab(Tab::Hourly).await;

        dash.refresh().await;

        let calls = dash.backend().calls();
        assert_eq!(calls.current, 2);
        assert_eq!(calls.hourly, 2);
    }

    #[tokio::test]
    async fn empty_search_leaves_snapshot_untouched() {
        let mut dash = loaded(MockBackend::new()).await;
        let before = dash.state().snapshot.clone();

        dash.search("atlantis").await;

        assert_eq!(dash.state().snapshot, before);
        assert_eq!(dash.state().view, View::Ready);
        assert_eq!(dash.state().notice.as_deref(), Some("No locations found. Try another search."));
        assert_eq!(dash.backend().calls().current, 1);
    }

    #[tokio::test]
    async fn empty_search_without_snapshot_ends_loading() {
        let mut dash = Dashboard::new(
            MockBackend::new(),
            Box::new(NoPositioning),
            Box::new(MemoryPreferenceStore::default()),
        );

        dash.search("atlantis").await;

        assert_eq!(dash.state().view, View::Ready);
        assert!(dash.state().snapshot.is_none());
        let html = render::render_main(dash.state());
        assert!(html.contains("No locations found. Try another search."));
        assert!(!html.contains("spinner"));
    }

    #[tokio::test]
    async fn search_hit_replaces_snapshot() {
        let backend = MockBackend::new().with_search_hits(vec![hit(48.85, 2.35, "Paris")]);
        let mut dash = loaded(backend).await;

        dash.search("paris").await;

        let snapshot = dash.state().snapshot.as_ref().expect("snapshot");
        assert_eq!(snapshot.coordinates(), Coordinates::new(48.85, 2.35));
        assert_eq!(dash.backend().last_current(), Some(Coordinates::new(48.85, 2.35)));
        assert!(dash.state().notice.is_none());
    }

    #[tokio::test]
    async fn failed_search_is_blocking_transport_error() {
        let mut dash = loaded(MockBackend::new().failing_search()).await;

        dash.search("paris").await;

        match &dash.state().view {
            View::Failed(err) => assert_eq!(err.user_message(), "Search failed. Please try again."),
            other => panic!("unexpected view {other:?}"),
        }
        assert!(dash.state().snapshot.is_some());
    }

    #[tokio::test]
    async fn retry_after_failed_search_searches_again() {
        let backend = MockBackend::new().with_search_hits(vec![hit(48.85, 2.35, "Paris")]);
        let mut dash = loaded(backend).await;

        dash.backend().set_fail_search(true);
        dash.search("paris").await;
        assert!(matches!(dash.state().view, View::Failed(DashboardError::Transport { .. })));

        dash.backend().set_fail_search(false);
        dash.retry().await;

        assert_eq!(dash.state().view, View::Ready);
        assert_eq!(dash.backend().calls().search, 2);
        assert_eq!(dash.backend().last_current(), Some(Coordinates::new(48.85, 2.35)));

        dash.retry().await;
        assert_eq!(dash.backend().calls().search, 2);
        assert_eq!(dash.backend().last_current(), Some(Coordinates::new(48.85, 2.35)));
    }

    #[tokio::test]
    async fn refresh_failure_discards_attempt_and_retry_repeats_it() {
        let mut dash = loaded(MockBackend::new()).await;
        let before = dash.state().snapshot.clone();

        dash.backend().set_fail_current(true);
        dash.refresh().await;
        assert!(matches!(dash.state().view, View::Failed(DashboardError::Transport { .. })));
        assert_eq!(dash.state().snapshot, before);

        dash.backend().set_fail_current(false);
        dash.retry().await;
        assert_eq!(dash.state().view, View::Ready);
        assert_eq!(dash.backend().calls().current, 3);
    }

    #[tokio::test]
    async fn chat_without_snapshot_is_noop() {
        let mut dash = dashboard(MockBackend::new());

        assert!(!dash.send_chat("hello").await);

        assert!(dash.chat().turns().is_empty());
        assert_eq!(dash.backend().calls().chat, 0);
    }

    #[tokio::test]
    async fn chat_sends_snapshot_as_context() {
        let mut dash = loaded(MockBackend::new()).await;

        assert!(dash.send_chat("Should I bring an umbrella?").await);

        let (message, context) = dash.backend().last_chat().expect("chat sent");
        assert_eq!(message, "Should I bring an umbrella?");
        assert_eq!(context.location.city, "London");

        let turns = dash.chat().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].sender, Sender::Bot);
        assert_eq!(turns[1].text, "It is Partly cloudy in London");
        assert_ne!(turns[1].text, THINKING);
    }

    #[tokio::test]
    async fn chat_failure_appends_apology() {
        let mut dash = loaded(MockBackend::new().failing_chat()).await;

        assert!(dash.send_chat("hi").await);

        let turns = dash.chat().turns();
        assert_eq!(turns.last().map(|t| t.text.as_str()), Some(APOLOGY));
        assert_eq!(dash.state().view, View::Ready);
    }

    #[tokio::test]
    async fn preferences_are_persisted_on_change() {
        let mut dash = dashboard(MockBackend::new());

        dash.toggle_theme().expect("save");
        dash.set_unit(TemperatureUnit::F).expect("save");

        let stored = dash.store.load().expect("load");
        assert_eq!(stored, Preferences { theme: Theme::Dark, unit: TemperatureUnit::F });
        assert_eq!(dash.state().prefs, stored);
    }

    #[tokio::test]
    async fn clear_cache_does_not_touch_state() {
        let dash = loaded(MockBackend::new()).await;
        let before = dash.state().clone();

        assert!(dash.clear_cache().await);
        assert_eq!(dash.state(), &before);
    }
}
