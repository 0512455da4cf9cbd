use anyhow::{Context, Result};
use async_trait::async_trait;
use inquire::{Confirm, InquireError, Select, Text};
use std::{fmt, path::Path};

use weatherdash_core::{
    Coordinates, Dashboard, HttpBackend, NoPositioning, PositionError, PositionSource, Tab,
    TemperatureUnit, View, chat::Sender, render::format_temperature,
};

use crate::cli::Session;

#[derive(Debug, Clone, Copy)]
enum Action {
    SwitchTab,
    Search,
    Refresh,
    Retry,
    Unit,
    Theme,
    Chat,
    ClearCache,
    Quit,
}

impl Action {
    fn all() -> Vec<Action> {
        vec![
            Action::SwitchTab,
            Action::Search,
            Action::Refresh,
            Action::Retry,
            Action::Unit,
            Action::Theme,
            Action::Chat,
            Action::ClearCache,
            Action::Quit,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::SwitchTab => "Switch tab",
            Action::Search => "Search for a place",
            Action::Refresh => "Refresh",
            Action::Retry => "Try again",
            Action::Unit => "Change unit",
            Action::Theme => "Toggle theme",
            Action::Chat => "Ask the chatbot",
            Action::ClearCache => "Clear backend cache",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// `None` when the user backed out of a prompt.
fn answered<T>(res: Result<T, InquireError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Prompt failed"),
    }
}

/// Runs a blocking inquire prompt off the async runtime.
async fn ask<T, F>(prompt: F) -> Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
{
    let res = tokio::task::spawn_blocking(prompt).await.context("Prompt task panicked")?;
    answered(res)
}

pub async fn run(session: &Session, out: &Path) -> Result<()> {
    let position: Box<dyn PositionSource> = match session.config.home {
        Some(home) => Box::new(PromptedPosition::new(home)),
        None => Box::new(NoPositioning),
    };
    let mut dash = session.dashboard(position, session.preference_store()?)?;

    dash.start().await;
    publish(&dash, out)?;

    loop {
        let Some(action) = ask(|| Select::new("What next?", Action::all()).prompt()).await? else {
            break;
        };

        match action {
            Action::SwitchTab => {
                if let Some(tab) = ask(|| Select::new("Tab", Tab::all().to_vec()).prompt()).await? {
                    dash.switch_tab(tab).await;
                }
            }
            Action::Search => {
                if let Some(query) = ask(|| Text::new("Place:").prompt()).await? {
                    dash.search(&query).await;
                }
            }
            Action::Refresh => dash.refresh().await,
            Action::Retry => dash.retry().await,
            Action::Unit => {
                let units = vec![TemperatureUnit::C, TemperatureUnit::F];
                if let Some(unit) = ask(move || Select::new("Unit", units).prompt()).await? {
                    if let Err(e) = dash.set_unit(unit) {
                        tracing::warn!("Failed to save unit preference: {e:#}");
                    }
                }
            }
            Action::Theme => {
                if let Err(e) = dash.toggle_theme() {
                    tracing::warn!("Failed to save theme preference: {e:#}");
                }
            }
            Action::Chat => chat(&mut dash).await?,
            Action::ClearCache => {
                if dash.clear_cache().await {
                    println!("Cache cleared successfully!");
                } else {
                    println!("Failed to clear cache");
                }
                continue;
            }
            Action::Quit => break,
        }

        publish(&dash, out)?;
    }

    Ok(())
}

async fn chat(dash: &mut Dashboard<HttpBackend>) -> Result<()> {
    if dash.state().snapshot.is_none() {
        println!("Load the weather first.");
        return Ok(());
    }
    let Some(message) = ask(|| Text::new("You:").prompt()).await? else {
        return Ok(());
    };

    if dash.send_chat(&message).await {
        if let Some(turn) = dash.chat().turns().iter().rev().find(|t| t.sender == Sender::Bot) {
            println!("Bot: {}", turn.text);
        }
    }
    Ok(())
}

/// Re-writes the page and prints a one-line summary of the state.
fn publish(dash: &Dashboard<HttpBackend>, out: &Path) -> Result<()> {
    let html = dash.render(chrono::Local::now());
    std::fs::write(out, html)
        .with_context(|| format!("Failed to write page: {}", out.display()))?;

    let state = dash.state();
    if let Some(notice) = &state.notice {
        println!("{notice}");
    }
    match (&state.view, &state.snapshot) {
        (View::Failed(err), _) => println!("Oops! {}", err.user_message()),
        (View::Loading(message), _) => println!("{message}"),
        (View::Ready, Some(s)) => println!(
            "[{}] {}: {}, {} ({} theme) -> {}",
            state.tab,
            s.location.city,
            format_temperature(s.current_weather.temperature_celsius, state.prefs.unit),
            s.current_weather.condition,
            state.prefs.theme,
            out.display()
        ),
        (View::Ready, None) => {}
    }
    Ok(())
}

/// The saved home position, shared only after the user agrees.
#[derive(Debug)]
struct PromptedPosition {
    home: Coordinates,
}

impl PromptedPosition {
    fn new(home: Coordinates) -> Self {
        Self { home }
    }
}

#[async_trait]
impl PositionSource for PromptedPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        let answer =
            ask(|| Confirm::new("Use your saved home location?").with_default(true).prompt()).await;

        if matches!(answer, Ok(Some(true))) { Ok(self.home) } else { Err(PositionError::Denied) }
    }
}
