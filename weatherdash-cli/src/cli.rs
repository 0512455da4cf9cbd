use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use weatherdash_core::{
    Config, Coordinates, Dashboard, FilePreferenceStore, FixedPosition, HttpBackend,
    MemoryPreferenceStore, NoPositioning, PositionSource, PreferenceStore, Tab, TemperatureUnit,
    Theme, View, chat::Sender, config::BASE_URL_ENV,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard")]
pub struct Cli {
    /// Backend origin, e.g. "https://weather.example.com". Overrides
    /// WEATHERDASH_BASE_URL and the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Keep preference changes for this run only.
    #[arg(long, global = true)]
    pub no_save: bool,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to load weather for.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Place name to search for instead of using the device position.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub search: Option<String>,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the weather and render the dashboard page.
    Show {
        #[command(flatten)]
        target: Target,

        /// Tab to render: overview, hourly, forecast or details.
        #[arg(long, default_value = "overview")]
        tab: Tab,

        /// Temperature unit for this run (C or F); does not change the saved preference.
        #[arg(long)]
        unit: Option<String>,

        /// Write the page here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the weather chatbot a question about the loaded location.
    Chat {
        message: String,

        #[command(flatten)]
        target: Target,
    },

    /// Show or change the saved theme and unit.
    Prefs {
        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        unit: Option<String>,
    },

    /// Set the backend origin or home position in the config file.
    Configure {
        #[arg(long)]
        base_url: Option<String>,

        /// Home position as LAT,LON; used as the device position.
        #[arg(long, allow_hyphen_values = true)]
        home: Option<Coordinates>,
    },

    /// Ask the backend to drop its cached weather.
    ClearCache,

    /// Check that the backend is reachable.
    Status,

    /// Interactive session; the page is re-written after every action.
    Interactive {
        #[arg(long, default_value = "weatherdash.html")]
        out: PathBuf,
    },
}

/// Settings resolved once at startup.
pub struct Session {
    pub config: Config,
    pub base_url: String,
    pub no_save: bool,
}

impl Session {
    pub fn load(flag: Option<&str>, no_save: bool) -> Result<Self> {
        let config = Config::load()?;
        let env = std::env::var(BASE_URL_ENV).ok();
        let base_url = config.resolve_base_url(flag, env.as_deref());
        tracing::info!(%base_url, "backend resolved");

        Ok(Self { config, base_url, no_save })
    }

    pub fn preference_store(&self) -> Result<Box<dyn PreferenceStore>> {
        let file = FilePreferenceStore::in_config_dir()?;
        if self.no_save {
            return Ok(Box::new(MemoryPreferenceStore::new(file.load()?)));
        }
        Ok(Box::new(file))
    }

    pub fn dashboard(
        &self,
        position: Box<dyn PositionSource>,
        store: Box<dyn PreferenceStore>,
    ) -> Result<Dashboard<HttpBackend>> {
        let backend = HttpBackend::new(&self.base_url)?;
        Ok(Dashboard::new(backend, position, store))
    }

    /// Explicit coordinates win over the configured home position.
    fn position_for(&self, target: &Target) -> Box<dyn PositionSource> {
        match (target.lat, target.lon, self.config.home) {
            (Some(lat), Some(lon), _) => Box::new(FixedPosition(Coordinates::new(lat, lon))),
            (_, _, Some(home)) => Box::new(FixedPosition(home)),
            _ => Box::new(NoPositioning),
        }
    }
}

/// Loads the base snapshot for `target`.
async fn load(dash: &mut Dashboard<HttpBackend>, target: &Target) {
    match target.search.as_deref() {
        Some(query) => dash.search(query).await,
        None => dash.start().await,
    }
}

fn blocking_error(dash: &Dashboard<HttpBackend>) -> Option<String> {
    match &dash.state().view {
        View::Failed(err) => Some(err.user_message().to_string()),
        _ if dash.state().snapshot.is_none() => {
            Some(dash.state().notice.clone().unwrap_or_else(|| "No weather loaded".into()))
        }
        _ => None,
    }
}

fn write_page(out: Option<&Path>, html: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("Failed to write page: {}", path.display())),
        None => {
            print!("{html}");
            Ok(())
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { target, tab, unit, out } => {
                let session = Session::load(self.base_url.as_deref(), self.no_save)?;
                let mut store = session.preference_store()?;
                if let Some(unit) = unit {
                    let unit = TemperatureUnit::try_from(unit.as_str())?;
                    store = Box::new(MemoryPreferenceStore::new(store.load()?.with_unit(unit)));
                }

                let mut dash = session.dashboard(session.position_for(&target), store)?;
                load(&mut dash, &target).await;
                if tab != Tab::Overview {
                    dash.switch_tab(tab).await;
                }

                write_page(out.as_deref(), &dash.render(chrono::Local::now()))?;
                if let Some(path) = &out {
                    eprintln!("Wrote {}", path.display());
                }

                if let Some(message) = blocking_error(&dash) {
                    bail!(message);
                }
            }

            Command::Chat { message, target } => {
                let session = Session::load(self.base_url.as_deref(), self.no_save)?;
                let store = session.preference_store()?;
                let mut dash = session.dashboard(session.position_for(&target), store)?;

                load(&mut dash, &target).await;
                if let Some(err) = blocking_error(&dash) {
                    bail!("Please load weather data first: {err}");
                }

                if !dash.send_chat(&message).await {
                    bail!("Message is empty");
                }

                let reply = dash
                    .chat()
                    .turns()
                    .iter()
                    .rev()
                    .find(|t| t.sender == Sender::Bot)
                    .ok_or_else(|| anyhow!("No reply received"))?;
                println!("{}", reply.text);
            }

            Command::Prefs { theme, unit } => {
                let store = FilePreferenceStore::in_config_dir()?;
                let mut prefs = store.load()?;

                if let Some(theme) = theme {
                    prefs.theme = Theme::try_from(theme.as_str())?;
                }
                if let Some(unit) = unit {
                    prefs.unit = TemperatureUnit::try_from(unit.as_str())?;
                }
                if !self.no_save {
                    store.save(&prefs)?;
                }

                println!("theme = {}", prefs.theme);
                println!("unit  = {}", prefs.unit);
            }

            Command::Configure { base_url, home } => {
                let mut config = Config::load()?;
                if let Some(url) = base_url {
                    // Validate before persisting.
                    weatherdash_core::backend::http::parse_base_url(&url)?;
                    config.set_base_url(url);
                }
                if let Some(home) = home {
                    config.set_home(home);
                }
                config.save()?;

                println!("Saved {}", Config::config_file_path()?.display());
                println!(
                    "base_url = {}",
                    config.base_url.as_deref().unwrap_or(weatherdash_core::config::DEFAULT_BASE_URL)
                );
                match config.home {
                    Some(home) => println!("home     = {home}"),
                    None => println!("home     = (not set)"),
                }
            }

            Command::ClearCache => {
                let session = Session::load(self.base_url.as_deref(), self.no_save)?;
                let dash = session.dashboard(
                    Box::new(NoPositioning),
                    Box::new(MemoryPreferenceStore::default()),
                )?;

                if dash.clear_cache().await {
                    println!("Cache cleared successfully!");
                } else {
                    bail!("Failed to clear cache");
                }
            }

            Command::Status => {
                let session = Session::load(self.base_url.as_deref(), self.no_save)?;
                let dash = session.dashboard(
                    Box::new(NoPositioning),
                    Box::new(MemoryPreferenceStore::default()),
                )?;

                let status = dash
                    .health()
                    .await
                    .with_context(|| format!("Backend at {} is unreachable", session.base_url))?;
                println!("{}: {status}", session.base_url);
            }

            Command::Interactive { out } => {
                let session = Session::load(self.base_url.as_deref(), self.no_save)?;
                crate::interactive::run(&session, &out).await?;
            }
        }

        Ok(())
    }
}
