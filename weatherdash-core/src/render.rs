//! Markup for the dashboard.
//!
//! Everything here is a pure function of its arguments. Temperatures are
//! stored in Celsius and converted only while formatting.

use chrono::{DateTime, Local};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::{
    app::{AppState, Panel, PanelContent, View},
    chat::ChatSession,
    model::{ForecastBundle, HourlyEntry, WeatherSnapshot},
    preferences::TemperatureUnit,
    tab::{PanelKind, Tab},
};

/// Hourly entries shown on the hourly tab.
pub const HOURLY_LIMIT: usize = 12;

const STYLE: &str = r#"
:root { --primary: #2563eb; --danger: #dc2626; --bg-1: #f8fafc; --bg-2: #eef2f7; --text-1: #0f172a; --text-2: #334155; --text-3: #64748b; --radius: 12px; }
[data-theme="dark"] { --primary: #60a5fa; --bg-1: #0f172a; --bg-2: #1e293b; --text-1: #f1f5f9; --text-2: #cbd5e1; --text-3: #94a3b8; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg-1); color: var(--text-1); }
.nav-tab { padding: 8px 16px; border-radius: var(--radius); color: var(--text-2); text-decoration: none; }
.nav-tab.active { background: var(--primary); color: #fff; }
.weather-card { background: var(--bg-1); border: 1px solid var(--bg-2); border-radius: var(--radius); padding: 24px; margin: 16px 0; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 16px; }
.tile { padding: 16px; background: var(--bg-2); border-radius: var(--radius); text-align: center; }
.row { display: flex; align-items: center; justify-content: space-between; padding: 16px; background: var(--bg-2); border-radius: var(--radius); margin-bottom: 12px; }
.muted { color: var(--text-3); }
.notice { padding: 12px 16px; border-left: 4px solid var(--primary); background: var(--bg-2); border-radius: var(--radius); }
.chat-msg.user { text-align: right; }
.chat-bubble { display: inline-block; padding: 8px 12px; border-radius: var(--radius); background: var(--bg-2); }
"#;

/// Font-awesome icon chosen for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Sun,
    CloudSun,
    Cloud,
    Rain,
    Snow,
    Bolt,
    Fog,
    Wind,
}

impl Icon {
    pub fn css_class(&self) -> &'static str {
        match self {
            Icon::Sun => "fa-sun",
            Icon::CloudSun => "fa-cloud-sun",
            Icon::Cloud => "fa-cloud",
            Icon::Rain => "fa-cloud-rain",
            Icon::Snow => "fa-snowflake",
            Icon::Bolt => "fa-bolt",
            Icon::Fog => "fa-smog",
            Icon::Wind => "fa-wind",
        }
    }
}

/// Ordered substring rules over the lowercased condition; first match wins.
const ICON_RULES: &[(&[&str], Icon)] = &[
    (&["clear", "sunny"], Icon::Sun),
    (&["rain"], Icon::Rain),
    (&["snow"], Icon::Snow),
    (&["cloud"], Icon::Cloud),
    (&["storm", "thunder"], Icon::Bolt),
    (&["fog", "mist"], Icon::Fog),
    (&["wind"], Icon::Wind),
];

pub fn weather_icon(condition: &str) -> Icon {
    let c = condition.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| c.contains(n)))
        .map(|(_, icon)| *icon)
        .unwrap_or(Icon::Cloud)
}

/// Rounds half-way cases toward positive infinity.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    let value = match unit {
        TemperatureUnit::C => celsius,
        TemperatureUnit::F => celsius_to_fahrenheit(celsius),
    };
    format!("{}{}", round_half_up(value), unit.symbol())
}

/// Integral values print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

pub fn metric_card(icon: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div class="tile"><div style="font-size: 2rem">{}</div><div class="muted">{}</div><div style="font-weight: 700">{}</div></div>"#,
        text(icon),
        text(label),
        text(value)
    )
}

pub fn forecast_card(day: &str, description: &str, icon: Icon) -> String {
    format!(
        r#"<div class="tile"><i class="fas {} fa-3x"></i><div style="font-weight: 600">{}</div><div class="muted">{}</div></div>"#,
        icon.css_class(),
        text(day),
        text(description)
    )
}

pub fn detail_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="tile" style="text-align: left"><div class="muted">{}</div><div style="font-weight: 600">{}</div></div>"#,
        text(label),
        text(value)
    )
}

fn card(icon: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div class="weather-card"><h3><i class="fas {icon}"></i> {}</h3>{body}</div>"#,
        text(title)
    )
}

fn section(title: &str, items: &[String]) -> String {
    format!(r#"<div><h4>{}</h4><div class="grid">{}</div></div>"#, text(title), items.concat())
}

pub fn render_overview(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let loc = &snapshot.location;
    let cw = &snapshot.current_weather;

    let metrics = [
        metric_card("💧", "Humidity", &format!("{}%", format_number(cw.humidity_percent))),
        metric_card("💨", "Wind", &format!("{} km/h", format_number(cw.wind_speed_kmh))),
        metric_card("🌡️", "Pressure", &format!("{} mb", format_number(cw.pressure_mb))),
        metric_card("👁️", "Visibility", &format!("{} km", format_number(cw.visibility_km))),
        metric_card("☀️", "UV Index", &format_number(cw.uv_index)),
        metric_card("☁️", "Cloud Cover", &format!("{}%", format_number(cw.cloud_cover_percent))),
    ]
    .concat();

    let location_card = format!(
        r#"<div class="weather-card"><div class="row" style="background: none"><div><h2>{city}</h2><p class="muted">{locality} • {country}</p></div><div style="text-align: right"><div class="temp-now" style="font-size: 3.5rem; font-weight: 900; color: var(--primary)">{temp}</div><p class="muted">Feels like {feels}</p></div></div><div class="row"><i class="fas {icon} fa-3x"></i><div><h3>{condition}</h3><p>{description}</p></div></div><div class="grid">{metrics}</div></div>"#,
        city = text(&loc.city),
        locality = text(&loc.locality),
        country = text(&loc.country),
        temp = format_temperature(cw.temperature_celsius, unit),
        feels = format_temperature(cw.feels_like_celsius, unit),
        icon = weather_icon(&cw.condition).css_class(),
        condition = text(&cw.condition),
        description = text(&cw.description),
    );

    let tips: String = snapshot
        .weather_tips
        .iter()
        .map(|tip| format!(r#"<div class="notice">{}</div>"#, text(tip)))
        .collect();

    let outlook = [
        forecast_card("Today", &snapshot.forecast.today, Icon::Sun),
        forecast_card("Tomorrow", &snapshot.forecast.tomorrow, Icon::CloudSun),
        forecast_card("Day After", &snapshot.forecast.day_after, Icon::Cloud),
    ]
    .concat();

    [
        location_card,
        card("fa-lightbulb", "Weather Tips", &tips),
        card("fa-calendar-days", "3-Day Outlook", &format!(r#"<div class="grid">{outlook}</div>"#)),
    ]
    .concat()
}

fn panel_loader(message: &str) -> String {
    format!(r#"<div class="loader-container"><div class="spinner"></div><p class="loader-text">{}</p></div>"#, text(message))
}

fn panel_message(message: &str) -> String {
    format!(r#"<p class="muted" style="text-align: center">{}</p>"#, text(message))
}

fn hourly_grid(hours: &[HourlyEntry], unit: TemperatureUnit) -> String {
    let tiles: String = hours
        .iter()
        .take(HOURLY_LIMIT)
        .map(|h| {
            format!(
                r#"<div class="tile"><div style="font-weight: 600">{}</div><i class="fas {} fa-2x"></i><div style="font-size: 1.5rem; font-weight: 700">{}</div><div class="muted">💧 {}%</div></div>"#,
                text(&h.hour),
                weather_icon(&h.condition).css_class(),
                format_temperature(h.temperature_celsius, unit),
                h.precipitation_chance
            )
        })
        .collect();
    format!(r#"<div class="grid">{tiles}</div>"#)
}

fn forecast_list(bundle: &ForecastBundle, unit: TemperatureUnit) -> String {
    if bundle.forecast.is_empty() {
        return panel_message("No forecast data available");
    }

    let days: String = bundle
        .forecast
        .iter()
        .map(|d| {
            format!(
                r#"<div class="row"><div><i class="fas {} fa-2x"></i> <strong>{}</strong> <span class="muted">{}</span></div><div><span class="muted">💧 {}%</span> <span>{}</span> <strong>{}</strong></div></div>"#,
                weather_icon(&d.condition).css_class(),
                text(&d.day),
                text(&d.condition),
                format_number(d.rain_chance),
                format_temperature(d.min_temp_c, unit),
                format_temperature(d.max_temp_c, unit)
            )
        })
        .collect();

    let aq = &bundle.air_quality;
    let air = [
        metric_card("🌍", "US EPA Index", &format_number(aq.epa_index_or_default())),
        metric_card("🌫️", "PM2.5", &format_number(aq.pm2_5_or_default())),
        metric_card("🌫️", "PM10", &format_number(aq.pm10_or_default())),
    ]
    .concat();

    format!(
        r#"<div>{days}</div><div class="air-quality"><h4><i class="fas fa-wind"></i> Air Quality Index</h4><div class="grid">{air}</div></div>"#
    )
}

/// Hourly tab: a shell plus whatever the lazy panel currently holds.
pub fn render_hourly(panel: Option<&Panel>, unit: TemperatureUnit) -> String {
    let body = match panel.map(|p| (p.kind, &p.content)) {
        Some((PanelKind::Hourly, PanelContent::Hourly(hours))) => hourly_grid(hours, unit),
        Some((PanelKind::Hourly, PanelContent::Failed)) => {
            panel_message("Failed to load hourly forecast")
        }
        _ => panel_loader("Loading hourly forecast..."),
    };
    card("fa-clock", "24-Hour Forecast", &format!(r#"<div id="hourlyContent">{body}</div>"#))
}

pub fn render_forecast(panel: Option<&Panel>, unit: TemperatureUnit) -> String {
    let body = match panel.map(|p| (p.kind, &p.content)) {
        Some((PanelKind::Forecast, PanelContent::Forecast(bundle))) => forecast_list(bundle, unit),
        Some((PanelKind::Forecast, PanelContent::Failed)) => panel_message("Failed to load forecast"),
        _ => panel_loader("Loading 7-day forecast..."),
    };
    card("fa-calendar-week", "7-Day Forecast", &format!(r#"<div id="forecastContent">{body}</div>"#))
}

pub fn render_details(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let cw = &snapshot.current_weather;
    let sun = &snapshot.sun_times;

    let temperature = section(
        "🌡️ Temperature",
        &[
            detail_item("Current", &format_temperature(cw.temperature_celsius, unit)),
            detail_item("Feels Like", &format_temperature(cw.feels_like_celsius, unit)),
            detail_item(
                "Fahrenheit",
                &format_temperature(cw.temperature_celsius, TemperatureUnit::F),
            ),
        ],
    );
    let wind = section(
        "💨 Wind",
        &[
            detail_item("Speed", &format!("{} km/h", format_number(cw.wind_speed_kmh))),
            detail_item("Direction", &cw.wind_direction),
        ],
    );
    let atmospheric = section(
        "🌍 Atmospheric",
        &[
            detail_item("Pressure", &format!("{} mb", format_number(cw.pressure_mb))),
            detail_item("Humidity", &format!("{}%", format_number(cw.humidity_percent))),
            detail_item("Visibility", &format!("{} km", format_number(cw.visibility_km))),
            detail_item("Cloud Cover", &format!("{}%", format_number(cw.cloud_cover_percent))),
        ],
    );
    let sun_moon = section(
        "☀️ Sun & Moon",
        &[
            detail_item("Sunrise", &sun.sunrise),
            detail_item("Sunset", &sun.sunset),
            detail_item("Moon Phase", snapshot.moon_phase().unwrap_or("Unknown")),
            detail_item("UV Index", &format_number(cw.uv_index)),
        ],
    );

    card(
        "fa-chart-line",
        "Detailed Metrics",
        &format!(r#"<div style="display: grid; gap: 24px">{temperature}{wind}{atmospheric}{sun_moon}</div>"#),
    )
}

/// Markup for the active tab. The panel is ignored by tabs that have none.
pub fn render_tab(
    snapshot: &WeatherSnapshot,
    tab: Tab,
    unit: TemperatureUnit,
    panel: Option<&Panel>,
) -> String {
    match tab {
        Tab::Overview => render_overview(snapshot, unit),
        Tab::Hourly => render_hourly(panel, unit),
        Tab::Forecast => render_forecast(panel, unit),
        Tab::Details => render_details(snapshot, unit),
    }
}

pub fn loader(message: &str) -> String {
    panel_loader(message)
}

/// Full-panel error with a manual retry action.
pub fn error_view(message: &str) -> String {
    format!(
        r#"<div class="weather-card error-view" style="text-align: center; padding: 60px 20px"><i class="fas fa-exclamation-triangle fa-4x" style="color: var(--danger)"></i><h3>Oops!</h3><p>{}</p><a class="retry" href="?action=retry">Try Again</a></div>"#,
        text(message)
    )
}

pub fn notice(message: &str) -> String {
    format!(r#"<div class="notice" role="status">{}</div>"#, text(message))
}

/// The `mainContent` region.
pub fn render_main(state: &AppState) -> String {
    let banner = state.notice.as_deref().map(notice).unwrap_or_default();

    let body = match (&state.view, &state.snapshot) {
        (View::Loading(message), _) => loader(message),
        (View::Failed(err), _) => error_view(err.user_message()),
        (View::Ready, Some(snapshot)) => {
            render_tab(snapshot, state.tab, state.prefs.unit, state.panel.as_ref())
        }
        (View::Ready, None) => String::new(),
    };

    format!("{banner}{body}")
}

pub fn chat_transcript(chat: &ChatSession) -> String {
    chat.turns()
        .iter()
        .map(|turn| {
            let icon = match turn.sender {
                crate::chat::Sender::Bot => "fa-robot",
                crate::chat::Sender::User => "fa-user",
            };
            format!(
                r#"<div class="chat-msg {sender}{typing}" id="{id}"><div class="chat-avatar {sender}-avatar"><i class="fas {icon}"></i></div><div class="chat-bubble">{text}</div></div>"#,
                sender = turn.sender.as_str(),
                typing = if turn.provisional { " typing" } else { "" },
                id = attr(&turn.id),
                text = text(&turn.text),
            )
        })
        .collect()
}

fn nav(active: Tab) -> String {
    Tab::all()
        .iter()
        .map(|tab| {
            format!(
                r#"<a class="nav-tab{}" data-tab="{}" href="?tab={}">{}</a>"#,
                if *tab == active { " active" } else { "" },
                tab.as_str(),
                tab.as_str(),
                tab.label()
            )
        })
        .collect()
}

/// The whole document. Theme is applied on the root element.
pub fn render_page(state: &AppState, chat: &ChatSession, generated_at: DateTime<Local>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Weather Dashboard</title>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
<style>{STYLE}</style>
</head>
<body>
<header><nav class="nav-tabs">{nav}</nav><span class="unit muted">Unit: °{unit}</span></header>
<main id="mainContent">{main}</main>
<aside id="chatPanel"><div id="chatMessages">{chat}</div></aside>
<footer class="muted">Updated {stamp}</footer>
</body>
</html>
"#,
        theme = state.prefs.theme.as_str(),
        nav = nav(state.tab),
        unit = state.prefs.unit.as_str(),
        main = render_main(state),
        chat = chat_transcript(chat),
        stamp = generated_at.format("%Y-%m-%d %H:%M"),
    )
}
