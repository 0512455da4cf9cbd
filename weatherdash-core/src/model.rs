use serde::{Deserialize, Serialize};

/// A latitude/longitude pair, the only input every weather endpoint needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = anyhow::Error;

    /// Parses `"LAT,LON"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Expected coordinates as LAT,LON, got '{s}'"))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid latitude '{}'", lat.trim()))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid longitude '{}'", lon.trim()))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow::anyhow!("Coordinates out of range: {latitude},{longitude}"));
        }

        Ok(Self { latitude, longitude })
    }
}

/// Resolved place the snapshot belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub country: String,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Current conditions. Celsius is canonical; `temperature_fahrenheit` is
/// carried through for the chatbot context but never displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_fahrenheit: Option<f64>,
    #[serde(default)]
    pub humidity_percent: f64,
    #[serde(default)]
    pub wind_speed_kmh: f64,
    #[serde(default)]
    pub pressure_mb: f64,
    #[serde(default)]
    pub visibility_km: f64,
    #[serde(default)]
    pub uv_index: f64,
    #[serde(default)]
    pub cloud_cover_percent: f64,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub wind_direction: String,
}

/// Three free-text outlook lines shown on the overview tab.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastOutlook {
    #[serde(default)]
    pub today: String,
    #[serde(default)]
    pub tomorrow: String,
    #[serde(default)]
    pub day_after: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SunTimes {
    #[serde(default)]
    pub sunrise: String,
    #[serde(default)]
    pub sunset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moon_phase: Option<String>,
}

/// Response of `/api/weather`. Immutable once fetched; a refresh replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current_weather: CurrentWeather,
    #[serde(default)]
    pub weather_tips: Vec<String>,
    #[serde(default)]
    pub forecast: ForecastOutlook,
    #[serde(default)]
    pub sun_times: SunTimes,
    /// The backend reports the moon phase next to `sun_times` rather than in it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moon_phase: Option<String>,
}

impl WeatherSnapshot {
    pub fn coordinates(&self) -> Coordinates {
        self.location.coordinates()
    }

    pub fn moon_phase(&self) -> Option<&str> {
        self.sun_times.moon_phase.as_deref().or(self.moon_phase.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub hour: String,
    #[serde(default)]
    pub condition: String,
    pub temperature_celsius: f64,
    #[serde(default)]
    pub precipitation_chance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub day: String,
    #[serde(default)]
    pub condition: String,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    #[serde(default)]
    pub rain_chance: f64,
}

/// Air quality block; every field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AirQuality {
    #[serde(default)]
    pub us_epa_index: Option<f64>,
    #[serde(default)]
    pub pm2_5: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
}

impl AirQuality {
    pub fn epa_index_or_default(&self) -> f64 {
        non_zero_or(self.us_epa_index, 1.0)
    }

    pub fn pm2_5_or_default(&self) -> f64 {
        non_zero_or(self.pm2_5, 0.0)
    }

    pub fn pm10_or_default(&self) -> f64 {
        non_zero_or(self.pm10, 0.0)
    }
}

fn non_zero_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => default,
    }
}

/// Response of `/api/forecast`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastBundle {
    #[serde(default)]
    pub forecast: Vec<DailyForecastEntry>,
    #[serde(default)]
    pub air_quality: AirQuality,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyResponse {
    #[serde(default)]
    pub hourly_forecast: Vec<HourlyEntry>,
}

/// One place returned by `/api/search-location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl SearchHit {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub weather_data: &'a WeatherSnapshot,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
}
