use std::convert::TryFrom;

/// The dashboard's four views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Overview,
    Hourly,
    Forecast,
    Details,
}

/// Sub-panels that are fetched on tab entry rather than with the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Hourly,
    Forecast,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Hourly => "hourly",
            Tab::Forecast => "forecast",
            Tab::Details => "details",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Hourly => "Hourly",
            Tab::Forecast => "7-Day",
            Tab::Details => "Details",
        }
    }

    pub const fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Hourly, Tab::Forecast, Tab::Details]
    }

    pub fn lazy_panel(&self) -> Option<PanelKind> {
        match self {
            Tab::Hourly => Some(PanelKind::Hourly),
            Tab::Forecast => Some(PanelKind::Forecast),
            Tab::Overview | Tab::Details => None,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Tab {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "overview" => Ok(Tab::Overview),
            "hourly" => Ok(Tab::Hourly),
            "forecast" => Ok(Tab::Forecast),
            "details" => Ok(Tab::Details),
            _ => Err(anyhow::anyhow!(
                "Unknown tab '{value}'. Supported tabs: overview, hourly, forecast, details."
            )),
        }
    }
}

impl std::str::FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_as_str_roundtrip() {
        for tab in Tab::all() {
            let parsed = Tab::try_from(tab.as_str()).expect("roundtrip should succeed");
            assert_eq!(*tab, parsed);
        }
    }

    #[test]
    fn unknown_tab_error() {
        let err = Tab::try_from("radar").unwrap_err();
        assert!(err.to_string().contains("Unknown tab"));
    }

    #[test]
    fn only_hourly_and_forecast_are_lazy() {
        assert_eq!(Tab::Hourly.lazy_panel(), Some(PanelKind::Hourly));
        assert_eq!(Tab::Forecast.lazy_panel(), Some(PanelKind::Forecast));
        assert_eq!(Tab::Overview.lazy_panel(), None);
        assert_eq!(Tab::Details.lazy_panel(), None);
    }
}
