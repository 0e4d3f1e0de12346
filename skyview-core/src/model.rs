use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display mode for temperatures and wind speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// °C, m/s
    #[default]
    Metric,
    /// °F, mph
    Imperial,
}

impl UnitSystem {
    /// Value used both for the API `units` parameter and for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitSystem::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(&self) -> Self {
        Theme::from_dark(!self.is_dark())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_dark() { "dark" } else { "light" })
    }
}

/// Snapshot of the weather at a place, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity, 0..=100.
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// Primary condition category, e.g. "Clear" or "Rain".
    pub category: String,
    pub description: String,
    pub wind_speed: f64,
    /// Meters.
    pub visibility: f64,
}

/// One sub-daily point of a forecast timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Epoch seconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub category: String,
}

impl ForecastSample {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Output of a single fetch: conditions are always present, the forecast only
/// when its request succeeded and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Option<Vec<ForecastSample>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserPreferences {
    pub unit_system: UnitSystem,
    pub theme: Theme,
}

impl UserPreferences {
    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }
}
