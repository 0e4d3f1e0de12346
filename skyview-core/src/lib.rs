//! Core library for the `skyview` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeatherMap fetcher behind a provider trait
//! - Pure derivations: qualitative labels, daily forecast digest, icons
//! - Persistent user preferences (unit system, theme)
//! - The dashboard state machine driven by user events
//!
//! It is used by `skyview-cli`, but has no terminal dependencies of its own.

pub mod config;
pub mod dashboard;
pub mod describe;
pub mod digest;
pub mod error;
pub mod icon;
pub mod model;
pub mod prefs;
pub mod provider;

pub use config::Config;
pub use dashboard::{Dashboard, ViewState, WeatherView};
pub use error::{ConfigurationError, FetchError};
pub use model::{
    CurrentConditions, ForecastSample, Theme, UnitSystem, UserPreferences, WeatherReport,
};
pub use prefs::{FileStore, KeyValueStore, MemoryStore, PreferenceStore};
pub use provider::{
    WeatherProvider, openweather::OpenWeatherProvider, provider_from_config,
    provider_from_config_with_env,
};
