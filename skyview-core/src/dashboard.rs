//! UI-bound state of the dashboard and the events that drive it.

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeZone};

use crate::{
    describe::Descriptors,
    digest::daily_digest_in,
    error::{ConfigurationError, FetchError},
    icon::{Icon, icon_for},
    model::{CurrentConditions, Theme, UnitSystem, UserPreferences, WeatherReport},
    prefs::{KeyValueStore, PreferenceStore},
    provider::WeatherProvider,
};

/// One forecast card.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCard {
    pub date: NaiveDate,
    pub icon: Icon,
    pub temperature: f64,
    pub category: String,
}

impl DailyCard {
    /// Short weekday name, e.g. "Mon".
    pub fn weekday(&self) -> String {
        self.date.format("%a").to_string()
    }
}

/// Everything the renderer needs for a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub units: UnitSystem,
    pub current: CurrentConditions,
    pub descriptors: Descriptors,
    pub icon: Icon,
    /// Empty when the forecast was unavailable.
    pub daily: Vec<DailyCard>,
}

impl WeatherView {
    pub fn build(report: WeatherReport, units: UnitSystem) -> Self {
        Self::build_in(report, units, &Local)
    }

    pub fn build_in<Tz: TimeZone>(report: WeatherReport, units: UnitSystem, tz: &Tz) -> Self {
        let daily = report
            .forecast
            .as_deref()
            .map(|samples| daily_digest_in(samples, tz))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sample| {
                let date = sample.datetime()?.with_timezone(tz).date_naive();
                Some(DailyCard {
                    date,
                    icon: icon_for(&sample.category),
                    temperature: sample.temperature,
                    category: sample.category,
                })
            })
            .collect();

        Self {
            units,
            descriptors: Descriptors::for_conditions(&report.current, units),
            icon: icon_for(&report.current.category),
            current: report.current,
            daily,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Ready(Box<WeatherView>),
    Error(String),
    /// No credential: the fetch capability is disabled.
    ConfigurationRequired,
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&WeatherView> {
        match self {
            ViewState::Ready(view) => Some(&**view),
            _ => None,
        }
    }
}

/// A fetch that has been started but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub place: String,
    pub units: UnitSystem,
}

pub struct Dashboard<S> {
    provider: Result<Box<dyn WeatherProvider>, ConfigurationError>,
    store: PreferenceStore<S>,
    preferences: UserPreferences,
    city: String,
    state: ViewState,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Preferences are read from `store` once, here.
    pub fn new(
        provider: Result<Box<dyn WeatherProvider>, ConfigurationError>,
        store: PreferenceStore<S>,
        city: impl Into<String>,
    ) -> Self {
        let preferences = store.load();
        Self {
            provider,
            store,
            preferences,
            city: city.into(),
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn preferences(&self) -> UserPreferences {
        self.preferences
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Initial load of the startup city.
    pub async fn startup(&mut self) {
        self.refresh().await;
    }

    /// Submit a search. Blank input is ignored and returns `false`.
    pub async fn search(&mut self, input: &str) -> bool {
        if !self.select_city(input) {
            return false;
        }
        self.refresh().await;
        true
    }

    /// Make the trimmed input the current city without fetching.
    pub fn select_city(&mut self, input: &str) -> bool {
        let place = input.trim();
        if place.is_empty() {
            return false;
        }
        self.city = place.to_string();
        true
    }

    /// Persist the unit system and refetch when it changed.
    pub async fn set_unit_system(&mut self, units: UnitSystem) -> Result<()> {
        if self.select_unit_system(units)? {
            self.refresh().await;
        }
        Ok(())
    }

    /// Persist the unit system without fetching; `true` when it changed.
    /// The in-memory preference only changes once the write succeeded.
    pub fn select_unit_system(&mut self, units: UnitSystem) -> Result<bool> {
        if self.preferences.unit_system == units {
            return Ok(false);
        }
        self.store.save_unit_system(units)?;
        self.preferences.unit_system = units;
        Ok(true)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.preferences.theme.toggled();
        self.store.save_theme(theme)?;
        self.preferences.theme = theme;
        Ok(theme)
    }

    /// Fetch the current city with the current unit system.
    pub async fn refresh(&mut self) {
        let Some(request) = self.begin_fetch() else {
            return;
        };
        let result = self.run_fetch(&request).await;
        self.complete_fetch(request, result);
    }

    /// Enter `Loading` and describe the fetch to run, or enter
    /// `ConfigurationRequired` and return `None` when no credential exists.
    pub fn begin_fetch(&mut self) -> Option<FetchRequest> {
        if self.provider.is_err() {
            self.state = ViewState::ConfigurationRequired;
            return None;
        }

        self.state = ViewState::Loading;
        Some(FetchRequest {
            place: self.city.clone(),
            units: self.preferences.unit_system,
        })
    }

    pub async fn run_fetch(&self, request: &FetchRequest) -> Result<WeatherReport, FetchError> {
        match &self.provider {
            Ok(provider) => provider.fetch_weather(&request.place, request.units).await,
            Err(e) => Err(e.clone().into()),
        }
    }

    /// Apply a finished fetch. The last completion applied wins.
    pub fn complete_fetch(
        &mut self,
        request: FetchRequest,
        result: Result<WeatherReport, FetchError>,
    ) {
        self.state = match result {
            Ok(report) => {
                if report.forecast.is_none() {
                    tracing::info!(place = %request.place, "showing conditions without forecast");
                }
                ViewState::Ready(Box::new(WeatherView::build(report, request.units)))
            }
            Err(e) => {
                tracing::info!(place = %request.place, "fetch failed: {e}");
                ViewState::Error(e.to_string())
            }
        };
    }
}
