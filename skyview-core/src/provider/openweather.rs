use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{CurrentConditions, ForecastSample, UnitSystem, WeatherReport},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another endpoint root, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get(
        &self,
        endpoint: &str,
        place: &str,
        units: UnitSystem,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&[
                ("q", place),
                ("units", units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
    }

    async fn fetch_current(
        &self,
        place: &str,
        units: UnitSystem,
    ) -> Result<CurrentConditions, FetchError> {
        let res = self.get("weather", place, units).await?;

        let status = res.status();
        if !status.is_success() {
            tracing::info!(%status, place, "current conditions request rejected");
            return Err(FetchError::NotFound);
        }

        let body = res.text().await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            FetchError::InvalidResponse(format!(
                "malformed current conditions ({e}): {}",
                truncate_body(&body)
            ))
        })?;

        parsed.try_into()
    }

    /// Any failure here is logged and reported as `None`.
    async fn fetch_forecast(&self, place: &str, units: UnitSystem) -> Option<Vec<ForecastSample>> {
        let res = match self.get("forecast", place, units).await {
            Ok(res) => res,
            Err(e) => {
                tracing::warn!("forecast request failed: {e}");
                return None;
            }
        };

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, place, "forecast request returned non-success status");
        }

        let body = match res.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("failed to read forecast body: {e}");
                return None;
            }
        };

        match serde_json::from_str::<OwForecastResponse>(&body) {
            Ok(parsed) => Some(parsed.list.into_iter().map(ForecastSample::from).collect()),
            Err(e) => {
                tracing::warn!("malformed forecast ({e}): {}", truncate_body(&body));
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: f64,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        if !(0.0..=100.0).contains(&parsed.main.humidity) {
            return Err(FetchError::InvalidResponse(format!(
                "humidity out of range: {}",
                parsed.main.humidity
            )));
        }

        let weather = parsed.weather.into_iter().next().ok_or_else(|| {
            FetchError::InvalidResponse("current conditions contained no weather entry".into())
        })?;

        Ok(CurrentConditions {
            place: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            category: weather.main,
            description: weather.description,
            wind_speed: parsed.wind.speed,
            visibility: parsed.visibility,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwForecastEntry> for ForecastSample {
    fn from(entry: OwForecastEntry) -> Self {
        let category = entry
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .unwrap_or_else(|| "Unknown".to_string());

        ForecastSample {
            timestamp: entry.dt,
            temperature: entry.main.temp,
            category,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(
        &self,
        place: &str,
        units: UnitSystem,
    ) -> Result<WeatherReport, FetchError> {
        let place = place.trim();
        if place.is_empty() {
            return Err(FetchError::BlankPlace);
        }

        tracing::debug!(place, %units, "fetching weather");

        let (current, forecast) = tokio::join!(
            self.fetch_current(place, units),
            self.fetch_forecast(place, units),
        );

        Ok(WeatherReport {
            current: current?,
            forecast,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
