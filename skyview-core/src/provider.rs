use crate::{
    Config,
    error::{ConfigurationError, FetchError},
    model::{UnitSystem, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions plus a forecast timeline for a named place.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(
        &self,
        place: &str,
        units: UnitSystem,
    ) -> Result<WeatherReport, FetchError>;
}

/// Construct the provider from config, resolving the API key first.
pub fn provider_from_config(
    config: &Config,
) -> Result<Box<dyn WeatherProvider>, ConfigurationError> {
    Ok(build(config, config.api_key()?))
}

/// Like [`provider_from_config`], with the environment key passed in.
pub fn provider_from_config_with_env(
    config: &Config,
    env_value: Option<String>,
) -> Result<Box<dyn WeatherProvider>, ConfigurationError> {
    Ok(build(config, config.api_key_with_env(env_value)?))
}

fn build(config: &Config, api_key: String) -> Box<dyn WeatherProvider> {
    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key, base_url),
        None => OpenWeatherProvider::new(api_key),
    };
    Box::new(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config_with_env(&cfg, None).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingApiKey);
    }

    #[test]
    fn env_key_satisfies_empty_config() {
        let cfg = Config::default();
        assert!(provider_from_config_with_env(&cfg, Some("ENV_KEY".into())).is_ok());
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
