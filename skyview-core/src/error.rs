use thiserror::Error;

/// The fetch capability is unusable until the user supplies a credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error(
        "API Key Required.\n\
         Hint: set OPENWEATHER_API_KEY or run `skyview configure` and enter your OpenWeatherMap API key."
    )]
    MissingApiKey,
}

/// Recoverable failure of a weather fetch. Only the current-conditions request
/// produces these; forecast problems degrade to an absent forecast.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No place given")]
    BlankPlace,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("City not found")]
    NotFound,

    #[error("Failed to fetch weather data: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to fetch weather data: {0}")]
    InvalidResponse(String),
}
