use thiserror::Error;

/// Unified failure kind for everything that can go wrong while talking to
/// the weather provider.
///
/// Transport failures, non-2xx responses and undecodable payloads all
/// collapse into [`WeatherProviderError::Api`]; a missing credential is
/// reported as [`WeatherProviderError::NotConfigured`] before any request
/// is sent.
#[derive(Debug, Error)]
pub enum WeatherProviderError {
    /// No API key was supplied via config file or environment.
    #[error("OpenWeather API key is not configured")]
    NotConfigured,

    /// The provider call failed. The message is the provider's own error
    /// text when the response body carried one, otherwise the stringified
    /// underlying failure.
    #[error("Weather API error: {0}")]
    Api(String),
}

impl WeatherProviderError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// True when the failure is a missing credential rather than a
    /// provider call gone wrong.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}
