use async_trait::async_trait;
use std::fmt::Debug;

use crate::config::Config;
use crate::error::WeatherProviderError;
use crate::model::{CurrentConditions, ForecastBlock};
use crate::provider::openweather::OpenWeatherClient;

pub mod openweather;

/// Upper bound on the forecast horizon; the provider serves five days of
/// 3-hour blocks.
pub const MAX_FORECAST_DAYS: u32 = 5;

/// Number of 3-hour blocks in one forecast day.
pub const BLOCKS_PER_DAY: u32 = 8;

/// Clamp a requested day count into the supported range before any
/// request is constructed. Zero, negative and oversized values are legal
/// inputs, never errors.
pub fn clamp_days(days: i32) -> u32 {
    days.clamp(1, MAX_FORECAST_DAYS as i32) as u32
}

/// Weather source abstraction.
///
/// Implementations normalize provider payloads into the crate's record
/// types and translate every failure into [`WeatherProviderError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for a city.
    async fn current_conditions(
        &self,
        city: &str,
    ) -> Result<CurrentConditions, WeatherProviderError>;

    /// Forecast 3-hour blocks for a city, oldest first, at most
    /// `clamp_days(days) * BLOCKS_PER_DAY` entries.
    async fn forecast_blocks(
        &self,
        city: &str,
        days: i32,
    ) -> Result<Vec<ForecastBlock>, WeatherProviderError>;
}

/// Build the OpenWeather-backed provider from config.
///
/// Fails with [`WeatherProviderError::NotConfigured`] when no API key is
/// resolvable; in that case no network request is ever attempted.
pub fn provider_from_config(config: &Config) -> Result<OpenWeatherClient, WeatherProviderError> {
    let api_key = config.api_key().ok_or(WeatherProviderError::NotConfigured)?;
    Ok(OpenWeatherClient::new(api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_days_caps_the_horizon() {
        assert_eq!(clamp_days(1), 1);
        assert_eq!(clamp_days(5), 5);
        assert_eq!(clamp_days(6), 5);
        assert_eq!(clamp_days(9), 5);
    }

    #[test]
    fn clamp_days_raises_degenerate_requests() {
        assert_eq!(clamp_days(0), 1);
        assert_eq!(clamp_days(-3), 1);
        assert_eq!(clamp_days(i32::MIN), 1);
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let config = Config::default();
        let err = provider_from_config(&config).unwrap_err();
        assert!(matches!(err, WeatherProviderError::NotConfigured));
    }

    #[test]
    fn provider_from_config_errors_on_empty_api_key() {
        let mut config = Config::default();
        config.set_api_key(String::new());
        let err = provider_from_config(&config).unwrap_err();
        assert!(matches!(err, WeatherProviderError::NotConfigured));
    }

    #[test]
    fn provider_from_config_builds_client_when_configured() {
        let mut config = Config::default();
        config.set_api_key("secret".to_string());
        assert!(provider_from_config(&config).is_ok());
    }
}
