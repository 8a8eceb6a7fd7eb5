use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::WeatherProviderError;
use crate::model::{CurrentConditions, ForecastBlock};
use crate::provider::{BLOCKS_PER_DAY, WeatherProvider, clamp_days};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MS_TO_KMH: f64 = 3.6;

/// Client for the OpenWeather "current weather" and "5 day / 3 hour"
/// endpoints.
///
/// Every request carries `units=metric` and `lang=en`, so temperatures
/// arrive in Celsius and labels in English; wind speed arrives in m/s and
/// is converted to km/h during normalization.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    #[cfg(test)]
    fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Issue one GET against the provider and decode the JSON body.
    ///
    /// Failure modes all funnel into [`WeatherProviderError`]: an empty
    /// key refuses to send, a non-2xx response prefers the provider's own
    /// `message` field, and transport or decode failures carry the
    /// stringified underlying error.
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherProviderError> {
        if self.api_key.is_empty() {
            return Err(WeatherProviderError::NotConfigured);
        }

        let url = format!("{}{}", self.base_url, path);
        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "en"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| WeatherProviderError::api(e.to_string()))?;

        let status_err = res.error_for_status_ref().err();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherProviderError::api(e.to_string()))?;

        if let Some(err) = status_err {
            let message = serde_json::from_str::<OwErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| err.to_string());
            return Err(WeatherProviderError::api(message));
        }

        serde_json::from_str(&body).map_err(|e| WeatherProviderError::api(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_conditions(
        &self,
        city: &str,
    ) -> Result<CurrentConditions, WeatherProviderError> {
        tracing::debug!("fetching current conditions for {}", city);
        let raw: OwCurrentResponse = self.request("/weather", &[("q", city)]).await?;
        Ok(normalize_current(raw))
    }

    async fn forecast_blocks(
        &self,
        city: &str,
        days: i32,
    ) -> Result<Vec<ForecastBlock>, WeatherProviderError> {
        let days = clamp_days(days);
        let cnt = (days * BLOCKS_PER_DAY).to_string();
        tracing::debug!("fetching {} forecast blocks for {}", cnt, city);
        let raw: OwForecastResponse = self
            .request("/forecast", &[("q", city), ("cnt", cnt.as_str())])
            .await?;
        Ok(normalize_forecast(raw, days))
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

/// Rain or snow volume block. The provider reports either a 1-hour or a
/// 3-hour window, or omits the object entirely.
#[derive(Debug, Default, Deserialize)]
struct OwPrecip {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

impl OwPrecip {
    /// Volume in mm, preferring the 1-hour window when both are present.
    fn millimetres(&self) -> f64 {
        self.one_hour.or(self.three_hours).unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    weather: Vec<OwWeather>,
    main: OwMain,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    rain: OwPrecip,
    #[serde(default)]
    snow: OwPrecip,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn normalize_current(raw: OwCurrentResponse) -> CurrentConditions {
    let (condition, description) = raw
        .weather
        .first()
        .map(|w| (w.main.clone(), w.description.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));

    CurrentConditions {
        city: raw.name,
        condition,
        description,
        temp_c: round1(raw.main.temp),
        feels_like_c: round1(raw.main.feels_like),
        wind_kmh: round1(raw.wind.speed * MS_TO_KMH),
        humidity: raw.main.humidity,
        rain_mm: raw.rain.millimetres(),
        snow_mm: raw.snow.millimetres(),
    }
}

fn normalize_forecast(raw: OwForecastResponse, days: u32) -> Vec<ForecastBlock> {
    let max_blocks = (days * BLOCKS_PER_DAY) as usize;
    raw.list
        .into_iter()
        .take(max_blocks)
        .map(|entry| ForecastBlock {
            timestamp_text: entry.dt_txt,
            temp_c: entry.main.temp,
            sky: entry
                .weather
                .first()
                .map(|w| w.main.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
        })
        .collect()
}
