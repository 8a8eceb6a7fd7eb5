use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Normalized snapshot of the current weather in one city.
///
/// All values are metric: Celsius, km/h, millimetres. `condition` carries
/// the provider's coarse label verbatim, including labels outside the
/// known vocabulary; [`CurrentConditions::sky_kind`] applies the display
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    /// City name as echoed back by the provider.
    pub city: String,
    /// Coarse condition label, e.g. "Clear", "Rain".
    pub condition: String,
    /// Free-text condition detail, e.g. "light rain".
    pub description: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub wind_kmh: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Rain volume in mm over the most recent reported window.
    #[serde(default)]
    pub rain_mm: f64,
    /// Snow volume in mm over the most recent reported window.
    #[serde(default)]
    pub snow_mm: f64,
}

impl CurrentConditions {
    pub fn sky_kind(&self) -> SkyKind {
        SkyKind::from_label(&self.condition).unwrap_or_default()
    }
}

/// One 3-hour forecast step, oldest first in the sequence returned by
/// [`WeatherProvider::forecast_blocks`](crate::provider::WeatherProvider::forecast_blocks).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ForecastBlock {
    /// The provider's literal "YYYY-MM-DD HH:MM:SS" timestamp text.
    pub timestamp_text: String,
    pub temp_c: f64,
    /// Coarse condition label for the block, passed through verbatim.
    pub sky: String,
}

impl ForecastBlock {
    /// Parsed form of `timestamp_text`, or `None` when the provider sent
    /// something other than "YYYY-MM-DD HH:MM:SS".
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp_text, "%Y-%m-%d %H:%M:%S").ok()
    }

    pub fn sky_kind(&self) -> SkyKind {
        SkyKind::from_label(&self.sky).unwrap_or_default()
    }
}

/// The known coarse sky vocabulary.
///
/// Records keep the provider string untouched; this enum is the rendering
/// fallback, with [`SkyKind::Clouds`] standing in for any label outside
/// the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkyKind {
    Clear,
    #[default]
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Fog,
    Haze,
    Smoke,
}

impl SkyKind {
    /// Exact match against the provider's label set. Case-sensitive on
    /// purpose: the provider capitalizes these labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Clear" => Some(Self::Clear),
            "Clouds" => Some(Self::Clouds),
            "Rain" => Some(Self::Rain),
            "Snow" => Some(Self::Snow),
            "Thunderstorm" => Some(Self::Thunderstorm),
            "Drizzle" => Some(Self::Drizzle),
            "Mist" => Some(Self::Mist),
            "Fog" => Some(Self::Fog),
            "Haze" => Some(Self::Haze),
            "Smoke" => Some(Self::Smoke),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Drizzle => "🌦️",
            Self::Mist | Self::Fog | Self::Haze | Self::Smoke => "🌫️",
        }
    }

    /// Icon file stem; haze and smoke share the fog artwork.
    pub fn icon_name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::Drizzle => "drizzle",
            Self::Mist => "mist",
            Self::Fog | Self::Haze | Self::Smoke => "fog",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn known_labels_resolve() {
        assert_eq!(SkyKind::from_label("Clear"), Some(SkyKind::Clear));
        assert_eq!(SkyKind::from_label("Thunderstorm"), Some(SkyKind::Thunderstorm));
        assert_eq!(SkyKind::from_label("Smoke"), Some(SkyKind::Smoke));
    }

    #[test]
    fn unknown_labels_do_not_resolve() {
        assert_eq!(SkyKind::from_label("Tornado"), None);
        assert_eq!(SkyKind::from_label("clear"), None);
        assert_eq!(SkyKind::from_label(""), None);
    }

    #[test]
    fn fallback_kind_is_clouds() {
        assert_eq!(SkyKind::default(), SkyKind::Clouds);
        let block = ForecastBlock {
            timestamp_text: "2025-08-25 12:00:00".to_string(),
            temp_c: 21.0,
            sky: "Tornado".to_string(),
        };
        assert_eq!(block.sky_kind(), SkyKind::Clouds);
        assert_eq!(block.sky, "Tornado");
    }

    #[test]
    fn obscured_skies_share_one_emoji() {
        assert_eq!(SkyKind::Mist.emoji(), "🌫️");
        assert_eq!(SkyKind::Fog.emoji(), "🌫️");
        assert_eq!(SkyKind::Haze.emoji(), "🌫️");
        assert_eq!(SkyKind::Smoke.emoji(), "🌫️");
        assert_eq!(SkyKind::Clear.emoji(), "☀️");
    }

    #[test]
    fn haze_and_smoke_reuse_fog_icon() {
        assert_eq!(SkyKind::Haze.icon_name(), "fog");
        assert_eq!(SkyKind::Smoke.icon_name(), "fog");
        assert_eq!(SkyKind::Mist.icon_name(), "mist");
        assert_eq!(SkyKind::Rain.icon_name(), "rain");
    }

    #[test]
    fn block_timestamp_parses_provider_format() {
        let block = ForecastBlock {
            timestamp_text: "2025-08-25 15:00:00".to_string(),
            temp_c: 24.5,
            sky: "Clear".to_string(),
        };
        let ts = block.timestamp().expect("valid timestamp must parse");
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 8, 25).expect("valid date"));
        assert_eq!(ts.hour(), 15);
    }

    #[test]
    fn block_timestamp_rejects_other_formats() {
        let block = ForecastBlock {
            timestamp_text: "25/08/2025 15:00".to_string(),
            temp_c: 24.5,
            sky: "Clear".to_string(),
        };
        assert!(block.timestamp().is_none());
    }

    #[test]
    fn current_conditions_serialize_with_precipitation() {
        let conditions = CurrentConditions {
            city: "Paris".to_string(),
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
            temp_c: 12.3,
            feels_like_c: 11.1,
            wind_kmh: 14.8,
            humidity: 82,
            rain_mm: 0.5,
            snow_mm: 0.0,
        };
        let value = serde_json::to_value(&conditions).expect("record must serialize");
        assert_eq!(value["city"], "Paris");
        assert_eq!(value["rain_mm"], 0.5);
        assert_eq!(value["snow_mm"], 0.0);
        assert_eq!(value["humidity"], 82);
    }

    #[test]
    fn current_conditions_deserialize_defaults_precipitation() {
        let value = serde_json::json!({
            "city": "Oslo",
            "condition": "Clear",
            "description": "clear sky",
            "temp_c": 3.0,
            "feels_like_c": 0.5,
            "wind_kmh": 7.2,
            "humidity": 55
        });
        let conditions: CurrentConditions =
            serde_json::from_value(value).expect("record must deserialize");
        assert_eq!(conditions.rain_mm, 0.0);
        assert_eq!(conditions.snow_mm, 0.0);
        assert_eq!(conditions.sky_kind(), SkyKind::Clear);
    }
}
