//! Core library for the SkyPlan day-planning assistant.
//!
//! This crate defines:
//! - Configuration and credential handling for the weather provider
//! - The OpenWeather client and the normalized weather records
//! - The capability registry the agent loop reads and dispatches through
//!
//! It is used by `skyplan-cli`, but can also be embedded in other
//! binaries or services that need weather grounding.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod tool;

pub use config::Config;
pub use error::WeatherProviderError;
pub use model::{CurrentConditions, ForecastBlock, SkyKind};
pub use provider::openweather::OpenWeatherClient;
pub use provider::{
    BLOCKS_PER_DAY, MAX_FORECAST_DAYS, WeatherProvider, clamp_days, provider_from_config,
};
pub use tool::weather::{WeatherQuery, WeatherTool};
pub use tool::{Tool, ToolDefinition, ToolError, ToolRegistry};
