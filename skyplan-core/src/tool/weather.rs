use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

use crate::model::CurrentConditions;
use crate::provider::WeatherProvider;
use crate::tool::{Tool, ToolDefinition, ToolError};

/// Arguments of the `get_weather` capability.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WeatherQuery {
    /// City name, free-form spelling.
    pub city: String,
}

/// The weather-grounding capability handed to the agent loop.
///
/// Provider failures are folded into the returned payload as
/// `{"error": message}` so the loop can narrate them instead of aborting
/// the run; only malformed arguments are reported as [`ToolError`].
pub struct WeatherTool {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherTool {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_weather",
            "Get the current weather for a city: temperature, sky condition, \
             wind, humidity and precipitation.",
        )
        .with_input_schema(schema_value::<WeatherQuery>())
        .with_output_schema(schema_value::<CurrentConditions>())
    }

    async fn call(&self, args: JsonValue) -> Result<JsonValue, ToolError> {
        let query: WeatherQuery = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        match self.provider.current_conditions(&query.city).await {
            Ok(conditions) => Ok(serde_json::to_value(conditions)?),
            Err(err) => Ok(json!({ "error": err.to_string() })),
        }
    }
}

fn schema_value<T: JsonSchema>() -> JsonValue {
    serde_json::to_value(schemars::schema_for!(T)).expect("tool schema must serialize")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherProviderError;
    use crate::model::ForecastBlock;
    use crate::tool::ToolRegistry;

    #[derive(Debug)]
    struct FixedProvider(CurrentConditions);

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn current_conditions(
            &self,
            _city: &str,
        ) -> Result<CurrentConditions, WeatherProviderError> {
            Ok(self.0.clone())
        }

        async fn forecast_blocks(
            &self,
            _city: &str,
            _days: i32,
        ) -> Result<Vec<ForecastBlock>, WeatherProviderError> {
            Ok(Vec::new())
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        async fn current_conditions(
            &self,
            _city: &str,
        ) -> Result<CurrentConditions, WeatherProviderError> {
            Err(WeatherProviderError::api("city not found"))
        }

        async fn forecast_blocks(
            &self,
            _city: &str,
            _days: i32,
        ) -> Result<Vec<ForecastBlock>, WeatherProviderError> {
            Err(WeatherProviderError::api("city not found"))
        }
    }

    fn sample_conditions() -> CurrentConditions {
        CurrentConditions {
            city: "Paris".to_string(),
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            temp_c: 21.0,
            feels_like_c: 20.4,
            wind_kmh: 9.7,
            humidity: 40,
            rain_mm: 0.0,
            snow_mm: 0.0,
        }
    }

    #[test]
    fn definition_describes_the_city_argument() {
        let tool = WeatherTool::new(Arc::new(FixedProvider(sample_conditions())));
        let definition = tool.definition();

        assert_eq!(definition.name, "get_weather");
        assert!(definition.input_schema["properties"]["city"].is_object());
        let required = definition.input_schema["required"]
            .as_array()
            .expect("required must be an array");
        assert!(required.iter().any(|v| v == "city"));
        assert!(definition.output_schema["properties"]["temp_c"].is_object());
    }

    #[tokio::test]
    async fn call_returns_the_weather_record() {
        let tool = WeatherTool::new(Arc::new(FixedProvider(sample_conditions())));
        let result = tool
            .call(json!({"city": "Paris"}))
            .await
            .expect("call must succeed");

        assert_eq!(result["city"], "Paris");
        assert_eq!(result["condition"], "Clear");
        assert_eq!(result["temp_c"], 21.0);
        assert!(result.get("error").is_none());
    }

    #[tokio::test]
    async fn provider_failure_becomes_error_payload() {
        let tool = WeatherTool::new(Arc::new(FailingProvider));
        let result = tool
            .call(json!({"city": "Atlantis"}))
            .await
            .expect("failures are folded into the payload");

        let message = result["error"].as_str().expect("error must be a string");
        assert_eq!(message, "Weather API error: city not found");
    }

    #[tokio::test]
    async fn malformed_arguments_are_rejected() {
        let tool = WeatherTool::new(Arc::new(FixedProvider(sample_conditions())));

        let err = tool.call(json!({"town": "Paris"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = tool.call(json!({"city": 42})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn registry_dispatches_get_weather() {
        let mut registry = ToolRegistry::new();
        registry.register(WeatherTool::new(Arc::new(FixedProvider(
            sample_conditions(),
        ))));

        assert_eq!(registry.names(), vec!["get_weather"]);
        let result = registry
            .call("get_weather", json!({"city": "Paris"}))
            .await
            .expect("dispatch must succeed");
        assert_eq!(result["city"], "Paris");
    }
}
