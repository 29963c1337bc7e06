use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use super::dto::{OwmCurrent, WeatherSnapshot};
use crate::config::WeatherConfig;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("weather provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider returned {status}")]
    Status { status: u16, body: Value },

    #[error("malformed weather payload: {0}")]
    Decode(String),
}

impl WeatherError {
    /// What the provider said, or our own description when it said nothing usable.
    pub fn detail(&self) -> Value {
        match self {
            WeatherError::Status { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// External weather gateway, queried by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}

/// OpenWeather "current weather" client; metric units, no caching, no retry.
pub struct OpenWeatherClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(cfg: &WeatherConfig) -> anyhow::Result<Self> {
        let base = cfg.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/weather"))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key: cfg.api_key.clone(),
        })
    }
}

/// Provider's error body as JSON when it parses, as lossy text otherwise.
fn map_status_error(status: StatusCode, body: &[u8]) -> WeatherError {
    let body = serde_json::from_slice::<Value>(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
    WeatherError::Status {
        status: status.as_u16(),
        body,
    }
}

fn decode_current(body: &[u8]) -> Result<WeatherSnapshot, WeatherError> {
    let current: OwmCurrent =
        serde_json::from_slice(body).map_err(|e| WeatherError::Decode(e.to_string()))?;
    current.into_snapshot().map_err(WeatherError::Decode)
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let err = map_status_error(status, &body);
            error!(%status, %city, provider_error = %err.detail(), "weather provider error");
            return Err(err);
        }

        let snapshot = decode_current(&body)?;
        debug!(%city, temperature = snapshot.temperature, "weather fetched");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_joins_base_url() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            api_key: "k".into(),
            base_url: "https://api.openweathermap.org/data/2.5/".into(),
        })
        .unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.openweathermap.org/data/2.5/weather"
        );
    }

    #[test]
    fn detail_prefers_provider_body() {
        let err = WeatherError::Status {
            status: 404,
            body: json!({"cod": "404", "message": "city not found"}),
        };
        assert_eq!(err.detail()["message"], "city not found");

        let err = WeatherError::Decode("bad".into());
        assert_eq!(err.detail(), Value::String("malformed weather payload: bad".into()));
    }

    #[test]
    fn json_error_body_is_kept_as_json() {
        let err = map_status_error(
            StatusCode::NOT_FOUND,
            br#"{"cod":"404","message":"city not found"}"#,
        );
        match &err {
            WeatherError::Status { status, body } => {
                assert_eq!(*status, 404);
                assert_eq!(body["message"], "city not found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "weather provider returned 404");
    }

    #[test]
    fn plain_text_error_body_becomes_a_string() {
        let err = map_status_error(StatusCode::BAD_GATEWAY, b"plain text");
        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, Value::String("plain text".into()));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_success_body_is_a_decode_error() {
        let err = decode_current(b"<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)), "{err:?}");
        assert!(err.to_string().starts_with("malformed weather payload"));
    }

    #[test]
    fn success_body_decodes_to_snapshot() {
        let body = br#"{
            "name": "Nagpur",
            "main": {"temp": 38.0, "humidity": 20},
            "weather": [{"description": "clear sky"}]
        }"#;
        let snapshot = decode_current(body).unwrap();
        assert_eq!(snapshot.city, "Nagpur");
        assert_eq!(snapshot.temperature, 38.0);
        assert_eq!(snapshot.humidity, 20);
    }
}
