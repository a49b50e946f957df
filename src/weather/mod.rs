//! Single-city weather lookup against the OpenWeatherMap current-weather API

mod http;
mod worker;

pub use http::HttpTransport;
pub use worker::{WeatherOutcome, WeatherRequest, WeatherWorker};

use crate::error::{Result, WidgetError};
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{debug, info};

/// Current-weather endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Country qualifier appended to the city name
pub const DEFAULT_COUNTRY: &str = "KR";

/// Language of the condition description
pub const DEFAULT_LANG: &str = "kr";

/// Request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw HTTP response as seen by the weather client
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP seam so lookups can run without a network
pub trait WeatherTransport {
    /// Issue a GET to `url` with URL-encoded `query` parameters
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse>;
}

/// Weather provider configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub endpoint: String,
    pub country: String,
    pub lang: String,
    pub timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Parsed current weather for one city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub condition_main: String,
    pub condition_description: String,
    pub temperature_celsius: Option<f64>,
    pub fetched_at: DateTime<Local>,
}

impl WeatherReport {
    /// Temperature as shown in the widget, `-` when the provider omitted it
    pub fn temperature_text(&self) -> String {
        match self.temperature_celsius {
            Some(t) => format!("{:.1} °C", t),
            None => "-".to_string(),
        }
    }
}

/// Parse a current-weather response body
///
/// Missing fields degrade to the requested city, an empty string, or no
/// temperature; only a body that is not JSON at all is an error.
pub fn parse_report(body: &str, city: &str, fetched_at: DateTime<Local>) -> Result<WeatherReport> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| WidgetError::WeatherFormat(e.to_string()))?;

    let condition = &json["weather"][0];
    let text = |v: &serde_json::Value| v.as_str().unwrap_or_default().to_string();

    Ok(WeatherReport {
        location: json["name"].as_str().unwrap_or(city).to_string(),
        condition_main: text(&condition["main"]),
        condition_description: text(&condition["description"]),
        temperature_celsius: json["main"]["temp"].as_f64(),
        fetched_at,
    })
}

/// Weather client over a transport
pub struct WeatherClient<T> {
    transport: T,
    config: WeatherConfig,
}

impl<T: WeatherTransport> WeatherClient<T> {
    pub fn new(transport: T, config: WeatherConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch current weather for `city`
    ///
    /// An empty API key fails with `MissingApiKey` before any request is made.
    pub fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherReport> {
        if api_key.trim().is_empty() {
            return Err(WidgetError::MissingApiKey);
        }

        let query = [
            ("q", format!("{},{}", city, self.config.country)),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
            ("lang", self.config.lang.clone()),
        ];

        debug!("Requesting weather for {}", city);
        let response = self.transport.get(&self.config.endpoint, &query)?;

        if !(200..300).contains(&response.status) {
            return Err(WidgetError::WeatherApi {
                status: response.status,
                message: api_error_message(&response.body),
            });
        }

        let report = parse_report(&response.body, city, Local::now())?;
        info!(
            "Weather for {}: {} {}",
            report.location,
            report.condition_main,
            report.temperature_text()
        );
        Ok(report)
    }
}

/// Provider error bodies look like `{"cod":"404","message":"city not found"}`
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| "unexpected response".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    const SEOUL: &str = r#"{"name":"Seoul","weather":[{"main":"Clear","description":"clear sky"}],"main":{"temp":21.5}}"#;

    fn client(transport: MockTransport) -> WeatherClient<MockTransport> {
        WeatherClient::new(transport, WeatherConfig::default())
    }

    #[test]
    fn test_fetch_parses_fields() {
        let client = client(MockTransport::ok(200, SEOUL));
        let report = client.fetch("Seoul", "key").unwrap();

        assert_eq!(report.location, "Seoul");
        assert_eq!(report.condition_main, "Clear");
        assert_eq!(report.condition_description, "clear sky");
        assert_eq!(report.temperature_text(), "21.5 °C");
    }

    #[test]
    fn test_query_parameters() {
        let client = client(MockTransport::ok(200, SEOUL));
        client.fetch("Seoul", "secret").unwrap();

        let query = client.transport().last_query();
        let get = |k: &str| {
            query
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("q"), "Seoul,KR");
        assert_eq!(get("appid"), "secret");
        assert_eq!(get("units"), "metric");
        assert_eq!(get("lang"), "kr");
    }

    #[test]
    fn test_missing_key_makes_no_request() {
        let client = client(MockTransport::ok(200, SEOUL));

        assert!(matches!(client.fetch("Seoul", ""), Err(WidgetError::MissingApiKey)));
        assert!(matches!(client.fetch("Seoul", "   "), Err(WidgetError::MissingApiKey)));
        assert_eq!(client.transport().calls(), 0);
    }

    #[test]
    fn test_missing_fields_degrade() {
        let report = parse_report(r#"{"weather":[]}"#, "Daegu", Local::now()).unwrap();
        assert_eq!(report.location, "Daegu");
        assert_eq!(report.condition_main, "");
        assert_eq!(report.condition_description, "");
        assert_eq!(report.temperature_celsius, None);
        assert_eq!(report.temperature_text(), "-");

        let report = parse_report(r#"{"main":{"temp":-3}}"#, "Daegu", Local::now()).unwrap();
        assert_eq!(report.temperature_text(), "-3.0 °C");
    }

    #[test]
    fn test_invalid_body_is_format_error() {
        let client = client(MockTransport::ok(200, "<html>busy</html>"));
        assert!(matches!(
            client.fetch("Seoul", "key"),
            Err(WidgetError::WeatherFormat(_))
        ));
    }

    #[test]
    fn test_api_error_uses_provider_message() {
        let client = client(MockTransport::ok(
            401,
            r#"{"cod":401,"message":"Invalid API key."}"#,
        ));
        let err = client.fetch("Seoul", "bad-key").unwrap_err();

        assert!(matches!(err, WidgetError::WeatherApi { status: 401, .. }));
        let text = err.to_string();
        assert!(text.contains("Invalid API key."));
        assert!(!text.contains("bad-key"));
    }

    #[test]
    fn test_timeout_propagates() {
        let client = client(MockTransport::timing_out());
        assert!(matches!(client.fetch("Seoul", "key"), Err(WidgetError::Timeout)));
        assert_eq!(client.transport().calls(), 1);
    }
}
