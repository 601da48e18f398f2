use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{error::LookupError, payload::ForecastPayload};

use super::ForecastSource;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/forecast.json", self.base_url)
    }

    fn query_params(&self, city: &str, days: u8) -> [(&'static str, String); 5] {
        [
            ("key", self.api_key.clone()),
            ("q", city.to_string()),
            ("days", days.to_string()),
            ("aqi", "no".to_string()),
            ("alerts", "no".to_string()),
        ]
    }
}

#[async_trait]
impl ForecastSource for WeatherApiProvider {
    async fn fetch_forecast(&self, city: &str, days: u8) -> Result<ForecastPayload, LookupError> {
        tracing::debug!(city = %city, days, "Requesting WeatherAPI forecast");

        let res = self
            .http
            .get(self.endpoint())
            .query(&self.query_params(city, days))
            .send()
            .await?;

        let status = res.status();
        tracing::debug!(status = %status, "Received WeatherAPI response");

        let body = match res.text().await {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(err.into()),
            // The status alone decides the outcome; the body is only logged.
            Err(_) => String::new(),
        };

        interpret_response(status, &body)
    }
}

/// Map a provider status and body to a payload or the matching lookup error.
fn interpret_response(status: StatusCode, body: &str) -> Result<ForecastPayload, LookupError> {
    if !status.is_success() {
        tracing::warn!(status = %status, body = %truncate_body(body), "WeatherAPI lookup failed");
        return Err(LookupError::NotFound);
    }

    ForecastPayload::from_json(body).map_err(|err| {
        tracing::warn!(error = %err, body = %truncate_body(body), "Undecodable WeatherAPI body");
        LookupError::MalformedPayload(err.to_string())
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::QueryController;
    use crate::error::QueryError;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    const OK_BODY: &str = r#"{
        "location": {"name": "London", "country": "United Kingdom"},
        "current": {"temp_c": 15.2, "feelslike_c": 14.1, "humidity": 72, "wind_kph": 13.7,
                    "is_day": 1, "condition": {"text": "Partly cloudy"}},
        "forecast": {"forecastday": [
            {"date": "2024-03-04", "day": {"maxtemp_c": 16.4, "mintemp_c": 8.1,
             "daily_chance_of_rain": 64, "condition": {"text": "Patchy rain possible"}}}
        ]}
    }"#;

    #[test]
    fn success_status_decodes_payload() {
        let payload = interpret_response(StatusCode::OK, OK_BODY).expect("payload");
        assert_eq!(payload.location.name, "London");
        assert!(payload.current.is_day);
    }

    #[test]
    fn any_error_status_is_city_not_found() {
        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;

        for status in [StatusCode::BAD_REQUEST, StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = interpret_response(status, body).unwrap_err();
            assert_eq!(err, LookupError::NotFound);
            assert_eq!(err.to_string(), "City not found");
        }
    }

    #[test]
    fn bad_json_on_success_is_malformed() {
        let err = interpret_response(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, LookupError::MalformedPayload(_)));
    }

    #[test]
    fn query_requests_fixed_horizon_without_aqi_or_alerts() {
        let provider = WeatherApiProvider::new("SECRET".into());
        let params = provider.query_params("New York", 5);

        assert_eq!(params[0], ("key", "SECRET".to_string()));
        assert_eq!(params[1], ("q", "New York".to_string()));
        assert_eq!(params[2], ("days", "5".to_string()));
        assert_eq!(params[3], ("aqi", "no".to_string()));
        assert_eq!(params[4], ("alerts", "no".to_string()));
    }

    #[test]
    fn default_endpoint_is_forecast_json() {
        let provider = WeatherApiProvider::new("KEY".into());
        assert_eq!(provider.endpoint(), "https://api.weatherapi.com/v1/forecast.json");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    /// Answer exactly one HTTP request on a loopback port with a canned
    /// response. Returns the base URL and a handle yielding the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}/v1"), handle)
    }

    #[tokio::test]
    async fn sends_fixed_horizon_query_and_decodes_success() {
        let (base_url, server) = serve_once("200 OK", OK_BODY).await;
        let provider = WeatherApiProvider::new("K".into()).with_base_url(&base_url);

        let payload = provider.fetch_forecast("London", 5).await.expect("payload");

        assert_eq!(payload.location.name, "London");
        assert_eq!(payload.forecast.forecastday.len(), 1);
        assert_eq!(
            server.await.unwrap(),
            "GET /v1/forecast.json?key=K&q=London&days=5&aqi=no&alerts=no HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn bad_request_surfaces_as_city_not_found_state() {
        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;
        let (base_url, server) = serve_once("400 Bad Request", body).await;
        let provider = WeatherApiProvider::new("K".into()).with_base_url(&base_url);
        let controller = QueryController::new(provider);

        let err = controller.submit_query("Zzzznotacity").await.unwrap_err();

        assert_eq!(err, QueryError::Lookup(LookupError::NotFound));
        let state = controller.state();
        assert_eq!(state.error_message(), Some("City not found"));
        assert!(state.report().is_none());
        assert!(!state.is_loading());

        let request_line = server.await.unwrap();
        assert!(request_line.contains("q=Zzzznotacity&days=5&aqi=no&alerts=no"));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error_with_cause() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let base_url = format!("http://{addr}");
        let provider = WeatherApiProvider::new("SECRET".into()).with_base_url(&base_url);

        let err = provider.fetch_forecast("London", 5).await.unwrap_err();

        let message = match err {
            LookupError::Transport(message) => message,
            other => panic!("expected transport error, got {other:?}"),
        };
        assert!(message.starts_with("error sending request: "), "message: {message}");
        assert!(!message.contains("SECRET"), "message leaks the key: {message}");
    }
}
