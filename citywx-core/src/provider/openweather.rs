use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use crate::{
    config::{Config, Endpoints},
    error::{ValidationError, WeatherError},
    model::{CurrentConditions, Location},
};

use super::{Geocoder, WeatherSource};

/// OpenWeatherMap client covering both the direct geocoding endpoint and the
/// current weather endpoint. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    endpoints: Endpoints,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, endpoints: Endpoints) -> Self {
        Self {
            api_key,
            endpoints,
            http: Client::new(),
        }
    }

    /// Keys that fail [`Config::api_key`] are dropped here, so every call
    /// on the resulting client reports `MissingApiKey` without touching the network.
    pub fn from_config(config: &Config) -> Self {
        let api_key = config.api_key().ok().map(str::to_owned);
        Self::new(api_key, config.endpoints.clone())
    }

    fn key(&self) -> Result<&str, WeatherError> {
        self.api_key
            .as_deref()
            .ok_or(WeatherError::Validation(ValidationError::MissingApiKey))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        debug!(url, "Requesting OpenWeather {what}");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                WeatherError::Network(format!("Failed to send request to OpenWeather ({what}): {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!("Failed to read OpenWeather {what} response body: {e}"))
        })?;

        if !status.is_success() {
            warn!(%status, "OpenWeather {what} request failed");
            return Err(WeatherError::Network(format!(
                "OpenWeather {what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %truncate_body(&body), "Unexpected OpenWeather {what} payload");
            WeatherError::MalformedResponse(format!("Failed to parse OpenWeather {what} JSON: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocodeEntry {
    lat: f64,
    lon: f64,
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    /// Meters.
    visibility: u32,
    clouds: OwClouds,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed.weather.into_iter().next().ok_or_else(|| {
            error!("OpenWeather current response contained an empty weather list");
            WeatherError::MalformedResponse(
                "OpenWeather current response contained no weather entries".to_string(),
            )
        })?;

        Ok(CurrentConditions {
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            visibility_km: f64::from(parsed.visibility) / 1000.0,
            cloudiness_pct: parsed.clouds.all,
            condition_main: weather.main,
            condition_description: weather.description,
            icon_code: weather.icon,
            place_name: parsed.name,
            country_code: parsed.sys.country,
        })
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    fn ensure_configured(&self) -> Result<(), WeatherError> {
        self.key().map(|_| ())
    }

    async fn resolve(&self, city: &str) -> Result<Option<Location>, WeatherError> {
        let key = self.key()?;
        let entries: Vec<OwGeocodeEntry> = self
            .get_json(
                "geocoding",
                &self.endpoints.geocode_url,
                &[
                    ("q", city.to_string()),
                    ("limit", "1".to_string()),
                    ("appid", key.to_string()),
                ],
            )
            .await?;

        let location = entries.into_iter().next().map(|e| Location {
            latitude: e.lat,
            longitude: e.lon,
            resolved_name: e.name,
            country_code: e.country,
        });

        match &location {
            Some(loc) => debug!(
                "Resolved {city:?} to {}, {} ({:.4}, {:.4})",
                loc.resolved_name, loc.country_code, loc.latitude, loc.longitude
            ),
            None => debug!("No geocoding match for {city:?}"),
        }

        Ok(location)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    fn ensure_configured(&self) -> Result<(), WeatherError> {
        self.key().map(|_| ())
    }

    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let key = self.key()?;
        let parsed: OwCurrentResponse = self
            .get_json(
                "current weather",
                &self.endpoints.weather_url,
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("appid", key.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        CurrentConditions::try_from(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn client_for(server: &MockServer, key: Option<&str>) -> OpenWeatherClient {
        let endpoints = Endpoints {
            geocode_url: format!("{}/geo/1.0/direct", server.uri()),
            weather_url: format!("{}/data/2.5/weather", server.uri()),
            ..Endpoints::default()
        };
        OpenWeatherClient::new(key.map(str::to_owned), endpoints)
    }

    fn london_weather() -> serde_json::Value {
        json!({
            "coord": { "lon": -0.12, "lat": 51.5 },
            "weather": [
                { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
            ],
            "main": {
                "temp": 15.4,
                "feels_like": 14.1,
                "pressure": 1012,
                "humidity": 80
            },
            "visibility": 9200,
            "wind": { "speed": 3.2, "deg": 240 },
            "clouds": { "all": 40 },
            "sys": { "country": "GB" },
            "name": "London"
        })
    }

    #[tokio::test]
    async fn resolve_returns_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "London"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "London", "lat": 51.5, "lon": -0.12, "country": "GB", "state": "England" },
                { "name": "London", "lat": 42.98, "lon": -81.24, "country": "CA" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let location = client
            .resolve("London")
            .await
            .expect("request should succeed")
            .expect("should find London");

        assert_eq!(location.resolved_name, "London");
        assert_eq!(location.country_code, "GB");
        assert_eq!(location.latitude, 51.5);
        assert_eq!(location.longitude, -0.12);
    }

    #[tokio::test]
    async fn resolve_with_no_matches_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let location = client.resolve("Nowhereville").await.expect("request should succeed");
        assert!(location.is_none());
    }

    #[tokio::test]
    async fn resolve_non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"cod":401}"#))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("BAD"));
        let err = client.resolve("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn resolve_unexpected_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "oops": true })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let err = client.resolve("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(Geocoder::ensure_configured(&client).is_err());

        let err = client.resolve("London").await.unwrap_err();
        assert!(matches!(
            err,
            WeatherError::Validation(ValidationError::MissingApiKey)
        ));

        let err = client.fetch_current(51.5, -0.12).await.unwrap_err();
        assert!(matches!(
            err,
            WeatherError::Validation(ValidationError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn fetch_current_maps_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.12"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_weather()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let conditions = client.fetch_current(51.5, -0.12).await.expect("should parse");

        assert_eq!(conditions.temperature_c, 15.4);
        assert_eq!(conditions.feels_like_c, 14.1);
        assert_eq!(conditions.humidity_pct, 80);
        assert_eq!(conditions.pressure_hpa, 1012);
        assert_eq!(conditions.wind_speed_mps, 3.2);
        assert!((conditions.visibility_km - 9.2).abs() < 1e-9);
        assert_eq!(conditions.cloudiness_pct, 40);
        assert_eq!(conditions.condition_main, "Rain");
        assert_eq!(conditions.condition_description, "light rain");
        assert_eq!(conditions.icon_code, "10d");
        assert_eq!(conditions.place_name, "London");
        assert_eq!(conditions.country_code, "GB");
    }

    #[tokio::test]
    async fn fetch_current_missing_field_is_malformed() {
        let mut body = london_weather();
        body.as_object_mut().expect("object").remove("visibility");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let err = client.fetch_current(51.5, -0.12).await.unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn fetch_current_empty_weather_list_is_malformed() {
        let mut body = london_weather();
        body["weather"] = json!([]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let err = client.fetch_current(51.5, -0.12).await.unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(ref msg) if msg.contains("no weather")));
    }

    #[tokio::test]
    async fn fetch_current_server_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("KEY"));
        let err = client.fetch_current(51.5, -0.12).await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let client = OpenWeatherClient::new(Some("SECRET".into()), Endpoints::default());
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
