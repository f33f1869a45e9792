use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::model::{Condition, Coordinates, WeatherQuery, WeatherSnapshot};

use super::{WeatherError, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Client::new(),
        }
    }

    /// Override the API endpoint (self-hosted proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", query.language.code()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::NotFound);
        }
        if !status.is_success() {
            return Err(WeatherError::Status { status, body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        Ok(snapshot_from(parsed))
    }
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
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
}

/// Build a display-ready snapshot: temperatures rounded to whole °C, wind
/// converted from m/s to km/h and rounded.
fn snapshot_from(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let (condition, description) = parsed
        .weather
        .first()
        .map(|w| (Condition::from_api_main(&w.main), w.description.clone()))
        .unwrap_or_else(|| (Condition::default(), "Unknown".to_string()));

    WeatherSnapshot {
        city: parsed.name,
        description,
        condition,
        temperature_c: parsed.main.temp.round() as i32,
        feels_like_c: parsed.main.feels_like.round() as i32,
        humidity_pct: parsed.main.humidity,
        wind_kmh: (parsed.wind.speed * 3.6).round() as i32,
        pressure_hpa: parsed.main.pressure,
        cloud_cover_pct: parsed.clouds.all,
        coord: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
        observed_at: DateTime::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PARIS_BODY: &str = r#"{
        "coord": {"lon": 2.3522, "lat": 48.8566},
        "weather": [{"id": 803, "main": "Clouds", "description": "nuageux", "icon": "04d"}],
        "main": {"temp": 12.6, "feels_like": 11.4, "temp_min": 10.1, "temp_max": 14.2, "pressure": 1012, "humidity": 71},
        "wind": {"speed": 3.2, "deg": 230},
        "clouds": {"all": 75},
        "dt": 1700000000,
        "name": "Paris",
        "cod": 200
    }"#;

    fn query(city: &str) -> WeatherQuery {
        WeatherQuery { city: city.to_owned(), language: Language::Fr }
    }

    #[test]
    fn snapshot_rounds_display_fields() {
        let parsed: OwCurrentResponse = serde_json::from_str(PARIS_BODY).expect("parse");
        let snapshot = snapshot_from(parsed);

        assert_eq!(snapshot.city, "Paris");
        assert_eq!(snapshot.description, "nuageux");
        assert_eq!(snapshot.condition, Condition::Clouds);
        assert_eq!(snapshot.temperature_c, 13);
        assert_eq!(snapshot.feels_like_c, 11);
        assert_eq!(snapshot.humidity_pct, 71);
        // 3.2 m/s -> 11.52 km/h -> 12
        assert_eq!(snapshot.wind_kmh, 12);
        assert_eq!(snapshot.pressure_hpa, 1012);
        assert_eq!(snapshot.cloud_cover_pct, 75);
        assert_eq!(snapshot.coord, Coordinates { lat: 48.8566, lon: 2.3522 });
        assert_eq!(snapshot.observed_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn snapshot_without_weather_entry_falls_back() {
        let body = r#"{
            "coord": {"lon": 0.0, "lat": 0.0},
            "weather": [],
            "main": {"temp": 1.0, "feels_like": 1.0, "pressure": 1000, "humidity": 50},
            "wind": {"speed": 0.0},
            "dt": 0,
            "name": "Nowhere"
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).expect("parse");
        let snapshot = snapshot_from(parsed);

        assert_eq!(snapshot.condition, Condition::Clear);
        assert_eq!(snapshot.description, "Unknown");
        assert_eq!(snapshot.cloud_cover_pct, 0);
    }

    #[tokio::test]
    async fn current_sends_metric_units_and_language() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "fr"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PARIS_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let snapshot = provider.current(&query("Paris")).await.expect("snapshot");
        assert_eq!(snapshot.temperature_c, 13);
    }

    #[tokio::test]
    async fn http_404_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_raw(r#"{"cod":"404","message":"city not found"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.current(&query("Zzzzznotacity")).await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound));
    }

    #[tokio::test]
    async fn other_http_failures_map_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.current(&query("Paris")).await.unwrap_err();
        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_maps_to_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.current(&query("Paris")).await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[test]
    fn truncate_body_keeps_short_bodies_and_caps_long_ones() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
