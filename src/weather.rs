//! # Weather Module
//!
//! Turns a free-text city name into a formatted report:
//! normalize the name, consult the [`ResponseCache`], otherwise make one
//! call to the [`WeatherGateway`], then convert, translate and format the
//! observation. Failures are returned as [`ApiError`] values and are never
//! cached.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use teloxide::utils::html;
use tracing::{debug, info, warn};

use crate::api_errors::ApiError;
use crate::cache::ResponseCache;
use crate::config::HttpConfig;
use crate::localization::{t, t_args};

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Multiplier from hectopascals to millimetres of mercury
pub const HPA_TO_MM_HG: f64 = 0.75006;

/// Known English condition phrases and their message keys
const CONDITION_KEYS: &[(&str, &str)] = &[
    ("clear sky", "condition-clear-sky"),
    ("few clouds", "condition-few-clouds"),
    ("scattered clouds", "condition-scattered-clouds"),
    ("broken clouds", "condition-broken-clouds"),
    ("shower rain", "condition-shower-rain"),
    ("rain", "condition-rain"),
    ("thunderstorm", "condition-thunderstorm"),
    ("snow", "condition-snow"),
    ("mist", "condition-mist"),
];

/// Current conditions for one city, as reported upstream
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Hectopascals
    pub pressure_hpa: f64,
    pub description: String,
}

/// A component that fetches current weather for a city
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    cod: Option<serde_json::Value>,
    main: Option<MainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

/// `cod` arrives as a number on success and as a string on errors
fn cod_is_success(cod: &serde_json::Value) -> bool {
    match cod {
        serde_json::Value::Number(n) => n.as_u64() == Some(200),
        serde_json::Value::String(s) => s.trim() == "200",
        _ => false,
    }
}

/// Parse an OpenWeatherMap current-weather body
pub fn parse_current_weather(city: &str, body: &str) -> Result<WeatherObservation, ApiError> {
    let payload: CurrentWeatherResponse = serde_json::from_str(body)?;

    if let Some(cod) = &payload.cod {
        if !cod_is_success(cod) {
            return Err(ApiError::NotFound(city.to_string()));
        }
    }

    let main = payload
        .main
        .ok_or_else(|| ApiError::MalformedResponse("missing `main` block".to_string()))?;
    let condition = payload
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::MalformedResponse("empty `weather` array".to_string()))?;

    Ok(WeatherObservation {
        temperature: main.temp,
        humidity: main.humidity,
        pressure_hpa: main.pressure,
        description: condition.description,
    })
}

/// OpenWeatherMap client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(client: reqwest::Client, api_key: String, http: &HttpConfig) -> Self {
        Self {
            client,
            api_key,
            language: http.target_language.clone(),
            base_url: CURRENT_WEATHER_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, ApiError> {
        debug!(city = %city, "Sending OpenWeatherMap request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(city.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_current_weather(city, &body)
    }
}

/// Trim surrounding whitespace and case-fold
pub fn normalize_city(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(ch);
            previous_is_letter = false;
        }
    }
    result
}

/// Upper-case the first character and lower-case the remainder
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn convert_hpa_to_mm_hg(pressure_hpa: f64) -> f64 {
    pressure_hpa * HPA_TO_MM_HG
}

/// Translate a condition phrase; unknown phrases are capitalized as-is
pub fn translate_description(description: &str) -> String {
    let lowered = description.trim().to_lowercase();
    CONDITION_KEYS
        .iter()
        .find(|(phrase, _)| *phrase == lowered)
        .map(|(_, key)| t(key))
        .unwrap_or_else(|| capitalize(&lowered))
}

/// Render the HTML report for a city
pub fn format_report(city: &str, observation: &WeatherObservation) -> String {
    let city = html::escape(&title_case(city));
    let condition = html::escape(&translate_description(&observation.description));
    let temperature = format!("{:.1}", observation.temperature);
    let humidity = format!("{}", observation.humidity.round());
    let pressure = format!("{:.2}", convert_hpa_to_mm_hg(observation.pressure_hpa));

    t_args(
        "weather-report",
        &[
            ("city", &city),
            ("condition", &condition),
            ("temperature", &temperature),
            ("humidity", &humidity),
            ("pressure", &pressure),
        ],
    )
}

/// Weather resolution flow: cache in front of a gateway
pub struct WeatherService {
    gateway: Arc<dyn WeatherGateway>,
    cache: ResponseCache,
}

impl WeatherService {
    pub fn new(gateway: Arc<dyn WeatherGateway>, cache: ResponseCache) -> Self {
        Self { gateway, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Resolve a raw city name into a formatted report
    pub async fn resolve(&self, raw_city: &str) -> Result<String, ApiError> {
        let city = normalize_city(raw_city);
        if city.is_empty() {
            return Err(ApiError::NotFound(raw_city.to_string()));
        }

        if let Some(report) = self.cache.get(&city) {
            info!(city = %city, "Returning cached weather report");
            return Ok(report);
        }

        info!(city = %city, "Fetching weather from gateway");
        match self.gateway.current_weather(&city).await {
            Ok(observation) => {
                let report = format_report(&city, &observation);
                self.cache.insert(&city, report.clone());
                Ok(report)
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Weather lookup failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_conversion() {
        let mm_hg = convert_hpa_to_mm_hg(1000.0);
        assert!((mm_hg - 750.06).abs() < 1e-9);
        assert_eq!(format!("{mm_hg:.2}"), "750.06");
    }

    #[test]
    fn test_known_condition_translated() {
        assert_eq!(translate_description("clear sky"), "Ясное небо");
        assert_eq!(translate_description("Clear Sky"), "Ясное небо");
    }

    #[test]
    fn test_unknown_condition_capitalized() {
        assert_eq!(translate_description("foo bar"), "Foo bar");
        assert_eq!(translate_description("пасмурно"), "Пасмурно");
    }

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("Paris "), "paris");
        assert_eq!(normalize_city("  paris"), "paris");
        assert_eq!(normalize_city("САНКТ-ПЕТЕРБУРГ"), "санкт-петербург");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("санкт-петербург"), "Санкт-Петербург");
        assert_eq!(title_case("o'hare"), "O'Hare");
    }

    #[test]
    fn test_parse_success_payload() {
        let body = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
            "main": {"temp": 21.37, "humidity": 40, "pressure": 1013},
            "cod": 200
        }"#;
        let observation = parse_current_weather("paris", body).unwrap();
        assert_eq!(observation.temperature, 21.37);
        assert_eq!(observation.humidity, 40.0);
        assert_eq!(observation.pressure_hpa, 1013.0);
        assert_eq!(observation.description, "clear sky");
    }

    #[test]
    fn test_parse_not_found_payload() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        assert_eq!(
            parse_current_weather("atlantis", body),
            Err(ApiError::NotFound("atlantis".to_string()))
        );
    }

    #[test]
    fn test_parse_malformed_payload() {
        let body = r#"{"cod": 200, "main": {"temp": 1.0, "humidity": 2, "pressure": 3}, "weather": []}"#;
        assert!(matches!(
            parse_current_weather("x", body),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_current_weather("x", "not json"),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_format_report() {
        let observation = WeatherObservation {
            temperature: 21.37,
            humidity: 40.0,
            pressure_hpa: 1000.0,
            description: "clear sky".to_string(),
        };
        let report = format_report("paris", &observation);
        assert!(report.contains("Погода в городе Paris:"));
        assert!(report.contains("<b>Ясное небо</b>"));
        assert!(report.contains("21.4°C"));
        assert!(report.contains("40 %"));
        assert!(report.contains("750.06 мм рт. ст."));
    }

    #[test]
    fn test_format_report_escapes_city() {
        let observation = WeatherObservation {
            temperature: 0.0,
            humidity: 0.0,
            pressure_hpa: 0.0,
            description: "mist".to_string(),
        };
        let report = format_report("<script>", &observation);
        assert!(report.contains("&lt;Script&gt;"));
    }
}
