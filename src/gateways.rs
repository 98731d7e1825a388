//! # Content Gateways Module
//!
//! One-shot wrappers around the public APIs behind the stateless commands.
//! Each method performs a single outbound request and returns one field of
//! the response.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::api_errors::ApiError;

const JOKE_URL: &str = "https://v2.jokeapi.dev/joke/Any";
const CAT_URL: &str = "https://api.thecatapi.com/v1/images/search";
const NASA_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
const DOG_URL: &str = "https://dog.ceo/api/breeds/image/random";
const CHUCK_NORRIS_URL: &str = "https://api.chucknorris.io/jokes/random";

/// How far back a random astronomy picture may be taken from
pub const APOD_LOOKBACK_DAYS: i64 = 365;

/// Astronomy picture of the day
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NasaImage {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

fn default_media_type() -> String {
    "image".to_string()
}

impl NasaImage {
    pub fn is_image(&self) -> bool {
        self.media_type == "image"
    }
}

/// Upstream sources for the stateless commands
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn random_joke(&self) -> Result<String, ApiError>;
    async fn random_cat(&self) -> Result<String, ApiError>;
    async fn random_nasa_image(&self) -> Result<NasaImage, ApiError>;
    async fn random_dog(&self) -> Result<String, ApiError>;
    async fn chuck_norris_fact(&self) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JokePayload {
    Single { joke: String },
    Twopart { setup: String, delivery: String },
}

impl JokePayload {
    fn into_text(self) -> String {
        match self {
            JokePayload::Single { joke } => joke,
            JokePayload::Twopart { setup, delivery } => format!("{setup} - {delivery}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct DogPayload {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChuckNorrisPayload {
    value: String,
}

/// Parse a JokeAPI body into display text
pub fn parse_joke(body: &str) -> Result<String, ApiError> {
    let payload: JokePayload = serde_json::from_str(body)?;
    Ok(payload.into_text())
}

/// Parse a TheCatAPI search body into the first image URL
pub fn parse_cat(body: &str) -> Result<String, ApiError> {
    let images: Vec<CatImage> = serde_json::from_str(body)?;
    images
        .into_iter()
        .next()
        .map(|image| image.url)
        .ok_or_else(|| ApiError::NotFound("no cat images returned".to_string()))
}

/// Pick a uniformly random day within the last `APOD_LOOKBACK_DAYS` days
pub fn random_apod_date<R: Rng>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let offset = rng.gen_range(0..=APOD_LOOKBACK_DAYS);
    today - ChronoDuration::days(offset)
}

/// HTTP implementation of [`ContentSource`]
#[derive(Debug, Clone)]
pub struct PublicApis {
    client: reqwest::Client,
    cat_api_key: String,
    nasa_api_key: String,
}

impl PublicApis {
    pub fn new(client: reqwest::Client, cat_api_key: String, nasa_api_key: String) -> Self {
        Self {
            client,
            cat_api_key,
            nasa_api_key,
        }
    }

    async fn fetch_text(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.fetch_text(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentSource for PublicApis {
    async fn random_joke(&self) -> Result<String, ApiError> {
        debug!(url = JOKE_URL, "Fetching random joke");
        let body = self.fetch_text(self.client.get(JOKE_URL)).await?;
        parse_joke(&body)
    }

    async fn random_cat(&self) -> Result<String, ApiError> {
        debug!(url = CAT_URL, "Fetching random cat");
        let request = self
            .client
            .get(CAT_URL)
            .header("x-api-key", &self.cat_api_key);
        let body = self.fetch_text(request).await?;
        parse_cat(&body)
    }

    async fn random_nasa_image(&self) -> Result<NasaImage, ApiError> {
        let date = random_apod_date(&mut rand::thread_rng(), Utc::now().date_naive());
        let date = date.format("%Y-%m-%d").to_string();
        debug!(url = NASA_APOD_URL, date = %date, "Fetching astronomy picture");

        let request = self.client.get(NASA_APOD_URL).query(&[
            ("api_key", self.nasa_api_key.as_str()),
            ("date", date.as_str()),
        ]);
        self.fetch_json(request).await
    }

    async fn random_dog(&self) -> Result<String, ApiError> {
        debug!(url = DOG_URL, "Fetching random dog");
        let payload: DogPayload = self.fetch_json(self.client.get(DOG_URL)).await?;
        Ok(payload.message)
    }

    async fn chuck_norris_fact(&self) -> Result<String, ApiError> {
        debug!(url = CHUCK_NORRIS_URL, "Fetching Chuck Norris fact");
        let payload: ChuckNorrisPayload =
            self.fetch_json(self.client.get(CHUCK_NORRIS_URL)).await?;
        Ok(payload.value)
    }
}
