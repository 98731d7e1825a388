//! Fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use infobot::api_errors::ApiError;
use infobot::bot::{CommandHandlers, EventDispatcher, ReplySink, TextFormat};
use infobot::cache::{Clock, ManualClock, ResponseCache};
use infobot::config::WeatherCacheConfig;
use infobot::dialogue::{ConversationId, DialogueStore};
use infobot::gateways::{ContentSource, NasaImage};
use infobot::translation::Translator;
use infobot::weather::{WeatherGateway, WeatherObservation, WeatherService};

#[derive(Clone, Debug, PartialEq)]
pub enum SentReply {
    Text {
        chat: ConversationId,
        body: String,
        format: TextFormat,
    },
    Photo {
        chat: ConversationId,
        url: String,
        caption: Option<String>,
    },
}

#[derive(Default)]
pub struct RecordingReplies {
    sent: Mutex<Vec<SentReply>>,
}

impl RecordingReplies {
    pub fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().unwrap().clone()
    }

    pub fn for_chat(&self, chat: ConversationId) -> Vec<SentReply> {
        self.sent()
            .into_iter()
            .filter(|reply| match reply {
                SentReply::Text { chat: c, .. } | SentReply::Photo { chat: c, .. } => *c == chat,
            })
            .collect()
    }

    pub fn last_text(&self, chat: ConversationId) -> Option<String> {
        self.for_chat(chat).into_iter().rev().find_map(|reply| match reply {
            SentReply::Text { body, .. } => Some(body),
            SentReply::Photo { .. } => None,
        })
    }
}

#[async_trait]
impl ReplySink for RecordingReplies {
    async fn send_text(&self, chat: ConversationId, body: &str, format: TextFormat) -> Result<()> {
        self.sent.lock().unwrap().push(SentReply::Text {
            chat,
            body: body.to_string(),
            format,
        });
        Ok(())
    }

    async fn send_photo(&self, chat: ConversationId, url: &str, caption: Option<&str>) -> Result<()> {
        self.sent.lock().unwrap().push(SentReply::Photo {
            chat,
            url: url.to_string(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }
}

pub fn observation(temperature: f64, description: &str) -> WeatherObservation {
    WeatherObservation {
        temperature,
        humidity: 55.0,
        pressure_hpa: 1000.0,
        description: description.to_string(),
    }
}

/// Gateway answering from a fixed table; unknown cities are not found
#[derive(Default)]
pub struct FakeWeather {
    responses: Mutex<HashMap<String, Result<WeatherObservation, ApiError>>>,
    pub calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn respond(&self, city: &str, result: Result<WeatherObservation, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(city.to_string(), result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherGateway for FakeWeather {
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(city)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::NotFound(city.to_string())))
    }
}

pub struct FakeContent {
    pub joke: Result<String, ApiError>,
    pub cat: Result<String, ApiError>,
    pub nasa: Result<NasaImage, ApiError>,
    pub dog: Result<String, ApiError>,
    pub chuck: Result<String, ApiError>,
    pub calls: AtomicUsize,
}

impl Default for FakeContent {
    fn default() -> Self {
        Self {
            joke: Ok("Why did the chicken cross the road?".to_string()),
            cat: Ok("https://cdn2.thecatapi.com/images/cat.jpg".to_string()),
            nasa: Ok(NasaImage {
                url: "https://apod.nasa.gov/apod/image/m31.jpg".to_string(),
                title: "Andromeda".to_string(),
                media_type: "image".to_string(),
            }),
            dog: Ok("https://images.dog.ceo/breeds/husky/dog.jpg".to_string()),
            chuck: Ok("Chuck Norris counted to infinity. Twice.".to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeContent {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record<T: Clone>(&self, value: &Result<T, ApiError>) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        value.clone()
    }
}

#[async_trait]
impl ContentSource for FakeContent {
    async fn random_joke(&self) -> Result<String, ApiError> {
        self.record(&self.joke)
    }

    async fn random_cat(&self) -> Result<String, ApiError> {
        self.record(&self.cat)
    }

    async fn random_nasa_image(&self) -> Result<NasaImage, ApiError> {
        self.record(&self.nasa)
    }

    async fn random_dog(&self) -> Result<String, ApiError> {
        self.record(&self.dog)
    }

    async fn chuck_norris_fact(&self) -> Result<String, ApiError> {
        self.record(&self.chuck)
    }
}

/// Prefixes text with `RU:` or fails when configured to
#[derive(Default)]
pub struct FakeTranslator {
    pub fail: bool,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<String, ApiError> {
        if self.fail {
            Err(ApiError::Translation("service unavailable".to_string()))
        } else {
            Ok(format!("RU: {text}"))
        }
    }
}

/// A dispatcher wired to fakes, with handles to inspect them
pub struct Harness {
    pub dispatcher: EventDispatcher,
    pub weather: Arc<FakeWeather>,
    pub content: Arc<FakeContent>,
    pub replies: Arc<RecordingReplies>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(FakeWeather::new(), FakeContent::default(), FakeTranslator::default())
    }

    pub fn build(weather: FakeWeather, content: FakeContent, translator: FakeTranslator) -> Self {
        let weather = Arc::new(weather);
        let content = Arc::new(content);
        let replies = Arc::new(RecordingReplies::default());
        let clock = Arc::new(ManualClock::new());

        let cache = ResponseCache::with_clock(
            &WeatherCacheConfig::default(),
            clock.clone() as Arc<dyn Clock>,
        );
        let service = WeatherService::new(weather.clone(), cache);
        let handlers = CommandHandlers::new(content.clone(), Arc::new(translator), replies.clone());
        let dispatcher =
            EventDispatcher::new(DialogueStore::new(), service, handlers, replies.clone());

        Self {
            dispatcher,
            weather,
            content,
            replies,
            clock,
        }
    }
}
