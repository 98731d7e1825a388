//! # Translation Module
//!
//! Machine translation of upstream English text into the target language
//! through the public Google Translate endpoint.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::api_errors::ApiError;
use crate::localization::t_args;

const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// A text translation service
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, ApiError>;
}

/// Translate, rendering a failure as literal explanatory text
pub async fn translate_or_explain(translator: &dyn Translator, text: &str) -> String {
    match translator.translate(text).await {
        Ok(translated) => translated,
        Err(e) => t_args("translation-failed", &[("error", &e.to_string())]),
    }
}

/// Extract the translated text from a `translate_a/single` response
///
/// The body is a nested array whose first element holds one
/// `[translated, original, ...]` row per sentence.
pub fn parse_translation(body: &str) -> Result<String, ApiError> {
    let value: Value = serde_json::from_str(body)?;
    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Translation("unexpected response shape".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|row| row.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(ApiError::Translation("empty translation".to_string()));
    }
    Ok(translated)
}

/// Google Translate client
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    target_language: String,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, target_language: impl Into<String>) -> Self {
        Self {
            client,
            target_language: target_language.into(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Translation("empty text".to_string()));
        }
        debug!(chars = text.len(), target = %self.target_language, "Translating text");

        let response = self
            .client
            .get(TRANSLATE_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Translation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Translation(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Translation(e.to_string()))?;
        parse_translation(&body).map_err(|e| match e {
            ApiError::Translation(_) => e,
            other => ApiError::Translation(other.to_string()),
        })
    }
}
