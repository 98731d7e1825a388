//! Stateless command handlers
//!
//! Each handler makes one gateway call, optionally translates the text, and
//! sends exactly one reply. Gateway failures become a text reply carrying
//! the error detail; they never escape the handler.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::api_errors::ApiError;
use crate::dialogue::ConversationId;
use crate::gateways::ContentSource;
use crate::localization::t_args;
use crate::translation::{translate_or_explain, Translator};

use super::commands::StatelessCommand;
use super::reply::{ReplySink, TextFormat};
use super::ui_builder::{format_help_message, format_start_message};

fn failure_text(key: &str, error: &ApiError) -> String {
    t_args(key, &[("error", &error.to_string())])
}

/// Handlers for every command that does not open a dialogue
pub struct CommandHandlers {
    content: Arc<dyn ContentSource>,
    translator: Arc<dyn Translator>,
    replies: Arc<dyn ReplySink>,
}

impl CommandHandlers {
    pub fn new(
        content: Arc<dyn ContentSource>,
        translator: Arc<dyn Translator>,
        replies: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            content,
            translator,
            replies,
        }
    }

    /// Run the handler for `command`
    pub async fn handle(
        &self,
        command: StatelessCommand,
        chat: ConversationId,
        first_name: &str,
    ) -> Result<()> {
        match command {
            StatelessCommand::Start => self.send_start(chat, first_name).await,
            StatelessCommand::Help => self.send_help(chat).await,
            StatelessCommand::Joke => self.send_joke(chat).await,
            StatelessCommand::Cat => self.send_cat(chat).await,
            StatelessCommand::Nasa => self.send_nasa_image(chat).await,
            StatelessCommand::Dog => self.send_dog(chat).await,
            StatelessCommand::ChuckNorris => self.send_chuck_norris_fact(chat).await,
        }
    }

    async fn send_text(&self, chat: ConversationId, body: &str) -> Result<()> {
        self.replies.send_text(chat, body, TextFormat::Plain).await
    }

    async fn send_start(&self, chat: ConversationId, first_name: &str) -> Result<()> {
        self.replies
            .send_text(chat, &format_start_message(first_name), TextFormat::Html)
            .await
    }

    async fn send_help(&self, chat: ConversationId) -> Result<()> {
        self.replies
            .send_text(chat, &format_help_message(), TextFormat::Html)
            .await
    }

    async fn send_joke(&self, chat: ConversationId) -> Result<()> {
        let text = match self.content.random_joke().await {
            Ok(joke) => translate_or_explain(self.translator.as_ref(), &joke).await,
            Err(e) => {
                warn!(user_id = %chat, error = %e, "Joke lookup failed");
                failure_text("joke-failed", &e)
            }
        };
        self.send_text(chat, &text).await
    }

    async fn send_cat(&self, chat: ConversationId) -> Result<()> {
        match self.content.random_cat().await {
            Ok(url) => self.replies.send_photo(chat, &url, None).await,
            Err(e) => {
                warn!(user_id = %chat, error = %e, "Cat lookup failed");
                self.send_text(chat, &failure_text("cat-failed", &e)).await
            }
        }
    }

    async fn send_nasa_image(&self, chat: ConversationId) -> Result<()> {
        match self.content.random_nasa_image().await {
            Ok(image) if image.is_image() => {
                self.replies
                    .send_photo(chat, &image.url, Some(image.title.as_str()))
                    .await
            }
            Ok(image) => {
                debug!(user_id = %chat, media_type = %image.media_type, "Astronomy picture is not an image");
                let text = t_args("nasa-video", &[("title", &image.title), ("url", &image.url)]);
                self.send_text(chat, &text).await
            }
            Err(e) => {
                warn!(user_id = %chat, error = %e, "Astronomy picture lookup failed");
                self.send_text(chat, &failure_text("nasa-failed", &e)).await
            }
        }
    }

    async fn send_dog(&self, chat: ConversationId) -> Result<()> {
        match self.content.random_dog().await {
            Ok(url) => self.replies.send_photo(chat, &url, None).await,
            Err(e) => {
                warn!(user_id = %chat, error = %e, "Dog lookup failed");
                self.send_text(chat, &failure_text("dog-failed", &e)).await
            }
        }
    }

    async fn send_chuck_norris_fact(&self, chat: ConversationId) -> Result<()> {
        let text = match self.content.chuck_norris_fact().await {
            Ok(fact) => translate_or_explain(self.translator.as_ref(), &fact).await,
            Err(e) => {
                warn!(user_id = %chat, error = %e, "Chuck Norris fact lookup failed");
                failure_text("chuck-norris-failed", &e)
            }
        };
        self.send_text(chat, &text).await
    }
}
