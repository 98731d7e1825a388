//! Outbound reply capability

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};

use crate::dialogue::ConversationId;

/// How a text reply should be rendered by the client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Sink for messages sent back to a conversation
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_text(&self, chat: ConversationId, body: &str, format: TextFormat) -> Result<()>;

    async fn send_photo(&self, chat: ConversationId, url: &str, caption: Option<&str>) -> Result<()>;
}

/// [`ReplySink`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramReplies {
    bot: Bot,
}

impl TelegramReplies {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReplySink for TelegramReplies {
    async fn send_text(&self, chat: ConversationId, body: &str, format: TextFormat) -> Result<()> {
        let request = self.bot.send_message(ChatId::from(chat), body);
        match format {
            TextFormat::Plain => request.await?,
            TextFormat::Html => request.parse_mode(ParseMode::Html).await?,
        };
        Ok(())
    }

    async fn send_photo(&self, chat: ConversationId, url: &str, caption: Option<&str>) -> Result<()> {
        let photo = InputFile::url(reqwest::Url::parse(url)?);
        let request = self.bot.send_photo(ChatId::from(chat), photo);
        match caption {
            Some(caption) if !caption.is_empty() => request.caption(caption).await?,
            _ => request.await?,
        };
        Ok(())
    }
}
