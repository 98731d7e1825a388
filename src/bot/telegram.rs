//! Telegram adapter: turns teloxide messages into inbound events

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use crate::dialogue::ConversationId;

use super::commands::Command;
use super::dispatcher::{EventDispatcher, InboundEvent};

/// Username the bot answers to in `/cmd@name` commands
#[derive(Clone, Debug)]
pub struct BotUsername(pub String);

/// Build an event from a message text
pub fn event_from_text(
    conversation_id: ConversationId,
    sender_name: &str,
    text: &str,
    bot_username: &str,
) -> InboundEvent {
    match Command::from_text(text, bot_username) {
        Some(command) => {
            InboundEvent::command_with_text(conversation_id, sender_name, command, text)
        }
        None => InboundEvent::text(conversation_id, sender_name, text),
    }
}

/// Build an event from a Telegram message; non-text messages yield `None`
pub fn inbound_event(msg: &Message, bot_username: &str) -> Option<InboundEvent> {
    let text = msg.text()?;
    let sender_name = msg
        .from
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or_default();

    Some(event_from_text(
        ConversationId::from(msg.chat.id),
        sender_name,
        text,
        bot_username,
    ))
}

/// dptree endpoint for every message update
pub async fn message_handler(
    msg: Message,
    dispatcher: Arc<EventDispatcher>,
    username: BotUsername,
) -> Result<()> {
    match inbound_event(&msg, &username.0) {
        Some(event) => {
            dispatcher.handle(event).await?;
        }
        None => {
            debug!(user_id = %msg.chat.id, "Ignoring non-text message");
        }
    }
    Ok(())
}
