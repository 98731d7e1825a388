//! Event dispatcher
//!
//! Single entry point for inbound chat events. Decides whether an event is a
//! command or the continuation of a pending weather dialogue and makes sure
//! at most one handler runs for it.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::api_errors::ApiError;
use crate::dialogue::{ConversationId, DialogueState, DialogueStore};
use crate::localization::t;
use crate::weather::WeatherService;

use super::commands::Command;
use super::handlers::CommandHandlers;
use super::reply::{ReplySink, TextFormat};
use super::ui_builder::{format_weather_not_found, format_weather_prompt};

/// What an inbound event carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A recognised command
    Command(Command),
    /// Anything else, including unrecognised `/commands`
    Text,
}

/// An inbound chat event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub conversation_id: ConversationId,
    /// First name of the sender, used to address them in replies
    pub sender_name: String,
    pub kind: EventKind,
    /// Message text as received
    pub text: String,
}

impl InboundEvent {
    pub fn command(conversation_id: ConversationId, sender_name: &str, command: Command) -> Self {
        Self::command_with_text(conversation_id, sender_name, command, command.as_text())
    }

    /// A command event that keeps the received text, e.g. `/joke@infobot`
    pub fn command_with_text(
        conversation_id: ConversationId,
        sender_name: &str,
        command: Command,
        text: &str,
    ) -> Self {
        Self {
            conversation_id,
            sender_name: sender_name.to_string(),
            kind: EventKind::Command(command),
            text: text.to_string(),
        }
    }

    pub fn text(conversation_id: ConversationId, sender_name: &str, text: &str) -> Self {
        Self {
            conversation_id,
            sender_name: sender_name.to_string(),
            kind: EventKind::Text,
            text: text.to_string(),
        }
    }
}

/// How an event was routed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A stateless command handler ran
    Command(Command),
    /// The weather prompt was sent and the dialogue is pending
    DialogueStarted,
    /// A pending weather dialogue received its city name and was closed
    DialogueCompleted,
    /// Nothing matched; no reply was sent
    Ignored,
}

/// Routes inbound events; owns the dialogue store and the weather flow
pub struct EventDispatcher {
    dialogues: DialogueStore,
    weather: WeatherService,
    handlers: CommandHandlers,
    replies: Arc<dyn ReplySink>,
}

impl EventDispatcher {
    pub fn new(
        dialogues: DialogueStore,
        weather: WeatherService,
        handlers: CommandHandlers,
        replies: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            dialogues,
            weather,
            handlers,
            replies,
        }
    }

    pub async fn dialogue_state(&self, id: ConversationId) -> Result<DialogueState> {
        self.dialogues.get(id).await
    }

    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }

    /// Handle one inbound event
    ///
    /// `/weather` always (re)starts the dialogue. While a city name is
    /// pending, any other message, commands included, is taken as the city.
    /// Only storage and reply delivery failures are returned as errors.
    pub async fn handle(&self, event: InboundEvent) -> Result<DispatchOutcome> {
        let id = event.conversation_id;

        let stateless = match event.kind {
            EventKind::Command(command) => match command.stateless() {
                Some(stateless) => Some((command, stateless)),
                None => {
                    info!(user_id = %id, "Starting weather dialogue");
                    self.start_weather_dialogue(id, &event.sender_name).await?;
                    return Ok(DispatchOutcome::DialogueStarted);
                }
            },
            EventKind::Text => None,
        };

        match (self.dialogues.get(id).await?, stateless) {
            (DialogueState::AwaitingCityName, _) => {
                self.continue_weather_dialogue(id, &event.sender_name, &event.text)
                    .await?;
                Ok(DispatchOutcome::DialogueCompleted)
            }
            (DialogueState::Idle, Some((command, stateless))) => {
                info!(user_id = %id, command = ?command, "Handling command");
                self.handlers
                    .handle(stateless, id, &event.sender_name)
                    .await?;
                Ok(DispatchOutcome::Command(command))
            }
            (DialogueState::Idle, None) => {
                debug!(user_id = %id, "Ignoring text outside of a dialogue");
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    async fn start_weather_dialogue(&self, id: ConversationId, first_name: &str) -> Result<()> {
        self.dialogues.set(id, DialogueState::AwaitingCityName).await?;
        self.replies
            .send_text(id, &format_weather_prompt(first_name), TextFormat::Html)
            .await
    }

    async fn continue_weather_dialogue(
        &self,
        id: ConversationId,
        first_name: &str,
        city: &str,
    ) -> Result<()> {
        info!(user_id = %id, city = %city.trim(), "Weather requested");

        let result = self.weather.resolve(city).await;
        // One attempt per prompt, whatever the outcome
        self.dialogues.clear(id).await?;

        let (body, format) = match result {
            Ok(report) => (report, TextFormat::Html),
            Err(ApiError::NotFound(_)) | Err(ApiError::Upstream { .. }) => (
                format_weather_not_found(first_name, city),
                TextFormat::Plain,
            ),
            Err(e) if e.is_network() => {
                warn!(user_id = %id, error = %e, "Weather service unreachable");
                (t("weather-unavailable"), TextFormat::Plain)
            }
            Err(e) => {
                error!(user_id = %id, error = %e, "Unusable weather response");
                (t("weather-unavailable"), TextFormat::Plain)
            }
        };
        self.replies.send_text(id, &body, format).await
    }
}
