//! Weather dialogue module for tracking per-conversation state.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{InMemStorage, Storage};
use teloxide::types::ChatId;

/// Stable identifier of a single chat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl From<ChatId> for ConversationId {
    fn from(chat_id: ChatId) -> Self {
        ConversationId(chat_id.0)
    }
}

impl From<ConversationId> for ChatId {
    fn from(id: ConversationId) -> Self {
        ChatId(id.0)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the conversation state for the weather dialogue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueState {
    #[default]
    Idle,
    AwaitingCityName,
}

/// Weather dialogue storage, one entry per chat
pub type WeatherDialogueStorage = InMemStorage<DialogueState>;

/// Per-conversation dialogue state over teloxide's in-memory dialogue storage
///
/// Absent conversations read as `Idle`; clearing removes the entry.
#[derive(Clone)]
pub struct DialogueStore {
    storage: Arc<WeatherDialogueStorage>,
}

impl DialogueStore {
    pub fn new() -> Self {
        Self::with_storage(InMemStorage::new())
    }

    pub fn with_storage(storage: Arc<WeatherDialogueStorage>) -> Self {
        Self { storage }
    }

    pub async fn get(&self, id: ConversationId) -> Result<DialogueState> {
        let state = self.storage.clone().get_dialogue(id.into()).await?;
        Ok(state.unwrap_or_default())
    }

    pub async fn set(&self, id: ConversationId, state: DialogueState) -> Result<()> {
        self.storage.clone().update_dialogue(id.into(), state).await?;
        Ok(())
    }

    pub async fn clear(&self, id: ConversationId) -> Result<()> {
        // Removing a missing dialogue is an error in InMemStorage
        if self.storage.clone().get_dialogue(id.into()).await?.is_some() {
            self.storage.clone().remove_dialogue(id.into()).await?;
        }
        Ok(())
    }
}

impl Default for DialogueStore {
    fn default() -> Self {
        Self::new()
    }
}
