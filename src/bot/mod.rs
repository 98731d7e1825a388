//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: the user-facing command surface
//! - `dispatcher`: routes inbound events to commands or the weather dialogue
//! - `handlers`: stateless command handlers
//! - `reply`: outbound reply sink and its Telegram implementation
//! - `telegram`: converts teloxide messages into inbound events
//! - `ui_builder`: formats static messages

pub mod commands;
pub mod dispatcher;
pub mod handlers;
pub mod reply;
pub mod telegram;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use commands::{Command, StatelessCommand};
pub use dispatcher::{DispatchOutcome, EventDispatcher, EventKind, InboundEvent};
pub use handlers::CommandHandlers;
pub use reply::{ReplySink, TelegramReplies, TextFormat};
pub use telegram::{message_handler, BotUsername};
