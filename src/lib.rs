//! # Infobot
//!
//! A Telegram bot that puts several public web APIs (jokes, cat, dog and
//! space pictures, Chuck Norris facts, weather) behind one chat interface,
//! translating English payloads before presenting them.

pub mod api_errors;
pub mod bot;
pub mod cache;
pub mod config;
pub mod dialogue;
pub mod gateways;
pub mod localization;
pub mod logging;
pub mod translation;
pub mod weather;
