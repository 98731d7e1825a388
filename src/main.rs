use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;

use infobot::bot::{
    message_handler, BotUsername, Command, CommandHandlers, EventDispatcher, ReplySink,
    TelegramReplies,
};
use infobot::cache::ResponseCache;
use infobot::config::BotConfig;
use infobot::dialogue::{DialogueStore, WeatherDialogueStorage};
use infobot::gateways::PublicApis;
use infobot::logging::init_tracing;
use infobot::translation::GoogleTranslator;
use infobot::weather::{OpenWeatherClient, WeatherService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(&config.log)?;

    info!("Starting infobot");

    let http = reqwest::Client::builder()
        .timeout(config.http.request_timeout)
        .build()
        .context("failed to build HTTP client")?;

    let bot = Bot::new(&config.credentials.telegram_token);
    bot.set_my_commands(Command::bot_commands())
        .await
        .context("failed to register the command menu")?;
    let me = bot.get_me().await.context("failed to fetch bot identity")?;
    let username = BotUsername(me.username().to_string());

    let replies: Arc<dyn ReplySink> = Arc::new(TelegramReplies::new(bot.clone()));
    let weather = WeatherService::new(
        Arc::new(OpenWeatherClient::new(
            http.clone(),
            config.credentials.openweather_api_key.clone(),
            &config.http,
        )),
        ResponseCache::new(&config.cache),
    );
    let handlers = CommandHandlers::new(
        Arc::new(PublicApis::new(
            http.clone(),
            config.credentials.cat_api_key.clone(),
            config.credentials.nasa_api_key.clone(),
        )),
        Arc::new(GoogleTranslator::new(http, config.http.target_language.clone())),
        replies.clone(),
    );
    let dispatcher = Arc::new(EventDispatcher::new(
        DialogueStore::with_storage(WeatherDialogueStorage::new()),
        weather,
        handlers,
        replies,
    ));

    info!(username = %username.0, "Bot initialized, starting dispatcher");

    // Updates from one chat are processed in order, chats run concurrently
    let handler = Update::filter_message().endpoint({
        let dispatcher = Arc::clone(&dispatcher);
        move |msg: Message| {
            let dispatcher = Arc::clone(&dispatcher);
            let username = username.clone();
            async move { message_handler(msg, dispatcher, username).await }
        }
    });

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
