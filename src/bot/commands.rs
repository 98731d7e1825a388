//! Command surface exposed to users

use teloxide::utils::command::BotCommands;

/// Commands understood by the bot
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case")]
pub enum Command {
    #[command(description = "Начать работу с ботом")]
    Start,
    #[command(description = "Помощь по использованию бота")]
    Help,
    #[command(description = "Произвольная шутка")]
    Joke,
    #[command(description = "Произвольное фото кота")]
    Cat,
    #[command(description = "Произвольное изображение из космоса")]
    Nasa,
    #[command(description = "Произвольное фото собаки")]
    Dog,
    #[command(description = "Факт о Чаке Норрисе")]
    ChuckNorris,
    #[command(description = "Погода в выбранном городе")]
    Weather,
}

impl Command {
    /// Parse a message text, accepting the `/cmd@botname` form
    pub fn from_text(text: &str, bot_username: &str) -> Option<Self> {
        Self::parse(text.trim(), bot_username).ok()
    }

    /// Canonical message text of the command, e.g. `/chuck_norris`
    pub fn as_text(self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::Help => "/help",
            Command::Joke => "/joke",
            Command::Cat => "/cat",
            Command::Nasa => "/nasa",
            Command::Dog => "/dog",
            Command::ChuckNorris => "/chuck_norris",
            Command::Weather => "/weather",
        }
    }

    /// The one-shot form of this command; `None` for `/weather`, which opens a dialogue
    pub fn stateless(self) -> Option<StatelessCommand> {
        match self {
            Command::Start => Some(StatelessCommand::Start),
            Command::Help => Some(StatelessCommand::Help),
            Command::Joke => Some(StatelessCommand::Joke),
            Command::Cat => Some(StatelessCommand::Cat),
            Command::Nasa => Some(StatelessCommand::Nasa),
            Command::Dog => Some(StatelessCommand::Dog),
            Command::ChuckNorris => Some(StatelessCommand::ChuckNorris),
            Command::Weather => None,
        }
    }
}

/// Commands answered with exactly one reply and no dialogue state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatelessCommand {
    Start,
    Help,
    Joke,
    Cat,
    Nasa,
    Dog,
    ChuckNorris,
}

impl From<StatelessCommand> for Command {
    fn from(command: StatelessCommand) -> Self {
        match command {
            StatelessCommand::Start => Command::Start,
            StatelessCommand::Help => Command::Help,
            StatelessCommand::Joke => Command::Joke,
            StatelessCommand::Cat => Command::Cat,
            StatelessCommand::Nasa => Command::Nasa,
            StatelessCommand::Dog => Command::Dog,
            StatelessCommand::ChuckNorris => Command::ChuckNorris,
        }
    }
}
