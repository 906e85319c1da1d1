use teloxide::utils::command::BotCommands;

use crate::session::UserCommand;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    #[command(description = "Main menu")]
    Home,

    #[command(description = "Look up a token by contract address")]
    Token,

    #[command(description = "Show your wallet")]
    Wallet,

    #[command(description = "Get help")]
    Help,
}

impl From<Command> for UserCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => UserCommand::Start,
            Command::Home => UserCommand::Home,
            Command::Token => UserCommand::Token,
            Command::Wallet => UserCommand::Wallet,
            Command::Help => UserCommand::Help,
        }
    }
}
