use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use super::commands::Command;
use super::context::BotContext;
use super::handlers::{CallbackHandler, CommandHandler, TextMessageHandler};
use crate::errors::Result;

/// Long-polling Telegram front end
pub struct TelegramBot {
    context: Arc<BotContext>,
}

impl TelegramBot {
    pub fn new(context: Arc<BotContext>) -> Self {
        Self { context }
    }

    /// Run the dispatcher until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let bot = Bot::new(&self.context.config.telegram_bot_token);

        info!("🤖 Starting Telegram bot on {:?}...", self.context.config.network);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(CommandHandler::handle),
            )
            .branch(Update::filter_message().endpoint(TextMessageHandler::handle))
            .branch(Update::filter_callback_query().endpoint(CallbackHandler::handle));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![self.context.clone()])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram bot stopped");
        Ok(())
    }
}
