use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use super::{perform, sender_id, Origin};
use crate::bot::{BotContext, Command};
use crate::session::IncomingMessage;

/// Entry point for slash commands
pub struct CommandHandler;

impl CommandHandler {
    pub async fn handle(bot: Bot, msg: Message, cmd: Command, ctx: Arc<BotContext>) -> ResponseResult<()> {
        let Some(user_id) = sender_id(&msg) else {
            return Ok(());
        };

        if !ctx.config.is_user_allowed(&user_id.to_string()) {
            bot.send_message(msg.chat.id, "⛔ Unauthorized access").await?;
            return Ok(());
        }

        info!("Processing command {:?} from user {}", cmd, user_id);

        let origin = Origin {
            chat_id: msg.chat.id,
            user_id,
            message_id: Some(msg.id),
        };
        let action = ctx
            .sessions
            .dispatch(user_id, IncomingMessage::Command(cmd.into()), ctx.config.quick_buy_cro)
            .await;

        perform(&bot, origin, action, &ctx).await
    }
}
