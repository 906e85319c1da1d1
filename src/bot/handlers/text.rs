use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::{perform, sender_id, Origin};
use crate::bot::BotContext;
use crate::session::IncomingMessage;

/// Free-text messages: answers to whatever the bot last asked for
pub struct TextMessageHandler;

impl TextMessageHandler {
    pub async fn handle(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
        let Some(user_id) = sender_id(&msg) else {
            return Ok(());
        };

        if !ctx.config.is_user_allowed(&user_id.to_string()) {
            return Ok(());
        }

        let Some(text) = msg.text() else {
            debug!("Ignoring non-text message from user {}", user_id);
            return Ok(());
        };

        let origin = Origin {
            chat_id: msg.chat.id,
            user_id,
            message_id: Some(msg.id),
        };
        let action = ctx
            .sessions
            .dispatch(user_id, IncomingMessage::Text(text.to_string()), ctx.config.quick_buy_cro)
            .await;

        perform(&bot, origin, action, &ctx).await
    }
}
