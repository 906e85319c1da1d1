use std::sync::Arc;
use teloxide::prelude::*;
use tracing::warn;

use super::{perform, Origin};
use crate::bot::BotContext;
use crate::session::{CallbackAction, IncomingMessage};

/// Inline keyboard presses
pub struct CallbackHandler;

impl CallbackHandler {
    pub async fn handle(bot: Bot, q: CallbackQuery, ctx: Arc<BotContext>) -> ResponseResult<()> {
        bot.answer_callback_query(q.id.clone()).await?;

        let user_id = q.from.id.0 as i64;
        if !ctx.config.is_user_allowed(&user_id.to_string()) {
            return Ok(());
        }

        let chat_id = match q.message {
            Some(ref m) => m.chat().id,
            None => ChatId(user_id),
        };

        let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
            warn!("Unknown callback data {:?} from user {}", q.data, user_id);
            return Ok(());
        };

        let origin = Origin {
            chat_id,
            user_id,
            message_id: None,
        };
        let action = ctx
            .sessions
            .dispatch(user_id, IncomingMessage::Callback(action), ctx.config.quick_buy_cro)
            .await;

        perform(&bot, origin, action, &ctx).await
    }
}
