pub mod callback;
pub mod command;
pub mod menu;
pub mod portfolio;
pub mod text;
pub mod trading;
pub mod wallet;

pub use callback::CallbackHandler;
pub use command::CommandHandler;
pub use menu::MenuCreator;
pub use text::TextMessageHandler;
pub use trading::TradingHandler;
pub use wallet::WalletHandler;
pub use portfolio::PortfolioHandler;

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use tracing::{error, info};

use super::context::BotContext;
use crate::errors::{BotError, TradingError, WalletError};
use crate::session::{Action, Prompt, Rejection};

/// Where a message came from and where replies go
#[derive(Debug, Clone, Copy)]
pub struct Origin {
    pub chat_id: ChatId,
    pub user_id: i64,
    /// The user's own message, when there is one to clean up
    pub message_id: Option<MessageId>,
}

/// Telegram user behind a message. Channel posts have none and are ignored.
pub(crate) fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().map(|u| u.id.0 as i64)
}

/// Carry out what the state machine decided. All failures end as a reply.
pub async fn perform(bot: &Bot, origin: Origin, action: Action, ctx: &BotContext) -> ResponseResult<()> {
    info!("User {} -> {:?}", origin.user_id, action);

    let result = match action {
        Action::Welcome => WalletHandler::welcome(bot, origin, ctx).await,
        Action::ShowHome => MenuCreator::send_home(bot, origin.chat_id).await,
        Action::ShowHelp => MenuCreator::send_help(bot, origin.chat_id).await,
        Action::ShowWallet => WalletHandler::show_wallet(bot, origin, ctx).await,
        Action::CreateWallet => WalletHandler::create_wallet(bot, origin, ctx).await,
        Action::ImportWallet(phrase) => WalletHandler::import_wallet(bot, origin, phrase.expose(), ctx).await,
        Action::ShowPrivateKey => WalletHandler::show_private_key(bot, origin, ctx).await,
        Action::Prompt(prompt) => send_prompt(bot, origin.chat_id, prompt).await,
        Action::LookupToken(address) => TradingHandler::show_token(bot, origin, &address, ctx).await,
        Action::Buy { token, amount_cro } => TradingHandler::buy(bot, origin, &token, amount_cro, ctx).await,
        Action::Sell { token, percentage } => TradingHandler::sell(bot, origin, &token, percentage, ctx).await,
        Action::ShowHolding { index } => PortfolioHandler::show_holding(bot, origin, index, ctx).await,
        Action::Reject(rejection) => send_rejection(bot, origin.chat_id, rejection).await,
        Action::Unrecognized => {
            bot.send_message(origin.chat_id, "🤔 I didn't understand that. Use /home to open the menu.")
                .await?;
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Action failed for user {}: {}", origin.user_id, e);
        bot.send_message(origin.chat_id, failure_reply(&e)).await?;
    }

    Ok(())
}

async fn send_prompt(bot: &Bot, chat_id: ChatId, prompt: Prompt) -> crate::errors::Result<()> {
    let text = match prompt {
        Prompt::TokenAddress => "📋 Paste the token contract address (0x...).",
        Prompt::BuyAmount => "💰 How much CRO do you want to spend?",
        Prompt::SellAmount => "💸 What percentage of your balance do you want to sell? (1-100)",
        Prompt::Mnemonic => {
            "🔑 Send your 12 or 24 word recovery phrase.\n\nThe message will be deleted right after import."
        }
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

async fn send_rejection(bot: &Bot, chat_id: ChatId, rejection: Rejection) -> crate::errors::Result<()> {
    let text = match rejection {
        Rejection::InvalidAddress => "❌ That is not a valid contract address.",
        Rejection::InvalidAmount => "❌ Please enter a positive number.",
        Rejection::InvalidPercentage => "❌ Please enter a percentage between 0.01 and 100.",
        Rejection::InvalidMnemonic => "❌ That is not a valid recovery phrase.",
        Rejection::NoTokenSelected => "❌ No token selected. Use /token to pick one first.",
    };
    bot.send_message(chat_id, text)
        .reply_markup(MenuCreator::back_home())
        .await?;
    Ok(())
}

/// Fixed user-facing text for an error; details stay in the logs
pub fn failure_reply(error: &BotError) -> &'static str {
    match error {
        BotError::Wallet(WalletError::WalletNotFound) => "❌ You don't have a wallet yet. Use /start to create one.",
        BotError::Wallet(WalletError::WalletAlreadyExists) => "⚠️ You already have a wallet. Use /wallet to view it.",
        BotError::Wallet(WalletError::InvalidMnemonic) => "❌ That is not a valid recovery phrase.",
        BotError::Wallet(WalletError::AddressMismatch) => {
            "⛔ Stored wallet data is inconsistent. Please re-import your wallet."
        }
        BotError::Wallet(_) => "❌ Wallet operation failed.",
        BotError::Trading(TradingError::InsufficientBalance { .. }) => "❌ Insufficient balance for this trade.",
        BotError::Trading(TradingError::NoRoute { .. }) => "❌ No liquidity route for this token on VVS.",
        BotError::Trading(TradingError::UnprotectedSwap) => {
            "⛔ Trade too small to protect against slippage. Try a larger amount."
        }
        BotError::Trading(TradingError::InvalidAmount { .. } | TradingError::InvalidPercentage { .. }) => {
            "❌ Invalid trade amount."
        }
        BotError::Trading(TradingError::TransactionFailed(_)) => "❌ Transaction failed. No further action was taken.",
        BotError::ValidationError(_) => "❌ Invalid input.",
        _ => "❌ Something went wrong. Please try again later.",
    }
}
