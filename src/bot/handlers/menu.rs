use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::utils::command::BotCommands;

use crate::bot::Command;
use crate::constants::QUICK_SELL_PERCENTAGES;
use crate::errors::Result;
use crate::session::CallbackAction;

fn button(text: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.data())
}

fn quick_sell_row() -> Vec<InlineKeyboardButton> {
    QUICK_SELL_PERCENTAGES
        .iter()
        .map(|&pct| button(&format!("Sell {}%", pct), CallbackAction::SellPercent(pct)))
        .collect()
}

/// Inline keyboards and the static screens built on them
pub struct MenuCreator;

impl MenuCreator {
    pub fn home_menu() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![button("🔍 Token Lookup", CallbackAction::PasteToken)],
            vec![
                button("📊 Open Positions", CallbackAction::OpenPositions),
                button("💼 Wallet", CallbackAction::Wallet),
            ],
            vec![button("📚 Help", CallbackAction::Help)],
        ])
    }

    pub fn welcome_menu() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![button("🆕 Create Wallet", CallbackAction::CreateWallet)],
            vec![button("📥 Import Wallet", CallbackAction::ImportWallet)],
        ])
    }

    pub fn wallet_menu() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![
                button("📊 Open Positions", CallbackAction::OpenPositions),
                button("🔑 Private Key", CallbackAction::ShowPrivateKey),
            ],
            vec![button("📥 Import Another Wallet", CallbackAction::ImportWallet)],
            vec![button("🏠 Home", CallbackAction::Home)],
        ])
    }

    /// Buttons under a token card
    pub fn token_menu(quick_buy_cro: f64) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![
                button(&format!("⚡ Buy {} CRO", quick_buy_cro), CallbackAction::BuyQuick),
                button("💰 Buy X CRO", CallbackAction::BuyToken),
            ],
            quick_sell_row(),
            vec![button("💸 Sell X %", CallbackAction::SellCustom)],
            vec![
                button("🔄 Refresh", CallbackAction::Refresh),
                button("🏠 Home", CallbackAction::Home),
            ],
        ])
    }

    /// Buttons under a holding in the positions browser
    pub fn holding_menu() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![
                button("⬅️ Prev", CallbackAction::PrevToken),
                button("🔄 Refresh", CallbackAction::OpenPositions),
                button("Next ➡️", CallbackAction::NextToken),
            ],
            quick_sell_row(),
            vec![
                button("💸 Sell X %", CallbackAction::SellCustom),
                button("🏠 Home", CallbackAction::Home),
            ],
        ])
    }

    pub fn back_home() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![vec![button("🏠 Home", CallbackAction::Home)]])
    }

    pub async fn send_home(bot: &Bot, chat_id: ChatId) -> Result<()> {
        let text = "🏠 <b>Cronos Trading Bot</b>\n\n\
                    Look up any Cronos token by contract address, trade it on VVS Finance \
                    and follow your open positions.";
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(Self::home_menu())
            .await?;
        Ok(())
    }

    pub async fn send_help(bot: &Bot, chat_id: ChatId) -> Result<()> {
        let text = format!(
            "📚 <b>Help</b>\n\n{}\n\n\
             <b>Trading</b>\n\
             1. Use /token and paste a contract address\n\
             2. Buy with CRO or sell a share of your balance from the token card\n\
             3. Follow results under 📊 Open Positions",
            teloxide::utils::html::escape(&Command::descriptions().to_string())
        );
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(Self::back_home())
            .await?;
        Ok(())
    }
}
