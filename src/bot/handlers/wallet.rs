use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::{info, warn};

use super::menu::MenuCreator;
use super::Origin;
use crate::bot::BotContext;
use crate::chain::from_base_units;
use crate::errors::{Result, WalletError};
use crate::utils::{format_cro, format_usd};

/// Wallet screens: creation, import, balance and key reveal
pub struct WalletHandler;

impl WalletHandler {
    /// `/start`: home for known users, create/import choice for new ones
    pub async fn welcome(bot: &Bot, origin: Origin, ctx: &BotContext) -> Result<()> {
        if ctx.wallets.get_user_wallet(origin.user_id).await?.is_some() {
            return MenuCreator::send_home(bot, origin.chat_id).await;
        }

        let text = "👋 <b>Welcome to the Cronos Trading Bot</b>\n\n\
                    Create a new wallet or import one you already have to start trading.";
        bot.send_message(origin.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::welcome_menu())
            .await?;
        Ok(())
    }

    pub async fn show_wallet(bot: &Bot, origin: Origin, ctx: &BotContext) -> Result<()> {
        let wallet = ctx
            .wallets
            .get_user_wallet(origin.user_id)
            .await?
            .ok_or(WalletError::WalletNotFound)?;

        let owner = wallet
            .address
            .parse()
            .map_err(|_| WalletError::InvalidAddress(wallet.address.clone()))?;
        let balance = from_base_units(ctx.chain.native_balance(owner).await?, 18)?;

        let usd_line = match ctx.cro_price.cro_usd_price().await {
            Ok(price) => format!("\nValue: {}", format_usd(balance * price)),
            Err(e) => {
                warn!("CRO price unavailable: {}", e);
                String::new()
            }
        };

        let text = format!(
            "💼 <b>Your Wallet</b>\n\n\
             Address: {}\n\
             Balance: {}{}\n\n\
             <a href=\"{}\">View on explorer</a>",
            html::code_inline(&wallet.address),
            format_cro(balance, ctx.native_symbol()),
            usd_line,
            ctx.address_url(&wallet.address),
        );

        bot.send_message(origin.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::wallet_menu())
            .await?;
        Ok(())
    }

    pub async fn create_wallet(bot: &Bot, origin: Origin, ctx: &BotContext) -> Result<()> {
        let credentials = ctx.wallets.create_wallet(origin.user_id).await?;
        let phrase = credentials.mnemonic.as_deref().unwrap_or_default();

        let text = format!(
            "✅ <b>Wallet created</b>\n\n\
             Address: {}\n\n\
             Recovery phrase (tap to reveal):\n<tg-spoiler>{}</tg-spoiler>\n\n\
             ⚠️ Write it down and delete this message. Anyone with the phrase controls the funds.",
            html::code_inline(&credentials.address),
            html::escape(phrase),
        );

        bot.send_message(origin.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::home_menu())
            .await?;
        Ok(())
    }

    pub async fn import_wallet(bot: &Bot, origin: Origin, phrase: &str, ctx: &BotContext) -> Result<()> {
        if let Some(message_id) = origin.message_id {
            if let Err(e) = bot.delete_message(origin.chat_id, message_id).await {
                warn!("Could not delete recovery phrase message: {}", e);
            }
        }

        let wallet = ctx.wallets.import_wallet(origin.user_id, phrase).await?;
        info!("User {} imported a wallet", origin.user_id);

        let text = format!(
            "✅ <b>Wallet imported</b>\n\nAddress: {}",
            html::code_inline(&wallet.address)
        );
        bot.send_message(origin.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::home_menu())
            .await?;
        Ok(())
    }

    pub async fn show_private_key(bot: &Bot, origin: Origin, ctx: &BotContext) -> Result<()> {
        let credentials = ctx.wallets.load_credentials(origin.user_id).await?;
        info!("Revealing private key to user {}", origin.user_id);

        let text = format!(
            "🔑 <b>Private key</b> (tap to reveal)\n\n<tg-spoiler>{}</tg-spoiler>\n\n\
             ⚠️ Never share it. Delete this message once saved.",
            html::escape(&credentials.private_key),
        );
        bot.send_message(origin.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::back_home())
            .await?;
        Ok(())
    }
}
