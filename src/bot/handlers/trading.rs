use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::{info, warn};

use super::menu::MenuCreator;
use super::Origin;
use crate::api::TokenInfo;
use crate::bot::BotContext;
use crate::errors::Result;
use crate::trading::{TradeResult, TradeSide};
use crate::utils::{format_cro, format_market_cap, format_percentage, format_token_amount, format_usd, trend_marker};

/// Token card, buys and sells
pub struct TradingHandler;

impl TradingHandler {
    /// Fetch a token, make it the session's current token and show its card
    pub async fn show_token(bot: &Bot, origin: Origin, address: &str, ctx: &BotContext) -> Result<()> {
        let Some(info) = ctx.tokens.token_info(address).await? else {
            bot.send_message(origin.chat_id, "🔍 No Cronos trading pair found for that token.")
                .reply_markup(MenuCreator::back_home())
                .await?;
            return Ok(());
        };

        let verified = if ctx.abi.is_enabled() {
            match ctx.abi.is_verified(&info.address).await {
                Ok(verified) => Some(verified),
                Err(e) => {
                    warn!("ABI lookup failed for {}: {}", info.address, e);
                    None
                }
            }
        } else {
            None
        };

        let card = token_card(&info, verified);
        ctx.sessions
            .with_session(origin.user_id, |s| s.token_info = Some(info))
            .await;

        bot.send_message(origin.chat_id, card)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::token_menu(ctx.config.quick_buy_cro))
            .await?;
        Ok(())
    }

    pub async fn buy(bot: &Bot, origin: Origin, token: &TokenInfo, amount_cro: f64, ctx: &BotContext) -> Result<()> {
        let credentials = ctx.wallets.load_credentials(origin.user_id).await?;

        bot.send_message(
            origin.chat_id,
            format!(
                "⏳ Buying {} with {}...",
                token.symbol,
                format_cro(amount_cro, ctx.native_symbol())
            ),
        )
        .await?;

        let plan = ctx.swaps.plan_buy(&token.address, amount_cro).await?;
        let result = ctx.swaps.execute_buy(&credentials, &plan).await?;
        info!("User {} bought {} in {}", origin.user_id, token.symbol, result.tx_hash);

        let cro_usd = match ctx.cro_price.cro_usd_price().await {
            Ok(price) => price,
            Err(e) => {
                warn!("Falling back to pair-implied CRO price: {}", e);
                token.implied_native_usd().unwrap_or(0.0)
            }
        };
        if let Err(e) = ctx
            .portfolio
            .record_trade(origin.user_id, &credentials.address, token, amount_cro * cro_usd)
            .await
        {
            warn!("Failed to record buy for user {}: {}", origin.user_id, e);
        }

        Self::send_result(bot, origin, token, &result, ctx).await
    }

    pub async fn sell(bot: &Bot, origin: Origin, token: &TokenInfo, percentage: f64, ctx: &BotContext) -> Result<()> {
        let credentials = ctx.wallets.load_credentials(origin.user_id).await?;

        bot.send_message(
            origin.chat_id,
            format!("⏳ Selling {}% of your {}...", percentage, token.symbol),
        )
        .await?;

        let plan = ctx
            .swaps
            .plan_sell(&token.address, &credentials.address, percentage)
            .await?;
        let result = ctx.swaps.execute_sell(&credentials, &plan).await?;
        info!("User {} sold {}% of {} in {}", origin.user_id, percentage, token.symbol, result.tx_hash);

        let recorded = async {
            let released = ctx
                .portfolio
                .cost_released(origin.user_id, &token.address, percentage)
                .await?;
            ctx.portfolio
                .record_trade(origin.user_id, &credentials.address, token, -released)
                .await
        };
        if let Err(e) = recorded.await {
            warn!("Failed to record sell for user {}: {}", origin.user_id, e);
        }

        Self::send_result(bot, origin, token, &result, ctx).await
    }

    async fn send_result(
        bot: &Bot,
        origin: Origin,
        token: &TokenInfo,
        result: &TradeResult,
        ctx: &BotContext,
    ) -> Result<()> {
        let symbol = ctx.native_symbol();
        let (spent, received) = match result.side {
            TradeSide::Buy => (
                format_cro(result.amount_in, symbol),
                format!("{} {}", format_token_amount(result.expected_out), html::escape(&token.symbol)),
            ),
            TradeSide::Sell => (
                format!("{} {}", format_token_amount(result.amount_in), html::escape(&token.symbol)),
                format_cro(result.expected_out, symbol),
            ),
        };

        let mut text = format!(
            "✅ <b>{:?} confirmed</b>\n\n\
             Spent: {}\n\
             Expected: ~{}\n\n\
             <a href=\"{}\">Transaction</a>",
            result.side,
            spent,
            received,
            ctx.tx_url(&result.tx_hash),
        );
        if let Some(fee_tx) = &result.fee_tx_hash {
            text.push_str(&format!(" · <a href=\"{}\">Fee</a>", ctx.tx_url(fee_tx)));
        }

        bot.send_message(origin.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::token_menu(ctx.config.quick_buy_cro))
            .await?;
        Ok(())
    }
}

/// HTML token card
pub fn token_card(info: &TokenInfo, verified: Option<bool>) -> String {
    let change = |label: &str, pct: f64| format!("{} {} {}", trend_marker(pct), label, format_percentage(pct));

    let mut card = format!(
        "🪙 <b>{}</b> ({})\n{}\n\n\
         Price: {} | {:.8} CRO\n",
        html::escape(&info.name),
        html::escape(&info.symbol),
        html::code_inline(&info.address),
        format_usd(info.price_usd),
        info.price_native,
    );

    if let Some(mc) = info.market_cap_usd {
        card.push_str(&format!("Market cap: {}\n", format_market_cap(mc)));
    }
    if let Some(liquidity) = info.liquidity_usd {
        card.push_str(&format!("Liquidity: {}\n", format_usd(liquidity)));
    }

    card.push_str(&format!(
        "\n{}\n{}\n{}\n{}\n",
        change("5m", info.price_change.m5),
        change("1h", info.price_change.h1),
        change("6h", info.price_change.h6),
        change("24h", info.price_change.h24),
    ));

    match verified {
        Some(true) => card.push_str("\n✅ Verified contract\n"),
        Some(false) => card.push_str("\n⚠️ Unverified contract\n"),
        None => {}
    }

    if !info.pair_url.is_empty() {
        card.push_str(&format!("\n<a href=\"{}\">DexScreener</a>", html::escape(&info.pair_url)));
    }

    card
}
