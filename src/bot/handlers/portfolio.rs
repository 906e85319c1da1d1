use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::warn;

use super::menu::MenuCreator;
use super::Origin;
use crate::api::{PriceChange, TokenInfo};
use crate::bot::BotContext;
use crate::errors::{Result, WalletError};
use crate::portfolio::{Holding, Portfolio};
use crate::utils::{format_percentage, format_token_amount, format_usd, trend_marker};

/// Open positions browser
pub struct PortfolioHandler;

impl PortfolioHandler {
    /// Show the holding at `index`; the viewed token becomes the session's current token
    pub async fn show_holding(bot: &Bot, origin: Origin, index: usize, ctx: &BotContext) -> Result<()> {
        let wallet = ctx
            .wallets
            .get_user_wallet(origin.user_id)
            .await?
            .ok_or(WalletError::WalletNotFound)?;
        let portfolio = ctx.portfolio.fetch_portfolio(origin.user_id, &wallet.address).await?;

        let index = ctx
            .sessions
            .with_session(origin.user_id, |s| {
                s.current_token_index = index;
                s.set_total_tokens(portfolio.len());
                s.current_token_index
            })
            .await;

        let Some(holding) = portfolio.get_wrapped(index) else {
            bot.send_message(origin.chat_id, "📭 You have no open positions yet. Use /token to buy one.")
                .reply_markup(MenuCreator::back_home())
                .await?;
            return Ok(());
        };

        let token = match ctx.tokens.token_info(&holding.token_address).await {
            Ok(Some(info)) => info,
            Ok(None) => fallback_token_info(holding),
            Err(e) => {
                warn!("Token lookup failed for {}: {}", holding.token_address, e);
                fallback_token_info(holding)
            }
        };
        ctx.sessions
            .with_session(origin.user_id, |s| s.token_info = Some(token))
            .await;

        bot.send_message(origin.chat_id, holding_card(&portfolio, index))
            .parse_mode(ParseMode::Html)
            .reply_markup(MenuCreator::holding_menu())
            .await?;
        Ok(())
    }
}

fn fallback_token_info(holding: &Holding) -> TokenInfo {
    TokenInfo {
        address: holding.token_address.clone(),
        name: holding.symbol.clone(),
        symbol: holding.symbol.clone(),
        price_native: 0.0,
        price_usd: holding.price_usd,
        market_cap_usd: None,
        liquidity_usd: None,
        pair_url: String::new(),
        dex_id: String::new(),
        price_change: PriceChange::default(),
    }
}

pub fn holding_card(portfolio: &Portfolio, index: usize) -> String {
    let Some(holding) = portfolio.get_wrapped(index) else {
        return String::new();
    };

    format!(
        "📊 <b>Open Positions</b> ({}/{})\n\n\
         <b>{}</b>\n{}\n\n\
         Balance: {}\n\
         Price: {}\n\
         Value: {}\n\
         Cost: {}\n\
         {} PNL: {} ({})\n\n\
         Total value: {} | Total PNL: {}",
        index % portfolio.len() + 1,
        portfolio.len(),
        html::escape(&holding.symbol),
        html::code_inline(&holding.token_address),
        format_token_amount(holding.balance),
        format_usd(holding.price_usd),
        format_usd(holding.value_usd),
        format_usd(holding.cost_usd),
        trend_marker(holding.pnl_usd),
        format_usd(holding.pnl_usd.abs()),
        format_percentage(holding.pnl_percentage),
        format_usd(portfolio.total_value_usd),
        format_percentage(portfolio.total_pnl_percentage()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_card_pages() {
        let portfolio = Portfolio::new(vec![
            Holding::new("0xa".into(), "AAA".into(), 10.0, 2.0, 10.0),
            Holding::new("0xb".into(), "BBB".into(), 5.0, 1.0, 10.0),
        ]);

        let first = holding_card(&portfolio, 0);
        assert!(first.contains("(1/2)"));
        assert!(first.contains("AAA"));
        assert!(first.contains("+100.00%"));

        let second = holding_card(&portfolio, 1);
        assert!(second.contains("(2/2)"));
        assert!(second.contains("🔴"));
    }

    #[test]
    fn test_empty_portfolio_has_no_card() {
        assert!(holding_card(&Portfolio::default(), 0).is_empty());
    }
}
