use std::fmt;

use super::state::{Awaiting, UserSession};
use crate::api::TokenInfo;
use crate::constants::QUICK_SELL_PERCENTAGES;
use crate::utils::Validator;

/// Slash commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Home,
    Token,
    Wallet,
    Help,
}

/// Inline keyboard buttons, keyed by their callback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    CreateWallet,
    ImportWallet,
    Home,
    Wallet,
    Help,
    PasteToken,
    BuyToken,
    BuyQuick,
    SellCustom,
    SellPercent(u8),
    OpenPositions,
    PrevToken,
    NextToken,
    ShowPrivateKey,
    Refresh,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "create_wallet" => Self::CreateWallet,
            "import_wallet" => Self::ImportWallet,
            "home" => Self::Home,
            "wallet" => Self::Wallet,
            "help" => Self::Help,
            "paste_token" => Self::PasteToken,
            "buy_token" => Self::BuyToken,
            "buy_quick" => Self::BuyQuick,
            "sell_custom" => Self::SellCustom,
            "open_positions" => Self::OpenPositions,
            "prev_token" => Self::PrevToken,
            "next_token" => Self::NextToken,
            "show_private_key" => Self::ShowPrivateKey,
            "refresh" => Self::Refresh,
            other => {
                let percentage = other.strip_prefix("sell_")?.parse::<u8>().ok()?;
                let action = Self::SellPercent(percentage);
                if !QUICK_SELL_PERCENTAGES.contains(&percentage) || action.data() != other {
                    return None;
                }
                action
            }
        };
        Some(action)
    }

    pub fn data(&self) -> String {
        let data = match self {
            Self::CreateWallet => "create_wallet",
            Self::ImportWallet => "import_wallet",
            Self::Home => "home",
            Self::Wallet => "wallet",
            Self::Help => "help",
            Self::PasteToken => "paste_token",
            Self::BuyToken => "buy_token",
            Self::BuyQuick => "buy_quick",
            Self::SellCustom => "sell_custom",
            Self::SellPercent(percentage) => return format!("sell_{}", percentage),
            Self::OpenPositions => "open_positions",
            Self::PrevToken => "prev_token",
            Self::NextToken => "next_token",
            Self::ShowPrivateKey => "show_private_key",
            Self::Refresh => "refresh",
        };
        data.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    Command(UserCommand),
    Callback(CallbackAction),
    Text(String),
}

/// Recovery phrase moving from the chat to the wallet importer
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(String);

impl Mnemonic {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mnemonic([REDACTED])")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    TokenAddress,
    BuyAmount,
    SellAmount,
    Mnemonic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidAddress,
    InvalidAmount,
    InvalidPercentage,
    InvalidMnemonic,
    NoTokenSelected,
}

/// What the bot layer should do in response to one message
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Welcome,
    ShowHome,
    ShowWallet,
    ShowHelp,
    CreateWallet,
    Prompt(Prompt),
    LookupToken(String),
    Buy { token: TokenInfo, amount_cro: f64 },
    Sell { token: TokenInfo, percentage: f64 },
    ImportWallet(Mnemonic),
    ShowHolding { index: usize },
    ShowPrivateKey,
    Reject(Rejection),
    Unrecognized,
}

/// Advance the conversation for one message. Pure: touches nothing but `session`.
pub fn dispatch(session: &mut UserSession, message: IncomingMessage, quick_buy_cro: f64) -> Action {
    match message {
        IncomingMessage::Command(command) => {
            session.clear_awaiting();
            on_command(session, command)
        }
        IncomingMessage::Callback(action) => on_callback(session, action, quick_buy_cro),
        IncomingMessage::Text(text) => on_text(session, &text),
    }
}

fn on_command(session: &mut UserSession, command: UserCommand) -> Action {
    match command {
        UserCommand::Start => Action::Welcome,
        UserCommand::Home => Action::ShowHome,
        UserCommand::Wallet => Action::ShowWallet,
        UserCommand::Help => Action::ShowHelp,
        UserCommand::Token => prompt(session, Awaiting::TokenAddress),
    }
}

fn on_callback(session: &mut UserSession, action: CallbackAction, quick_buy_cro: f64) -> Action {
    match action {
        CallbackAction::CreateWallet => Action::CreateWallet,
        CallbackAction::ImportWallet => prompt(session, Awaiting::Mnemonic),
        CallbackAction::Home => Action::ShowHome,
        CallbackAction::Wallet => Action::ShowWallet,
        CallbackAction::Help => Action::ShowHelp,
        CallbackAction::PasteToken => prompt(session, Awaiting::TokenAddress),
        CallbackAction::BuyToken if session.token_info.is_some() => prompt(session, Awaiting::BuyAmount),
        CallbackAction::BuyQuick => match &session.token_info {
            Some(token) => Action::Buy {
                token: token.clone(),
                amount_cro: quick_buy_cro,
            },
            None => Action::Reject(Rejection::NoTokenSelected),
        },
        CallbackAction::SellCustom if session.token_info.is_some() => prompt(session, Awaiting::SellAmount),
        CallbackAction::SellPercent(percentage) => match &session.token_info {
            Some(token) => Action::Sell {
                token: token.clone(),
                percentage: percentage as f64,
            },
            None => Action::Reject(Rejection::NoTokenSelected),
        },
        CallbackAction::BuyToken | CallbackAction::SellCustom => {
            Action::Reject(Rejection::NoTokenSelected)
        }
        CallbackAction::OpenPositions => Action::ShowHolding {
            index: session.first_holding(),
        },
        CallbackAction::NextToken => Action::ShowHolding {
            index: session.next_holding(),
        },
        CallbackAction::PrevToken => Action::ShowHolding {
            index: session.prev_holding(),
        },
        CallbackAction::ShowPrivateKey => Action::ShowPrivateKey,
        CallbackAction::Refresh => match &session.token_info {
            Some(token) => Action::LookupToken(token.address.clone()),
            None => Action::ShowHome,
        },
    }
}

fn prompt(session: &mut UserSession, awaiting: Awaiting) -> Action {
    session.expect(awaiting);
    Action::Prompt(match awaiting {
        Awaiting::TokenAddress => Prompt::TokenAddress,
        Awaiting::BuyAmount => Prompt::BuyAmount,
        Awaiting::SellAmount => Prompt::SellAmount,
        Awaiting::Mnemonic => Prompt::Mnemonic,
    })
}

fn on_text(session: &mut UserSession, text: &str) -> Action {
    let Some(awaiting) = session.awaiting() else {
        return Action::Unrecognized;
    };
    // one message per prompt, valid or not
    session.clear(awaiting);

    match awaiting {
        Awaiting::TokenAddress => match Validator::validate_contract_address(text) {
            Ok(address) => Action::LookupToken(address),
            Err(_) => Action::Reject(Rejection::InvalidAddress),
        },
        Awaiting::BuyAmount => {
            let Some(token) = session.token_info.clone() else {
                return Action::Reject(Rejection::NoTokenSelected);
            };
            match Validator::parse_amount(text) {
                Ok(amount_cro) => Action::Buy { token, amount_cro },
                Err(_) => Action::Reject(Rejection::InvalidAmount),
            }
        }
        Awaiting::SellAmount => {
            let Some(token) = session.token_info.clone() else {
                return Action::Reject(Rejection::NoTokenSelected);
            };
            match Validator::parse_percentage(text) {
                Ok(percentage) => Action::Sell { token, percentage },
                Err(_) => Action::Reject(Rejection::InvalidPercentage),
            }
        }
        Awaiting::Mnemonic => match Validator::normalize_mnemonic(text) {
            Ok(phrase) => Action::ImportWallet(Mnemonic(phrase)),
            Err(_) => Action::Reject(Rejection::InvalidMnemonic),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PriceChange;
    use pretty_assertions::assert_eq;

    const TOKEN: &str = "0x2D03bECE6747ADC00E1a131BBA1469C15fD11e03";
    const QUICK: f64 = 1_000.0;

    fn vvs() -> TokenInfo {
        TokenInfo {
            address: TOKEN.into(),
            name: "VVS Finance".into(),
            symbol: "VVS".into(),
            price_native: 0.05,
            price_usd: 0.005,
            market_cap_usd: Some(1_000_000.0),
            liquidity_usd: None,
            pair_url: String::new(),
            dex_id: "vvsfinance".into(),
            price_change: PriceChange::default(),
        }
    }

    fn text(s: &str) -> IncomingMessage {
        IncomingMessage::Text(s.to_string())
    }

    fn callback(action: CallbackAction) -> IncomingMessage {
        IncomingMessage::Callback(action)
    }

    #[test]
    fn test_callback_data_round_trip() {
        for data in [
            "create_wallet", "import_wallet", "home", "wallet", "help", "paste_token",
            "buy_token", "buy_quick", "sell_custom", "sell_25", "sell_50", "sell_100",
            "open_positions", "prev_token", "next_token", "show_private_key", "refresh",
        ] {
            let action = CallbackAction::parse(data).unwrap();
            assert_eq!(action.data(), data);
        }
        assert_eq!(CallbackAction::parse("sell_75"), None);
        assert_eq!(CallbackAction::parse("sell_+25"), None);
        assert_eq!(CallbackAction::parse("sell_"), None);
    }

    #[test]
    fn test_paste_token_then_valid_address() {
        let mut session = UserSession::new();
        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::PasteToken), QUICK),
            Action::Prompt(Prompt::TokenAddress)
        );
        assert_eq!(
            dispatch(&mut session, text(&format!("  {}  ", TOKEN)), QUICK),
            Action::LookupToken(TOKEN.to_string())
        );
        assert_eq!(session.awaiting(), None);
    }

    #[test]
    fn test_bad_address_clears_flag_and_rejects() {
        let mut session = UserSession::new();
        dispatch(&mut session, callback(CallbackAction::PasteToken), QUICK);

        assert_eq!(
            dispatch(&mut session, text("hello"), QUICK),
            Action::Reject(Rejection::InvalidAddress)
        );
        assert!(!session.expecting_token_address);
        // no retry in place
        assert_eq!(dispatch(&mut session, text(TOKEN), QUICK), Action::Unrecognized);
    }

    #[test]
    fn test_free_text_without_prompt_is_unrecognized() {
        let mut session = UserSession::new();
        assert_eq!(dispatch(&mut session, text("gm"), QUICK), Action::Unrecognized);
    }

    #[test]
    fn test_buy_requires_selected_token() {
        let mut session = UserSession::new();
        for action in [CallbackAction::BuyToken, CallbackAction::BuyQuick, CallbackAction::SellCustom, CallbackAction::SellPercent(50)] {
            assert_eq!(
                dispatch(&mut session, callback(action), QUICK),
                Action::Reject(Rejection::NoTokenSelected)
            );
        }
        assert_eq!(session.awaiting(), None);
    }

    #[test]
    fn test_buy_flow() {
        let mut session = UserSession::new();
        session.token_info = Some(vvs());

        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::BuyToken), QUICK),
            Action::Prompt(Prompt::BuyAmount)
        );
        assert_eq!(
            dispatch(&mut session, text("250.5"), QUICK),
            Action::Buy { token: vvs(), amount_cro: 250.5 }
        );

        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::BuyQuick), QUICK),
            Action::Buy { token: vvs(), amount_cro: QUICK }
        );
    }

    #[test]
    fn test_invalid_buy_amounts_rejected() {
        for input in ["abc", "0", "-3", ""] {
            let mut session = UserSession::new();
            session.token_info = Some(vvs());
            dispatch(&mut session, callback(CallbackAction::BuyToken), QUICK);
            assert_eq!(
                dispatch(&mut session, text(input), QUICK),
                Action::Reject(Rejection::InvalidAmount),
                "input {:?}",
                input
            );
            assert!(!session.expecting_buy_amount);
        }
    }

    #[test]
    fn test_sell_flow() {
        let mut session = UserSession::new();
        session.token_info = Some(vvs());

        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::SellPercent(25)), QUICK),
            Action::Sell { token: vvs(), percentage: 25.0 }
        );

        dispatch(&mut session, callback(CallbackAction::SellCustom), QUICK);
        assert_eq!(
            dispatch(&mut session, text("33%"), QUICK),
            Action::Sell { token: vvs(), percentage: 33.0 }
        );

        dispatch(&mut session, callback(CallbackAction::SellCustom), QUICK);
        assert_eq!(
            dispatch(&mut session, text("150"), QUICK),
            Action::Reject(Rejection::InvalidPercentage)
        );
    }

    #[test]
    fn test_flag_priority_consumes_token_address_first() {
        let mut session = UserSession::new();
        session.token_info = Some(vvs());
        session.expecting_buy_amount = true;
        session.expecting_token_address = true;

        assert_eq!(
            dispatch(&mut session, text(TOKEN), QUICK),
            Action::LookupToken(TOKEN.to_string())
        );
        assert_eq!(
            dispatch(&mut session, text("5"), QUICK),
            Action::Buy { token: vvs(), amount_cro: 5.0 }
        );
    }

    #[test]
    fn test_command_cancels_pending_prompt() {
        let mut session = UserSession::new();
        dispatch(&mut session, callback(CallbackAction::ImportWallet), QUICK);
        assert_eq!(
            dispatch(&mut session, IncomingMessage::Command(UserCommand::Home), QUICK),
            Action::ShowHome
        );
        assert_eq!(session.awaiting(), None);

        assert_eq!(
            dispatch(&mut session, IncomingMessage::Command(UserCommand::Token), QUICK),
            Action::Prompt(Prompt::TokenAddress)
        );
        assert!(session.expecting_token_address);
    }

    #[test]
    fn test_mnemonic_import() {
        let mut session = UserSession::new();
        dispatch(&mut session, callback(CallbackAction::ImportWallet), QUICK);
        let action = dispatch(
            &mut session,
            text("Test test test test test test test test test test test JUNK"),
            QUICK,
        );
        match action {
            Action::ImportWallet(phrase) => {
                assert_eq!(phrase.expose(), "test test test test test test test test test test test junk");
                assert!(!format!("{:?}", phrase).contains("junk"));
            }
            other => panic!("unexpected {:?}", other),
        }

        dispatch(&mut session, callback(CallbackAction::ImportWallet), QUICK);
        assert_eq!(
            dispatch(&mut session, text("only three words"), QUICK),
            Action::Reject(Rejection::InvalidMnemonic)
        );
    }

    #[test]
    fn test_holdings_pagination() {
        let mut session = UserSession::new();
        session.set_total_tokens(2);
        session.current_token_index = 1;

        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::OpenPositions), QUICK),
            Action::ShowHolding { index: 0 }
        );
        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::PrevToken), QUICK),
            Action::ShowHolding { index: 1 }
        );
        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::NextToken), QUICK),
            Action::ShowHolding { index: 0 }
        );
    }

    #[test]
    fn test_refresh_reloads_current_token() {
        let mut session = UserSession::new();
        assert_eq!(dispatch(&mut session, callback(CallbackAction::Refresh), QUICK), Action::ShowHome);

        session.token_info = Some(vvs());
        assert_eq!(
            dispatch(&mut session, callback(CallbackAction::Refresh), QUICK),
            Action::LookupToken(TOKEN.to_string())
        );
    }
}
