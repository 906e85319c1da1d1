use std::time::Instant;

use crate::api::TokenInfo;

/// What the next free-text message from the user will be read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awaiting {
    TokenAddress,
    BuyAmount,
    SellAmount,
    Mnemonic,
}

/// Per-user conversation state.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub expecting_token_address: bool,
    pub expecting_buy_amount: bool,
    pub expecting_sell_amount: bool,
    pub expecting_mnemonic: bool,
    /// Token currently shown on the token card; buy and sell act on it
    pub token_info: Option<TokenInfo>,
    pub current_token_index: usize,
    pub total_tokens: usize,
    pub last_seen: Instant,
}

impl Default for UserSession {
    fn default() -> Self {
        Self::new()
    }
}

impl UserSession {
    pub fn new() -> Self {
        Self {
            expecting_token_address: false,
            expecting_buy_amount: false,
            expecting_sell_amount: false,
            expecting_mnemonic: false,
            token_info: None,
            current_token_index: 0,
            total_tokens: 0,
            last_seen: Instant::now(),
        }
    }

    /// Highest-priority pending flag: token address, buy, sell, then mnemonic.
    pub fn awaiting(&self) -> Option<Awaiting> {
        if self.expecting_token_address {
            Some(Awaiting::TokenAddress)
        } else if self.expecting_buy_amount {
            Some(Awaiting::BuyAmount)
        } else if self.expecting_sell_amount {
            Some(Awaiting::SellAmount)
        } else if self.expecting_mnemonic {
            Some(Awaiting::Mnemonic)
        } else {
            None
        }
    }

    /// Replace any pending prompt with `awaiting`
    pub fn expect(&mut self, awaiting: Awaiting) {
        self.clear_awaiting();
        *self.flag_mut(awaiting) = true;
    }

    pub fn clear(&mut self, awaiting: Awaiting) {
        *self.flag_mut(awaiting) = false;
    }

    pub fn clear_awaiting(&mut self) {
        self.expecting_token_address = false;
        self.expecting_buy_amount = false;
        self.expecting_sell_amount = false;
        self.expecting_mnemonic = false;
    }

    fn flag_mut(&mut self, awaiting: Awaiting) -> &mut bool {
        match awaiting {
            Awaiting::TokenAddress => &mut self.expecting_token_address,
            Awaiting::BuyAmount => &mut self.expecting_buy_amount,
            Awaiting::SellAmount => &mut self.expecting_sell_amount,
            Awaiting::Mnemonic => &mut self.expecting_mnemonic,
        }
    }

    pub fn first_holding(&mut self) -> usize {
        self.current_token_index = 0;
        0
    }

    pub fn next_holding(&mut self) -> usize {
        self.current_token_index = match self.total_tokens {
            0 => 0,
            n => (self.current_token_index + 1) % n,
        };
        self.current_token_index
    }

    pub fn prev_holding(&mut self) -> usize {
        self.current_token_index = match self.total_tokens {
            0 => 0,
            n => (self.current_token_index % n + n - 1) % n,
        };
        self.current_token_index
    }

    /// Record a fresh holdings count, pulling the index back in range
    pub fn set_total_tokens(&mut self, total: usize) {
        self.total_tokens = total;
        if total == 0 {
            self.current_token_index = 0;
        } else if self.current_token_index >= total {
            self.current_token_index %= total;
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_priority() {
        let mut session = UserSession::new();
        assert_eq!(session.awaiting(), None);

        session.expecting_mnemonic = true;
        session.expecting_sell_amount = true;
        assert_eq!(session.awaiting(), Some(Awaiting::SellAmount));

        session.expecting_buy_amount = true;
        assert_eq!(session.awaiting(), Some(Awaiting::BuyAmount));

        session.expecting_token_address = true;
        assert_eq!(session.awaiting(), Some(Awaiting::TokenAddress));

        session.clear(Awaiting::TokenAddress);
        assert_eq!(session.awaiting(), Some(Awaiting::BuyAmount));
    }

    #[test]
    fn test_expect_replaces_pending_prompt() {
        let mut session = UserSession::new();
        session.expect(Awaiting::BuyAmount);
        session.expect(Awaiting::Mnemonic);
        assert!(!session.expecting_buy_amount);
        assert_eq!(session.awaiting(), Some(Awaiting::Mnemonic));
    }

    #[test]
    fn test_pagination_wraps() {
        let mut session = UserSession::new();
        session.set_total_tokens(3);
        assert_eq!(session.next_holding(), 1);
        assert_eq!(session.next_holding(), 2);
        assert_eq!(session.next_holding(), 0);
        assert_eq!(session.prev_holding(), 2);
        assert_eq!(session.first_holding(), 0);
        assert_eq!(session.prev_holding(), 2);
    }

    #[test]
    fn test_pagination_without_holdings_stays_at_zero() {
        let mut session = UserSession::new();
        assert_eq!(session.next_holding(), 0);
        assert_eq!(session.prev_holding(), 0);
    }

    #[test]
    fn test_shrinking_holdings_clamps_index() {
        let mut session = UserSession::new();
        session.set_total_tokens(5);
        session.current_token_index = 4;
        session.set_total_tokens(2);
        assert_eq!(session.current_token_index, 0);
        session.set_total_tokens(0);
        assert_eq!(session.current_token_index, 0);
    }
}
