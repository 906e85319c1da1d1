use chrono::Utc;
use ethers::contract::ContractCall;
use ethers::providers::Middleware;
use ethers::types::{Address, TransactionReceipt, TransactionRequest, U256, U64};
use std::sync::Arc;
use tracing::{info, warn};

use super::types::{
    min_amount_out, percentage_of, split_fee, SwapPlan, TradeResult, TradeSide,
};
use crate::chain::{from_base_units, to_base_units, ChainClient, Erc20, SignerClient, VvsRouter};
use crate::constants::{BUY_FEE_BPS, SELL_TAX_BPS, SWAP_DEADLINE_SECS};
use crate::errors::{BotError, Result, TradingError, WalletError};
use crate::utils::Validator;
use crate::wallet::WalletCredentials;

const NATIVE_DECIMALS: u8 = 18;

/// Prices and submits swaps through a Uniswap-V2 style router (VVS Finance).
pub struct SwapExecutor {
    chain: Arc<ChainClient>,
    router: Address,
    wcro: Address,
    dev_account: Option<Address>,
    slippage_bps: u16,
}

impl SwapExecutor {
    pub fn new(
        chain: Arc<ChainClient>,
        router: &str,
        wcro: &str,
        dev_account: Option<&str>,
        slippage_bps: u16,
    ) -> Result<Self> {
        Validator::validate_slippage(slippage_bps)?;

        Ok(Self {
            chain,
            router: parse_address(router)?,
            wcro: parse_address(wcro)?,
            dev_account: dev_account.map(parse_address).transpose()?,
            slippage_bps,
        })
    }

    fn fee_bps(&self, side: TradeSide) -> u64 {
        match (self.dev_account, side) {
            (None, _) => 0,
            (Some(_), TradeSide::Buy) => BUY_FEE_BPS,
            (Some(_), TradeSide::Sell) => SELL_TAX_BPS,
        }
    }

    fn deadline() -> U256 {
        U256::from(Utc::now().timestamp().max(0) as u64 + SWAP_DEADLINE_SECS)
    }

    async fn quote(&self, amount_in: U256, path: Vec<Address>) -> Result<U256> {
        let router = VvsRouter::new(self.router, Arc::new(self.chain.provider()?));
        let token = path.last().copied().unwrap_or_default();

        let amounts = router
            .get_amounts_out(amount_in, path)
            .call()
            .await
            .map_err(|e| {
                warn!("getAmountsOut failed for {:?}: {}", token, e);
                TradingError::NoRoute {
                    token: format!("{:?}", token),
                }
            })?;

        amounts
            .last()
            .copied()
            .ok_or_else(|| TradingError::NoRoute { token: format!("{:?}", token) }.into())
    }

    /// Price a CRO -> token buy of `cro_amount` whole CRO.
    pub async fn plan_buy(&self, token: &str, cro_amount: f64) -> Result<SwapPlan> {
        Validator::validate_trade_amount(cro_amount)?;
        let token = parse_address(token)?;

        let gross = to_base_units(cro_amount, NATIVE_DECIMALS)?;
        let (amount_in, fee_amount) = split_fee(gross, self.fee_bps(TradeSide::Buy));
        let path = vec![self.wcro, token];

        let (quoted_out, out_decimals) = futures::try_join!(
            self.quote(amount_in, path.clone()),
            self.chain.token_decimals(token)
        )?;

        Ok(SwapPlan {
            side: TradeSide::Buy,
            token,
            path,
            amount_in,
            fee_amount,
            quoted_out,
            amount_out_min: min_amount_out(quoted_out, self.slippage_bps),
            deadline: Self::deadline(),
            in_decimals: NATIVE_DECIMALS,
            out_decimals,
        })
    }

    /// Price a token -> CRO sell of `percentage` percent of `owner`'s balance.
    pub async fn plan_sell(&self, token: &str, owner: &str, percentage: f64) -> Result<SwapPlan> {
        let token = parse_address(token)?;
        let owner = parse_address(owner)?;

        let (balance, in_decimals, available) = self.chain.token_balance_units(token, owner).await?;
        let gross = percentage_of(balance, percentage)?;
        if gross.is_zero() {
            return Err(TradingError::InsufficientBalance {
                required: available * percentage / 100.0,
                available,
            }
            .into());
        }

        let (amount_in, fee_amount) = split_fee(gross, self.fee_bps(TradeSide::Sell));
        let path = vec![token, self.wcro];
        let quoted_out = self.quote(amount_in, path.clone()).await?;

        Ok(SwapPlan {
            side: TradeSide::Sell,
            token,
            path,
            amount_in,
            fee_amount,
            quoted_out,
            amount_out_min: min_amount_out(quoted_out, self.slippage_bps),
            deadline: Self::deadline(),
            in_decimals,
            out_decimals: NATIVE_DECIMALS,
        })
    }

    pub async fn execute_buy(&self, credentials: &WalletCredentials, plan: &SwapPlan) -> Result<TradeResult> {
        ensure_protected(plan, TradeSide::Buy)?;
        let client = self.signer(credentials)?;
        let recipient = client.address();

        let available = self.chain.native_balance(recipient).await?;
        if available < plan.gross_amount_in() {
            return Err(TradingError::InsufficientBalance {
                required: from_base_units(plan.gross_amount_in(), NATIVE_DECIMALS)?,
                available: from_base_units(available, NATIVE_DECIMALS)?,
            }
            .into());
        }

        let router = VvsRouter::new(self.router, client.clone());
        let call = router
            .swap_exact_eth_for_tokens(plan.amount_out_min, plan.path.clone(), recipient, plan.deadline)
            .value(plan.amount_in);
        let receipt = submit(call, "swapExactETHForTokens").await?;
        let tx_hash = format!("{:?}", receipt.transaction_hash);
        info!("Buy submitted for {:?}: {}", plan.token, tx_hash);

        let fee_tx_hash = match self.dev_account {
            Some(dev) if !plan.fee_amount.is_zero() => {
                let tx = TransactionRequest::new().to(dev).value(plan.fee_amount);
                settle_fee(self.send_fee(&client, tx.into()).await, plan)
            }
            _ => None,
        };

        self.result(plan, tx_hash, fee_tx_hash, None)
    }

    pub async fn execute_sell(&self, credentials: &WalletCredentials, plan: &SwapPlan) -> Result<TradeResult> {
        ensure_protected(plan, TradeSide::Sell)?;
        let client = self.signer(credentials)?;
        let owner = client.address();
        let token = Erc20::new(plan.token, client.clone());

        let allowance = token
            .allowance(owner, self.router)
            .call()
            .await
            .map_err(|e| BotError::chain(e.to_string()))?;

        let approve_tx_hash = if allowance < plan.amount_in {
            let receipt = submit(token.approve(self.router, plan.amount_in), "approve").await?;
            Some(format!("{:?}", receipt.transaction_hash))
        } else {
            None
        };

        let router = VvsRouter::new(self.router, client.clone());
        let call = router.swap_exact_tokens_for_eth(
            plan.amount_in,
            plan.amount_out_min,
            plan.path.clone(),
            owner,
            plan.deadline,
        );
        let receipt = match submit(call, "swapExactTokensForETH").await {
            Ok(receipt) => receipt,
            Err(e) => {
                if approve_tx_hash.is_some() {
                    warn!("Sell failed after approval for {:?}; approval remains", plan.token);
                }
                return Err(e);
            }
        };
        let tx_hash = format!("{:?}", receipt.transaction_hash);
        info!("Sell submitted for {:?}: {}", plan.token, tx_hash);

        let fee_tx_hash = match self.dev_account {
            Some(dev) if !plan.fee_amount.is_zero() => {
                let outcome = submit(token.transfer(dev, plan.fee_amount), "transfer")
                    .await
                    .map(|receipt| format!("{:?}", receipt.transaction_hash));
                settle_fee(outcome, plan)
            }
            _ => None,
        };

        self.result(plan, tx_hash, fee_tx_hash, approve_tx_hash)
    }

    fn signer(&self, credentials: &WalletCredentials) -> Result<Arc<SignerClient>> {
        let wallet = credentials.signer(self.chain.chain_id())?;
        self.chain.signer_client(wallet)
    }

    async fn send_fee(
        &self,
        client: &Arc<SignerClient>,
        tx: ethers::types::transaction::eip2718::TypedTransaction,
    ) -> Result<String> {
        let mut tx = tx;
        let gas = client
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| BotError::chain(format!("Fee gas estimation failed: {}", e)))?;
        tx.set_gas(gas);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| TradingError::TransactionFailed(e.to_string()))?;
        let receipt = pending
            .await
            .map_err(|e| TradingError::TransactionFailed(e.to_string()))?
            .ok_or_else(|| TradingError::TransactionFailed("fee transfer dropped".into()))?;

        Ok(format!("{:?}", receipt.transaction_hash))
    }

    fn result(
        &self,
        plan: &SwapPlan,
        tx_hash: String,
        fee_tx_hash: Option<String>,
        approve_tx_hash: Option<String>,
    ) -> Result<TradeResult> {
        Ok(TradeResult {
            side: plan.side,
            token_address: ethers::utils::to_checksum(&plan.token, None),
            tx_hash,
            fee_tx_hash,
            approve_tx_hash,
            amount_in: from_base_units(plan.gross_amount_in(), plan.in_decimals)?,
            expected_out: from_base_units(plan.quoted_out, plan.out_decimals)?,
            timestamp: Utc::now(),
        })
    }
}

fn parse_address(input: &str) -> Result<Address> {
    let checked = Validator::validate_contract_address(input)?;
    checked
        .parse::<Address>()
        .map_err(|_| WalletError::InvalidAddress(checked).into())
}

/// The swap is final by the time the fee moves, so a failed transfer only loses the fee.
fn settle_fee(outcome: Result<String>, plan: &SwapPlan) -> Option<String> {
    match outcome {
        Ok(tx_hash) => Some(tx_hash),
        Err(e) => {
            warn!(
                "{:?} of {:?} went through but the dev fee of {} was not collected: {}",
                plan.side, plan.token, plan.fee_amount, e
            );
            None
        }
    }
}

fn ensure_protected(plan: &SwapPlan, side: TradeSide) -> Result<()> {
    if plan.side != side {
        return Err(TradingError::InvalidAmount {
            message: format!("expected a {:?} plan", side),
        }
        .into());
    }
    if plan.needs_slippage_protection() {
        warn!("Refusing swap for {:?} with zero minimum output", plan.token);
        return Err(TradingError::UnprotectedSwap.into());
    }
    Ok(())
}

/// Estimate gas, send, and wait for the receipt of a contract call.
async fn submit<D>(call: ContractCall<SignerClient, D>, label: &str) -> Result<TransactionReceipt>
where
    D: ethers::abi::Detokenize,
{
    let gas = call
        .estimate_gas()
        .await
        .map_err(|e| BotError::chain(format!("{} gas estimation failed: {}", label, e)))?;
    let call = call.gas(gas);

    let pending = call
        .send()
        .await
        .map_err(|e| TradingError::TransactionFailed(format!("{}: {}", label, e)))?;
    let receipt = pending
        .await
        .map_err(|e| TradingError::TransactionFailed(format!("{}: {}", label, e)))?
        .ok_or_else(|| TradingError::TransactionFailed(format!("{} dropped from mempool", label)))?;

    if receipt.status != Some(U64::from(1)) {
        return Err(TradingError::TransactionFailed(format!(
            "{} reverted in {:?}",
            label, receipt.transaction_hash
        ))
        .into());
    }

    Ok(receipt)
}
