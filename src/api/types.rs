use serde::{Deserialize, Deserializer, Serialize};

/// Normalized token snapshot shown on the token card. Rebuilt on every lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    /// Price in the pair's quote token (WCRO for VVS pairs)
    pub price_native: f64,
    pub price_usd: f64,
    pub market_cap_usd: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub pair_url: String,
    pub dex_id: String,
    pub price_change: PriceChange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(default)]
    pub m5: f64,
    #[serde(default)]
    pub h1: f64,
    #[serde(default)]
    pub h6: f64,
    #[serde(default)]
    pub h24: f64,
}

impl TokenInfo {
    /// USD value of one native unit implied by this pair, if both prices are known
    pub fn implied_native_usd(&self) -> Option<f64> {
        (self.price_native > 0.0 && self.price_usd > 0.0).then(|| self.price_usd / self.price_native)
    }
}

#[derive(Debug, Deserialize)]
pub struct DexScreenerResponse {
    #[serde(default)]
    pub pairs: Option<Vec<DexScreenerPair>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexScreenerPair {
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pair_address: String,
    pub base_token: PairToken,
    pub quote_token: PairToken,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub price_native: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub price_change: PriceChange,
    #[serde(default)]
    pub liquidity: Option<PairLiquidity>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub fdv: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairToken {
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairLiquidity {
    #[serde(default)]
    pub usd: Option<f64>,
}

impl DexScreenerPair {
    pub fn into_token_info(self) -> TokenInfo {
        TokenInfo {
            address: self.base_token.address,
            name: self.base_token.name,
            symbol: self.base_token.symbol,
            price_native: self.price_native.unwrap_or_default(),
            price_usd: self.price_usd.unwrap_or_default(),
            market_cap_usd: self.market_cap.or(self.fdv),
            liquidity_usd: self.liquidity.and_then(|l| l.usd),
            pair_url: self.url,
            dex_id: self.dex_id,
            price_change: self.price_change,
        }
    }
}

/// DexScreener sends prices as strings and numbers as numbers; accept both.
fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Str(s)) => s.parse().ok(),
        None => None,
    })
}

#[derive(Debug, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}
