// Chain
pub const CRONOS_MAINNET_CHAIN_ID: u64 = 25;
pub const CRONOS_TESTNET_CHAIN_ID: u64 = 338;
pub const CRONOS_SYMBOL: &str = "CRO";
pub const CRONOS_TESTNET_SYMBOL: &str = "tCRO";

pub const MAINNET_RPC_URLS: &[&str] = &[
    "https://evm.cronos.org",
    "https://cronos-evm-rpc.publicnode.com",
    "https://cronos.blockpi.network/v1/rpc/public",
];
pub const TESTNET_RPC_URLS: &[&str] = &["https://evm-t3.cronos.org"];

pub const MAINNET_EXPLORER_URL: &str = "https://explorer.cronos.org";
pub const TESTNET_EXPLORER_URL: &str = "https://explorer.cronos.org/testnet";

// VVS Finance
pub const VVS_ROUTER_ADDRESS: &str = "0x145863Eb42Cf62847A6Ca784e6416C1682b1b2Ae";
pub const WCRO_ADDRESS: &str = "0x5C7F8A570d578ED84E63fdFA7b1eE72dEae1AE23";

// Wallets
pub const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";
pub const MNEMONIC_ENTROPY_BYTES: usize = 16;

// External APIs
pub const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com";
pub const DEXSCREENER_CHAIN_ID: &str = "cronos";
pub const CRONOSCAN_API_URL: &str = "https://api.cronoscan.com/api";
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const COINGECKO_CRO_ID: &str = "crypto-com-chain";

// Trading
pub const DEFAULT_SLIPPAGE_BPS: u16 = 300;
pub const MAX_SLIPPAGE_BPS: u16 = 5_000;
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const BUY_FEE_BPS: u64 = 50;
pub const SELL_TAX_BPS: u64 = 25;
pub const DEFAULT_QUICK_BUY_CRO: f64 = 1_000.0;
pub const SWAP_DEADLINE_SECS: u64 = 20 * 60;
pub const QUICK_SELL_PERCENTAGES: [u8; 3] = [25, 50, 100];
/// One basis point, the finest split the sell math can express
pub const MIN_SELL_PERCENTAGE: f64 = 0.01;

// Sessions
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

// Retries
pub const FETCH_ATTEMPTS: u32 = 3;
pub const FETCH_BACKOFF_MS: u64 = 1_000;
pub const HTTP_TIMEOUT_SECS: u64 = 15;
