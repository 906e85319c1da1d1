use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cronos_trading_bot::bot::{BotContext, TelegramBot};
use cronos_trading_bot::constants::SESSION_SWEEP_INTERVAL_SECS;
use cronos_trading_bot::db::Database;
use cronos_trading_bot::session::SessionStore;
use cronos_trading_bot::utils::Config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    let config = Arc::new(config);

    info!(
        "Starting Cronos trading bot on {:?} (chain id {})",
        config.network,
        config.network.chain_id()
    );

    if config.db_encryption_key.is_none() {
        warn!("DB_ENCRYPTION_KEY not set; recovery phrases are stored in plaintext");
    }
    if config.dev_account_address.is_none() {
        info!("DEV_ACCOUNT_ADDRESS not set; trading fees disabled");
    }

    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database_url))?,
    );

    let sessions = Arc::new(SessionStore::new(config.session_ttl()));
    let sweeper = sessions
        .clone()
        .spawn_sweeper(Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS));

    let context = Arc::new(BotContext::new(config.clone(), db, sessions)?);
    TelegramBot::new(context).run().await?;

    sweeper.abort();
    info!("Shutdown complete");
    Ok(())
}
