mod models;

pub use models::{OpenPosition, UserWalletRow};

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use crate::errors::Result;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        telegram_user_id INTEGER NOT NULL UNIQUE,
        cronos_address TEXT NOT NULL,
        mnemonic TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS open_positions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        telegram_user_id INTEGER NOT NULL,
        token_address TEXT NOT NULL,
        symbol TEXT NOT NULL DEFAULT '',
        balance REAL NOT NULL DEFAULT 0,
        value_usd REAL NOT NULL DEFAULT 0,
        cost_usd REAL NOT NULL DEFAULT 0,
        last_updated TEXT NOT NULL,
        UNIQUE (telegram_user_id, token_address)
    )
    "#,
];

/// SQLite persistence for wallets and open positions
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database is its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        info!("Database ready at {}", database_url);
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert or replace the wallet of a user
    pub async fn upsert_user_wallet(
        &self,
        telegram_user_id: i64,
        cronos_address: &str,
        mnemonic: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (telegram_user_id, cronos_address, mnemonic)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(telegram_user_id) DO UPDATE SET
                cronos_address = excluded.cronos_address,
                mnemonic = excluded.mnemonic
            "#,
        )
        .bind(telegram_user_id)
        .bind(cronos_address)
        .bind(mnemonic)
        .execute(&self.pool)
        .await?;

        debug!("Stored wallet {} for user {}", cronos_address, telegram_user_id);
        Ok(())
    }

    pub async fn get_user_wallet(&self, telegram_user_id: i64) -> Result<Option<UserWalletRow>> {
        let row = sqlx::query_as::<_, UserWalletRow>(
            "SELECT telegram_user_id, cronos_address, mnemonic FROM users WHERE telegram_user_id = ?1",
        )
        .bind(telegram_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Upsert keyed by (user, token). `cost_delta_usd` is added to the running cost basis.
    pub async fn upsert_open_position(
        &self,
        telegram_user_id: i64,
        token_address: &str,
        symbol: &str,
        balance: f64,
        value_usd: f64,
        cost_delta_usd: f64,
    ) -> Result<()> {
        let token_address = token_address.to_lowercase();
        sqlx::query(
            r#"
            INSERT INTO open_positions
                (telegram_user_id, token_address, symbol, balance, value_usd, cost_usd, last_updated)
            VALUES (?1, ?2, ?3, ?4, ?5, MAX(?6, 0), ?7)
            ON CONFLICT(telegram_user_id, token_address) DO UPDATE SET
                symbol = excluded.symbol,
                balance = excluded.balance,
                value_usd = excluded.value_usd,
                cost_usd = MAX(open_positions.cost_usd + ?6, 0),
                last_updated = excluded.last_updated
            "#,
        )
        .bind(telegram_user_id)
        .bind(&token_address)
        .bind(symbol)
        .bind(balance)
        .bind(value_usd)
        .bind(cost_delta_usd)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_open_positions(&self, telegram_user_id: i64) -> Result<Vec<OpenPosition>> {
        let rows = sqlx::query_as::<_, OpenPosition>(
            r#"
            SELECT telegram_user_id, token_address, symbol, balance, value_usd, cost_usd, last_updated
            FROM open_positions
            WHERE telegram_user_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(telegram_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_open_position(
        &self,
        telegram_user_id: i64,
        token_address: &str,
    ) -> Result<Option<OpenPosition>> {
        let row = sqlx::query_as::<_, OpenPosition>(
            r#"
            SELECT telegram_user_id, token_address, symbol, balance, value_usd, cost_usd, last_updated
            FROM open_positions
            WHERE telegram_user_id = ?1 AND token_address = ?2
            "#,
        )
        .bind(telegram_user_id)
        .bind(token_address.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x5C7F8A570d578ED84E63fdFA7b1eE72dEae1AE23";

    async fn memory_db() -> Database {
        Database::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_user_wallet_upsert() {
        let db = memory_db().await;
        assert!(db.get_user_wallet(7).await.unwrap().is_none());

        db.upsert_user_wallet(7, "0xaaa", "phrase one").await.unwrap();
        db.upsert_user_wallet(7, "0xbbb", "phrase two").await.unwrap();

        let row = db.get_user_wallet(7).await.unwrap().unwrap();
        assert_eq!(row.cronos_address, "0xbbb");
        assert_eq!(row.mnemonic, "phrase two");
    }

    #[tokio::test]
    async fn test_open_position_accumulates_cost() {
        let db = memory_db().await;
        db.upsert_open_position(7, TOKEN, "WCRO", 100.0, 10.0, 10.0).await.unwrap();
        db.upsert_open_position(7, TOKEN, "WCRO", 300.0, 31.0, 20.0).await.unwrap();

        let positions = db.get_open_positions(7).await.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].balance, 300.0);
        assert_eq!(positions[0].cost_usd, 30.0);
        assert_eq!(positions[0].token_address, TOKEN.to_lowercase());
    }

    #[tokio::test]
    async fn test_cost_never_negative() {
        let db = memory_db().await;
        db.upsert_open_position(7, TOKEN, "WCRO", 100.0, 10.0, 10.0).await.unwrap();
        db.upsert_open_position(7, TOKEN, "WCRO", 0.0, 0.0, -50.0).await.unwrap();

        let position = db.get_open_position(7, TOKEN).await.unwrap().unwrap();
        assert_eq!(position.cost_usd, 0.0);
    }

    #[tokio::test]
    async fn test_positions_are_per_user() {
        let db = memory_db().await;
        db.upsert_open_position(1, TOKEN, "A", 1.0, 1.0, 1.0).await.unwrap();
        db.upsert_open_position(2, TOKEN, "A", 2.0, 2.0, 2.0).await.unwrap();

        assert_eq!(db.get_open_positions(1).await.unwrap().len(), 1);
        assert_eq!(db.get_open_positions(2).await.unwrap()[0].balance, 2.0);
    }
}
