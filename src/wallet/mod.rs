mod generator;
mod manager;
mod security;

pub use generator::{WalletGenerator, WalletCredentials};
pub use manager::{WalletManager, WalletInfo};
pub use security::WalletSecurity;
