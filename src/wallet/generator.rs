use bip39::{Language, Mnemonic};
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::to_checksum;
use rand::RngCore;
use std::fmt;
use tiny_hderive::bip32::ExtendedPrivKey;
use tracing::info;

use crate::constants::{DERIVATION_PATH, MNEMONIC_ENTROPY_BYTES};
use crate::errors::{Result, WalletError};

#[derive(Clone, PartialEq, Eq)]
pub struct WalletCredentials {
    /// EIP-55 checksummed address
    pub address: String,
    /// 0x-prefixed hex secret key
    pub private_key: String,
    pub mnemonic: Option<String>,
    pub derivation_path: String,
}

impl fmt::Debug for WalletCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletCredentials")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "<redacted>"))
            .field("derivation_path", &self.derivation_path)
            .finish()
    }
}

impl WalletCredentials {
    /// Local signer for transactions on `chain_id`.
    pub fn signer(&self, chain_id: u64) -> Result<LocalWallet> {
        let wallet: LocalWallet = self
            .private_key
            .parse()
            .map_err(|_| WalletError::InvalidPrivateKey)?;
        Ok(wallet.with_chain_id(chain_id))
    }
}

pub struct WalletGenerator;

impl WalletGenerator {
    /// Generate a completely new wallet with a 12-word mnemonic phrase
    pub fn generate_new() -> Result<WalletCredentials> {
        let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut entropy);

        let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
            .map_err(WalletError::from)?;

        let credentials = Self::derive(&mnemonic)?;
        info!("Generated new wallet: {}", credentials.address);

        Ok(credentials)
    }

    /// Restore the wallet for an existing mnemonic
    pub fn from_mnemonic(phrase: &str) -> Result<WalletCredentials> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
            .map_err(WalletError::from)?;

        Self::derive(&mnemonic)
    }

    fn derive(mnemonic: &Mnemonic) -> Result<WalletCredentials> {
        let seed = mnemonic.to_seed("");

        let extended = ExtendedPrivKey::derive(&seed, DERIVATION_PATH)
            .map_err(|_| WalletError::DerivationFailed)?;
        let secret = extended.secret();

        let wallet = LocalWallet::from_bytes(&secret).map_err(WalletError::from)?;

        Ok(WalletCredentials {
            address: to_checksum(&wallet.address(), None),
            private_key: format!("0x{}", hex::encode(secret)),
            mnemonic: Some(mnemonic.to_string()),
            derivation_path: DERIVATION_PATH.to_string(),
        })
    }
}
