use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::{Result, WalletError};

const SEALED_PREFIX: &str = "enc:v1:";
const NONCE_LEN: usize = 12;

/// Seals wallet mnemonics before they reach the database.
///
/// The AES-256 key is the SHA-256 of the configured passphrase. Without a
/// passphrase values pass through untouched, matching legacy plaintext rows.
#[derive(Clone)]
pub struct WalletSecurity {
    cipher: Option<Aes256Gcm>,
}

impl WalletSecurity {
    pub fn new(passphrase: Option<&str>) -> Self {
        let cipher = passphrase.map(|p| {
            let key = Sha256::digest(p.as_bytes());
            Aes256Gcm::new(&key)
        });
        Self { cipher }
    }

    pub fn plaintext() -> Self {
        Self { cipher: None }
    }

    pub fn seal(&self, secret: &str) -> Result<String> {
        let Some(cipher) = &self.cipher else {
            return Ok(secret.to_string());
        };

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), secret.as_bytes())
            .map_err(|_| WalletError::Sealing)?;

        let mut payload = nonce_bytes.to_vec();
        payload.extend_from_slice(&ciphertext);
        Ok(format!("{}{}", SEALED_PREFIX, BASE64.encode(payload)))
    }

    /// Plaintext rows are returned as-is so older databases keep working.
    pub fn unseal(&self, stored: &str) -> Result<String> {
        let Some(encoded) = stored.strip_prefix(SEALED_PREFIX) else {
            return Ok(stored.to_string());
        };
        let cipher = self.cipher.as_ref().ok_or(WalletError::Sealing)?;

        let payload = BASE64.decode(encoded).map_err(|_| WalletError::Sealing)?;
        if payload.len() <= NONCE_LEN {
            return Err(WalletError::Sealing.into());
        }
        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| WalletError::Sealing)?;

        String::from_utf8(plaintext).map_err(|_| WalletError::Sealing.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_sealed_value_hides_phrase() {
        let security = WalletSecurity::new(Some("hunter2"));
        let sealed = security.seal(PHRASE).unwrap();
        assert!(sealed.starts_with(SEALED_PREFIX));
        assert!(!sealed.contains("junk"));
        assert_eq!(security.unseal(&sealed).unwrap(), PHRASE);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = WalletSecurity::new(Some("right")).seal(PHRASE).unwrap();
        assert!(WalletSecurity::new(Some("wrong")).unseal(&sealed).is_err());
        assert!(WalletSecurity::plaintext().unseal(&sealed).is_err());
    }

    #[test]
    fn test_plaintext_passthrough() {
        let security = WalletSecurity::plaintext();
        assert_eq!(security.seal(PHRASE).unwrap(), PHRASE);
        assert_eq!(WalletSecurity::new(Some("k")).unseal(PHRASE).unwrap(), PHRASE);
    }
}
