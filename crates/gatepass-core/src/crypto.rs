//! Payload encryption
//!
//! AES-256-GCM with a random nonce per message. Output is
//! `base64(version || nonce || ciphertext)` so the result is safe to
//! carry in a JSON body.
//!
//! KNOWN WEAKNESS: the key is derived from a constant embedded in the
//! client. Acceptable for this demo scope only; a real deployment must
//! externalize key management.

use crate::{Error, Result};
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

const EMBEDDED_PASSPHRASE: &str = "qr-scanner-secret-key-2024";
const FORMAT_VERSION: u8 = 1;
const NONCE_LEN: usize = 12;

/// Symmetric cipher for check-in payloads
pub struct CheckInCipher {
    key: [u8; 32],
}

impl CheckInCipher {
    /// Cipher using the embedded demo key
    pub fn fixed() -> Self {
        let hash = Sha256::digest(EMBEDDED_PASSPHRASE.as_bytes());
        Self { key: hash.into() }
    }

    /// Cipher using caller-supplied key bytes
    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Encrypt plaintext into a transport-safe string
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = Aes256Gcm::new(&self.key.into());

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::Encryption(e.to_string()))?;

        // Format: [version(1)][nonce(12)][ciphertext]
        let mut raw = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        raw.push(FORMAT_VERSION);
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(raw))
    }

    /// Decrypt a string produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let raw = BASE64
            .decode(encoded)
            .map_err(|e| Error::Encryption(e.to_string()))?;

        if raw.len() < 1 + NONCE_LEN {
            return Err(Error::Encryption("Invalid ciphertext length".to_string()));
        }
        if raw[0] != FORMAT_VERSION {
            return Err(Error::Encryption(format!(
                "Unsupported ciphertext version: {}",
                raw[0]
            )));
        }

        let cipher = Aes256Gcm::new(&self.key.into());
        let nonce = Nonce::from_slice(&raw[1..1 + NONCE_LEN]);

        let plaintext = cipher
            .decrypt(nonce, &raw[1 + NONCE_LEN..])
            .map_err(|e| Error::Encryption(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| Error::Encryption(e.to_string()))
    }
}

impl Default for CheckInCipher {
    fn default() -> Self {
        Self::fixed()
    }
}
