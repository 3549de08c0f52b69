use std::fmt;

use aes_gcm::{
    AeadCore, Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

use crate::keys::CapsuleKey;

pub const NONCE_LEN: usize = 12;
/// AES-GCM tag length appended to every ciphertext.
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("sealed text is not valid: {0}")]
    Encoding(String),

    #[error("ciphertext failed authentication (wrong key or tampered data)")]
    Authentication,

    #[error("decrypted payload is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("encryption failed")]
    Seal,
}

/// Seals message text into the textual form kept in the store:
/// `base64(nonce || ciphertext || tag)`, with a fresh random nonce per call.
#[derive(Clone)]
pub struct CapsuleCipher {
    aead: Aes256Gcm,
}

impl CapsuleCipher {
    pub fn new(key: CapsuleKey) -> Self {
        let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { aead }
    }

    pub fn seal(&self, plaintext: &str) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .aead
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Seal)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(nonce.as_slice());
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(sealed))
    }

    pub fn open(&self, sealed: &str) -> Result<String, CryptoError> {
        let bytes = BASE64
            .decode(sealed.trim())
            .map_err(|e| CryptoError::Encoding(e.to_string()))?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::Encoding(format!("{} bytes is too short", bytes.len())));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .aead
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Authentication)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

impl fmt::Debug for CapsuleCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CapsuleCipher(<redacted>)")
    }
}
