use std::sync::Arc;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::services::biometric::BiometricGate;
use crate::services::credential_store::{SecureStorage, StorageError};

// 96-bit AES-GCM nonce, prepended to the ciphertext.
const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("No encryption key has been initialized for this user")]
    KeyNotInitialized,

    #[error("Decryption failed authentication")]
    AuthFailed,

    #[error("Biometric challenge was not passed")]
    ChallengeFailed,

    #[error("Secure storage failure: {0}")]
    Storage(String),
}

impl From<StorageError> for EncryptionError {
    fn from(e: StorageError) -> Self {
        EncryptionError::Storage(e.to_string())
    }
}

/// Field-level encryption for sensitive short strings (diagnoses, notes).
///
/// One random 256-bit key per user, generated on first use and kept in the
/// secure credential storage; every key retrieval is gated behind a fresh
/// biometric challenge. Ciphertext layout is `base64(nonce || aes-gcm ct)`.
pub struct EncryptionGate {
    storage: Arc<dyn SecureStorage>,
    biometric: Arc<dyn BiometricGate>,
}

impl EncryptionGate {
    pub fn new(storage: Arc<dyn SecureStorage>, biometric: Arc<dyn BiometricGate>) -> Self {
        Self { storage, biometric }
    }

    fn key_name(user_id: &str) -> String {
        format!("encryption_key:{user_id}")
    }

    async fn challenge(&self) -> Result<(), EncryptionError> {
        match self
            .biometric
            .authenticate("Unlock your protected health data", true)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(EncryptionError::ChallengeFailed),
        }
    }

    async fn load_key(&self, user_id: &str) -> Result<Option<Key<Aes256Gcm>>, EncryptionError> {
        let Some(encoded) = self.storage.get(&Self::key_name(user_id)).await? else {
            return Ok(None);
        };
        let bytes = BASE64
            .decode(encoded)
            .map_err(|_| EncryptionError::KeyNotInitialized)?;
        if bytes.len() != KEY_SIZE {
            return Err(EncryptionError::KeyNotInitialized);
        }
        Ok(Some(*Key::<Aes256Gcm>::from_slice(&bytes)))
    }

    async fn load_or_create_key(&self, user_id: &str) -> Result<Key<Aes256Gcm>, EncryptionError> {
        if let Some(key) = self.load_key(user_id).await? {
            return Ok(key);
        }
        let key = Aes256Gcm::generate_key(OsRng);
        self.storage
            .set(&Self::key_name(user_id), &BASE64.encode(key))
            .await?;
        Ok(key)
    }

    pub async fn encrypt(&self, user_id: &str, plaintext: &str) -> Result<String, EncryptionError> {
        self.challenge().await?;
        let key = self.load_or_create_key(user_id).await?;

        let cipher = Aes256Gcm::new(&key);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| EncryptionError::AuthFailed)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(out))
    }

    pub async fn decrypt(&self, user_id: &str, encoded: &str) -> Result<String, EncryptionError> {
        self.challenge().await?;
        let key = self
            .load_key(user_id)
            .await?
            .ok_or(EncryptionError::KeyNotInitialized)?;

        let data = BASE64
            .decode(encoded)
            .map_err(|_| EncryptionError::AuthFailed)?;
        if data.len() < NONCE_SIZE {
            return Err(EncryptionError::AuthFailed);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let cipher = Aes256Gcm::new(&key);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| EncryptionError::AuthFailed)?;

        String::from_utf8(plaintext).map_err(|_| EncryptionError::AuthFailed)
    }
}
