use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};
use uuid::Uuid;

use keepsake_crypto::CapsuleCipher;
use keepsake_db::CapsuleStore;
use keepsake_types::models::{Capsule, NewCapsule};

use crate::clock::Clock;
use crate::error::CapsuleError;

/// Input of [`CapsuleService::create_with`].
#[derive(Debug, Default, Clone)]
pub struct NewCapsuleRequest {
    pub message: String,
    /// Defaults to the creation day.
    pub unlock_at: Option<NaiveDate>,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub title: Option<String>,
}

/// Outcome of checking a capsule against the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revealed {
    Locked { unlock_at: NaiveDate },
    Unlocked(String),
}

/// Create, fetch and reveal capsules.
///
/// `cipher` is `None` when the key could not be loaded at startup: the
/// service keeps serving, and every operation that needs the key fails with
/// `EncryptionUnavailable`.
pub struct CapsuleService {
    store: Arc<dyn CapsuleStore>,
    cipher: Option<CapsuleCipher>,
    clock: Arc<dyn Clock>,
}

impl CapsuleService {
    pub fn new(store: Arc<dyn CapsuleStore>, cipher: Option<CapsuleCipher>, clock: Arc<dyn Clock>) -> Self {
        Self { store, cipher, clock }
    }

    pub fn encryption_available(&self) -> bool {
        self.cipher.is_some()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Seal `plaintext` into a new capsule that unlocks today.
    pub fn create(&self, plaintext: &str) -> Result<String, CapsuleError> {
        self.create_with(NewCapsuleRequest {
            message: plaintext.to_string(),
            ..Default::default()
        })
    }

    pub fn create_with(&self, req: NewCapsuleRequest) -> Result<String, CapsuleError> {
        let cipher = self.cipher.as_ref().ok_or(CapsuleError::EncryptionUnavailable)?;
        if req.message.trim().is_empty() {
            return Err(CapsuleError::Validation("Message cannot be empty".into()));
        }

        let ciphertext = cipher.seal(&req.message).map_err(|e| {
            error!("Sealing capsule failed: {}", e);
            CapsuleError::EncryptionUnavailable
        })?;

        let unlock_at = req.unlock_at.unwrap_or_else(|| self.clock.today());
        let capsule = NewCapsule {
            id: Uuid::new_v4().to_string(),
            ciphertext,
            created_at: self.clock.now(),
            unlock_at,
            sender_name: non_blank(req.sender_name),
            recipient_name: non_blank(req.recipient_name),
            title: non_blank(req.title),
        };

        self.store.insert(&capsule)?;
        info!("Capsule {} created, unlocks {}", capsule.id, unlock_at);
        Ok(capsule.id)
    }

    pub fn fetch(&self, id: &str) -> Result<Capsule, CapsuleError> {
        self.store
            .get_by_id(id)?
            .ok_or_else(|| CapsuleError::NotFound(id.to_string()))
    }

    /// True once the calendar reaches the unlock date. Legacy capsules with
    /// no readable unlock date count as unlocking today.
    pub fn is_unlocked(&self, capsule: &Capsule) -> bool {
        let today = self.clock.today();
        today >= capsule.unlock_at.unwrap_or(today)
    }

    /// The time-lock gate: nothing is decrypted before the unlock date.
    pub fn reveal(&self, capsule: &Capsule) -> Result<Revealed, CapsuleError> {
        if !self.is_unlocked(capsule) {
            let unlock_at = capsule.unlock_at.unwrap_or_else(|| self.clock.today());
            return Ok(Revealed::Locked { unlock_at });
        }
        self.decrypt(capsule).map(Revealed::Unlocked)
    }

    /// Decrypt regardless of the unlock date.
    pub fn decrypt(&self, capsule: &Capsule) -> Result<String, CapsuleError> {
        let cipher = self.cipher.as_ref().ok_or(CapsuleError::EncryptionUnavailable)?;
        cipher.open(&capsule.ciphertext).map_err(|e| {
            warn!("Decryption failed for {}: {}", capsule.id, e);
            CapsuleError::DecryptionFailed(e)
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
