/// Keepsake Crypto Library
///
/// Every capsule is sealed with one process-wide AES-256-GCM key. The key is
/// generated on first start and persisted to a key file; later starts must
/// load the same file.
///
/// Durability: the key file is the single point of failure for all stored
/// capsules. If it is lost or replaced, every ciphertext written before is
/// permanently undecryptable. Back it up together with the database.

pub mod cipher;
pub mod keys;

pub use cipher::{CapsuleCipher, CryptoError};
pub use keys::{CapsuleKey, KeyFile};
