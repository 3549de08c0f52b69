use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{info, warn};

pub const KEY_LEN: usize = 32;

/// The symmetric key shared by every capsule.
#[derive(Clone, PartialEq, Eq)]
pub struct CapsuleKey([u8; KEY_LEN]);

impl CapsuleKey {
    pub fn generate() -> Self {
        Self(generate_key())
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for CapsuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CapsuleKey(<redacted>)")
    }
}

/// Generate a random 256-bit key for AES-256-GCM.
pub fn generate_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

/// Encode a key to base64 for the key file.
pub fn key_to_base64(key: &[u8; KEY_LEN]) -> String {
    BASE64.encode(key)
}

/// Decode a base64 key.
pub fn key_from_base64(encoded: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = BASE64.decode(encoded.trim())?;
    let key: [u8; KEY_LEN] = bytes
        .try_into()
        .map_err(|_| anyhow!("Invalid key length"))?;
    Ok(key)
}

/// On-disk home of the capsule key.
///
/// Load-or-generate runs once at startup; the returned key is read-only for
/// the rest of the process. An existing file that cannot be read or decoded
/// is an error and is never overwritten.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_or_generate(&self) -> Result<CapsuleKey> {
        if self.path.exists() {
            return self.load();
        }

        let key = CapsuleKey::generate();
        self.write(&key)?;
        warn!(
            "Generated a new capsule key at {}. Back this file up: capsules cannot be opened without it.",
            self.path.display()
        );
        Ok(key)
    }

    pub fn load(&self) -> Result<CapsuleKey> {
        let encoded = fs::read_to_string(&self.path)
            .with_context(|| format!("reading key file {}", self.path.display()))?;
        let key = key_from_base64(&encoded)
            .with_context(|| format!("decoding key file {}", self.path.display()))?;
        info!("Capsule key loaded from {}", self.path.display());
        Ok(CapsuleKey(key))
    }

    fn write(&self, key: &CapsuleKey) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating key directory {}", parent.display()))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("creating key file {}", self.path.display()))?;
        file.write_all(key_to_base64(key.as_bytes()).as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip() {
        let key = generate_key();
        let encoded = key_to_base64(&key);
        assert_eq!(key_from_base64(&encoded).unwrap(), key);
        assert_eq!(key_from_base64(&format!("{encoded}\n")).unwrap(), key);
    }

    #[test]
    fn rejects_short_key() {
        let encoded = BASE64.encode([7u8; 16]);
        assert!(key_from_base64(&encoded).is_err());
    }

    #[test]
    fn generates_once_then_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = KeyFile::new(dir.path().join("keys").join("secret.key"));

        let first = key_file.load_or_generate().unwrap();
        assert!(key_file.path().exists());

        let second = key_file.load_or_generate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_key_file_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, "not a key").unwrap();

        let key_file = KeyFile::new(&path);
        assert!(key_file.load_or_generate().is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not a key");
    }

    #[test]
    fn debug_hides_key_material() {
        let key = CapsuleKey::from_bytes([0xAB; KEY_LEN]);
        assert_eq!(format!("{:?}", key), "CapsuleKey(<redacted>)");
    }
}
