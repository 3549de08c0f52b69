pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::info;

use keepsake_types::models::{Capsule, NewCapsule};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage seam for capsules. Every backend returns the same normalized
/// `Capsule` shape.
pub trait CapsuleStore: Send + Sync {
    /// Insert a new capsule. Fails if the id is already taken.
    fn insert(&self, capsule: &NewCapsule) -> Result<()>;

    fn get_by_id(&self, id: &str) -> Result<Option<Capsule>>;
}

/// Which backend to open, decided once at startup from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    SqliteFile(PathBuf),
    SqliteMemory,
    Memory,
}

impl StoreBackend {
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            bail!("unsupported backend: networked databases are not available in this build");
        }
        if url == "memory://" || url == "memory:" {
            return Ok(Self::Memory);
        }
        if url == "sqlite::memory:" || url == ":memory:" || url == "sqlite://:memory:" {
            return Ok(Self::SqliteMemory);
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        if path.is_empty() {
            bail!("DATABASE_URL names no database path");
        }
        Ok(Self::SqliteFile(PathBuf::from(path)))
    }
}

pub fn open_store(backend: &StoreBackend) -> Result<Arc<dyn CapsuleStore>> {
    let store: Arc<dyn CapsuleStore> = match backend {
        StoreBackend::SqliteFile(path) => Arc::new(SqliteStore::open(path)?),
        StoreBackend::SqliteMemory => Arc::new(SqliteStore::open_in_memory()?),
        StoreBackend::Memory => {
            info!("Using in-memory capsule store; capsules will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_urls() {
        assert_eq!(
            StoreBackend::from_url("sqlite://database.db").unwrap(),
            StoreBackend::SqliteFile(PathBuf::from("database.db"))
        );
        assert_eq!(
            StoreBackend::from_url("sqlite:///var/lib/keepsake/capsules.db").unwrap(),
            StoreBackend::SqliteFile(PathBuf::from("/var/lib/keepsake/capsules.db"))
        );
        assert_eq!(
            StoreBackend::from_url("capsules.db").unwrap(),
            StoreBackend::SqliteFile(PathBuf::from("capsules.db"))
        );
        assert_eq!(StoreBackend::from_url("sqlite::memory:").unwrap(), StoreBackend::SqliteMemory);
        assert_eq!(StoreBackend::from_url("memory://").unwrap(), StoreBackend::Memory);
    }

    #[test]
    fn rejects_networked_and_empty_urls() {
        assert!(StoreBackend::from_url("postgres://user@host/db").is_err());
        assert!(StoreBackend::from_url("postgresql://host/db").is_err());
        assert!(StoreBackend::from_url("sqlite://").is_err());
    }

    #[test]
    fn factory_opens_every_local_backend() {
        for backend in [StoreBackend::SqliteMemory, StoreBackend::Memory] {
            let store = open_store(&backend).unwrap();
            assert!(store.get_by_id("missing").unwrap().is_none());
        }
    }
}
