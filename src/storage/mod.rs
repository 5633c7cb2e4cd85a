//! Persistencia key-value
//!
//! La garagem se guarda como un único string JSON bajo una clave fija.
//! Este módulo define el contrato del almacén y sus backends.

pub mod file_store;
pub mod memory_store;
pub mod redis_store;
pub mod storage_config;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use storage_config::{StorageBackend, StorageConfig};

/// Almacén key-value de strings
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Construir el backend configurado
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.path).await?),
        StorageBackend::Redis => Arc::new(RedisStore::new(config).await?),
    };
    tracing::info!("💾 Persistência configurada: {:?}", config.backend);
    Ok(store)
}
