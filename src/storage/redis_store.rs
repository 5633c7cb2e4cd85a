use anyhow::Result;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info};

use super::{KeyValueStore, StorageConfig};

/// Almacén Redis con connection manager. Las claves no expiran.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Conectar y verificar con PING
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        let store = Self { manager };
        if !store.is_connected().await {
            error!("❌ Redis não respondeu ao PING");
            anyhow::bail!("Redis não respondeu ao PING em {}", config.redis_url);
        }

        info!("✅ Redis conectado exitosamente");
        Ok(store)
    }

    /// Clave con prefijo del proyecto
    fn make_key(key: &str) -> String {
        format!("garagem_virtual:{}", key)
    }

    /// Verificar si Redis está conectado
    pub async fn is_connected(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(Self::make_key(key)).await?;
        debug!("📥 Redis GET {}: {}", key, if value.is_some() { "HIT" } else { "MISS" });
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let result: RedisResult<()> = conn.set(Self::make_key(key), value).await;

        match result {
            Ok(()) => {
                debug!("💾 Redis SET {} ({} bytes)", key, value.len());
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando en Redis la clave {}: {}", key, e);
                Err(anyhow::anyhow!("Error de Redis: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key_is_prefixed() {
        assert_eq!(RedisStore::make_key("garagemVirtual"), "garagem_virtual:garagemVirtual");
    }

    #[tokio::test]
    async fn test_redis_store_round_trip() {
        // Requiere un Redis accesible en REDIS_URL
        let Ok(redis_url) = std::env::var("REDIS_URL") else {
            println!("⚠️ Skipping test: REDIS_URL not set");
            return;
        };

        let config = StorageConfig {
            redis_url,
            ..StorageConfig::default()
        };
        let store = match RedisStore::new(&config).await {
            Ok(store) => store,
            Err(e) => {
                println!("⚠️ Skipping test: {}", e);
                return;
            }
        };

        assert!(store.is_connected().await);
        store.set("test_round_trip", "[]").await.unwrap();
        assert_eq!(store.get("test_round_trip").await.unwrap().as_deref(), Some("[]"));
    }
}
