//! Configuración de persistencia

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clave bajo la que se guarda la garagem
pub const DEFAULT_STORAGE_KEY: &str = "garagemVirtual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            other => Err(other.to_string()),
        }
    }
}

/// Configuración del almacén
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directorio del backend `file`
    pub path: String,
    pub redis_url: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "./data".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Redis".parse::<StorageBackend>(), Ok(StorageBackend::Redis));
        assert_eq!(" file ".parse::<StorageBackend>(), Ok(StorageBackend::File));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("sqlite".parse::<StorageBackend>(), Err("sqlite".to_string()));
    }
}
