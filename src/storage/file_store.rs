//! Almacén en disco: un archivo `<clave>.json` por clave

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Crea el directorio si no existe
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(anyhow!("Clave de almacenamiento inválida: '{}'", key));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => {
                debug!("📥 Leído {} ({} bytes)", path.display(), value.len());
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        debug!("💾 Escrito {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("garagem_file_store_{}", Uuid::new_v4().simple()))
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).await.unwrap();

        assert_eq!(store.get("garagemVirtual").await.unwrap(), None);
        store.set("garagemVirtual", r#"[{"id":"a"}]"#).await.unwrap();
        assert_eq!(
            store.get("garagemVirtual").await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );

        store.set("garagemVirtual", "[]").await.unwrap();
        assert_eq!(store.get("garagemVirtual").await.unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_like_keys() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).await.unwrap();

        assert!(store.set("../escape", "x").await.is_err());
        assert!(store.get("").await.is_err());

        let _ = std::fs::remove_dir_all(dir);
    }
}
