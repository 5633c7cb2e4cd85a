//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto; un valor presente pero inválido es un error.

use std::env;
use std::str::FromStr;

use crate::services::WeatherConfig;
use crate::storage::{StorageBackend, StorageConfig};
use crate::utils::errors::ConfigError;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub storage: StorageConfig,
    pub weather: WeatherConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            storage: StorageConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage = StorageConfig {
            backend: parse_var::<StorageBackend>("STORAGE_BACKEND", var("STORAGE_BACKEND"))?
                .unwrap_or(defaults.storage.backend),
            path: var("STORAGE_PATH").unwrap_or(defaults.storage.path),
            redis_url: var("REDIS_URL").unwrap_or(defaults.storage.redis_url),
            key: var("STORAGE_KEY").unwrap_or(defaults.storage.key),
        };

        let weather = WeatherConfig {
            api_key: var("OPENWEATHER_API_KEY"),
            base_url: var("OPENWEATHER_BASE_URL").unwrap_or(defaults.weather.base_url),
            timeout_secs: parse_var("WEATHER_TIMEOUT_SECS", var("WEATHER_TIMEOUT_SECS"))?
                .unwrap_or(defaults.weather.timeout_secs),
        };

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", var("PORT"))?.unwrap_or(defaults.port),
            host: var("HOST").unwrap_or(defaults.host),
            cors_origins: var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            storage,
            weather,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    match value {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();

        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.key, "garagemVirtual");
        assert!(config.weather.api_key.is_none());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_reads_variables() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8080"),
            ("STORAGE_BACKEND", "redis"),
            ("REDIS_URL", "redis://cache:6379"),
            ("OPENWEATHER_API_KEY", "abc"),
            ("CORS_ORIGINS", "http://a.com, http://b.com,"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Redis);
        assert_eq!(config.storage.redis_url, "redis://cache:6379");
        assert_eq!(config.weather.api_key.as_deref(), Some("abc"));
        assert_eq!(config.cors_origins, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = EnvironmentConfig::from_lookup(lookup(&[("PORT", "tres mil")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "PORT", .. }));

        let err = EnvironmentConfig::from_lookup(lookup(&[("STORAGE_BACKEND", "sqlite")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "STORAGE_BACKEND", .. }));
    }
}
