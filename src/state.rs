//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. La garagem es la única fuente de verdad y
//! cada acción la usa con acceso exclusivo.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::environment::EnvironmentConfig;
use crate::services::{GarageService, WeatherService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub garage: Arc<Mutex<GarageService>>,
    pub weather: WeatherService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, garage: GarageService, weather: WeatherService) -> Self {
        Self {
            config,
            garage: Arc::new(Mutex::new(garage)),
            weather,
        }
    }
}
