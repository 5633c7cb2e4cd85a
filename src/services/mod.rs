//! Services module
//!
//! Este módulo contiene la lógica de aplicación alrededor del núcleo:
//! la persistencia de la garagem y el proxy de previsión del tiempo.

pub mod garage_service;
pub mod weather_service;

pub use garage_service::{GarageService, GarageStatus};
pub use weather_service::{CityForecast, DailyForecast, WeatherConfig, WeatherService};
