//! Garagem Virtual
//!
//! Simulador de garagem: vehículos con acciones y historial de manutenção,
//! persistidos como un único blob JSON, más un proxy de previsión del clima.

pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
