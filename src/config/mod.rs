//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del entorno: servidor HTTP,
//! persistencia de la garagem y proveedor del clima.

pub mod environment;

pub use environment::*;
