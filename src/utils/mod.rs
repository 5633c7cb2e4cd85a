//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y formateo de valores para la UI.

pub mod errors;
pub mod format;
pub mod validation;
