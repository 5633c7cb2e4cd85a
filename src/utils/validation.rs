//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada (placas, cantidades de carga, textos obligatorios).

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Placa antigua (`ABC1234` / `ABC-1234`) o Mercosul (`ABC1D23`)
    static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").unwrap();
}

/// Normalizar una placa: mayúsculas, sin espacios ni guión
pub fn normalize_plate(value: &str) -> String {
    value
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Validar formato de placa
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    if !PLATE_REGEX.is_match(&value.trim().to_uppercase()) {
        let mut error = ValidationError::new("plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"AAA1234 | AAA1A23".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que una cantidad sea un número finito y positivo
pub fn validate_positive_amount(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        let mut error = ValidationError::new("positive_amount");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("ABC1234").is_ok());
        assert!(validate_plate("abc-1234").is_ok());
        assert!(validate_plate("BRA2E19").is_ok());
        assert!(validate_plate("AB1234").is_err());
        assert!(validate_plate("ABCD123").is_err());
        assert!(validate_plate("").is_err());
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate(" abc-1234 "), "ABC1234");
        assert_eq!(normalize_plate("bra 2e19"), "BRA2E19");
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(matches!(validate_positive_amount(10.5), Ok(v) if v == 10.5));
        assert!(validate_positive_amount(0.0).is_err());
        assert!(validate_positive_amount(-3.0).is_err());
        assert!(validate_positive_amount(f64::NAN).is_err());
        assert!(validate_positive_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Revisão").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }
}
