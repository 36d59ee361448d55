//! Utilidades de validación
//!
//! Validadores `custom` para los payloads de entrada (`validator`).

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::max_money;

fn money_range_error(value: &Decimal) -> ValidationError {
    let mut error = ValidationError::new("money_range");
    error.add_param("value".into(), &value.to_string());
    error.add_param("max".into(), &max_money().to_string());
    error
}

/// Código ISO 4217: tres letras mayúsculas
pub fn validate_currency(value: &str) -> Result<(), ValidationError> {
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        let mut error = ValidationError::new("currency");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"ISO 4217, e.g. EUR".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un importe sea no negativo
pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    if *value > max_money() {
        return Err(money_range_error(value));
    }
    Ok(())
}

/// Validar que un importe sea positivo
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    if *value > max_money() {
        return Err(money_range_error(value));
    }
    Ok(())
}
