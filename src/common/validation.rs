// src/common/validation.rs

use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::common::error::AppError;

/// Formulários que reportam apenas o primeiro campo inválido,
/// na ordem em que os campos aparecem no formulário.
pub trait ValidateForm: Validate {
    const FIELD_ORDER: &'static [&'static str];

    fn validate_form(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|errors| AppError::ValidationError(first_error_message(&errors, Self::FIELD_ORDER)))
    }
}

pub fn first_error_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.errors();

    let ordered = field_order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values());

    for kind in ordered {
        if let ValidationErrorsKind::Field(list) = kind {
            if let Some(message) = list.iter().find_map(|e| e.message.as_ref()) {
                return message.to_string();
            }
        }
    }

    "Data yang dikirim tidak valid.".to_string()
}

// ---
// Validações customizadas
// ---
fn price_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

/// Preço cabe em `NUMERIC(14, 2)`: positivo, até 2 casas decimais e menor que 10^12.
pub fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        return Err(price_error("Harga harus lebih besar dari 0"));
    }
    if val.normalize().scale() > 2 {
        return Err(price_error("Harga maksimal memiliki 2 angka desimal"));
    }
    if *val >= Decimal::from(1_000_000_000_000i64) {
        return Err(price_error("Harga terlalu besar"));
    }
    Ok(())
}

pub fn validate_steps(steps: &[String]) -> Result<(), ValidationError> {
    if steps.is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("Setidaknya satu langkah diperlukan".into());
        return Err(err);
    }
    if steps.iter().any(|s| s.trim().is_empty()) {
        let mut err = ValidationError::new("length");
        err.message = Some("Langkah tidak boleh kosong".into());
        return Err(err);
    }
    Ok(())
}
