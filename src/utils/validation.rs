//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de parámetros de query.

use chrono::NaiveDate;
use validator::{ValidationError, ValidationErrors};

use crate::models::booking_status::BookingStatus;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
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

/// Validar y convertir un estado de reserva recibido como texto
pub fn validate_booking_status(value: &str) -> Result<BookingStatus, ValidationError> {
    value.parse::<BookingStatus>().map_err(|_| {
        let mut error = ValidationError::new("booking_status");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Parámetro de query opcional: vacío o "all" equivalen a sin filtro
pub fn optional_query_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Validar un rango de fechas inclusivo
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            let mut error = ValidationError::new("date_range");
            error.add_param("start".into(), &start.to_string());
            error.add_param("end".into(), &end.to_string());
            return Err(error);
        }
    }
    Ok(())
}

/// Envolver un error de campo en `ValidationErrors`
pub fn field_error(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Normalizar página y límite: página >= 1, límite en 1..=max (max al menos 1)
pub fn normalize_pagination(
    page: Option<u32>,
    limit: Option<u32>,
    default_limit: u32,
    max_limit: u32,
) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("no availability").is_ok());
        assert!(validate_not_empty(" \t ").is_err());
    }

    #[test]
    fn test_validate_booking_status() {
        assert_eq!(validate_booking_status("payment_pending"), Ok(BookingStatus::PaymentPending));
        assert!(validate_booking_status("PAID").is_err());
    }

    #[test]
    fn test_optional_query_value() {
        assert_eq!(optional_query_value(Some("all")), None);
        assert_eq!(optional_query_value(Some(" ")), None);
        assert_eq!(optional_query_value(Some("paid")), Some("paid"));
        assert_eq!(optional_query_value(None), None);
    }

    #[test]
    fn test_validate_date_range() {
        let a = NaiveDate::from_ymd_opt(2026, 1, 1);
        let b = NaiveDate::from_ymd_opt(2026, 2, 1);
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(a, a).is_ok());
        assert!(validate_date_range(b, a).is_err());
        assert!(validate_date_range(None, a).is_ok());
    }

    #[test]
    fn test_normalize_pagination() {
        assert_eq!(normalize_pagination(None, None, 10, 100), (1, 10));
        assert_eq!(normalize_pagination(Some(0), Some(500), 10, 100), (1, 100));
        assert_eq!(normalize_pagination(Some(3), Some(0), 10, 100), (3, 1));
    }

    #[test]
    fn test_normalize_pagination_zero_max() {
        assert_eq!(normalize_pagination(None, None, 10, 0), (1, 1));
        assert_eq!(normalize_pagination(Some(2), Some(50), 0, 0), (2, 1));
    }
}
