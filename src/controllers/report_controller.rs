use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::booking_controller::parse_status_filter;
use crate::dto::report_dto::ReportParams;
use crate::models::booking::BookingQuery;
use crate::models::report::{BookingReport, ReportFilters};
use crate::repositories::BookingStore;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{field_error, optional_query_value, validate_date, validate_date_range};

pub struct ReportController {
    store: Arc<dyn BookingStore>,
}

impl ReportController {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Generar el reporte de reservas con los filtros de la query
    pub async fn generate(&self, params: &ReportParams) -> AppResult<BookingReport> {
        let filters = parse_report_filters(params)?;

        let query = BookingQuery {
            status: filters.status,
            client_id: None,
            start_from: filters.start_date,
            start_to: filters.end_date,
        };

        let bookings = self.store.list_all(&query).await?;
        let report = BookingReport::build(&bookings, filters, Utc::now());

        info!(
            "📊 Reporte generado: {} reservas, ingresos {}",
            report.summary.total_bookings, report.summary.total_revenue
        );

        Ok(report)
    }
}

pub fn parse_report_filters(params: &ReportParams) -> AppResult<ReportFilters> {
    let parse_date = |field: &'static str, value: Option<&str>| {
        optional_query_value(value)
            .map(|raw| validate_date(raw).map_err(|e| field_error(field, e)))
            .transpose()
            .map_err(AppError::Validation)
    };

    let start_date = parse_date("startDate", params.start_date.as_deref())?;
    let end_date = parse_date("endDate", params.end_date.as_deref())?;

    validate_date_range(start_date, end_date)
        .map_err(|e| AppError::Validation(field_error("startDate", e)))?;

    Ok(ReportFilters {
        status: parse_status_filter(params.status.as_deref())?,
        start_date,
        end_date,
    })
}
