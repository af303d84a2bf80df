//! Reportes administrativos de reservas
//!
//! Resumen por estado e ingresos, más una fila por reserva. Se exporta
//! en JSON o CSV.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking::Booking;
use super::booking_status::BookingStatus;

/// Filtros del reporte ya validados
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    pub status: Option<BookingStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_bookings: usize,
    pub by_status: BTreeMap<String, usize>,
    pub total_revenue: Decimal,
    pub average_booking_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub booking_id: Uuid,
    pub reference_code: String,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i32,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for ReportRow {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            reference_code: booking.reference_code.clone(),
            client_id: booking.client_id,
            vehicle_id: booking.vehicle_id,
            start_date: booking.rental_period.start_date,
            end_date: booking.rental_period.end_date,
            total_days: booking.rental_period.total_days,
            total_amount: booking.pricing.total,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReport {
    pub generated_at: DateTime<Utc>,
    pub filters: ReportFilters,
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
}

const CSV_HEADER: [&str; 10] = [
    "Booking ID",
    "Reference",
    "Client ID",
    "Vehicle ID",
    "Start Date",
    "End Date",
    "Total Days",
    "Total Amount",
    "Status",
    "Created At",
];

impl BookingReport {
    pub fn build(bookings: &[Booking], filters: ReportFilters, generated_at: DateTime<Utc>) -> Self {
        let mut by_status = BTreeMap::new();
        let mut total_revenue = Decimal::ZERO;
        let mut revenue_count = 0u32;

        for booking in bookings {
            *by_status.entry(booking.status.to_string()).or_insert(0) += 1;
            if booking.status.counts_as_revenue() {
                total_revenue += booking.pricing.total;
                revenue_count += 1;
            }
        }

        let average_booking_value = if revenue_count == 0 {
            Decimal::ZERO
        } else {
            (total_revenue / Decimal::from(revenue_count)).round_dp(2)
        };

        Self {
            generated_at,
            filters,
            summary: ReportSummary {
                total_bookings: bookings.len(),
                by_status,
                total_revenue,
                average_booking_value,
            },
            rows: bookings.iter().map(ReportRow::from).collect(),
        }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

        for row in &self.rows {
            push_csv_line(
                &mut out,
                [
                    row.booking_id.to_string(),
                    row.reference_code.clone(),
                    row.client_id.to_string(),
                    row.vehicle_id.to_string(),
                    row.start_date.to_string(),
                    row.end_date.to_string(),
                    row.total_days.to_string(),
                    row.total_amount.to_string(),
                    row.status.to_string(),
                    row.created_at.to_rfc3339(),
                ]
                .into_iter(),
            );
        }

        out
    }

    pub fn csv_filename(&self) -> String {
        format!("bookings-report-{}.csv", self.generated_at.format("%Y-%m-%d"))
    }
}

fn push_csv_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| escape_csv_field(&f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Comillas dobles si el campo contiene separador, comillas o saltos de línea
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
