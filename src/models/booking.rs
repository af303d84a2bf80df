//! Modelo de Booking
//!
//! Una reserva de un vehículo por parte de un cliente. La tabla `bookings`
//! es plana; `BookingRow` la mapea tal cual y `Booking` agrupa los campos
//! en sub-objetos (periodo, precios, ubicaciones, reseña).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::booking_status::BookingStatus;

/// Periodo de alquiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPeriod {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub total_days: i32,
}

/// Desglose de precios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub daily_rate: Decimal,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub security_deposit: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReview {
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reserva principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub reference_code: String,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_owner_id: Uuid,
    pub rental_period: RentalPeriod,
    pub pricing: PricingBreakdown,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub special_requirements: Option<String>,
    pub status: BookingStatus,
    pub status_reason: Option<String>,
    pub approved_by: Option<Uuid>,
    pub cancelled_by: Option<Uuid>,
    pub review: Option<BookingReview>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Cliente, propietario del vehículo o admin pueden ver la reserva
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.vehicle_owner_id == user_id
    }
}

/// Fila de `bookings` con la reseña unida por LEFT JOIN
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub reference_code: String,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_owner_id: Uuid,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub total_days: i32,
    pub daily_rate: Decimal,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub security_deposit: Decimal,
    pub total_amount: Decimal,
    pub pickup_address: String,
    pub pickup_city: Option<String>,
    pub dropoff_address: String,
    pub dropoff_city: Option<String>,
    pub special_requirements: Option<String>,
    pub status: BookingStatus,
    pub status_reason: Option<String>,
    pub approved_by: Option<Uuid>,
    pub cancelled_by: Option<Uuid>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub review_rating: Option<i16>,
    pub review_comment: Option<String>,
    pub review_created_at: Option<DateTime<Utc>>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        let review = match (row.review_rating, row.review_created_at) {
            (Some(rating), Some(created_at)) => Some(BookingReview {
                rating,
                comment: row.review_comment,
                created_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            reference_code: row.reference_code,
            client_id: row.client_id,
            vehicle_id: row.vehicle_id,
            vehicle_owner_id: row.vehicle_owner_id,
            rental_period: RentalPeriod {
                start_date: row.start_date,
                start_time: row.start_time,
                end_date: row.end_date,
                end_time: row.end_time,
                total_days: row.total_days,
            },
            pricing: PricingBreakdown {
                daily_rate: row.daily_rate,
                subtotal: row.subtotal,
                service_fee: row.service_fee,
                taxes: row.taxes,
                security_deposit: row.security_deposit,
                total: row.total_amount,
            },
            pickup_location: Location {
                address: row.pickup_address,
                city: row.pickup_city,
            },
            dropoff_location: Location {
                address: row.dropoff_address,
                city: row.dropoff_city,
            },
            special_requirements: row.special_requirements,
            status: row.status,
            status_reason: row.status_reason,
            approved_by: row.approved_by,
            cancelled_by: row.cancelled_by,
            review,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Entrada del historial de estados (auditoría)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatusHistory {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub from_status: BookingStatus,
    pub to_status: BookingStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
}

/// Filtros para listados de reservas
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub client_id: Option<Uuid>,
    pub start_from: Option<NaiveDate>,
    pub start_to: Option<NaiveDate>,
}

impl BookingQuery {
    /// Misma semántica que el WHERE de la consulta SQL
    pub fn matches(&self, booking: &Booking) -> bool {
        let start = booking.rental_period.start_date;

        self.status.map_or(true, |s| booking.status == s)
            && self.client_id.map_or(true, |c| booking.client_id == c)
            && self.start_from.map_or(true, |from| start >= from)
            && self.start_to.map_or(true, |to| start <= to)
    }
}

/// Metadatos de un cambio de estado: quién lo hizo y quién aprueba/cancela
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChangeActor {
    pub changed_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub cancelled_by: Option<Uuid>,
}

/// Reseña nueva a persistir
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: i16,
    pub comment: Option<String>,
}
