use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BookingStore, Page, Pagination};
use crate::models::booking::{
    Booking, BookingQuery, BookingRow, BookingStatusHistory, NewReview, StatusChangeActor,
};
use crate::models::booking_status::StatusChange;
use crate::utils::errors::{not_found_error, AppError, AppResult};

const BOOKING_SELECT: &str = r#"
    SELECT
        b.id, b.reference_code, b.client_id, b.vehicle_id, b.vehicle_owner_id,
        b.start_date, b.start_time, b.end_date, b.end_time, b.total_days,
        b.daily_rate, b.subtotal, b.service_fee, b.taxes, b.security_deposit, b.total_amount,
        b.pickup_address, b.pickup_city, b.dropoff_address, b.dropoff_city,
        b.special_requirements, b.status, b.status_reason, b.approved_by, b.cancelled_by,
        b.version, b.created_at, b.updated_at,
        r.rating AS review_rating, r.comment AS review_comment, r.created_at AS review_created_at
    FROM bookings b
    LEFT JOIN booking_reviews r ON r.booking_id = b.id
"#;

// Mismo orden de parámetros en todas las consultas filtradas: $1..$4
const BOOKING_FILTER: &str = r#"
    WHERE ($1::booking_status IS NULL OR b.status = $1)
      AND ($2::uuid IS NULL OR b.client_id = $2)
      AND ($3::date IS NULL OR b.start_date >= $3)
      AND ($4::date IS NULL OR b.start_date <= $4)
"#;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, query: &BookingQuery) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM bookings b {}", BOOKING_FILTER);
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(query.status)
            .bind(query.client_id)
            .bind(query.start_from)
            .bind(query.start_to)
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl BookingStore for PgBookingRepository {
    async fn list(&self, query: &BookingQuery, pagination: Pagination) -> AppResult<Page<Booking>> {
        let sql = format!(
            "{} {} ORDER BY b.created_at DESC LIMIT $5 OFFSET $6",
            BOOKING_SELECT, BOOKING_FILTER
        );

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(query.status)
            .bind(query.client_id)
            .bind(query.start_from)
            .bind(query.start_to)
            .bind(i64::from(pagination.limit))
            .bind(pagination.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let total = self.count(query).await?;

        Ok(Page {
            items: rows.into_iter().map(Booking::from).collect(),
            total,
            page: pagination.page,
            limit: pagination.limit,
        })
    }

    async fn list_all(&self, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        let sql = format!("{} {} ORDER BY b.created_at DESC", BOOKING_SELECT, BOOKING_FILTER);

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(query.status)
            .bind(query.client_id)
            .bind(query.start_from)
            .bind(query.start_to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let sql = format!("{} WHERE b.id = $1", BOOKING_SELECT);

        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Booking::from))
    }

    async fn update_status(
        &self,
        id: Uuid,
        change: &StatusChange,
        actor: &StatusChangeActor,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE bookings
            SET status = $3,
                status_reason = $4,
                approved_by = COALESCE($5, approved_by),
                cancelled_by = COALESCE($6, cancelled_by),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(change.from)
        .bind(change.to)
        .bind(&change.reason)
        .bind(actor.approved_by)
        .bind(actor.cancelled_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_actor_error)?;

        if updated.is_none() {
            tx.rollback().await?;
            return Err(match self.find_by_id(id).await? {
                None => not_found_error("Booking", &id.to_string()),
                Some(current) => AppError::StaleStatus(format!(
                    "booking is '{}', expected '{}'",
                    current.status, change.from
                )),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO booking_status_history (
                id, booking_id, from_status, to_status, reason, notes, changed_by, changed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(change.from)
        .bind(change.to)
        .bind(&change.reason)
        .bind(&change.notes)
        .bind(actor.changed_by)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(map_actor_error)?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))
    }

    async fn status_history(&self, id: Uuid) -> AppResult<Vec<BookingStatusHistory>> {
        let history = sqlx::query_as::<_, BookingStatusHistory>(
            r#"
            SELECT id, booking_id, from_status, to_status, reason, notes, changed_by, changed_at
            FROM booking_status_history
            WHERE booking_id = $1
            ORDER BY changed_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    async fn add_review(&self, id: Uuid, review: &NewReview) -> AppResult<Booking> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO booking_reviews (booking_id, rating, comment, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (booking_id) DO NOTHING
            RETURNING booking_id
            "#,
        )
        .bind(id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_none() {
            return Err(AppError::Conflict("Booking already has a review".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))
    }
}

/// Un id de aprobador/cancelador que no existe en users viola la FK: es un 400
fn map_actor_error(err: sqlx::Error) -> AppError {
    match err.as_database_error() {
        Some(db) if db.is_foreign_key_violation() => {
            AppError::BadRequest("Referenced user does not exist".to_string())
        }
        _ => AppError::Database(err),
    }
}
