use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{
    BookingListParams, BookingListResponse, CancelBookingRequest, ClientBookingParams,
    CreateReviewRequest, UpdateBookingStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{Booking, BookingQuery, BookingStatusHistory, NewReview, StatusChangeActor};
use crate::models::booking_status::{BookingStatus, StatusChange};
use crate::repositories::{BookingStore, Pagination};
use crate::utils::errors::{bad_request_error, forbidden_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{
    field_error, normalize_pagination, optional_query_value, validate_booking_status,
};

pub struct BookingController {
    store: Arc<dyn BookingStore>,
}

impl BookingController {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    async fn load(&self, id: Uuid) -> AppResult<Booking> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))
    }

    pub async fn list_admin(
        &self,
        params: BookingListParams,
        default_limit: u32,
        max_limit: u32,
    ) -> AppResult<BookingListResponse> {
        let (page, limit) = normalize_pagination(params.page, params.limit, default_limit, max_limit);
        let query = BookingQuery {
            status: parse_status_filter(params.status.as_deref())?,
            ..Default::default()
        };

        let page = self.store.list(&query, Pagination { page, limit }).await?;
        Ok(BookingListResponse::from(page))
    }

    pub async fn get_for_user(&self, id: Uuid, user: &AuthenticatedUser) -> AppResult<Booking> {
        let booking = self.load(id).await?;

        if !user.is_admin() && !booking.is_party(user.user_id) {
            return Err(forbidden_error("view booking", "not a party to this booking"));
        }

        Ok(booking)
    }

    /// Cambio de estado por un admin, validado contra la tabla de transiciones
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateBookingStatusRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<Booking> {
        request.validate()?;

        let booking = self.load(id).await?;

        if let Some(expected) = request.expected_status {
            if expected != booking.status {
                return Err(AppError::StaleStatus(format!(
                    "booking is '{}', expected '{}'",
                    booking.status, expected
                )));
            }
        }

        let change = StatusChange::new(booking.status, request.status, request.reason, request.notes)?;

        // approvedBy solo al confirmar, cancelledBy solo al cancelar
        let actor = StatusChangeActor {
            changed_by: Some(user.user_id),
            approved_by: (change.to == BookingStatus::Confirmed)
                .then(|| request.approved_by.unwrap_or(user.user_id)),
            cancelled_by: (change.to == BookingStatus::Cancelled)
                .then(|| request.cancelled_by.unwrap_or(user.user_id)),
        };

        let updated = self.store.update_status(id, &change, &actor).await?;

        info!(
            "📋 Reserva {} ({}): {} -> {} por {}",
            updated.reference_code, id, change.from, change.to, user.user_id
        );

        Ok(updated)
    }

    pub async fn history(&self, id: Uuid) -> AppResult<Vec<BookingStatusHistory>> {
        self.load(id).await?;
        self.store.status_history(id).await
    }

    pub async fn list_for_client(
        &self,
        client_id: Uuid,
        params: ClientBookingParams,
        user: &AuthenticatedUser,
    ) -> AppResult<Vec<Booking>> {
        if !user.can_act_for(client_id) {
            return Err(forbidden_error("list bookings", "bookings belong to another client"));
        }

        let query = BookingQuery {
            status: parse_status_filter(params.status.as_deref())?,
            client_id: Some(client_id),
            ..Default::default()
        };

        self.store.list_all(&query).await
    }

    /// Cancelación por el cliente; pasa por la misma tabla de transiciones
    pub async fn cancel(
        &self,
        id: Uuid,
        request: CancelBookingRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<Booking> {
        request.validate()?;

        let booking = self.load(id).await?;
        if !user.can_act_for(booking.client_id) {
            return Err(forbidden_error("cancel booking", "booking belongs to another client"));
        }

        let change = StatusChange::new(
            booking.status,
            BookingStatus::Cancelled,
            Some(request.reason),
            None,
        )?;

        let actor = StatusChangeActor {
            changed_by: Some(user.user_id),
            approved_by: None,
            cancelled_by: Some(user.user_id),
        };

        let updated = self.store.update_status(id, &change, &actor).await?;
        info!("🚫 Reserva {} cancelada por {}", updated.reference_code, user.user_id);

        Ok(updated)
    }

    pub async fn add_review(
        &self,
        id: Uuid,
        request: CreateReviewRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<Booking> {
        request.validate()?;

        let booking = self.load(id).await?;
        if booking.client_id != user.user_id {
            return Err(forbidden_error("review booking", "only the booking's client can review it"));
        }
        if booking.status != BookingStatus::Completed {
            return Err(bad_request_error("Only completed bookings can be reviewed"));
        }
        if booking.review.is_some() {
            return Err(AppError::Conflict("Booking already has a review".to_string()));
        }

        let review = NewReview {
            rating: request.rating,
            comment: request
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };

        self.store.add_review(id, &review).await
    }
}

/// Filtro de estado de un parámetro de query ("all" o vacío = sin filtro)
pub fn parse_status_filter(value: Option<&str>) -> AppResult<Option<BookingStatus>> {
    optional_query_value(value)
        .map(|raw| validate_booking_status(raw).map_err(|e| field_error("status", e)))
        .transpose()
        .map_err(AppError::Validation)
}
