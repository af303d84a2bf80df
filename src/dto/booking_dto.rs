use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::Booking;
use crate::models::booking_status::{BookingStatus, StatusChange};
use crate::repositories::Page;
use crate::utils::validation::validate_not_empty;

// Query del listado admin: ?page=&limit=&status=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

// Query del listado de un cliente: ?status=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientBookingParams {
    pub status: Option<String>,
}

// Body de PUT /api/bookings/:id/status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<Uuid>,

    /// Estado que vio quien envía el cambio; si difiere del persistido, 409
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<BookingStatus>,
}

impl From<&StatusChange> for UpdateBookingStatusRequest {
    fn from(change: &StatusChange) -> Self {
        Self {
            status: change.to,
            reason: change.reason.clone(),
            notes: change.notes.clone(),
            approved_by: None,
            cancelled_by: None,
            expected_status: Some(change.from),
        }
    }
}

// Body de PUT /api/bookings/:id/cancel
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    #[validate(custom = "validate_not_empty", length(max = 1000))]
    pub reason: String,
}

// Body de POST /api/bookings/:id/review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

// Response del listado paginado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    pub pagination: PaginationInfo,
}

impl From<Page<Booking>> for BookingListResponse {
    fn from(page: Page<Booking>) -> Self {
        let pagination = PaginationInfo {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages(),
        };

        Self {
            bookings: page.items,
            pagination,
        }
    }
}
